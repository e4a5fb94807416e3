use crate::services::{Library, LibraryError, Theme};
use crate::types::{parse_resource_id, LibraryKey};
use actix_web::web::{Data, Json, Path};
use actix_web::{HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use source_providers::Catalog;
use std::sync::Arc;
use tracing::error;

#[derive(Deserialize)]
pub(crate) struct ItemBody {
    catalog: Catalog,
    resource_id: String,
    title: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct ThemeBody {
    theme: Theme,
}

fn storage_failure(error: LibraryError) -> HttpResponse {
    error!(?error, "Library operation failed");

    HttpResponse::InternalServerError().finish()
}

fn item_key(catalog: Catalog, resource_id: &str) -> Result<LibraryKey, HttpResponse> {
    match parse_resource_id(resource_id) {
        Ok(resource_id) => Ok(LibraryKey {
            catalog,
            resource_id,
        }),
        Err(error) => Err(HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": error.to_string() }))),
    }
}

pub(crate) async fn get_history(library: Data<Arc<Library>>) -> impl Responder {
    match library.history().await {
        Ok(history) => HttpResponse::Ok().json(history),
        Err(error) => storage_failure(error),
    }
}

pub(crate) async fn record_view(
    library: Data<Arc<Library>>,
    body: Json<ItemBody>,
) -> impl Responder {
    let ItemBody {
        catalog,
        resource_id,
        title,
    } = body.into_inner();

    let key = match item_key(catalog, &resource_id) {
        Ok(key) => key,
        Err(response) => return response,
    };

    match library.record_view(key, title).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => storage_failure(error),
    }
}

pub(crate) async fn clear_history(library: Data<Arc<Library>>) -> impl Responder {
    match library.clear_history().await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => storage_failure(error),
    }
}

pub(crate) async fn get_wishlist(library: Data<Arc<Library>>) -> impl Responder {
    match library.wishlist().await {
        Ok(wishlist) => HttpResponse::Ok().json(wishlist),
        Err(error) => storage_failure(error),
    }
}

pub(crate) async fn add_to_wishlist(
    library: Data<Arc<Library>>,
    body: Json<ItemBody>,
) -> impl Responder {
    let ItemBody {
        catalog,
        resource_id,
        title,
    } = body.into_inner();

    let key = match item_key(catalog, &resource_id) {
        Ok(key) => key,
        Err(response) => return response,
    };

    match library.add_to_wishlist(key, title).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => storage_failure(error),
    }
}

pub(crate) async fn remove_from_wishlist(
    library: Data<Arc<Library>>,
    path: Path<(Catalog, String)>,
) -> impl Responder {
    let (catalog, resource_id) = path.into_inner();

    let key = match item_key(catalog, &resource_id) {
        Ok(key) => key,
        Err(response) => return response,
    };

    match library.remove_from_wishlist(&key).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => storage_failure(error),
    }
}

pub(crate) async fn get_theme(library: Data<Arc<Library>>) -> impl Responder {
    match library.theme().await {
        Ok(theme) => HttpResponse::Ok().json(ThemeBody { theme }),
        Err(error) => storage_failure(error),
    }
}

pub(crate) async fn set_theme(
    library: Data<Arc<Library>>,
    body: Json<ThemeBody>,
) -> impl Responder {
    match library.set_theme(body.theme).await {
        Ok(()) => HttpResponse::Ok().json(body.into_inner()),
        Err(error) => storage_failure(error),
    }
}
