use crate::services::ViewRegistry;
use crate::types::{parse_resource_id, ViewId};
use aggregation::{CandidateKey, SelectionError};
use actix_web::web::{Data, Json, Path, Query};
use actix_web::{HttpResponse, Responder};
use serde::Deserialize;
use source_providers::Catalog;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const MAX_WAIT_MS: u64 = 30_000;

#[derive(Deserialize)]
pub(crate) struct RequestBody {
    catalog: Catalog,
    resource_id: String,
    #[serde(default)]
    source_ids: HashMap<String, String>,
}

#[derive(Deserialize)]
pub(crate) struct SelectBody {
    key: String,
}

#[derive(Deserialize)]
pub(crate) struct SnapshotQuery {
    #[serde(default)]
    wait_ms: u64,
}

pub(crate) async fn open_view() -> impl Responder {
    let view_id = Uuid::new_v4().to_string();

    HttpResponse::Created().json(serde_json::json!({ "view_id": view_id }))
}

pub(crate) async fn request_sources(
    registry: Data<Arc<ViewRegistry>>,
    view_id: Path<String>,
    body: Json<RequestBody>,
) -> impl Responder {
    let view_id = ViewId(view_id.into_inner());
    let RequestBody {
        catalog,
        resource_id,
        source_ids,
    } = body.into_inner();

    let resource_id = match parse_resource_id(&resource_id) {
        Ok(resource_id) => resource_id,
        Err(error) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": error.to_string() }))
        }
    };

    let source_ids = match source_ids
        .into_iter()
        .map(|(source, id)| parse_resource_id(&id).map(|id| (source, id)))
        .collect::<Result<HashMap<_, _>, _>>()
    {
        Ok(source_ids) => source_ids,
        Err(error) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": error.to_string() }))
        }
    };

    let snapshot = registry
        .request(&view_id, catalog, resource_id, &source_ids)
        .await;

    HttpResponse::Ok().json(snapshot)
}

pub(crate) async fn get_snapshot(
    registry: Data<Arc<ViewRegistry>>,
    view_id: Path<String>,
    query: Query<SnapshotQuery>,
) -> impl Responder {
    let view_id = ViewId(view_id.into_inner());
    let wait = match query.wait_ms {
        0 => None,
        wait_ms => Some(Duration::from_millis(wait_ms.min(MAX_WAIT_MS))),
    };

    let snapshot = registry.snapshot(&view_id, wait).await;

    HttpResponse::Ok().json(snapshot)
}

pub(crate) async fn select_candidate(
    registry: Data<Arc<ViewRegistry>>,
    view_id: Path<String>,
    body: Json<SelectBody>,
) -> impl Responder {
    let view_id = ViewId(view_id.into_inner());
    let key = CandidateKey(body.into_inner().key);

    match registry.select(&view_id, &key).await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(error @ SelectionError::UnknownCandidate(_)) => {
            HttpResponse::NotFound().json(serde_json::json!({ "error": error.to_string() }))
        }
        Err(error @ SelectionError::NoActiveRequest) => {
            HttpResponse::Conflict().json(serde_json::json!({ "error": error.to_string() }))
        }
    }
}

pub(crate) async fn close_view(
    registry: Data<Arc<ViewRegistry>>,
    view_id: Path<String>,
) -> impl Responder {
    registry.close(&ViewId(view_id.into_inner())).await;

    HttpResponse::NoContent().finish()
}
