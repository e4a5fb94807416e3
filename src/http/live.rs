use crate::services::LiveMatches;
use actix_web::web::Data;
use actix_web::{HttpResponse, Responder};
use std::sync::Arc;

pub(crate) async fn list_live_matches(live_matches: Data<Arc<LiveMatches>>) -> impl Responder {
    HttpResponse::Ok().json(live_matches.list().await)
}
