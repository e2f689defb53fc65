use crate::db::Database;
use crate::model::worker::Worker;
use crate::serializer::Serializer;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use tracing::{debug, error};

/// List all workers
// The documented path assumes the default API_PREFIX; routes.rs mounts the
// handler under whatever prefix is configured.
#[utoipa::path(
    get,
    path = "/api/v1/workers",
    responses(
        (status = 200, description = "Every worker, in storage order", body = [Worker]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Worker"
)]
pub async fn list_workers(db: web::Data<Database>) -> actix_web::Result<impl Responder> {
    let workers = Worker::all(db.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch workers");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let records = Worker::serialize_list(&workers).map_err(|e| {
        error!(error = %e, "Failed to serialize workers");
        ErrorInternalServerError("Internal Server Error")
    })?;

    debug!(count = records.len(), "Returning workers");
    Ok(HttpResponse::Ok().json(records))
}
