use crate::model::worker::Worker;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Workers API",
        version = "0.1.0",
        description = r#"
## Workers API

Read-only access to the `worker` table.

- `GET /api/v1/workers` returns every worker as a JSON array of
  `{id, fullname, email, active}` objects.

Schema lifecycle (readiness, reset, seed) is handled by the management CLI,
not over HTTP.
"#,
    ),
    paths(crate::api::worker::list_workers),
    components(schemas(Worker)),
    tags(
        (name = "Worker", description = "Worker listing"),
    )
)]
pub struct ApiDoc;
