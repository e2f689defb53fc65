use actix_web::http::StatusCode;
use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, test};
use serde_json::{Value, json};

use workers_api::config::Config;
use workers_api::db::Database;
use workers_api::manage::{self, SEED_EMAIL, SEED_FULLNAME};
use workers_api::model::worker::NewWorker;
use workers_api::routes;

fn test_config() -> Config {
    Config::from_lookup(|_| None).expect("default config")
}

async fn fresh_db() -> Database {
    let db = Database::connect_lazy("sqlite::memory:").expect("memory database");
    manage::create_db(&db).await.expect("schema");
    db
}

async fn get_workers(db: &Database) -> (StatusCode, Value) {
    let config = test_config();
    let app = test::init_service(
        App::new()
            .wrap(NormalizePath::trim())
            .app_data(Data::new(db.clone()))
            .configure(|cfg| routes::configure(cfg, &config)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/workers").to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, value)
}

#[actix_web::test]
async fn empty_table_returns_empty_array() {
    let db = fresh_db().await;

    let (status, body) = get_workers(&db).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn seeded_database_returns_the_admin_worker() {
    let db = fresh_db().await;
    manage::seed_db(&db).await.unwrap();

    let (status, body) = get_workers(&db).await;

    assert_eq!(status, StatusCode::OK);
    let workers = body.as_array().expect("array body");
    assert_eq!(workers.len(), 1);

    let worker = workers[0].as_object().expect("object");
    let keys: Vec<&str> = worker.keys().map(String::as_str).collect();
    assert_eq!(keys, ["id", "fullname", "email", "active"]);
    assert!(worker["id"].is_i64());
    assert_eq!(worker["fullname"], SEED_FULLNAME);
    assert_eq!(worker["email"], SEED_EMAIL);
    assert_eq!(worker["active"], true);
}

#[actix_web::test]
async fn every_row_is_listed_with_all_columns() {
    let db = fresh_db().await;
    NewWorker::new("Jane Roe", "jane@example.com")
        .insert(&db)
        .await
        .unwrap();
    NewWorker::new("John Doe", "john@example.com")
        .with_active(false)
        .insert(&db)
        .await
        .unwrap();

    let (status, body) = get_workers(&db).await;

    assert_eq!(status, StatusCode::OK);
    let workers = body.as_array().expect("array body");
    assert_eq!(workers.len(), 2);
    for worker in workers {
        let obj = worker.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["active", "email", "fullname", "id"]);
    }

    let john = workers
        .iter()
        .find(|w| w["fullname"] == "John Doe")
        .expect("John Doe listed");
    assert_eq!(john["active"], false);
}

#[actix_web::test]
async fn failed_second_seed_leaves_one_row() {
    let db = fresh_db().await;
    manage::seed_db(&db).await.unwrap();
    assert!(manage::seed_db(&db).await.is_err());

    let (_, body) = get_workers(&db).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn create_db_resets_to_empty() {
    let db = fresh_db().await;
    manage::seed_db(&db).await.unwrap();

    manage::create_db(&db).await.unwrap();

    let (status, body) = get_workers(&db).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn missing_table_is_a_server_error() {
    let db = Database::connect_lazy("sqlite::memory:").unwrap();

    let (status, _) = get_workers(&db).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn trailing_slash_is_normalised() {
    let db = fresh_db().await;
    let config = test_config();
    let app = test::init_service(
        App::new()
            .wrap(NormalizePath::trim())
            .app_data(Data::new(db.clone()))
            .configure(|cfg| routes::configure(cfg, &config)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/workers/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}
