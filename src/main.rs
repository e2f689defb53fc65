use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use workers_api::cli::{Cli, Command, ReadyArgs};
use workers_api::config::Config;
use workers_api::db::Database;
use workers_api::docs::ApiDoc;
use workers_api::manage::{self, ReadyOptions};
use workers_api::routes;

fn init_tracing(config: &Config) -> WorkerGuard {
    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let level = if config.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    guard
}

async fn ready(db: &Database, config: &Config, args: ReadyArgs) -> Result<()> {
    let options = ReadyOptions {
        interval: args
            .interval_ms
            .map(Duration::from_millis)
            .unwrap_or(config.ready_interval),
        timeout: args
            .timeout_secs
            .map(Duration::from_secs)
            .or(config.ready_timeout),
    };

    let cancel = async {
        // A failure to install the handler just means Ctrl-C is not caught.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    manage::wait_until_ready(db, options, &mut std::io::stdout(), cancel)
        .await?
        .into_result()
}

async fn serve(db: Database, config: Config) -> Result<()> {
    info!(
        addr = %config.server_addr,
        static_folder = %config.static_folder.display(),
        media_folder = %config.media_folder.display(),
        "Server starting..."
    );

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        let config = config.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard so JS/CSS assets resolve
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(db.clone()))
            .configure(move |cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    let _guard = init_tracing(&config);

    let db = Database::connect_lazy(&config.database_url).context("invalid DATABASE_URL")?;

    let result = match cli.command {
        Command::Ready(args) => ready(&db, &config, args).await,
        Command::CreateDb => manage::create_db(&db).await.context("create_db failed"),
        Command::SeedDb => manage::seed_db(&db)
            .await
            .map(|_| ())
            .context("seed_db failed"),
        Command::Serve => serve(db.clone(), config).await,
    };

    db.close().await;
    result
}
