use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod payroll;
mod routes;
mod store;

use crate::config::Config;
use crate::db::init_db;
use crate::docs::ApiDoc;
use crate::payroll::{pdf::PdfSink, render::PayslipPrinter};
use crate::routes::Limiters;
use crate::store::{MemoryStore, MySqlStore, Store};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => Arc::new(MySqlStore::new(init_db(url).await?)),
        None => {
            warn!("DATABASE_URL not set, records are kept in memory and lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    auth::seed_admin(store.as_ref(), &config.admin_username, &config.admin_password).await?;

    let limiters = Limiters::new(&config)?;
    let printer = Data::new(PayslipPrinter::new(
        config.render_options(),
        Box::new(PdfSink),
    ));
    let store = Data::from(store);
    let server_addr = config.server_addr.clone();
    let api_prefix = config.api_prefix.clone();
    let config = Data::new(config);

    info!(addr = %server_addr, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard matches the JS/CSS assets
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(store.clone())
            .app_data(config.clone())
            .app_data(printer.clone())
            .configure(|cfg| routes::configure(cfg, &api_prefix, limiters.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
