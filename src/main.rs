use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use chatech::auth::JwtKeys;
use chatech::config::AppConfig;
use chatech::prompts::PromptCatalog;
use chatech::relay::OpenAiRelay;
use chatech::{configure_api, ApiDoc, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!().run(&pool).await?;

    let state = Arc::new(AppState {
        pool,
        jwt_keys: JwtKeys::new(config.jwt_secret.as_bytes()),
        prompts: PromptCatalog::new(),
        relay: Arc::new(OpenAiRelay::new(
            &config.openai_api_key,
            config.openai_api_base.as_deref(),
        )),
    });

    info!("listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .configure(|cfg| configure_api(cfg, state.clone()))
            .service(Scalar::with_url("/scalar", ApiDoc::openapi()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
