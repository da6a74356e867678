use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use fcm_shared::FcmClient;
use push_gateway::middleware::build_cors;
use push_gateway::{handlers, metrics, Config, InMemoryTokenStore, PushProvider, TokenStore};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    tracing::info!("Starting push gateway");

    let fcm_client = FcmClient::from_service_account_file(&config.service_account_path)
        .with_context(|| {
            format!(
                "failed to load service account from {}",
                config.service_account_path
            )
        })?;
    tracing::info!(project_id = %fcm_client.project_id, "FCM client initialized");

    let provider: Arc<dyn PushProvider> = Arc::new(fcm_client);
    let store: Arc<dyn TokenStore> = Arc::new(InMemoryTokenStore::new());

    let addr = config.bind_addr();
    tracing::info!("FCM server listening on {}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(provider.clone()))
            .app_data(web::Data::new(store.clone()))
            .wrap(build_cors(&config))
            .wrap(middleware::Logger::default())
            .wrap(metrics::MetricsMiddleware)
            .configure(handlers::register_routes)
    })
    .bind(&addr)?
    .run()
    .await?;

    Ok(())
}
