//! Products API - REST server with an order-placed queue consumer

use amqp_bus::{EventPublisher, QueueConsumer};
use axum_helpers::server::{create_app, create_router, health_router};
use axum_helpers::JwtAuth;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::{
    AmqpChangePublisher, HttpCategoryClient, OrderProcessor, PgProductRepository, ProductService,
};
use database::postgres::DatabaseConnection;
use std::sync::Arc;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to PostgreSQL");
    let db = database::postgres::connect_from_config_with_retry(config.postgres.clone(), None)
        .await?;
    database::postgres::run_migrations::<migration::Migrator>(&db, "products_api").await?;

    // Outbound events are best-effort: without a broker the API still serves
    let publisher = match EventPublisher::connect(&config.amqp).await {
        Ok(publisher) => Some(Arc::new(publisher)),
        Err(e) => {
            warn!(error = %e, "AMQP publisher unavailable; product-changed events disabled");
            None
        }
    };

    let service = build_service(&db, &config, publisher);

    // The order-placed consumer runs beside the HTTP server; when its
    // connection retries are exhausted the API keeps serving without it
    let consumer = QueueConsumer::new(config.amqp.clone());
    let processor = OrderProcessor::new(service.clone());
    let consumer_handle = tokio::spawn(async move { consumer.run(processor).await });

    let auth = JwtAuth::from_env();
    let api_routes = api::routes(service, auth);
    let router = create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router.merge(health_router(config.app.clone()));

    info!("Starting Products API on port {}", config.server.port);
    create_app(app, &config.server).await?;

    consumer_handle.abort();
    info!("Products API shutdown complete");
    Ok(())
}

fn build_service(
    db: &DatabaseConnection,
    config: &Config,
    publisher: Option<Arc<EventPublisher>>,
) -> ProductService<PgProductRepository, HttpCategoryClient> {
    let repository = PgProductRepository::new(db.clone());
    let categories = HttpCategoryClient::new(config.category_service_url.clone());

    let mut service = ProductService::new(repository, categories);
    if let Some(publisher) = publisher {
        service = service.with_publisher(Arc::new(AmqpChangePublisher::from_arc(publisher)));
    }

    service
}
