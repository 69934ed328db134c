use actix_web::{middleware::Compress, web, App, HttpServer};
use actix_cors::Cors;
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi; // bring trait into scope for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

use postplan::openapi::ApiDoc;
use postplan::repo::PostRepo;
use postplan::routes::{config, AppState};
use postplan::{seed, AppConfig, InMemPostStore, SecurityHeaders};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env automatically only in debug builds.
    if cfg!(debug_assertions) {
        let _ = dotenv::dotenv();
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cfg = AppConfig::from_env();
    info!(policy = %cfg.reschedule_policy, hsts = cfg.enable_hsts, "bootstrapping postplan");

    let mut store = InMemPostStore::new().with_policy(cfg.reschedule_policy);
    if let Some(path) = &cfg.snapshot_path {
        store = store.with_snapshot(path);
    }
    if cfg.seed_demo && store.list_posts().await?.is_empty() {
        let demo = seed::demo_posts(Utc::now());
        info!(count = demo.len(), "seeding demo posts");
        store.set_posts(demo).await?;
    }
    let repo: Arc<dyn PostRepo> = Arc::new(store);

    let openapi = ApiDoc::openapi();
    let addr = cfg.bind_addr();
    let server_cfg = cfg.clone();

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            // Vite dev server
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://127.0.0.1:5173")
            .allowed_origin(&server_cfg.frontend_url)
            .allow_any_header()
            .allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(Compress::default())
            .wrap(SecurityHeaders::from_config(&server_cfg))
            .wrap(cors)
            .app_data(web::Data::new(AppState { repo: repo.clone() }))
            .configure(config)
            .service(SwaggerUi::new("/docs/{_:.*}").url("/docs/openapi.json", openapi.clone()))
    })
    .bind(addr.clone())
    .with_context(|| format!("binding {}:{}", addr.0, addr.1))?;

    info!("Listening on http://{}:{}", addr.0, addr.1);

    server.run().await?;
    Ok(())
}
