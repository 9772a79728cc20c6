use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use sneaker_stylist::{
    constants::REFRESH_DRAIN_GRACE,
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::{drain_background_work, shutdown_signal},
    routes::configure_routes_with_upload_limit,
    settings::AppConfig,
    AppState,
};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }

    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::new();
    init_tracing(matches!(&config, Ok(cfg) if cfg.is_production()));

    let config = match config {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match create_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool).await {
        tracing::error!("Failed to run database migrations: {}", e);
        std::process::exit(1);
    }

    let app_state = web::Data::new(AppState::new(&config, pool));
    let server_addr = format!("{}:{}", config.host, config.port);
    let cors_origins = config.cors_origins();
    let max_upload_bytes = app_state.max_upload_bytes;

    tracing::info!(
        "🚀 Starting {} v{} on {} ({})",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.env
    );

    let server = HttpServer::new({
        let app_state = app_state.clone();
        move || {
            App::new()
                .app_data(app_state.clone())
                .wrap(NormalizePath::trim())
                .wrap(build_cors(&cors_origins))
                .wrap(TracingLogger::default())
                .configure(move |cfg| configure_routes_with_upload_limit(cfg, max_upload_bytes))
        }
    })
    .workers(config.worker_count)
    .disable_signals()
    .bind(&server_addr)?
    .run();

    let handle = server.handle();

    tokio::select! {
        res = server => res?,
        reason = shutdown_signal() => {
            tracing::info!(?reason, "Stopping HTTP server");
            handle.stop(true).await;
        }
    }

    drain_background_work(&app_state.trend_cache, REFRESH_DRAIN_GRACE).await;
    Ok(())
}
