//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use auth::application::config::AuthConfig;
use auth::infra::postgres::PgAuthRepository;
use auth::domain::repository::TokenDenylistRepository;
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use platform::mailer::{LogMailer, Mailer, SmtpConfig, SmtpMailer};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,social=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: drop denylist entries whose tokens have expired
    // Errors here should not prevent server startup
    let denylist_for_cleanup = PgAuthRepository::new(pool.clone());
    match denylist_for_cleanup.cleanup_expired(chrono::Utc::now()).await {
        Ok(removed) => {
            tracing::info!(entries_deleted = removed, "Token denylist cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Token denylist cleanup failed, continuing anyway");
        }
    }

    // Auth configuration
    let auth_config = Arc::new(load_auth_config()?);

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router. SMTP when configured, log-only otherwise.
    let app = match load_smtp_config() {
        Some(smtp) => {
            let mailer = Arc::new(SmtpMailer::new(smtp)?);
            build_router(pool, mailer, auth_config)
        }
        None => {
            tracing::warn!("No SMTP configuration found, outbound email will only be logged");
            build_router(pool, Arc::new(LogMailer), auth_config)
        }
    }
    .layer(TraceLayer::new_for_http())
    .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn build_router<M>(pool: PgPool, mailer: Arc<M>, config: Arc<AuthConfig>) -> Router
where
    M: Mailer + Send + Sync + 'static,
{
    Router::new()
        .nest(
            "/api/auth",
            auth::presentation::router::auth_router(pool.clone(), mailer, config.clone()),
        )
        .nest("/api/social", social::social_router(pool, config))
}

fn load_auth_config() -> anyhow::Result<AuthConfig> {
    if cfg!(debug_assertions) && env::var("JWT_SECRET").is_err() {
        return Ok(AuthConfig::development());
    }

    // In production, load secret from environment
    let secret_b64 = env::var("JWT_SECRET").expect("JWT_SECRET must be set in production");
    let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
    anyhow::ensure!(secret_bytes.len() == 32, "JWT_SECRET must decode to 32 bytes");
    let mut secret = [0u8; 32];
    secret.copy_from_slice(&secret_bytes);

    let mut config = AuthConfig {
        jwt_secret: secret,
        ..AuthConfig::default()
    };
    if let Ok(frontend) = env::var("FRONTEND_BASE_URL") {
        config.frontend_base_url = frontend;
    }
    if let Ok(pepper) = env::var("PASSWORD_PEPPER") {
        config.password_pepper = Some(pepper.into_bytes());
    }
    Ok(config)
}

fn load_smtp_config() -> Option<SmtpConfig> {
    let host = env::var("SMTP_HOST").ok()?;
    let username = env::var("SMTP_USERNAME").ok()?;
    let password = env::var("SMTP_PASSWORD").ok()?;
    let port = env::var("SMTP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(587);
    let from = env::var("SMTP_FROM").unwrap_or_else(|_| username.clone());

    Some(SmtpConfig {
        host,
        port,
        username,
        password,
        from,
    })
}
