//! Server construction and middleware wiring.

mod config;
pub mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::{ServerSettings, SettingsError};

use state_builders::build_http_state;

#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::NormalizePath;
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(feature = "metrics")]
use tracing::warn;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::json_config;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users;
use crate::outbound::persistence::{DbPool, MigrationError, PoolConfig, PoolError, run_migrations};

/// Failures raised while preparing the server from settings.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Settings could not be turned into runtime values.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// Schema migrations failed.
    #[error(transparent)]
    Migrations(#[from] MigrationError),
    /// The connection pool could not be built.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Shared state handed to every worker's [`App`].
#[derive(Clone)]
pub struct AppDependencies {
    /// Lifecycle phase reported by the health endpoints.
    pub health_state: web::Data<HealthState>,
    /// Repository handle shared by the users handlers.
    pub http_state: web::Data<HttpState>,
}

/// Assemble the application: users routes, health endpoints, JSON body limits,
/// trailing-slash normalisation and request tracing.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(NormalizePath::trim())
        .wrap(Trace)
        .configure(users::configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Build Prometheus middleware, logging and discarding it when the builder
/// fails.
#[cfg(feature = "metrics")]
pub fn initialize_metrics<F, E>(build: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "prometheus metrics disabled");
            None
        }
    }
}

/// Resolve settings into a [`ServerConfig`].
///
/// When a database URL is configured, pending migrations are applied and a
/// connection pool is created; otherwise the server falls back to the
/// in-memory store.
///
/// # Errors
/// Returns [`StartupError`] when the bind address does not resolve or the
/// database cannot be prepared.
pub async fn build_config(settings: &ServerSettings) -> Result<ServerConfig, StartupError> {
    let mut config = ServerConfig::new(settings.bind_addr()?);

    if let Some(url) = settings.database_url() {
        run_migrations(url).await?;
        let pool_config = PoolConfig::new(url).with_max_size(settings.max_connections);
        config = config.with_db_pool(DbPool::new(pool_config).await?);
        info!(max_connections = settings.max_connections, "database pool ready");
    }

    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(initialize_metrics(|| {
            PrometheusMetricsBuilder::new("users_api")
                .endpoint("/metrics")
                .build()
        }));
    }

    Ok(config)
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        db_pool,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;
    let http_state = web::Data::new(build_http_state(db_pool));

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(actix_web::middleware::Condition::from_option(
            prometheus.clone(),
        ));

        app
    })
    .bind(bind_addr)?;

    for addr in server.addrs() {
        info!(%addr, "listening");
    }

    let server = server.run();
    health_state.mark_serving();
    Ok(server)
}
