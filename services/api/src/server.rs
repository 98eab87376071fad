use crate::cli::ServeArgs;
use crate::infra::{idle_limit, load_catalog, AppState, InMemorySessionStore};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use loan_advisor::advisor::{AdvisorService, EvaluationConfig, HttpTextGenerator};
use loan_advisor::config::AppConfig;
use loan_advisor::error::AppError;
use loan_advisor::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(load_catalog(&config.advisor)?);
    let store = Arc::new(InMemorySessionStore::default());
    let mut service = AdvisorService::new(store.clone(), catalog, EvaluationConfig::default());
    if let Some(url) = &config.advisor.generator_url {
        let generator = HttpTextGenerator::new(url);
        info!(endpoint = %generator.endpoint(), "text generator enabled");
        service = service.with_generator(Arc::new(generator), config.advisor.generator_timeout);
    }

    let limit = idle_limit(&config.advisor);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = store.purge_idle(Utc::now(), limit);
            if removed > 0 {
                debug!(removed, remaining = store.len(), "expired idle interviews");
            }
        }
    });

    let app = with_operational_routes(Arc::new(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
