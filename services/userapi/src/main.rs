//! usergate user API entry point.
//!
//! # Purpose
//! Loads configuration, builds the access-controlled router and serves it
//! alongside the Prometheus metrics listener.
use anyhow::Context;
use std::future::Future;
use userapi::app::{AppState, build_router};
use userapi::config::ServiceConfig;
use userapi::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let metrics_handle = observability::init_observability("usergate-userapi")?;
    let config = ServiceConfig::from_env_or_yaml()?;
    run_with_shutdown(config, metrics_handle, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(
    config: ServiceConfig,
    metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::debug!(?config, "configuration loaded");
    let state = AppState::from_config(&config)?;
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;

    let metrics_bind = config.metrics_bind;
    let metrics_task = tokio::spawn(async move {
        if let Err(err) = observability::serve_metrics(metrics_handle, metrics_bind).await {
            tracing::warn!(error = %err, %metrics_bind, "metrics listener stopped");
        }
    });
    tracing::info!(addr = %listener.local_addr()?, "user api listening");
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    tracing::info!("user api stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;

    fn config() -> ServiceConfig {
        ServiceConfig {
            bind_addr: "127.0.0.1:0".parse().expect("bind"),
            metrics_bind: "127.0.0.1:0".parse().expect("metrics"),
            jwt_secret: "main-test-secret".to_string(),
            jwt_issuer: "usergate".to_string(),
            token_ttl: Duration::from_secs(60),
            token_leeway_secs: 0,
            registration_enabled: true,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn run_with_shutdown_stops_on_signal() {
        let handle = observability::init_observability("userapi-main-test").expect("init");
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(run_with_shutdown(config(), handle, async move {
            let _ = rx.await;
        }));
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = tx.send(());
        let result = tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .expect("shutdown in time")
            .expect("join");
        assert!(result.is_ok());
    }

    #[tokio::test(flavor = "multi_thread")]
    #[serial]
    async fn run_with_shutdown_reports_bind_failure() {
        let handle = observability::init_observability("userapi-main-test").expect("init");
        let taken = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let mut config = config();
        config.bind_addr = taken.local_addr().expect("addr");
        let err = run_with_shutdown(config, handle, std::future::pending::<()>())
            .await
            .expect_err("address in use");
        assert!(err.to_string().starts_with("bind "));
    }
}
