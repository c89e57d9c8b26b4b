use std::net::SocketAddr;
use std::time::Duration;

use metrics::Unit;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Used when `RUST_LOG` is unset. sqlx logs every statement at info.
pub const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn";

const RPC_REQUESTS: &str = "tournaments.rpc.requests";
const RPC_ERRORS: &str = "tournaments.rpc.errors";
const RPC_DURATION: &str = "tournaments.rpc.duration";

pub fn init_tracing(service_name: &'static str) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;
    let filter = env_filter.to_string();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .compact(),
        )
        .try_init()?;

    tracing::info!(service = service_name, filter = %filter, "Tracing ready");

    Ok(())
}

/// Installs the Prometheus recorder and its scrape endpoint on `port`.
pub fn init_metrics(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    describe_rpc_metrics();

    tracing::info!(scrape_url = %format!("http://{}/metrics", addr), "Metrics exporter listening");

    Ok(())
}

fn describe_rpc_metrics() {
    metrics::describe_counter!(RPC_REQUESTS, Unit::Count, "gRPC calls handled");
    metrics::describe_counter!(RPC_ERRORS, Unit::Count, "gRPC calls answered with an error status");
    metrics::describe_histogram!(RPC_DURATION, Unit::Seconds, "gRPC handling time");
}

/// Records one handled RPC: request count, error count and latency.
pub fn record_rpc(service: &'static str, method: &'static str, elapsed: Duration, ok: bool) {
    metrics::counter!(RPC_REQUESTS, "service" => service, "method" => method).increment(1);

    if !ok {
        metrics::counter!(RPC_ERRORS, "service" => service, "method" => method).increment(1);
    }

    metrics::histogram!(RPC_DURATION, "service" => service, "method" => method)
        .record(elapsed.as_secs_f64());
}
