pub mod convert;
pub mod games_server;
pub mod results_server;

use shared::{ErrorKind, ServiceError};
use tonic::Status;

pub use games_server::GameServerImpl;
pub use results_server::ResultServerImpl;

/// Logs a failed call at a level matching who is at fault and converts it to
/// a gRPC status.
fn reject(method: &'static str, err: ServiceError) -> Status {
    match err.kind() {
        ErrorKind::InvalidArgument | ErrorKind::NotFound => {
            tracing::debug!(method = method, error = %err, "Request rejected");
        }
        _ => {
            tracing::error!(method = method, op = ?err.op(), error = %err, "Request failed");
        }
    }
    err.into()
}
