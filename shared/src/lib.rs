pub mod config;
pub mod errors;
pub mod telemetry;
pub mod types;

pub use config::{DatabaseConfig, ServiceConfig};
pub use errors::{ErrorKind, Result, ServiceError};
pub use telemetry::{init_metrics, init_tracing, record_rpc};
pub use types::{
    to_stored_precision, Game, GameId, GameResult, GameType, GameTypeId, GameUpdate, ResultId,
    WinnerId,
};

pub mod proto {
    tonic::include_proto!("tournaments");

    /// Encoded descriptors of both services, served through gRPC reflection.
    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("tournaments_descriptor");

}
