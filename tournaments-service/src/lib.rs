pub mod grpc_server;
pub mod repository;
pub mod service;

pub use grpc_server::{GameServerImpl, ResultServerImpl};
pub use repository::{GameRepository, PgGameRepository, PgResultRepository, ResultRepository};
pub use service::{GameService, ResultService, DEFAULT_REQUEST_TIMEOUT};
