//! Persistence adapters for games and results.

pub mod games_repo;
pub mod results_repo;

use std::future::Future;

use shared::{Game, GameId, GameResult, GameUpdate, Result, ResultId};

pub use games_repo::PgGameRepository;
pub use results_repo::PgResultRepository;

/// Storage for games.
///
/// `update` keeps the stored start time when none is supplied but always
/// replaces the game type. `delete_by_id` succeeds for unknown ids.
pub trait GameRepository: Send + Sync {
    fn create(&self, game: &Game) -> impl Future<Output = Result<()>> + Send;
    fn fetch_by_id(&self, id: GameId) -> impl Future<Output = Result<Game>> + Send;
    fn update(&self, update: &GameUpdate) -> impl Future<Output = Result<()>> + Send;
    fn delete_by_id(&self, id: GameId) -> impl Future<Output = Result<()>> + Send;
}

/// Storage for results. `update` overwrites every column.
pub trait ResultRepository: Send + Sync {
    fn create(&self, result: &GameResult) -> impl Future<Output = Result<()>> + Send;
    fn fetch_by_id(&self, id: ResultId) -> impl Future<Output = Result<GameResult>> + Send;
    fn update(&self, result: &GameResult) -> impl Future<Output = Result<()>> + Send;
    fn delete_by_id(&self, id: ResultId) -> impl Future<Output = Result<()>> + Send;
}
