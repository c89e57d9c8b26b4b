use std::time::Duration;

use shared::{Game, GameId, GameUpdate, Result};

use super::with_deadline;
use crate::repository::GameRepository;

const OP_CREATE: &str = "service.games.create";
const OP_FETCH_BY_ID: &str = "service.games.fetch_by_id";
const OP_UPDATE: &str = "service.games.update";
const OP_DELETE_BY_ID: &str = "service.games.delete_by_id";

/// Game operations bounded by a per-call deadline.
pub struct GameService<R> {
    repo: R,
    timeout: Duration,
}

impl<R: GameRepository> GameService<R> {
    pub fn new(repo: R, timeout: Duration) -> Self {
        Self { repo, timeout }
    }

    #[tracing::instrument(skip(self, game), fields(game_id = %game.id))]
    pub async fn create(&self, game: &Game) -> Result<()> {
        with_deadline(OP_CREATE, self.timeout, self.repo.create(game)).await?;

        tracing::info!(game_type_id = %game.game_type_id, "Game created");

        Ok(())
    }

    pub async fn fetch_by_id(&self, id: GameId) -> Result<Game> {
        with_deadline(OP_FETCH_BY_ID, self.timeout, self.repo.fetch_by_id(id)).await
    }

    #[tracing::instrument(skip(self, update), fields(game_id = %update.id))]
    pub async fn update(&self, update: &GameUpdate) -> Result<()> {
        with_deadline(OP_UPDATE, self.timeout, self.repo.update(update)).await?;

        tracing::info!("Game updated");

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(game_id = %id))]
    pub async fn delete_by_id(&self, id: GameId) -> Result<()> {
        with_deadline(OP_DELETE_BY_ID, self.timeout, self.repo.delete_by_id(id)).await?;

        tracing::info!("Game deleted");

        Ok(())
    }
}
