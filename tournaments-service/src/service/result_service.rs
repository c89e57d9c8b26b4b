use std::time::Duration;

use shared::{GameResult, Result, ResultId};

use super::with_deadline;
use crate::repository::ResultRepository;

const OP_CREATE: &str = "service.results.create";
const OP_FETCH_BY_ID: &str = "service.results.fetch_by_id";
const OP_UPDATE: &str = "service.results.update";
const OP_DELETE_BY_ID: &str = "service.results.delete_by_id";

pub struct ResultService<R> {
    repo: R,
    timeout: Duration,
}

impl<R: ResultRepository> ResultService<R> {
    pub fn new(repo: R, timeout: Duration) -> Self {
        Self { repo, timeout }
    }

    #[tracing::instrument(skip(self, result), fields(result_id = %result.id, game_id = %result.game_id))]
    pub async fn create(&self, result: &GameResult) -> Result<()> {
        with_deadline(OP_CREATE, self.timeout, self.repo.create(result)).await?;

        tracing::info!(winner_id = %result.winner_id, "Result created");

        Ok(())
    }

    pub async fn fetch_by_id(&self, id: ResultId) -> Result<GameResult> {
        with_deadline(OP_FETCH_BY_ID, self.timeout, self.repo.fetch_by_id(id)).await
    }

    #[tracing::instrument(skip(self, result), fields(result_id = %result.id))]
    pub async fn update(&self, result: &GameResult) -> Result<()> {
        with_deadline(OP_UPDATE, self.timeout, self.repo.update(result)).await?;

        tracing::info!(winner_id = %result.winner_id, "Result updated");

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(result_id = %id))]
    pub async fn delete_by_id(&self, id: ResultId) -> Result<()> {
        with_deadline(OP_DELETE_BY_ID, self.timeout, self.repo.delete_by_id(id)).await?;

        tracing::info!("Result deleted");

        Ok(())
    }
}
