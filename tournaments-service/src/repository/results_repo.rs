use shared::{GameId, GameResult, Result, ResultId, ServiceError, WinnerId};
use sqlx::PgPool;
use uuid::Uuid;

use super::ResultRepository;

const OP_CREATE: &str = "repository.results.create";
const OP_FETCH_BY_ID: &str = "repository.results.fetch_by_id";
const OP_UPDATE: &str = "repository.results.update";
const OP_DELETE_BY_ID: &str = "repository.results.delete_by_id";

#[derive(sqlx::FromRow)]
struct ResultRow {
    result_id: Uuid,
    game_id: Uuid,
    winner_id: Uuid,
    comment: String,
}

impl From<ResultRow> for GameResult {
    fn from(row: ResultRow) -> Self {
        Self {
            id: ResultId(row.result_id),
            game_id: GameId(row.game_id),
            winner_id: WinnerId(row.winner_id),
            comment: row.comment,
        }
    }
}

fn storage_error(op: &'static str, err: sqlx::Error) -> ServiceError {
    tracing::error!(op = op, error = %err, "Results storage operation failed");
    ServiceError::database(op, err)
}

#[derive(Clone)]
pub struct PgResultRepository {
    pool: PgPool,
}

impl PgResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ResultRepository for PgResultRepository {
    async fn create(&self, result: &GameResult) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error(OP_CREATE, e))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO game_creator.results (result_id, game_id, winner_id, comment)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(result.id.0)
        .bind(result.game_id.0)
        .bind(result.winner_id.0)
        .bind(&result.comment)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(result_id = %result.id, error = %rollback_err, "Rollback after failed insert failed");
            }
            return Err(storage_error(OP_CREATE, e));
        }

        tx.commit().await.map_err(|e| storage_error(OP_CREATE, e))?;

        tracing::debug!(result_id = %result.id, game_id = %result.game_id, "Result inserted");

        Ok(())
    }

    async fn fetch_by_id(&self, id: ResultId) -> Result<GameResult> {
        let row = sqlx::query_as::<_, ResultRow>(
            r#"
            SELECT result_id, game_id, winner_id, comment
            FROM game_creator.results
            WHERE result_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error(OP_FETCH_BY_ID, e))?
        .ok_or_else(|| ServiceError::ResultNotFound(id.to_string()))?;

        Ok(row.into())
    }

    async fn update(&self, result: &GameResult) -> Result<()> {
        let outcome = sqlx::query(
            r#"
            UPDATE game_creator.results
            SET game_id = $1,
                winner_id = $2,
                comment = $3
            WHERE result_id = $4
            "#,
        )
        .bind(result.game_id.0)
        .bind(result.winner_id.0)
        .bind(&result.comment)
        .bind(result.id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error(OP_UPDATE, e))?;

        if outcome.rows_affected() == 0 {
            return Err(ServiceError::ResultNotFound(result.id.to_string()));
        }

        tracing::debug!(result_id = %result.id, "Result updated");

        Ok(())
    }

    async fn delete_by_id(&self, id: ResultId) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error(OP_DELETE_BY_ID, e))?;

        let deleted = sqlx::query("DELETE FROM game_creator.results WHERE result_id = $1")
            .bind(id.0)
            .execute(&mut *tx)
            .await;

        let rows = match deleted {
            Ok(outcome) => outcome.rows_affected(),
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(result_id = %id, error = %rollback_err, "Rollback after failed delete failed");
                }
                return Err(storage_error(OP_DELETE_BY_ID, e));
            }
        };

        tx.commit().await.map_err(|e| storage_error(OP_DELETE_BY_ID, e))?;

        tracing::debug!(result_id = %id, rows = rows, "Result deleted");

        Ok(())
    }
}
