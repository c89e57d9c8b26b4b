use chrono::{DateTime, Utc};
use shared::{Game, GameId, GameTypeId, GameUpdate, Result, ServiceError};
use sqlx::PgPool;
use uuid::Uuid;

use super::GameRepository;

const OP_CREATE: &str = "repository.games.create";
const OP_FETCH_BY_ID: &str = "repository.games.fetch_by_id";
const OP_UPDATE: &str = "repository.games.update";
const OP_DELETE_BY_ID: &str = "repository.games.delete_by_id";

#[derive(sqlx::FromRow)]
struct GameRow {
    game_id: Uuid,
    game_start: DateTime<Utc>,
    game_type_id: Uuid,
}

impl From<GameRow> for Game {
    fn from(row: GameRow) -> Self {
        Self {
            id: GameId(row.game_id),
            game_start: row.game_start,
            game_type_id: GameTypeId(row.game_type_id),
        }
    }
}

fn storage_error(op: &'static str, err: sqlx::Error) -> ServiceError {
    tracing::error!(op = op, error = %err, "Games storage operation failed");
    ServiceError::database(op, err)
}

#[derive(Clone)]
pub struct PgGameRepository {
    pool: PgPool,
}

impl PgGameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl GameRepository for PgGameRepository {
    async fn create(&self, game: &Game) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error(OP_CREATE, e))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO game_creator.games (game_id, game_start, game_type_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(game.id.0)
        .bind(game.game_start)
        .bind(game.game_type_id.0)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(game_id = %game.id, error = %rollback_err, "Rollback after failed insert failed");
            }
            return Err(storage_error(OP_CREATE, e));
        }

        tx.commit().await.map_err(|e| storage_error(OP_CREATE, e))?;

        tracing::debug!(game_id = %game.id, "Game inserted");

        Ok(())
    }

    async fn fetch_by_id(&self, id: GameId) -> Result<Game> {
        let row = sqlx::query_as::<_, GameRow>(
            r#"
            SELECT game_id, game_start, game_type_id
            FROM game_creator.games
            WHERE game_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error(OP_FETCH_BY_ID, e))?
        .ok_or_else(|| ServiceError::GameNotFound(id.to_string()))?;

        Ok(row.into())
    }

    async fn update(&self, update: &GameUpdate) -> Result<()> {
        // Only the start time is optional; the game type is always replaced.
        let result = sqlx::query(
            r#"
            UPDATE game_creator.games
            SET game_start = COALESCE($1, game_start),
                game_type_id = $2
            WHERE game_id = $3
            "#,
        )
        .bind(update.game_start)
        .bind(update.game_type_id.0)
        .bind(update.id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error(OP_UPDATE, e))?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::GameNotFound(update.id.to_string()));
        }

        tracing::debug!(
            game_id = %update.id,
            start_replaced = update.game_start.is_some(),
            "Game updated"
        );

        Ok(())
    }

    async fn delete_by_id(&self, id: GameId) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error(OP_DELETE_BY_ID, e))?;

        let deleted = sqlx::query("DELETE FROM game_creator.games WHERE game_id = $1")
            .bind(id.0)
            .execute(&mut *tx)
            .await;

        let rows = match deleted {
            Ok(result) => result.rows_affected(),
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(game_id = %id, error = %rollback_err, "Rollback after failed delete failed");
                }
                return Err(storage_error(OP_DELETE_BY_ID, e));
            }
        };

        tx.commit().await.map_err(|e| storage_error(OP_DELETE_BY_ID, e))?;

        tracing::debug!(game_id = %id, rows = rows, "Game deleted");

        Ok(())
    }
}
