#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use shared::{
    Game, GameId, GameResult, GameUpdate, Result, ResultId, ServiceError,
};
use tournaments_service::{GameRepository, ResultRepository};

pub fn new_year_2024() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn timestamp(dt: DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

/// Game storage backed by a map, counting every call that reaches it.
#[derive(Clone, Default)]
pub struct InMemoryGameRepository {
    games: Arc<Mutex<HashMap<GameId, Game>>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryGameRepository {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<Game> {
        self.games.lock().unwrap().values().cloned().collect()
    }

    pub fn insert(&self, game: Game) {
        self.games.lock().unwrap().insert(game.id, game);
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl GameRepository for InMemoryGameRepository {
    async fn create(&self, game: &Game) -> Result<()> {
        self.touch();
        self.games.lock().unwrap().insert(game.id, game.clone());
        Ok(())
    }

    async fn fetch_by_id(&self, id: GameId) -> Result<Game> {
        self.touch();
        self.games
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::GameNotFound(id.to_string()))
    }

    async fn update(&self, update: &GameUpdate) -> Result<()> {
        self.touch();
        let mut games = self.games.lock().unwrap();
        let game = games
            .get_mut(&update.id)
            .ok_or_else(|| ServiceError::GameNotFound(update.id.to_string()))?;

        if let Some(start) = update.game_start {
            game.game_start = start;
        }
        game.game_type_id = update.game_type_id;

        Ok(())
    }

    async fn delete_by_id(&self, id: GameId) -> Result<()> {
        self.touch();
        self.games.lock().unwrap().remove(&id);
        Ok(())
    }
}

/// Result storage backed by a map, counting every call that reaches it.
#[derive(Clone, Default)]
pub struct InMemoryResultRepository {
    results: Arc<Mutex<HashMap<ResultId, GameResult>>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryResultRepository {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<GameResult> {
        self.results.lock().unwrap().values().cloned().collect()
    }

    pub fn insert(&self, result: GameResult) {
        self.results.lock().unwrap().insert(result.id, result);
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl ResultRepository for InMemoryResultRepository {
    async fn create(&self, result: &GameResult) -> Result<()> {
        self.touch();
        self.results.lock().unwrap().insert(result.id, result.clone());
        Ok(())
    }

    async fn fetch_by_id(&self, id: ResultId) -> Result<GameResult> {
        self.touch();
        self.results
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::ResultNotFound(id.to_string()))
    }

    async fn update(&self, result: &GameResult) -> Result<()> {
        self.touch();
        let mut results = self.results.lock().unwrap();
        let stored = results
            .get_mut(&result.id)
            .ok_or_else(|| ServiceError::ResultNotFound(result.id.to_string()))?;
        *stored = result.clone();
        Ok(())
    }

    async fn delete_by_id(&self, id: ResultId) -> Result<()> {
        self.touch();
        self.results.lock().unwrap().remove(&id);
        Ok(())
    }
}

/// Delays every call before delegating, to exercise call deadlines.
#[derive(Clone)]
pub struct SlowGameRepository {
    pub inner: InMemoryGameRepository,
    pub delay: Duration,
}

impl GameRepository for SlowGameRepository {
    async fn create(&self, game: &Game) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.create(game).await
    }

    async fn fetch_by_id(&self, id: GameId) -> Result<Game> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_by_id(id).await
    }

    async fn update(&self, update: &GameUpdate) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.update(update).await
    }

    async fn delete_by_id(&self, id: GameId) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete_by_id(id).await
    }
}

/// Fails every call as if the connection pool were exhausted.
#[derive(Clone, Default)]
pub struct UnavailableResultRepository;

fn pool_timed_out(op: &'static str) -> ServiceError {
    ServiceError::database(op, sqlx::Error::PoolTimedOut)
}

impl ResultRepository for UnavailableResultRepository {
    async fn create(&self, _result: &GameResult) -> Result<()> {
        Err(pool_timed_out("repository.results.create"))
    }

    async fn fetch_by_id(&self, _id: ResultId) -> Result<GameResult> {
        Err(pool_timed_out("repository.results.fetch_by_id"))
    }

    async fn update(&self, _result: &GameResult) -> Result<()> {
        Err(pool_timed_out("repository.results.update"))
    }

    async fn delete_by_id(&self, _id: ResultId) -> Result<()> {
        Err(pool_timed_out("repository.results.delete_by_id"))
    }
}
