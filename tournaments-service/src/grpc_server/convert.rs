//! Wire ↔ domain conversions.
//!
//! Decoders fail with [`ServiceError::Validation`], encoders with
//! [`ServiceError::Internal`].

use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use shared::proto::{
    GameCreateRequest, GameRequest, GameResponse, ResultCreateRequest, ResultRequest,
    ResultResponse,
};
use shared::{
    to_stored_precision, Game, GameId, GameResult, GameTypeId, GameUpdate, Result, ResultId,
    ServiceError, WinnerId,
};

/// 0001-01-01T00:00:00Z
const MIN_TIMESTAMP_SECONDS: i64 = -62_135_596_800;
/// 9999-12-31T23:59:59Z
const MAX_TIMESTAMP_SECONDS: i64 = 253_402_300_799;
const NANOS_PER_SECOND: i32 = 1_000_000_000;

fn timestamp_in_range(seconds: i64, nanos: i32) -> bool {
    (MIN_TIMESTAMP_SECONDS..=MAX_TIMESTAMP_SECONDS).contains(&seconds)
        && (0..NANOS_PER_SECOND).contains(&nanos)
}

/// Decodes a wire timestamp, truncating sub-microsecond digits the store
/// would drop.
pub fn timestamp_to_datetime(ts: &Timestamp, field: &str) -> Result<DateTime<Utc>> {
    if !timestamp_in_range(ts.seconds, ts.nanos) {
        return Err(ServiceError::Validation(format!(
            "Invalid {}: timestamp {}s/{}ns out of range",
            field, ts.seconds, ts.nanos
        )));
    }

    DateTime::from_timestamp(ts.seconds, ts.nanos as u32)
        .map(to_stored_precision)
        .ok_or_else(|| {
            ServiceError::Validation(format!("Invalid {}: unrepresentable timestamp", field))
        })
}

pub fn datetime_to_timestamp(dt: &DateTime<Utc>) -> Result<Timestamp> {
    let ts = Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    };

    if !timestamp_in_range(ts.seconds, ts.nanos) {
        return Err(ServiceError::Internal(format!("invalid time: {}", dt)));
    }

    Ok(ts)
}

pub fn game_from_create(req: &GameCreateRequest) -> Result<Game> {
    let game_type_id = GameTypeId::from_string(&req.game_type_id)?;
    let game_start = req
        .game_start
        .as_ref()
        .ok_or_else(|| ServiceError::Validation("game_start is required".to_string()))
        .and_then(|ts| timestamp_to_datetime(ts, "game_start"))?;

    Ok(Game::new(game_start, game_type_id))
}

/// An unset `game_start` becomes `None`, which keeps the stored start time.
pub fn game_update_from_request(req: &GameRequest) -> Result<GameUpdate> {
    let id = GameId::from_string(&req.id)?;
    let game_type_id = GameTypeId::from_string(&req.game_type_id)?;
    let game_start = req
        .game_start
        .as_ref()
        .map(|ts| timestamp_to_datetime(ts, "game_start"))
        .transpose()?;

    Ok(GameUpdate {
        id,
        game_start,
        game_type_id,
    })
}

pub fn game_to_response(game: &Game) -> Result<GameResponse> {
    Ok(GameResponse {
        id: game.id.to_string(),
        game_start: Some(datetime_to_timestamp(&game.game_start)?),
        game_type_id: game.game_type_id.to_string(),
    })
}

pub fn result_from_create(req: &ResultCreateRequest) -> Result<GameResult> {
    let game_id = GameId::from_string(&req.game_id)?;
    let winner_id = WinnerId::from_string(&req.winner_id)?;

    Ok(GameResult::new(game_id, winner_id, req.comment.clone()))
}

/// Every field is required because result updates overwrite the whole row.
pub fn result_from_request(req: &ResultRequest) -> Result<GameResult> {
    Ok(GameResult {
        id: ResultId::from_string(&req.id)?,
        game_id: GameId::from_string(&req.game_id)?,
        winner_id: WinnerId::from_string(&req.winner_id)?,
        comment: req.comment.clone(),
    })
}

pub fn result_to_response(result: GameResult) -> ResultResponse {
    ResultResponse {
        id: result.id.to_string(),
        game_id: result.game_id.to_string(),
        winner_id: result.winner_id.to_string(),
        comment: result.comment,
    }
}
