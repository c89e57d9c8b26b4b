use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, ServiceError};

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_string(s: &str) -> Result<Self> {
                Uuid::parse_str(s)
                    .map($name)
                    .map_err(|e| ServiceError::Validation(format!(concat!("Invalid ", $label, ": {}"), e)))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// Sub-second digits a `TIMESTAMPTZ` column keeps.
pub const STORED_SUBSEC_DIGITS: u16 = 6;

/// Truncates `dt` to microseconds so the stored value reads back unchanged.
pub fn to_stored_precision(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.trunc_subsecs(STORED_SUBSEC_DIGITS)
}

uuid_id!(GameId, "game ID");
uuid_id!(GameTypeId, "game type ID");
uuid_id!(ResultId, "result ID");
uuid_id!(
    /// Identifies the winning participant. Participants live outside this service.
    WinnerId,
    "winner ID"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(rename = "game_id")]
    pub id: GameId,
    pub game_start: DateTime<Utc>,
    pub game_type_id: GameTypeId,
}

impl Game {
    /// Builds a game with a freshly generated identifier. The start time is
    /// truncated to stored precision.
    pub fn new(game_start: DateTime<Utc>, game_type_id: GameTypeId) -> Self {
        Self {
            id: GameId::new(),
            game_start: to_stored_precision(game_start),
            game_type_id,
        }
    }
}

/// Partial update of a stored [`Game`].
///
/// `game_start: None` keeps the stored start time. `game_type_id` is always
/// written.
#[derive(Debug, Clone, PartialEq)]
pub struct GameUpdate {
    pub id: GameId,
    pub game_start: Option<DateTime<Utc>>,
    pub game_type_id: GameTypeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameType {
    pub game_type_id: GameTypeId,
    pub platform_name: String,
}

/// Outcome of a game. Updates overwrite every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    #[serde(rename = "result_id")]
    pub id: ResultId,
    pub game_id: GameId,
    pub winner_id: WinnerId,
    pub comment: String,
}

impl GameResult {
    pub fn new(game_id: GameId, winner_id: WinnerId, comment: impl Into<String>) -> Self {
        Self {
            id: ResultId::new(),
            game_id,
            winner_id,
            comment: comment.into(),
        }
    }
}
