use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::Location;

/// Points awarded for a single guess, or a running total of them.
pub type Points = u32;

/// A base64-encoded image, as sent by the problem provider.
///
/// The game logic never looks inside; rendering is up to the front end.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagePayload(String);

impl ImagePayload {
    pub fn new(base64: impl Into<String>) -> Self {
        Self(base64.into())
    }

    pub fn as_base64(&self) -> &str {
        &self.0
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.0.trim())
    }
}

// Images are large, so only print their size.
impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ImagePayload({} base64 chars)", self.0.len())
    }
}

/// The challenge for one round.
#[derive(Clone, Debug, PartialEq)]
pub struct Problem {
    pub image: ImagePayload,
    pub correct_location: Location,
    pub opponent_location: Location,
    pub opponent_score: Points,
}

/// The result of the player's single guess for a round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuessOutcome {
    pub guessed_location: Location,
    pub player_score: Points,
    pub correct_location: Location,
    pub opponent_location: Location,
    pub opponent_score: Points,
    /// Distance between guess and correct location, if the scorer reported it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}
