use serde::{Deserialize, Serialize};

use crate::{ImagePayload, Location, Points, Problem, ServiceError};

/// Response body of `GET /problem`.
///
/// Extra fields sent by the service (such as the opponent's raw
/// probabilities) are ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProblemResponse {
    pub image_base64: ImagePayload,
    pub correct_location: Location,
    pub model_predicted_location: Location,
    pub model_predicted_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_predicted_distance_km: Option<f64>,
}

/// Request body of `POST /guess`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuessRequest {
    pub correct_location: Location,
    pub guessed_location: Location,
}

/// Response body of `POST /guess`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuessResponse {
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// A validated answer of the scoring service.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuessScore {
    pub score: Points,
    pub distance_km: Option<f64>,
}

fn points_from_wire(field: &str, value: f64) -> Result<Points, ServiceError> {
    if !value.is_finite() || value < 0.0 || value > f64::from(Points::MAX) {
        return Err(ServiceError::MalformedResponse(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(value.round() as Points)
}

fn check_location(field: &str, location: Location) -> Result<Location, ServiceError> {
    if location.is_valid() {
        Ok(location)
    } else {
        Err(ServiceError::MalformedResponse(format!(
            "{} is not a valid coordinate pair: [{}, {}]",
            field, location.lat, location.lon
        )))
    }
}

impl TryFrom<ProblemResponse> for Problem {
    type Error = ServiceError;

    fn try_from(resp: ProblemResponse) -> Result<Self, Self::Error> {
        if resp.image_base64.as_base64().is_empty() {
            return Err(ServiceError::MalformedResponse(String::from(
                "image_base64 is empty",
            )));
        }
        Ok(Problem {
            correct_location: check_location("correct_location", resp.correct_location)?,
            opponent_location: check_location(
                "model_predicted_location",
                resp.model_predicted_location,
            )?,
            opponent_score: points_from_wire("model_predicted_score", resp.model_predicted_score)?,
            image: resp.image_base64,
        })
    }
}

impl TryFrom<GuessResponse> for GuessScore {
    type Error = ServiceError;

    fn try_from(resp: GuessResponse) -> Result<Self, Self::Error> {
        let distance_km = match resp.distance_km {
            Some(d) if !d.is_finite() || d < 0.0 => {
                return Err(ServiceError::MalformedResponse(format!(
                    "distance_km must be a non-negative number, got {}",
                    d
                )))
            }
            other => other,
        };
        Ok(GuessScore {
            score: points_from_wire("score", resp.score)?,
            distance_km,
        })
    }
}
