/// An operation was invoked outside of its precondition.
///
/// These are rejected before anything is mutated, so the state is exactly as
/// it was before the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidState {
    GameOver,
    NoProblem,
    NoPick,
    SubmissionPending,
    RoundAlreadyOver,
    RoundNotOver,
    NoSubmissionPending,
    StaleSubmission,
    ProblemAlreadyLoaded,
}

impl std::error::Error for InvalidState {}

impl std::fmt::Display for InvalidState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidState::GameOver => write!(f, "The game is over, start a new session"),
            InvalidState::NoProblem => write!(f, "The round has no problem loaded yet"),
            InvalidState::NoPick => write!(f, "No location has been picked for this round"),
            InvalidState::SubmissionPending => {
                write!(f, "A guess for this round is already being scored")
            }
            InvalidState::RoundAlreadyOver => {
                write!(f, "A guess for this round has already been scored")
            }
            InvalidState::RoundNotOver => write!(f, "The current round has not been resolved yet"),
            InvalidState::NoSubmissionPending => write!(f, "No guess is awaiting a score"),
            InvalidState::StaleSubmission => {
                write!(f, "The score belongs to a guess that is no longer pending")
            }
            InvalidState::ProblemAlreadyLoaded => {
                write!(f, "The problem for this round is already loaded")
            }
        }
    }
}

/// The problem provider or the scoring service failed.
#[derive(Clone, Debug, PartialEq)]
pub enum ServiceError {
    /// The service could not be reached, or the connection broke.
    Transport(String),
    /// No response arrived within the configured timeout.
    Timeout,
    /// The service answered with a non-success HTTP status.
    Status(u16),
    /// The response was missing fields or carried impossible values.
    MalformedResponse(String),
}

impl std::error::Error for ServiceError {}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Transport(msg) => write!(f, "Could not reach the game service: {}", msg),
            ServiceError::Timeout => write!(f, "The game service did not respond in time"),
            ServiceError::Status(code) => {
                write!(f, "The game service answered with HTTP status {}", code)
            }
            ServiceError::MalformedResponse(msg) => {
                write!(f, "The game service sent a malformed response: {}", msg)
            }
        }
    }
}

/// The error type for all [`SessionController`](crate::SessionController) operations.
#[derive(Clone, Debug, PartialEq)]
pub enum GameError {
    InvalidState(InvalidState),
    Service(ServiceError),
}

impl GameError {
    /// Service failures can be fixed by retrying the same action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GameError::Service(_))
    }
}

impl From<InvalidState> for GameError {
    fn from(err: InvalidState) -> Self {
        GameError::InvalidState(err)
    }
}

impl From<ServiceError> for GameError {
    fn from(err: ServiceError) -> Self {
        GameError::Service(err)
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::InvalidState(err) => Some(err),
            GameError::Service(err) => Some(err),
        }
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::InvalidState(_) => write!(f, "Action not allowed right now"),
            GameError::Service(_) => write!(f, "Game service request failed"),
        }
    }
}
