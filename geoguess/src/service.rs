use crate::{GuessRequest, GuessScore, Problem, ServiceError};

/// The two exchanges with the problem provider and scoring service.
///
/// Implementations must not retry on their own; the player decides whether
/// to try again.
pub trait GameService {
    /// Get the challenge for a new round.
    fn fetch_problem(&mut self) -> Result<Problem, ServiceError>;

    /// Score a guess against the correct location.
    fn score_guess(&mut self, request: &GuessRequest) -> Result<GuessScore, ServiceError>;
}

impl<S: GameService + ?Sized> GameService for Box<S> {
    fn fetch_problem(&mut self) -> Result<Problem, ServiceError> {
        (**self).fetch_problem()
    }

    fn score_guess(&mut self, request: &GuessRequest) -> Result<GuessScore, ServiceError> {
        (**self).score_guess(request)
    }
}

impl<S: GameService + ?Sized> GameService for &mut S {
    fn fetch_problem(&mut self) -> Result<Problem, ServiceError> {
        (**self).fetch_problem()
    }

    fn score_guess(&mut self, request: &GuessRequest) -> Result<GuessScore, ServiceError> {
        (**self).score_guess(request)
    }
}
