use tracing::{debug, info, warn};

use crate::{
    GameError, GameService, GuessOutcome, GuessRequest, GuessScore, InvalidState, Location,
    RoundPhase, RoundState, ServiceError, SessionState,
};

/// Number of rounds in a session.
pub const MAX_ROUNDS: u32 = 5;

/// A guess handed out by [`SessionController::begin_guess()`] that is
/// waiting for its score.
///
/// Only the ticket of the latest submission is accepted by
/// [`SessionController::complete_guess()`]; results that arrive for an older
/// one, e.g. from before a new session was started, are rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingGuess {
    id: u64,
    request: GuessRequest,
}

impl PendingGuess {
    /// What to send to the scoring service.
    pub fn request(&self) -> &GuessRequest {
        &self.request
    }
}

/// A read-only view of everything a front end needs to draw.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub round: &'a RoundState,
    pub session: &'a SessionState,
    pub max_rounds: u32,
}

/// Drives a game session: fetches problems, submits guesses, keeps score.
///
/// This is the only place where [`RoundState`] and [`SessionState`] are
/// mutated. Front ends read them through [`round()`](Self::round) and
/// [`session()`](Self::session) and forward user intents to the methods below.
pub struct SessionController<S> {
    service: S,
    max_rounds: u32,
    round: RoundState,
    session: SessionState,
    next_submission_id: u64,
    pending_submission: Option<u64>,
}

impl<S: GameService> SessionController<S> {
    /// Creates a controller for [`MAX_ROUNDS`] rounds.
    ///
    /// No problem is requested until [`start_session()`](Self::start_session).
    pub fn new(service: S) -> Self {
        Self::with_max_rounds(service, MAX_ROUNDS)
    }

    /// Same as [`new()`](Self::new), for sessions of a different length.
    /// A session always has at least one round.
    pub fn with_max_rounds(service: S, max_rounds: u32) -> Self {
        Self {
            service,
            max_rounds: max_rounds.max(1),
            round: RoundState::new(1),
            session: SessionState::default(),
            next_submission_id: 0,
            pending_submission: None,
        }
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            round: &self.round,
            session: &self.session,
            max_rounds: self.max_rounds,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Discards all previous state and starts at round 1.
    ///
    /// If the first problem cannot be fetched, the session is still reset and
    /// the round is left in [`RoundPhase::ProblemUnavailable`].
    pub fn start_session(&mut self) -> Result<(), GameError> {
        info!(max_rounds = self.max_rounds, "Starting new session");
        self.session = SessionState::default();
        self.round = RoundState::new(1);
        self.pending_submission = None;
        self.load_problem()?;
        Ok(())
    }

    /// Allowed at any time, including after the game is over.
    pub fn request_new_session(&mut self) -> Result<(), GameError> {
        self.start_session()
    }

    /// Fetch the current round's problem again after a failed attempt.
    pub fn retry_problem(&mut self) -> Result<(), GameError> {
        match self.round.phase() {
            RoundPhase::AwaitingProblem | RoundPhase::ProblemUnavailable => {
                self.load_problem()?;
                Ok(())
            }
            _ => Err(InvalidState::ProblemAlreadyLoaded.into()),
        }
    }

    /// Places the player's marker. The last pick before submitting counts.
    ///
    /// Returns `false` and leaves the state untouched when picking is closed,
    /// i.e. the guess is being scored, the round is over, or the game is over.
    /// Locations that are not valid coordinates are ignored as well.
    pub fn record_player_pick(&mut self, location: Location) -> bool {
        if !location.is_valid() {
            debug!(lat = location.lat, lon = location.lon, "Ignoring invalid pick");
            return false;
        }
        if self.session.is_game_over()
            || self.round.is_over()
            || self.round.phase() == RoundPhase::Resolving
        {
            debug!(%location, phase = ?self.round.phase(), "Ignoring pick");
            return false;
        }
        self.round.set_picked(location);
        true
    }

    /// Scores the picked location and adds both scores to the totals.
    ///
    /// Can succeed only once per round. If the scoring service fails, the
    /// round stays open with the pick intact, so submitting can be retried.
    pub fn submit_guess(&mut self) -> Result<&GuessOutcome, GameError> {
        let pending = self.begin_guess()?;
        let result = self.service.score_guess(pending.request());
        self.complete_guess(pending, result)
    }

    /// First half of [`submit_guess()`](Self::submit_guess), for front ends
    /// that send the scoring request themselves.
    ///
    /// Until [`complete_guess()`](Self::complete_guess) is called, the round
    /// is [`RoundPhase::Resolving`] and rejects picks and further submissions.
    pub fn begin_guess(&mut self) -> Result<PendingGuess, InvalidState> {
        if self.session.is_game_over() {
            return Err(InvalidState::GameOver);
        }
        match self.round.phase() {
            RoundPhase::Picking => {}
            RoundPhase::Resolving => return Err(InvalidState::SubmissionPending),
            RoundPhase::RoundOver => return Err(InvalidState::RoundAlreadyOver),
            RoundPhase::AwaitingProblem | RoundPhase::ProblemUnavailable => {
                return Err(InvalidState::NoProblem)
            }
        }
        let Some(problem) = self.round.problem() else {
            return Err(InvalidState::NoProblem);
        };
        let Some(guessed_location) = self.round.picked() else {
            return Err(InvalidState::NoPick);
        };
        let request = GuessRequest {
            correct_location: problem.correct_location,
            guessed_location,
        };
        let id = self.next_submission_id;
        self.next_submission_id += 1;
        self.pending_submission = Some(id);
        self.round.set_phase(RoundPhase::Resolving);
        debug!(round = self.round.number(), guess = %guessed_location, id, "Submitting guess");
        Ok(PendingGuess { id, request })
    }

    /// Second half of [`submit_guess()`](Self::submit_guess).
    pub fn complete_guess(
        &mut self,
        pending: PendingGuess,
        result: Result<GuessScore, ServiceError>,
    ) -> Result<&GuessOutcome, GameError> {
        if self.round.phase() != RoundPhase::Resolving {
            return Err(InvalidState::NoSubmissionPending.into());
        }
        if self.pending_submission != Some(pending.id) {
            debug!(id = pending.id, "Ignoring score of an outdated submission");
            return Err(InvalidState::StaleSubmission.into());
        }
        self.pending_submission = None;
        let score = match result {
            Ok(score) => score,
            Err(err) => {
                warn!(round = self.round.number(), %err, "Scoring the guess failed");
                self.round.set_phase(RoundPhase::Picking);
                return Err(err.into());
            }
        };
        let (Some(problem), Some(guessed_location)) = (self.round.problem(), self.round.picked())
        else {
            // Resolving is only entered with both present
            self.round.set_phase(RoundPhase::Picking);
            return Err(InvalidState::NoPick.into());
        };
        let outcome = GuessOutcome {
            guessed_location,
            player_score: score.score,
            correct_location: problem.correct_location,
            opponent_location: problem.opponent_location,
            opponent_score: problem.opponent_score,
            distance_km: score.distance_km,
        };
        self.session
            .add_scores(outcome.player_score, outcome.opponent_score);
        info!(
            round = self.round.number(),
            player_score = outcome.player_score,
            opponent_score = outcome.opponent_score,
            player_total = self.session.player_total(),
            opponent_total = self.session.opponent_total(),
            "Round resolved"
        );
        Ok(self.round.resolve(outcome))
    }

    /// Moves on once the current round is resolved.
    ///
    /// After the final round this ends the game and keeps the last outcome
    /// visible. Otherwise the next round starts and its problem is fetched;
    /// if that fails the round is [`RoundPhase::ProblemUnavailable`].
    pub fn advance_round(&mut self) -> Result<(), GameError> {
        if self.session.is_game_over() {
            return Err(InvalidState::GameOver.into());
        }
        if !self.round.is_over() {
            return Err(InvalidState::RoundNotOver.into());
        }
        if self.round.number() >= self.max_rounds {
            self.session.finish();
            info!(
                player_total = self.session.player_total(),
                opponent_total = self.session.opponent_total(),
                verdict = ?self.session.verdict(),
                "Game over"
            );
            return Ok(());
        }
        self.round = RoundState::new(self.round.number() + 1);
        self.load_problem()?;
        Ok(())
    }

    fn load_problem(&mut self) -> Result<(), ServiceError> {
        self.round.set_phase(RoundPhase::AwaitingProblem);
        match self.service.fetch_problem() {
            Ok(problem) => {
                debug!(round = self.round.number(), "Problem received");
                self.round.install_problem(problem);
                Ok(())
            }
            Err(err) => {
                warn!(round = self.round.number(), %err, "Fetching the problem failed");
                self.round.set_phase(RoundPhase::ProblemUnavailable);
                Err(err)
            }
        }
    }
}
