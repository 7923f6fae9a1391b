use crate::{GuessOutcome, Location, Problem};

/// Where a round currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    /// The problem has been requested and has not arrived yet.
    AwaitingProblem,
    /// Fetching the problem failed; it has to be requested again.
    ProblemUnavailable,
    /// The problem is shown and the player may place their marker.
    Picking,
    /// The guess has been sent to the scoring service.
    Resolving,
    /// The guess has been scored.
    RoundOver,
}

/// The state of a single round.
///
/// Only the [`SessionController`](crate::SessionController) can change it,
/// which keeps `is_over()` equivalent to an outcome being present.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundState {
    number: u32,
    phase: RoundPhase,
    problem: Option<Problem>,
    picked: Option<Location>,
    outcome: Option<GuessOutcome>,
}

impl RoundState {
    pub(crate) fn new(number: u32) -> Self {
        Self {
            number,
            phase: RoundPhase::AwaitingProblem,
            problem: None,
            picked: None,
            outcome: None,
        }
    }

    /// 1-based round number.
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn problem(&self) -> Option<&Problem> {
        self.problem.as_ref()
    }

    pub fn picked(&self) -> Option<Location> {
        self.picked
    }

    pub fn outcome(&self) -> Option<&GuessOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == RoundPhase::AwaitingProblem
    }

    pub(crate) fn set_phase(&mut self, phase: RoundPhase) {
        self.phase = phase;
    }

    pub(crate) fn install_problem(&mut self, problem: Problem) {
        self.problem = Some(problem);
        self.phase = RoundPhase::Picking;
    }

    pub(crate) fn set_picked(&mut self, location: Location) {
        debug_assert!(!self.is_over());
        self.picked = Some(location);
    }

    pub(crate) fn resolve(&mut self, outcome: GuessOutcome) -> &GuessOutcome {
        debug_assert!(self.outcome.is_none());
        self.phase = RoundPhase::RoundOver;
        self.outcome.insert(outcome)
    }
}
