use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::Points;

/// Who came out ahead once the game is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    PlayerWon,
    OpponentWon,
    Tie,
}

/// State that spans all rounds of one session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    player_total: Points,
    opponent_total: Points,
    game_over: bool,
}

impl SessionState {
    pub fn player_total(&self) -> Points {
        self.player_total
    }

    pub fn opponent_total(&self) -> Points {
        self.opponent_total
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// `None` until the game is over.
    pub fn verdict(&self) -> Option<Verdict> {
        if !self.game_over {
            return None;
        }
        Some(match self.player_total.cmp(&self.opponent_total) {
            Ordering::Greater => Verdict::PlayerWon,
            Ordering::Less => Verdict::OpponentWon,
            Ordering::Equal => Verdict::Tie,
        })
    }

    pub(crate) fn add_scores(&mut self, player: Points, opponent: Points) {
        self.player_total = self.player_total.saturating_add(player);
        self.opponent_total = self.opponent_total.saturating_add(opponent);
    }

    pub(crate) fn finish(&mut self) {
        self.game_over = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_only_after_game_over() {
        let mut session = SessionState::default();
        session.add_scores(10, 5);
        assert_eq!(session.verdict(), None);
        session.finish();
        assert_eq!(session.verdict(), Some(Verdict::PlayerWon));
    }

    #[test]
    fn equal_totals_are_a_tie() {
        let mut session = SessionState::default();
        session.add_scores(4000, 3000);
        session.add_scores(1000, 2000);
        session.finish();
        assert_eq!(session.verdict(), Some(Verdict::Tie));
    }

    #[test]
    fn totals_saturate() {
        let mut session = SessionState::default();
        session.add_scores(Points::MAX, 1);
        session.add_scores(1, 1);
        assert_eq!(session.player_total(), Points::MAX);
        assert_eq!(session.opponent_total(), 2);
    }
}
