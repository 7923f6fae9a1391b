use std::io::Write;
use std::path::PathBuf;

use geoguess::{GameError, GameService, GuessOutcome, RoundPhase, SessionController, Verdict};
use tracing::{info, warn};

use crate::command::{Command, HELP};
use crate::recording::Recorder;

/// The terminal front end: forwards commands to the controller and prints
/// what the player needs to see afterwards.
pub struct Game<S, W> {
    controller: SessionController<S>,
    out: W,
    recorder: Option<Recorder>,
    image_dir: Option<PathBuf>,
}

pub fn verdict_message(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::PlayerWon => "You won! Congratulations!",
        Verdict::OpponentWon => "You lost, better luck next time.",
        Verdict::Tie => "It's a tie! That's quite rare!",
    }
}

fn write_outcome(out: &mut impl Write, outcome: &GuessOutcome) -> anyhow::Result<()> {
    let distance = outcome
        .distance_km
        .map(|d| format!(" ({:.1} km away)", d))
        .unwrap_or_default();
    writeln!(
        out,
        "Your guess {} scored {} points{}.",
        outcome.guessed_location, outcome.player_score, distance
    )?;
    writeln!(out, "Correct location: {}.", outcome.correct_location)?;
    writeln!(
        out,
        "The AI guessed {} and scored {} points.",
        outcome.opponent_location, outcome.opponent_score
    )?;
    Ok(())
}

impl<S: GameService, W: Write> Game<S, W> {
    pub fn new(
        controller: SessionController<S>,
        out: W,
        recorder: Option<Recorder>,
        image_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            controller,
            out,
            recorder,
            image_dir,
        }
    }

    pub fn start(&mut self) -> anyhow::Result<()> {
        let result = self.controller.start_session();
        self.after_session_start(result)?;
        self.render()
    }

    /// Returns `false` once the player wants to quit.
    ///
    /// Rejected actions and service failures are shown to the player; only
    /// failures to write output or recordings are returned as errors.
    pub fn handle(&mut self, command: Command) -> anyhow::Result<bool> {
        match command {
            Command::Pick(location) => {
                if self.controller.record_player_pick(location) {
                    writeln!(self.out, "Marker placed at {}.", location)?;
                } else {
                    writeln!(self.out, "You cannot move your marker right now.")?;
                }
            }
            Command::Guess => {
                let round = self.controller.round().number();
                match self.controller.submit_guess().cloned() {
                    Ok(outcome) => {
                        if let Some(recorder) = &mut self.recorder {
                            recorder.store_round(round, &outcome);
                        }
                    }
                    Err(err) => self.report(&err)?,
                }
            }
            Command::Continue => {
                let result = self.controller.advance_round();
                let finished = result.is_ok() && self.controller.session().is_game_over();
                self.after_problem_request(result)?;
                if finished {
                    self.write_recording()?;
                }
            }
            Command::Retry => {
                let result = self.controller.retry_problem();
                self.after_problem_request(result)?;
            }
            Command::New => {
                let result = self.controller.request_new_session();
                self.after_session_start(result)?;
            }
            Command::Status => {}
            Command::Help => {
                writeln!(self.out, "{}", HELP)?;
                return Ok(true);
            }
            Command::Quit => return Ok(false),
        }
        self.render()?;
        Ok(true)
    }

    fn after_session_start(&mut self, result: Result<(), GameError>) -> anyhow::Result<()> {
        if let Some(recorder) = &mut self.recorder {
            recorder.discard_session();
        }
        self.after_problem_request(result)
    }

    fn after_problem_request(&mut self, result: Result<(), GameError>) -> anyhow::Result<()> {
        match result {
            Ok(()) => {
                if self.controller.round().phase() == RoundPhase::Picking {
                    self.save_image();
                }
                Ok(())
            }
            Err(err) => self.report(&err),
        }
    }

    fn report(&mut self, err: &GameError) -> anyhow::Result<()> {
        let reason = match err {
            GameError::InvalidState(err) => err.to_string(),
            GameError::Service(err) => err.to_string(),
        };
        if err.is_retryable() {
            writeln!(self.out, "Error: {}. You can try again.", reason)?;
        } else {
            writeln!(self.out, "{}.", reason)?;
        }
        Ok(())
    }

    fn save_image(&self) {
        let (Some(dir), Some(problem)) = (&self.image_dir, self.controller.round().problem())
        else {
            return;
        };
        let path = dir.join(format!("round_{}.jpg", self.controller.round().number()));
        let result = problem
            .image
            .decode()
            .map_err(anyhow::Error::from)
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(anyhow::Error::from));
        match result {
            Ok(()) => info!(path = %path.display(), "Saved image"),
            Err(err) => warn!(path = %path.display(), %err, "Could not save image"),
        }
    }

    fn write_recording(&mut self) -> anyhow::Result<()> {
        if let Some(recorder) = &mut self.recorder {
            let path = recorder.write_session_recording(self.controller.session())?;
            info!(path = %path.display(), "Recorded session");
        }
        Ok(())
    }

    /// Prints the current state of the game.
    pub fn render(&mut self) -> anyhow::Result<()> {
        let out = &mut self.out;
        let snapshot = self.controller.snapshot();
        let (round, session) = (snapshot.round, snapshot.session);
        writeln!(
            out,
            "Round {} of {}. Your score total is {} and the AI's score total is {}.",
            round.number(),
            snapshot.max_rounds,
            session.player_total(),
            session.opponent_total()
        )?;
        match round.phase() {
            RoundPhase::AwaitingProblem => writeln!(out, "Loading the image...")?,
            RoundPhase::ProblemUnavailable => writeln!(
                out,
                "The image could not be loaded. Type `retry` to try again."
            )?,
            RoundPhase::Picking | RoundPhase::Resolving => {
                if let Some(dir) = &self.image_dir {
                    writeln!(
                        out,
                        "Where was this taken? See {}.",
                        dir.join(format!("round_{}.jpg", round.number())).display()
                    )?;
                }
                match round.picked() {
                    Some(location) => writeln!(
                        out,
                        "Your marker is at {}. Type `guess` to submit it.",
                        location
                    )?,
                    None => writeln!(out, "Place your marker with `pick <lat> <lon>`.")?,
                }
            }
            RoundPhase::RoundOver => {
                if let Some(outcome) = round.outcome() {
                    write_outcome(out, outcome)?;
                }
                if let Some(verdict) = session.verdict() {
                    writeln!(out, "{}", verdict_message(verdict))?;
                    writeln!(
                        out,
                        "You scored {} points while the AI scored {} points.",
                        session.player_total(),
                        session.opponent_total()
                    )?;
                    writeln!(out, "Type `new` to play again.")?;
                } else {
                    writeln!(out, "Type `continue` for the next round.")?;
                }
            }
        }
        Ok(())
    }
}
