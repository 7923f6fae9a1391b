use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use geoguess::{GuessOutcome, Points, SessionState, Verdict};
use serde::{Deserialize, Serialize};

/// Writes every finished session to its own JSON file.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    rounds: Vec<RoundRecording>,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            rounds: Vec::new(),
        })
    }

    pub fn store_round(&mut self, round: u32, outcome: &GuessOutcome) {
        self.rounds.push(RoundRecording {
            round,
            outcome: outcome.clone(),
        });
    }

    /// Forget the rounds of a session that was abandoned.
    pub fn discard_session(&mut self) {
        self.rounds.clear();
    }

    pub fn write_session_recording(&mut self, session: &SessionState) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("session_{:0>6}.json", self.num));
        let recording = SessionRecording {
            rounds: std::mem::take(&mut self.rounds),
            player_total: session.player_total(),
            opponent_total: session.opponent_total(),
            verdict: session.verdict(),
        };
        let mut writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(&mut writer, &recording)?;
        writer.flush()?;
        self.num += 1;
        Ok(filepath)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionRecording {
    pub rounds: Vec<RoundRecording>,
    pub player_total: Points,
    pub opponent_total: Points,
    pub verdict: Option<Verdict>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoundRecording {
    pub round: u32,
    #[serde(flatten)]
    pub outcome: GuessOutcome,
}
