use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use geoguess::scoring::{distance_km, score};
use geoguess::{GameService, GuessRequest, GuessScore, Problem, ProblemResponse, ServiceError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Plays without a server: problems come from a file, guesses are scored locally.
///
/// The file is a JSON array of records in the same format as the
/// `GET /problem` response. Problems are served in a shuffled order, and the
/// order is reshuffled once all of them have been played.
pub struct OfflineService {
    problems: Vec<Problem>,
    order: Vec<usize>,
    rng: StdRng,
}

impl OfflineService {
    pub fn load(path: &Path, rng: StdRng) -> anyhow::Result<Self> {
        let reader = BufReader::new(
            File::open(path)
                .with_context(|| format!("Could not open problem file '{}'", path.display()))?,
        );
        let records: Vec<ProblemResponse> = serde_json::from_reader(reader)
            .with_context(|| format!("Could not parse problem file '{}'", path.display()))?;
        let problems = records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| {
                Problem::try_from(record).with_context(|| format!("Problem #{} is invalid", idx))
            })
            .collect::<anyhow::Result<Vec<Problem>>>()?;
        Self::from_problems(problems, rng)
    }

    pub fn from_problems(problems: Vec<Problem>, rng: StdRng) -> anyhow::Result<Self> {
        if problems.is_empty() {
            anyhow::bail!("At least one problem is needed to play offline");
        }
        Ok(Self {
            problems,
            order: Vec::new(),
            rng,
        })
    }

    pub fn num_problems(&self) -> usize {
        self.problems.len()
    }
}

impl GameService for OfflineService {
    fn fetch_problem(&mut self) -> Result<Problem, ServiceError> {
        if self.order.is_empty() {
            self.order = (0..self.problems.len()).collect();
            self.order.shuffle(&mut self.rng);
            debug!(num_problems = self.order.len(), "Shuffled offline problems");
        }
        // `problems` is never empty, so neither is `order` at this point
        let idx = self.order.pop().unwrap_or_default();
        Ok(self.problems[idx].clone())
    }

    fn score_guess(&mut self, request: &GuessRequest) -> Result<GuessScore, ServiceError> {
        let distance = distance_km(request.guessed_location, request.correct_location);
        Ok(GuessScore {
            score: score(distance),
            distance_km: Some(distance),
        })
    }
}
