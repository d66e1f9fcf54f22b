use maple_arbiter_types::{RankedCandidate, RankingMethod, AXIS_COUNT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::pareto::ScoredCandidate;

/// Orders a Pareto front.
///
/// Output is a total order, best first, with every input candidate exactly
/// once. Equal scores keep input order.
pub trait Ranker {
    fn rank(&self, front: &[ScoredCandidate]) -> Vec<RankedCandidate>;
}

/// Win frequency over randomly drawn weight vectors.
///
/// The generator is seeded from `seed` on every call, so a fixed seed and
/// input always give the same ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RobustWeightRanker {
    pub samples: usize,
    pub seed: u64,
}

impl RobustWeightRanker {
    pub fn new(samples: usize, seed: u64) -> Self {
        Self { samples, seed }
    }
}

/// One uniform draw from the probability simplex.
pub fn sample_simplex<R: Rng>(rng: &mut R) -> [f64; AXIS_COUNT] {
    let draws: [f64; AXIS_COUNT] = std::array::from_fn(|_| -(1.0 - rng.gen::<f64>()).ln());
    let total: f64 = draws.iter().sum();
    if total > 0.0 {
        draws.map(|d| d / total)
    } else {
        [1.0 / AXIS_COUNT as f64; AXIS_COUNT]
    }
}

/// Index of the highest value; the earliest wins ties.
fn first_max(values: impl Iterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, value) in values.enumerate() {
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

/// Sort by score descending, keeping input order among equals.
fn ordered(front: &[ScoredCandidate], scores: Vec<f64>) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = front
        .iter()
        .zip(scores)
        .map(|(c, score)| RankedCandidate {
            id: c.id.clone(),
            score,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

impl Ranker for RobustWeightRanker {
    fn rank(&self, front: &[ScoredCandidate]) -> Vec<RankedCandidate> {
        if front.is_empty() {
            return Vec::new();
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut wins = vec![0usize; front.len()];
        for _ in 0..self.samples {
            let weights = sample_simplex(&mut rng);
            if let Some(winner) = first_max(front.iter().map(|c| c.vector.weighted_sum(&weights))) {
                wins[winner] += 1;
            }
        }

        let scores = wins
            .iter()
            .map(|&w| {
                if self.samples == 0 {
                    0.0
                } else {
                    w as f64 / self.samples as f64
                }
            })
            .collect();
        debug!(
            candidates = front.len(),
            samples = self.samples,
            seed = self.seed,
            "Robust weight ranking complete"
        );
        ordered(front, scores)
    }
}

/// Closeness to the ideal point after vector normalization (TOPSIS).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopsisRanker {
    /// Per-axis weights, canonical order
    pub weights: [f64; AXIS_COUNT],
}

impl Default for TopsisRanker {
    fn default() -> Self {
        Self {
            weights: [1.0 / AXIS_COUNT as f64; AXIS_COUNT],
        }
    }
}

impl TopsisRanker {
    pub fn with_weights(weights: [f64; AXIS_COUNT]) -> Self {
        Self { weights }
    }

    /// Closeness coefficient `d⁻ / (d⁺ + d⁻)` per candidate, input order.
    ///
    /// A candidate equidistant at zero from both points (every candidate
    /// identical on every axis) scores 1.0.
    pub fn closeness(&self, front: &[ScoredCandidate]) -> Vec<f64> {
        let norms: [f64; AXIS_COUNT] = std::array::from_fn(|axis| {
            front
                .iter()
                .map(|c| c.vector.values()[axis].powi(2))
                .sum::<f64>()
                .sqrt()
        });

        let matrix: Vec<[f64; AXIS_COUNT]> = front
            .iter()
            .map(|c| {
                std::array::from_fn(|axis| {
                    if norms[axis] > 0.0 {
                        self.weights[axis] * c.vector.values()[axis] / norms[axis]
                    } else {
                        0.0
                    }
                })
            })
            .collect();

        let ideal: [f64; AXIS_COUNT] = std::array::from_fn(|axis| {
            matrix
                .iter()
                .map(|row| row[axis])
                .fold(f64::NEG_INFINITY, f64::max)
        });
        let anti_ideal: [f64; AXIS_COUNT] = std::array::from_fn(|axis| {
            matrix
                .iter()
                .map(|row| row[axis])
                .fold(f64::INFINITY, f64::min)
        });

        matrix
            .iter()
            .map(|row| {
                let to_ideal = euclidean(row, &ideal);
                let to_anti = euclidean(row, &anti_ideal);
                let denominator = to_ideal + to_anti;
                if denominator > 0.0 {
                    to_anti / denominator
                } else {
                    1.0
                }
            })
            .collect()
    }
}

fn euclidean(a: &[f64; AXIS_COUNT], b: &[f64; AXIS_COUNT]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

impl Ranker for TopsisRanker {
    fn rank(&self, front: &[ScoredCandidate]) -> Vec<RankedCandidate> {
        if front.is_empty() {
            return Vec::new();
        }
        let scores = self.closeness(front);
        debug!(candidates = front.len(), "TOPSIS ranking complete");
        ordered(front, scores)
    }
}

/// Rank `front` with the method a caller selected.
pub fn rank(front: &[ScoredCandidate], method: RankingMethod, seed: u64) -> Vec<RankedCandidate> {
    match method {
        RankingMethod::RobustWeights { samples } => {
            RobustWeightRanker::new(samples, seed).rank(front)
        }
        RankingMethod::Topsis => TopsisRanker::default().rank(front),
    }
}
