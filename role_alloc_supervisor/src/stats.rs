use serde::{Deserialize, Serialize};

/// Dispersion of one trial's competency table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    /// Mean over workers of each worker's mean competency.
    pub mean_competency: f64,
    /// Population std of per-worker means around `mean_competency`.
    pub between_worker_std: f64,
    /// Mean over workers of the population std of their own competencies.
    pub within_worker_std: f64,
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn population_std(xs: &[f64], around: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    (xs.iter().map(|x| (x - around).powi(2)).sum::<f64>() / xs.len() as f64).sqrt()
}

pub fn population_stats(rows: &[Vec<f64>]) -> PopulationStats {
    let worker_means: Vec<f64> = rows.iter().map(|r| mean(r)).collect();
    let mean_competency = mean(&worker_means);
    let within: Vec<f64> = rows
        .iter()
        .zip(&worker_means)
        .map(|(r, &m)| population_std(r, m))
        .collect();

    PopulationStats {
        mean_competency,
        between_worker_std: population_std(&worker_means, mean_competency),
        within_worker_std: mean(&within),
    }
}
