//! Action timing statistics.

use serde::Serialize;

use crate::config::IntegrityConfig;

/// Outcome of scoring a window of action timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum TimingVerdict {
    /// Too few samples, or nothing unusual
    Human,
    /// Every interval lands in the same rounding bucket
    ExactInterval { interval_ms: i64 },
    LowVariance { variance: f64 },
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

fn round_to_bucket(delta: i64, bucket: i64) -> i64 {
    ((delta as f64 / bucket as f64).round() as i64) * bucket
}

/// Score consecutive deltas of `timestamps`. The exact-interval check runs first since
/// it is the stronger signal.
pub fn evaluate_timing<'a, I>(timestamps: I, cfg: &IntegrityConfig) -> TimingVerdict
where
    I: IntoIterator<Item = &'a i64>,
{
    let ts: Vec<i64> = timestamps.into_iter().copied().collect();
    if ts.len() < cfg.timing_min_samples {
        return TimingVerdict::Human;
    }
    let deltas: Vec<i64> = ts.windows(2).map(|w| w[1] - w[0]).collect();

    let first = round_to_bucket(deltas[0], cfg.exact_interval_bucket_ms);
    if deltas
        .iter()
        .all(|d| round_to_bucket(*d, cfg.exact_interval_bucket_ms) == first)
    {
        return TimingVerdict::ExactInterval { interval_ms: first };
    }

    let as_f64: Vec<f64> = deltas.iter().map(|d| *d as f64).collect();
    let var = variance(&as_f64);
    if var < cfg.timing_variance_ms {
        return TimingVerdict::LowVariance { variance: var };
    }
    TimingVerdict::Human
}

/// `Some(reason)` when `elapsed_ms` is faster than a human can react.
pub fn instant_action_reason(elapsed_ms: i64, cfg: &IntegrityConfig) -> Option<String> {
    (elapsed_ms < cfg.min_human_reaction_ms).then(|| {
        format!(
            "Action in {}ms (< {}ms threshold)",
            elapsed_ms, cfg.min_human_reaction_ms
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variance_of_constant_is_zero() {
        assert_eq!(variance(&[5.0, 5.0, 5.0]), 0.0);
        assert_eq!(variance(&[1.0, 3.0]), 1.0);
        assert_eq!(variance(&[]), 0.0);
    }

    #[test]
    fn too_few_samples_is_human() {
        let cfg = IntegrityConfig::default();
        let ts: Vec<i64> = (0..9).map(|i| i * 1000).collect();
        assert_eq!(evaluate_timing(&ts, &cfg), TimingVerdict::Human);
    }

    #[test]
    fn metronome_is_exact_interval() {
        let cfg = IntegrityConfig::default();
        let ts: Vec<i64> = (0..10).map(|i| i * 1000 + (i % 2) * 20).collect();
        assert_eq!(
            evaluate_timing(&ts, &cfg),
            TimingVerdict::ExactInterval { interval_ms: 1000 }
        );
    }

    #[test]
    fn tight_jitter_across_buckets_is_low_variance() {
        let cfg = IntegrityConfig::default();
        // deltas alternate 1045 / 1055: buckets 1000 and 1100, variance 25
        let mut ts = vec![0i64];
        for i in 0..10 {
            let step = if i % 2 == 0 { 1045 } else { 1055 };
            ts.push(ts[i] + step);
        }
        match evaluate_timing(&ts, &cfg) {
            TimingVerdict::LowVariance { variance } => assert_eq!(variance, 25.0),
            other => panic!("unexpected verdict {:?}", other),
        }
    }

    #[test]
    fn human_spread_passes() {
        let cfg = IntegrityConfig::default();
        let deltas = [800, 2300, 1400, 5100, 950, 3300, 1200, 2700, 4100, 600];
        let mut ts = vec![0i64];
        for d in deltas {
            ts.push(ts[ts.len() - 1] + d);
        }
        assert_eq!(evaluate_timing(&ts, &cfg), TimingVerdict::Human);
    }

    #[test]
    fn instant_action_threshold() {
        let cfg = IntegrityConfig::default();
        assert!(instant_action_reason(150, &cfg).is_some());
        assert!(instant_action_reason(200, &cfg).is_none());
    }
}
