use crate::behavior::BetSample;
use crate::config::IntegrityConfig;

/// A bet sized inside the "textbook" band of the resulting pot.
pub fn is_optimal(sample: &BetSample, cfg: &IntegrityConfig) -> bool {
    let r = sample.ratio();
    r >= cfg.optimal_ratio_low && r <= cfg.optimal_ratio_high
}

/// Share of optimally sized bets, or `None` while the window is below the sample floor.
pub fn optimal_share<'a, I>(samples: I, cfg: &IntegrityConfig) -> Option<f64>
where
    I: IntoIterator<Item = &'a BetSample>,
{
    let (mut total, mut optimal) = (0usize, 0usize);
    for s in samples {
        total += 1;
        if is_optimal(s, cfg) {
            optimal += 1;
        }
    }
    (total >= cfg.bet_min_samples).then(|| optimal as f64 / total as f64)
}
