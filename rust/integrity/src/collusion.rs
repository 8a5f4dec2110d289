use serde::Serialize;

use crate::behavior::PlayerBehavior;
use crate::config::IntegrityConfig;

/// Two active actors whose stats look suspiciously alike.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollusionPair {
    pub first: String,
    pub second: String,
    pub score: f64,
}

/// Similarity score for two actors. With a `collusion_min_hands` gate, actors below it score 0.
pub fn collusion_score(a: &PlayerBehavior, b: &PlayerBehavior, cfg: &IntegrityConfig) -> f64 {
    if a.hands_seen < cfg.collusion_min_hands || b.hands_seen < cfg.collusion_min_hands {
        return 0.0;
    }
    let vpip_diff = (a.vpip() - b.vpip()).abs();
    let pfr_diff = (a.pfr() - b.pfr()).abs();
    if vpip_diff < cfg.collusion_similarity && pfr_diff < cfg.collusion_similarity {
        cfg.collusion_match_score
    } else {
        cfg.collusion_base_score
    }
}
