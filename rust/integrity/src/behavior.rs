use std::collections::VecDeque;

use ante_engine::errors::ErrorCode;
use serde::Serialize;

/// Why an actor was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    BotTiming,
    ExactTiming,
    InstantAction,
    Collusion,
    MultiAccount,
    OptimalBetting,
}

impl FlagKind {
    pub fn code(self) -> ErrorCode {
        match self {
            FlagKind::BotTiming | FlagKind::ExactTiming => ErrorCode::BotDetected,
            FlagKind::InstantAction => ErrorCode::ActionTooFast,
            FlagKind::Collusion => ErrorCode::CollusionDetected,
            FlagKind::MultiAccount => ErrorCode::MultiAccount,
            FlagKind::OptimalBetting => ErrorCode::SuspiciousBetting,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flag {
    pub kind: FlagKind,
    pub points: u32,
    pub reason: String,
    pub at_ms: i64,
}

/// One bet and the pot it was made into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BetSample {
    pub amount: u64,
    pub pot: u64,
}

impl BetSample {
    /// Share of the resulting pot this bet represents.
    pub fn ratio(&self) -> f64 {
        let total = self.pot + self.amount;
        if total == 0 {
            return 0.0;
        }
        self.amount as f64 / total as f64
    }
}

/// Everything observed about one actor. Suspicion only ever grows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerBehavior {
    pub actor_id: String,
    pub action_timestamps: VecDeque<i64>,
    pub bet_samples: VecDeque<BetSample>,
    pub hands_seen: u64,
    pub vpip_hands: u64,
    pub pfr_hands: u64,
    pub suspicion_score: u32,
    /// Newest flags, oldest dropped first
    pub flags: VecDeque<Flag>,
    /// Every flag ever raised, including dropped ones
    pub flag_count: u64,
}

impl PlayerBehavior {
    pub fn new(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            action_timestamps: VecDeque::new(),
            bet_samples: VecDeque::new(),
            hands_seen: 0,
            vpip_hands: 0,
            pfr_hands: 0,
            suspicion_score: 0,
            flags: VecDeque::new(),
            flag_count: 0,
        }
    }

    pub fn vpip(&self) -> f64 {
        ratio(self.vpip_hands, self.hands_seen)
    }

    pub fn pfr(&self) -> f64 {
        ratio(self.pfr_hands, self.hands_seen)
    }

    /// 100 minus suspicion, floored at 0.
    pub fn reputation(&self) -> u32 {
        100u32.saturating_sub(self.suspicion_score)
    }

    pub(crate) fn push_timestamp(&mut self, at_ms: i64, window: usize) {
        self.action_timestamps.push_back(at_ms);
        while self.action_timestamps.len() > window {
            self.action_timestamps.pop_front();
        }
    }

    pub(crate) fn push_bet(&mut self, sample: BetSample, window: usize) {
        self.bet_samples.push_back(sample);
        while self.bet_samples.len() > window {
            self.bet_samples.pop_front();
        }
    }

    pub(crate) fn add_flag(&mut self, flag: Flag, history: usize) {
        self.suspicion_score = self.suspicion_score.saturating_add(flag.points);
        self.flag_count += 1;
        self.flags.push_back(flag);
        while self.flags.len() > history {
            self.flags.pop_front();
        }
    }
}

fn ratio(n: u64, d: u64) -> f64 {
    if d == 0 {
        0.0
    } else {
        n as f64 / d as f64
    }
}
