use crate::cards::Card;
use serde::{Deserialize, Serialize};

/// Kind of a betting action, without its amount.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
}

impl ActionKind {
    /// Bets and raises put pressure on the table; everything else is passive.
    pub fn is_aggressive(self) -> bool {
        matches!(self, ActionKind::Bet | ActionKind::Raise)
    }
}

/// Represents a player action during a betting round.
/// Amounts are the chips the actor commits with this action.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", content = "amount", rename_all = "lowercase")]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check (no bet, only valid if no bet to call)
    Check,
    /// Call the current bet
    Call(u64),
    /// Open the betting for the street
    Bet(u64),
    /// Raise over an existing bet
    Raise(u64),
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::Fold => ActionKind::Fold,
            PlayerAction::Check => ActionKind::Check,
            PlayerAction::Call(_) => ActionKind::Call,
            PlayerAction::Bet(_) => ActionKind::Bet,
            PlayerAction::Raise(_) => ActionKind::Raise,
        }
    }

    pub fn amount(&self) -> Option<u64> {
        match self {
            PlayerAction::Call(a) | PlayerAction::Bet(a) | PlayerAction::Raise(a) => Some(*a),
            PlayerAction::Fold | PlayerAction::Check => None,
        }
    }
}

/// Engine view of a seated player. Owned by the game loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Current chip stack
    pub chips: u64,
    /// Hole cards (up to 2 cards)
    hole: [Option<Card>; 2],
    pub folded: bool,
    /// Chips committed on the current street
    pub bet: u64,
    /// Chips committed over the whole hand
    #[serde(default)]
    pub contributed: u64,
    pub is_dealer: bool,
    pub is_turn: bool,
}

impl Player {
    pub fn new(id: impl Into<String>, chips: u64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            chips,
            hole: [None, None],
            folded: false,
            bet: 0,
            contributed: 0,
            is_dealer: false,
            is_turn: false,
        }
    }

    pub fn with_hole(id: impl Into<String>, chips: u64, hole: [Card; 2]) -> Self {
        let mut p = Self::new(id, chips);
        p.hole = [Some(hole[0]), Some(hole[1])];
        p
    }

    pub fn hole_cards(&self) -> Vec<Card> {
        self.hole.iter().flatten().copied().collect()
    }

    /// Both hole cards, once dealt.
    pub fn hole_pair(&self) -> Option<[Card; 2]> {
        match self.hole {
            [Some(a), Some(b)] => Some([a, b]),
            _ => None,
        }
    }

    pub fn give_card(&mut self, c: Card) -> Result<(), String> {
        if self.hole[0].is_none() {
            self.hole[0] = Some(c);
            Ok(())
        } else if self.hole[1].is_none() {
            self.hole[1] = Some(c);
            Ok(())
        } else {
            Err("Hole cards already full".to_string())
        }
    }

    pub fn clear_cards(&mut self) {
        self.hole = [None, None];
    }

    pub fn add_chips(&mut self, amount: u64) {
        self.chips = self.chips.saturating_add(amount);
    }

    /// Move chips from the stack into the current street bet.
    pub fn commit(&mut self, amount: u64) -> Result<(), String> {
        if amount > self.chips {
            return Err("Insufficient chips".to_string());
        }
        self.chips -= amount;
        self.bet += amount;
        self.contributed += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_serializes_with_amount() {
        let json = serde_json::to_value(PlayerAction::Bet(50)).unwrap();
        assert_eq!(json["action"], "bet");
        assert_eq!(json["amount"], 50);
        let fold = serde_json::to_value(PlayerAction::Fold).unwrap();
        assert_eq!(fold["action"], "fold");
    }

    #[test]
    fn commit_rejects_overdraw() {
        let mut p = Player::new("a", 10);
        assert!(p.commit(11).is_err());
        p.commit(4).unwrap();
        assert_eq!((p.chips, p.bet), (6, 4));
    }

    #[test]
    fn third_card_is_refused() {
        let mut p = Player::new("a", 10);
        p.give_card("Ah".parse().unwrap()).unwrap();
        p.give_card("Kh".parse().unwrap()).unwrap();
        assert!(p.give_card("Qh".parse().unwrap()).is_err());
        assert!(p.hole_pair().is_some());
    }
}
