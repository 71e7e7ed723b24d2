//! The per-hand record and its position and scenario vocabularies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Hero's seat relative to the button at a 6-max table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "BTN")]
    Button,
    #[serde(rename = "SB")]
    SmallBlind,
    #[serde(rename = "BB")]
    BigBlind,
    #[serde(rename = "UTG")]
    UnderTheGun,
    #[serde(rename = "HJ")]
    Hijack,
    #[serde(rename = "CO")]
    Cutoff,
    Unknown,
}

const ROTATION: [Position; 6] = [
    Position::Button,
    Position::SmallBlind,
    Position::BigBlind,
    Position::UnderTheGun,
    Position::Hijack,
    Position::Cutoff,
];

impl Position {
    /// Map `(hero_seat - button_seat) mod 6` through the 6-max rotation.
    pub fn from_seats(button_seat: Option<u32>, hero_seat: Option<u32>) -> Self {
        match (button_seat, hero_seat) {
            (Some(button), Some(hero)) => {
                let idx = (hero as i64 - button as i64).rem_euclid(6) as usize;
                ROTATION[idx]
            }
            _ => Position::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Button => "BTN",
            Position::SmallBlind => "SB",
            Position::BigBlind => "BB",
            Position::UnderTheGun => "UTG",
            Position::Hijack => "HJ",
            Position::Cutoff => "CO",
            Position::Unknown => "Unknown",
        }
    }

    pub fn is_blind(&self) -> bool {
        matches!(self, Position::SmallBlind | Position::BigBlind)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = std::convert::Infallible;

    /// Unrecognised strings map to `Unknown`, matching how the field is stored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "BTN" => Position::Button,
            "SB" => Position::SmallBlind,
            "BB" => Position::BigBlind,
            "UTG" => Position::UnderTheGun,
            "HJ" => Position::Hijack,
            "CO" => Position::Cutoff,
            _ => Position::Unknown,
        })
    }
}

/// What Hero ended up doing preflop, relative to the raises in front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreflopScenario {
    #[serde(rename = "none")]
    NoAction,
    #[serde(rename = "open (single raised)")]
    Open,
    #[serde(rename = "3bet")]
    ThreeBet,
    #[serde(rename = "4bet")]
    FourBet,
    #[serde(rename = "5bet+")]
    FiveBetPlus,
    #[serde(rename = "call_vs_open (single raised)")]
    CallVsOpen,
    #[serde(rename = "call_vs_3bet")]
    CallVsThreeBet,
    #[serde(rename = "call_vs_4bet+")]
    CallVsFourBetPlus,
    #[serde(rename = "check_vs_open")]
    CheckVsOpen,
    #[serde(rename = "limp")]
    Limp,
    #[serde(rename = "fold")]
    Fold,
}

impl PreflopScenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreflopScenario::NoAction => "none",
            PreflopScenario::Open => "open (single raised)",
            PreflopScenario::ThreeBet => "3bet",
            PreflopScenario::FourBet => "4bet",
            PreflopScenario::FiveBetPlus => "5bet+",
            PreflopScenario::CallVsOpen => "call_vs_open (single raised)",
            PreflopScenario::CallVsThreeBet => "call_vs_3bet",
            PreflopScenario::CallVsFourBetPlus => "call_vs_4bet+",
            PreflopScenario::CheckVsOpen => "check_vs_open",
            PreflopScenario::Limp => "limp",
            PreflopScenario::Fold => "fold",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "none" => PreflopScenario::NoAction,
            "open (single raised)" => PreflopScenario::Open,
            "3bet" => PreflopScenario::ThreeBet,
            "4bet" => PreflopScenario::FourBet,
            "5bet+" => PreflopScenario::FiveBetPlus,
            "call_vs_open (single raised)" => PreflopScenario::CallVsOpen,
            "call_vs_3bet" => PreflopScenario::CallVsThreeBet,
            "call_vs_4bet+" => PreflopScenario::CallVsFourBetPlus,
            "check_vs_open" => PreflopScenario::CheckVsOpen,
            "limp" => PreflopScenario::Limp,
            "fold" => PreflopScenario::Fold,
            _ => return None,
        })
    }
}

impl fmt::Display for PreflopScenario {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatInfo {
    pub seat: u32,
    pub player: String,
    /// Kept as the logged text so the stored JSON matches the hand history.
    pub stack: String,
}

/// One parsed hand. Built once by the parser; only the rakeback-dependent
/// figures are rewritten afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    pub hand_id: String,
    pub date_time: String,
    pub stake: String,
    pub hero_position: Position,
    pub hero_cards: String,

    pub preflop_all: String,
    pub flop_all: String,
    pub turn_all: String,
    pub river_all: String,
    pub preflop_action: String,
    pub flop_action: String,
    pub turn_action: String,
    pub river_action: String,

    pub board_flop: String,
    pub board_turn: String,
    pub board_river: String,

    pub total_pot: f64,
    pub rake: f64,
    pub jackpot: f64,
    pub hero_contribution: f64,
    pub hero_profit: f64,
    pub hero_profit_with_rake: f64,
    pub paid_rake: f64,
    pub adjusted_profit: f64,
    pub hero_starting_stack: f64,

    pub preflop_scenario: PreflopScenario,
    pub had_rfi_opportunity: u8,
    pub had_3bet_op: u8,
    pub had_4bet_op: u8,

    pub seats_info: String,
    pub imported_on: String,
}

impl HandRecord {
    pub fn seats(&self) -> Vec<SeatInfo> {
        serde_json::from_str(&self.seats_info).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_rotation() {
        assert_eq!(Position::from_seats(Some(1), Some(1)), Position::Button);
        assert_eq!(Position::from_seats(Some(1), Some(2)), Position::SmallBlind);
        assert_eq!(Position::from_seats(Some(1), Some(3)), Position::BigBlind);
        assert_eq!(Position::from_seats(Some(1), Some(4)), Position::UnderTheGun);
        assert_eq!(Position::from_seats(Some(1), Some(5)), Position::Hijack);
        assert_eq!(Position::from_seats(Some(1), Some(6)), Position::Cutoff);
        // wraps past seat 6
        assert_eq!(Position::from_seats(Some(5), Some(1)), Position::BigBlind);
        assert_eq!(Position::from_seats(None, Some(3)), Position::Unknown);
        assert_eq!(Position::from_seats(Some(3), None), Position::Unknown);
    }

    #[test]
    fn test_position_string_forms() {
        assert_eq!(Position::Hijack.to_string(), "HJ");
        assert_eq!("CO".parse::<Position>().unwrap(), Position::Cutoff);
        assert_eq!("??".parse::<Position>().unwrap(), Position::Unknown);
        assert_eq!(serde_json::to_string(&Position::Button).unwrap(), "\"BTN\"");
    }

    #[test]
    fn test_scenario_vocabulary() {
        for s in [
            "none",
            "open (single raised)",
            "3bet",
            "4bet",
            "5bet+",
            "call_vs_open (single raised)",
            "call_vs_3bet",
            "call_vs_4bet+",
            "check_vs_open",
            "limp",
            "fold",
        ] {
            let parsed = PreflopScenario::parse(s).unwrap();
            assert_eq!(parsed.as_str(), s);
            assert_eq!(serde_json::to_string(&parsed).unwrap(), format!("\"{}\"", s));
        }
        assert_eq!(PreflopScenario::parse("donk"), None);
    }
}
