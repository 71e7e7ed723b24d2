//! Rakeback-dependent figures and the bulk recompute over stored hands.
//! The percentage is always an explicit argument.

use crate::contribution::hero_contribution;
use crate::money::round2;
use crate::record::{Position, SeatInfo};

/// Profit after rakeback at `percentage` (0–100).
///
/// Rakeback only applies to hands Hero won. At 100% the full rebate already
/// computed into `hero_profit_with_rake` is used.
pub fn adjusted_profit(hero_profit: f64, hero_profit_with_rake: f64, rake: f64, percentage: f64) -> f64 {
    if hero_profit <= 0.0 {
        return hero_profit;
    }
    let fraction = percentage / 100.0;
    if fraction == 1.0 {
        hero_profit_with_rake
    } else {
        hero_profit + rake * fraction
    }
}

/// The stored columns a recompute needs.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredStreets {
    pub hand_id: String,
    pub preflop_all: String,
    pub flop_all: String,
    pub turn_all: String,
    pub river_all: String,
    pub hero_position: Position,
    pub stake: String,
    pub hero_profit: f64,
    pub hero_profit_with_rake: f64,
    pub rake: f64,
    pub seats_info: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recomputed {
    pub hand_id: String,
    pub hero_contribution: f64,
    pub adjusted_profit: f64,
    pub hero_starting_stack: f64,
}

fn starting_stack_from_seats(seats_info: &str) -> f64 {
    serde_json::from_str::<Vec<SeatInfo>>(seats_info)
        .ok()
        .and_then(|seats| {
            seats
                .into_iter()
                .find(|s| s.player.eq_ignore_ascii_case("hero"))
        })
        .and_then(|s| s.stack.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Re-run the contribution calculation over the stored street text and
/// refresh the rakeback-dependent profit.
///
/// Stored slices start at `*** HOLE CARDS ***`, so blind postings are not
/// visible and blinds are rebuilt from the stake.
pub fn recompute(hand: &StoredStreets, percentage: f64) -> Recomputed {
    let text = [
        hand.preflop_all.as_str(),
        hand.flop_all.as_str(),
        hand.turn_all.as_str(),
        hand.river_all.as_str(),
    ]
    .concat();

    Recomputed {
        hand_id: hand.hand_id.clone(),
        hero_contribution: round2(hero_contribution(&text, hand.hero_position, &hand.stake)),
        adjusted_profit: adjusted_profit(
            hand.hero_profit,
            hand.hero_profit_with_rake,
            hand.rake,
            percentage,
        ),
        hero_starting_stack: starting_stack_from_seats(&hand.seats_info),
    }
}
