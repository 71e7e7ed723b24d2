//! How much money Hero put into the pot over a whole hand.

use log::debug;

use crate::money::{first_amount, last_amount, parse_stake};
use crate::record::Position;
use crate::streets::{split_streets, HOLE_CARDS};

/// Blind and straddle postings seen before the hole cards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Postings {
    /// Recoverable blinds/straddles, added only if Hero never raised preflop.
    blinds: f64,
    /// All-in postings, always counted.
    all_in: f64,
    found: bool,
}

fn scan_postings(text: &str) -> Postings {
    let mut postings = Postings::default();
    let pre_action = match text.find(HOLE_CARDS) {
        Some(idx) if idx > 0 => &text[..idx],
        _ => return postings,
    };

    for line in pre_action.lines() {
        let line = line.trim().to_lowercase();
        if !line.starts_with("hero: posts") {
            continue;
        }
        let Some(amount) = first_amount(&line) else {
            continue;
        };
        postings.found = true;
        if line.contains("all-in") {
            postings.all_in += amount;
        } else {
            postings.blinds += amount;
        }
    }
    postings
}

fn hero_raised(street: &str) -> bool {
    street.lines().any(|line| {
        let line = line.trim().to_lowercase();
        line.starts_with("hero:") && line.contains("raises")
    })
}

/// Hero's money into the pot on one street.
///
/// A raise amount is the street total ("raises $X to $Y" logs Y), so Hero's
/// own calls or bets before the last raise are superseded by it. Uncalled
/// bets returned to Hero are subtracted. Cashout lines never count.
pub fn street_contribution(street: &str) -> f64 {
    let mut contribution = 0.0;
    let mut actions: Vec<(f64, bool)> = Vec::new();

    for line in street.lines() {
        let line = line.trim().to_lowercase();
        if line.starts_with("hero:") {
            if line.contains("receives cashout") {
                continue;
            }
            if let Some(amount) = last_amount(&line) {
                actions.push((amount, line.contains("raises")));
            }
        } else if line.contains("uncalled bet") && line.contains("returned to hero") {
            if let Some(amount) = first_amount(&line) {
                contribution -= amount;
            }
        }
    }

    let counted = match actions.iter().rposition(|&(_, is_raise)| is_raise) {
        Some(last_raise) => &actions[last_raise..],
        None => &actions[..],
    };
    contribution + counted.iter().map(|&(amount, _)| amount).sum::<f64>()
}

/// Total amount Hero committed across the hand, before rounding.
///
/// `text` is either a whole block or the concatenated street slices. When the
/// blind lines are not visible (no text before `*** HOLE CARDS ***`), Hero's
/// blind is rebuilt from `stake` for SB/BB, unless Hero raised preflop. A
/// stake that does not split into two numbers skips that step.
pub fn hero_contribution(text: &str, position: Position, stake: &str) -> f64 {
    let postings = scan_postings(text);
    let streets = split_streets(text);
    let raised_preflop = hero_raised(streets.preflop);

    let mut total = postings.all_in;
    for street in streets.as_array() {
        total += street_contribution(street);
    }

    if !raised_preflop && postings.blinds > 0.0 {
        total += postings.blinds;
    }

    if !postings.found && position.is_blind() && !raised_preflop {
        match parse_stake(stake) {
            Some((sb, bb)) => {
                total += if position == Position::SmallBlind { sb } else { bb };
            }
            None => debug!("stake {:?} is malformed, skipping blind synthesis", stake),
        }
    }

    total
}
