use std::fmt;

use chrono::Local;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::contribution::hero_contribution;
use crate::extract;
use crate::profit;
use crate::rakeback::adjusted_profit;
use crate::record::{HandRecord, Position};
use crate::scenario::read_preflop;
use crate::streets::{hero_actions, split_streets};

static BLOCK_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("static block separator pattern"));

/// Inputs that come from outside the hand text.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Rakeback percentage (0–100) used for `adjusted_profit`.
    pub rakeback_percentage: f64,
    pub imported_on: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            rakeback_percentage: 0.0,
            imported_on: now_iso(),
        }
    }
}

impl ParseOptions {
    pub fn with_rakeback(rakeback_percentage: f64) -> Self {
        Self {
            rakeback_percentage,
            ..Self::default()
        }
    }
}

pub fn now_iso() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// No "Poker Hand #...: Hold'em No Limit (...)" header, strict or loose.
    NoHeader,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::NoHeader => f.write_str("no hand header"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedBlock {
    pub index: usize,
    pub reason: SkipReason,
    pub preview: String,
}

/// Records from a chunk of text plus what was dropped along the way.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub records: Vec<HandRecord>,
    pub skipped: Vec<SkippedBlock>,
    pub blocks_seen: usize,
}

impl ParseOutcome {
    pub fn merge(&mut self, other: ParseOutcome) {
        self.records.extend(other.records);
        self.skipped.extend(other.skipped);
        self.blocks_seen += other.blocks_seen;
    }
}

/// Parse one hand block into a record.
pub fn parse_block(block: &str, options: &ParseOptions) -> Result<HandRecord, SkipReason> {
    let header = extract::header(block).ok_or(SkipReason::NoHeader)?;

    let seats = extract::seats(block);
    let hero_position =
        Position::from_seats(extract::button_seat(block), extract::hero_seat(&seats));
    let seats_info = serde_json::to_string(&seats).unwrap_or_else(|_| "[]".to_string());

    let streets = split_streets(block);
    let board = extract::board(block);
    let totals = extract::summary_totals(block);

    let contribution = hero_contribution(block, hero_position, &header.stake);
    let result = profit::reconstruct(block, contribution, &totals);
    let preflop = read_preflop(streets.preflop);

    Ok(HandRecord {
        hand_id: header.hand_id,
        date_time: header.date_time,
        stake: header.stake,
        hero_position,
        hero_cards: extract::hero_cards(block),

        preflop_all: streets.preflop.to_string(),
        flop_all: streets.flop.to_string(),
        turn_all: streets.turn.to_string(),
        river_all: streets.river.to_string(),
        preflop_action: hero_actions(streets.preflop),
        flop_action: hero_actions(streets.flop),
        turn_action: hero_actions(streets.turn),
        river_action: hero_actions(streets.river),

        board_flop: board.flop,
        board_turn: board.turn,
        board_river: board.river,

        total_pot: totals.total_pot,
        rake: totals.rake,
        jackpot: totals.jackpot,
        hero_contribution: result.hero_contribution,
        hero_profit: result.hero_profit,
        hero_profit_with_rake: result.hero_profit_with_rake,
        paid_rake: result.paid_rake,
        adjusted_profit: adjusted_profit(
            result.hero_profit,
            result.hero_profit_with_rake,
            totals.rake,
            options.rakeback_percentage,
        ),
        hero_starting_stack: extract::hero_starting_stack(block),

        preflop_scenario: preflop.scenario,
        had_rfi_opportunity: preflop.had_rfi_opportunity,
        had_3bet_op: preflop.had_3bet_op,
        had_4bet_op: preflop.had_4bet_op,

        seats_info,
        imported_on: options.imported_on.clone(),
    })
}

/// Split `text` on blank-line runs and parse every block.
pub fn parse_hand_text(text: &str, options: &ParseOptions) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (idx, block) in BLOCK_SPLIT_RE.split(text).enumerate() {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        outcome.blocks_seen += 1;

        match parse_block(block, options) {
            Ok(record) => outcome.records.push(record),
            Err(reason) => {
                let preview = block.chars().take(80).collect::<String>();
                debug!("block {}: skipped ({}). preview: {}", idx, reason, preview);
                outcome.skipped.push(SkippedBlock {
                    index: idx,
                    reason,
                    preview,
                });
            }
        }
    }

    info!(
        "parsed {} hands from {} blocks ({} skipped)",
        outcome.records.len(),
        outcome.blocks_seen,
        outcome.skipped.len()
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PreflopScenario;

    fn options() -> ParseOptions {
        ParseOptions {
            rakeback_percentage: 0.0,
            imported_on: "2024-05-01T10:00:00.000000".to_string(),
        }
    }

    const BB_DEFENDS: &str = "Poker Hand #HD100: Hold'em No Limit ($0.10/$0.25) - 2024/04/02 18:22:10
Table 'RushAndCash7' 6-max Seat #1 is the button
Seat 1: btnplayer ($25.00 in chips)
Seat 2: sbplayer ($25.00 in chips)
Seat 3: Hero ($25.00 in chips)
Seat 4: utgplayer ($30.12 in chips)
sbplayer: posts small blind $0.10
Hero: posts big blind $0.25
*** HOLE CARDS ***
Dealt to btnplayer
Dealt to sbplayer
Dealt to Hero [Th 9h]
Dealt to utgplayer
utgplayer: raises $0.50 to $0.75
btnplayer: folds
sbplayer: folds
Hero: calls $0.50
*** FLOP *** [Kd 7c 2h]
Hero: checks
utgplayer: checks
*** TURN *** [Kd 7c 2h] [4s]
Hero: checks
utgplayer: checks
*** RIVER *** [Kd 7c 2h 4s] [Qc]
Hero: checks
utgplayer: checks
*** SHOWDOWN ***
Hero: shows [Th 9h] (High Card)
utgplayer: shows [Kh Jd] (a Pair of Kings)
utgplayer collected $1.52 from pot
*** SUMMARY ***
Total pot $1.60 | Rake $0.08 | Jackpot $0 | Bingo $0 | Fortune $0 | Tax $0
Board [Kd 7c 2h 4s Qc]
Seat 1: btnplayer (button) folded before Flop
Seat 2: sbplayer (small blind) folded before Flop
Seat 3: Hero (big blind) showed [Th 9h] and lost with High Card
Seat 4: utgplayer showed [Kh Jd] and won ($1.52) with a Pair of Kings";

    const UTG_OPEN_WINS: &str = "Poker Hand #HD101: Hold'em No Limit ($0.10/$0.25) - 2024/04/02 18:23:40
Table 'RushAndCash7' 6-max Seat #3 is the button
Seat 1: sbplayer ($25.00 in chips)
Seat 2: bbplayer ($25.00 in chips)
Seat 3: btnplayer ($25.00 in chips)
Seat 6: Hero ($25.00 in chips)
sbplayer: posts small blind $0.10
bbplayer: posts big blind $0.25
*** HOLE CARDS ***
Dealt to Hero [Ac Qc]
Hero: raises $0.50 to $0.75
btnplayer: folds
sbplayer: folds
bbplayer: calls $0.50
*** FLOP *** [Qd 8s 3c]
bbplayer: checks
Hero: checks
*** TURN *** [Qd 8s 3c] [5h]
bbplayer: checks
Hero: checks
*** RIVER *** [Qd 8s 3c 5h] [2d]
bbplayer: checks
Hero: checks
*** SHOWDOWN ***
Hero collected $1.55 from pot
*** SUMMARY ***
Total pot $1.60 | Rake $0.05 | Jackpot $0
Board [Qd 8s 3c 5h 2d]
Seat 1: sbplayer (small blind) folded before Flop
Seat 2: bbplayer (big blind) showed [Kh 8h] and lost with a Pair of Eights
Seat 3: btnplayer (button) folded before Flop
Seat 6: Hero showed [Ac Qc] and won ($1.55) with a Pair of Queens";

    #[test]
    fn test_bb_call_and_lose() {
        let r = parse_block(BB_DEFENDS, &options()).unwrap();
        assert_eq!(r.hand_id, "HD100");
        assert_eq!(r.stake, "$0.10/$0.25");
        assert_eq!(r.date_time, "2024/04/02 18:22:10");
        assert_eq!(r.hero_position, Position::BigBlind);
        assert_eq!(r.hero_cards, "Th 9h");
        assert_eq!(r.board_flop, "Kd 7c 2h");
        assert_eq!(r.board_turn, "4s");
        assert_eq!(r.board_river, "Qc");
        assert_eq!(r.total_pot, 1.6);
        assert_eq!(r.rake, 0.08);
        assert_eq!(r.hero_contribution, 0.75);
        assert_eq!(r.hero_profit, -0.75);
        assert_eq!(r.hero_profit_with_rake, -0.75);
        assert_eq!(r.paid_rake, 0.0);
        assert_eq!(r.preflop_scenario, PreflopScenario::CallVsOpen);
        assert_eq!(r.had_rfi_opportunity, 0);
        assert_eq!(r.had_3bet_op, 1);
        assert_eq!(r.preflop_action, "Hero: calls $0.50");
        assert_eq!(r.flop_action, "Hero: checks");
        assert_eq!(r.hero_starting_stack, 25.0);
        assert_eq!(r.imported_on, "2024-05-01T10:00:00.000000");
        assert_eq!(r.seats().len(), 4);
    }

    #[test]
    fn test_utg_open_and_win() {
        let r = parse_block(UTG_OPEN_WINS, &options()).unwrap();
        assert_eq!(r.hero_position, Position::UnderTheGun);
        assert_eq!(r.hero_contribution, 0.75);
        assert_eq!(r.hero_profit, 0.8);
        assert_eq!(r.hero_profit_with_rake, 0.85);
        assert_eq!(r.paid_rake, 0.05);
        assert_eq!(r.adjusted_profit, 0.8);
        assert_eq!(r.preflop_scenario, PreflopScenario::Open);
        assert_eq!(r.had_rfi_opportunity, 1);
        assert_eq!(r.had_3bet_op, 0);
    }

    #[test]
    fn test_rakeback_applied_at_parse() {
        let opts = ParseOptions {
            rakeback_percentage: 100.0,
            ..options()
        };
        let r = parse_block(UTG_OPEN_WINS, &opts).unwrap();
        assert_eq!(r.adjusted_profit, 0.85);
    }

    #[test]
    fn test_unknown_position_without_button() {
        let block = "Poker Hand #HD5: Hold'em No Limit ($1/$2) - 2024/01/01 00:00:00\nSeat 1: Hero ($200 in chips)\n*** HOLE CARDS ***\nHero: folds\n*** SUMMARY ***";
        let r = parse_block(block, &options()).unwrap();
        assert_eq!(r.hero_position, Position::Unknown);
        assert_eq!(r.preflop_scenario, PreflopScenario::Fold);
        assert_eq!(r.hero_profit, 0.0);
        assert_eq!(r.total_pot, 0.0);
    }

    #[test]
    fn test_parse_text_skips_junk_blocks() {
        let text = format!(
            "{}\n\n\n{}\n\n   \nthis is not a hand\n\n{}\n",
            BB_DEFENDS, UTG_OPEN_WINS, "Poker Hand #HD102: Hold'em"
        );
        let outcome = parse_hand_text(&text, &options());
        assert_eq!(outcome.blocks_seen, 4);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped.len(), 2);
        assert!(outcome.skipped.iter().all(|s| s.reason == SkipReason::NoHeader));
        assert_eq!(outcome.records[1].hand_id, "HD101");
    }

    #[test]
    fn test_crlf_blocks() {
        let crlf = |s: &str| s.replace('\n', "\r\n");
        let text = format!("{}\r\n\r\n{}", crlf(BB_DEFENDS), crlf(UTG_OPEN_WINS));
        let outcome = parse_hand_text(&text, &options());
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[0].hero_contribution, 0.75);
    }
}
