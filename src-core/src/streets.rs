//! Splits one hand-history block into its betting streets.

use once_cell::sync::Lazy;
use regex::Regex;

pub const HOLE_CARDS: &str = "*** HOLE CARDS ***";
pub const SUMMARY: &str = "*** SUMMARY ***";

const FLOP_MARKERS: [&str; 3] = ["*** FLOP ***", "*** FIRST FLOP ***", "*** SECOND FLOP ***"];
const TURN_MARKERS: [&str; 3] = ["*** TURN ***", "*** FIRST TURN ***", "*** SECOND TURN ***"];
const RIVER_MARKERS: [&str; 3] = ["*** RIVER ***", "*** FIRST RIVER ***", "*** SECOND RIVER ***"];

static SHOWDOWN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*\* (?:(?:FIRST|SECOND|THIRD|FOURTH|FIFTH) )?SHOW ?DOWN \*\*\*")
        .expect("static showdown pattern")
});

/// The four street slices of a block. A slice is empty when its street
/// never happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Streets<'a> {
    pub preflop: &'a str,
    pub flop: &'a str,
    pub turn: &'a str,
    pub river: &'a str,
}

impl<'a> Streets<'a> {
    pub fn as_array(&self) -> [&'a str; 4] {
        [self.preflop, self.flop, self.turn, self.river]
    }
}

fn earliest(block: &str, markers: &[&str]) -> Option<usize> {
    markers.iter().filter_map(|m| block.find(m)).min()
}

/// Earliest `*** SUMMARY ***` or showdown marker, if any.
fn terminator(block: &str) -> Option<usize> {
    let summary = block.find(SUMMARY);
    let showdown = SHOWDOWN_RE.find(block).map(|m| m.start());
    match (summary, showdown) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn slice(block: &str, start: Option<usize>, end: Option<usize>) -> &str {
    match (start, end) {
        (Some(s), Some(e)) if s <= e => &block[s..e],
        _ => "",
    }
}

/// Segment `block` into preflop, flop, turn and river.
///
/// Preflop runs from `*** HOLE CARDS ***` to the flop (or the first
/// summary/showdown marker); each later street runs from its own marker to
/// the next street's marker, or to the terminator when the next street is
/// absent. Without any terminator, slices run to end of block.
pub fn split_streets(block: &str) -> Streets<'_> {
    let hole = block.find(HOLE_CARDS);
    let flop = earliest(block, &FLOP_MARKERS);
    let turn = earliest(block, &TURN_MARKERS);
    let river = earliest(block, &RIVER_MARKERS);
    let end = terminator(block).unwrap_or(block.len());

    let preflop_end = flop.unwrap_or(end);
    let flop_end = turn.or(flop.map(|_| end));
    let turn_end = river.or(turn.map(|_| end));
    let river_end = river.map(|_| end);

    Streets {
        preflop: slice(block, hole, Some(preflop_end)),
        flop: slice(block, flop, flop_end),
        turn: slice(block, turn, turn_end),
        river: slice(block, river, river_end),
    }
}

/// Count of showdown markers naming an ordinal (run-it-twice and up).
pub fn count_numbered_showdowns(block: &str) -> usize {
    static NUMBERED_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\*\*\* (?:FIRST|SECOND|THIRD|FOURTH|FIFTH) SHOWDOWN \*\*\*")
            .expect("static numbered showdown pattern")
    });
    NUMBERED_RE.find_iter(block).count()
}

/// Hero's own lines from a street slice, joined with `" | "`.
pub fn hero_actions(street: &str) -> String {
    street
        .lines()
        .map(str::trim)
        .filter(|line| line.to_lowercase().starts_with("hero:"))
        .collect::<Vec<_>>()
        .join(" | ")
}
