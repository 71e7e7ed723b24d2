//! Independent field extractors. Each one scans the raw block (or the
//! summary section) on its own; none depends on another succeeding.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::SeatInfo;
use crate::streets::SUMMARY;

const HEADER_DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Poker\s+Hand\s+#(HD[^\s:]+):\s+Hold'em\s+No\s+Limit\s+\((\$[\d.]+/\$[\d.]+)\)\s*-\s*(\d{4}/\d{2}/\d{2}\s+\d{2}:\d{2}:\d{2})",
    )
    .expect("static header pattern")
});

static LOOSE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Poker\s+Hand\s+#(HD[^\s:]+):\s+Hold'em\s+No\s+Limit\s+\((\$[\d.]+/\$[\d.]+)\)\s*-\s*(.+)")
        .expect("static loose header pattern")
});

static BUTTON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Seat\s+#(\d+)\s+is\s+the\s+button").expect("static button pattern"));

static SEAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Seat\s+(\d+):\s+([^(]+)\s+\(\$([\d.]+)\s+in\s+chips\)").expect("static seat pattern")
});

static HOLE_CARDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Dealt\s+to\s+Hero\s*\[([^\]]+)\]").expect("static hole cards pattern"));

static FLOP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*\*\s+(?:FIRST\s+)?FLOP\s+\*\*\*\s*\[([^\]]+)\]").expect("static flop pattern")
});

static TURN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*\*\s+(?:FIRST\s+)?TURN\s+\*\*\*\s*(?:\[([^\]]+)\]\s*)?\[([^\]]+)\]")
        .expect("static turn pattern")
});

static RIVER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*\*\s+(?:FIRST\s+)?RIVER\s+\*\*\*\s*(?:\[([^\]]+)\]\s*)?\[([^\]]+)\]")
        .expect("static river pattern")
});

static POT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Total\s+pot\s+\$(\d+(?:\.\d+)?)").expect("static pot pattern"));
static RAKE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Rake\s+\$(\d+(?:\.\d+)?)").expect("static rake pattern"));
static JACKPOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Jackpot\s+\$(\d+(?:\.\d+)?)").expect("static jackpot pattern"));

static HERO_STACK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Hero\s+\(\$(\d+\.?\d*)\s+in\s+chips\)").expect("static hero stack pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub hand_id: String,
    pub stake: String,
    pub date_time: String,
}

/// Match the opening header line.
///
/// The strict form requires a `YYYY/MM/DD HH:MM:SS` timestamp; otherwise the
/// rest of the line is kept verbatim as `date_time`. Only `HD`-prefixed hand
/// ids are accepted. `None` means the block is not a hand at all.
pub fn header(block: &str) -> Option<Header> {
    if let Some(c) = HEADER_RE.captures(block) {
        if NaiveDateTime::parse_from_str(&c[3], HEADER_DATE_FORMAT).is_ok() {
            return Some(Header {
                hand_id: c[1].to_string(),
                stake: c[2].to_string(),
                date_time: c[3].to_string(),
            });
        }
    }

    LOOSE_HEADER_RE.captures(block).map(|c| Header {
        hand_id: c[1].to_string(),
        stake: c[2].to_string(),
        date_time: c[3].trim().to_string(),
    })
}

pub fn button_seat(block: &str) -> Option<u32> {
    BUTTON_RE
        .captures(block)
        .and_then(|c| c[1].parse::<u32>().ok())
}

pub fn seats(block: &str) -> Vec<SeatInfo> {
    SEAT_RE
        .captures_iter(block)
        .filter_map(|c| {
            Some(SeatInfo {
                seat: c[1].parse::<u32>().ok()?,
                player: c[2].trim().to_string(),
                stack: c[3].to_string(),
            })
        })
        .collect()
}

/// Seat whose player name is "Hero", compared case-insensitively.
pub fn hero_seat(seats: &[SeatInfo]) -> Option<u32> {
    seats
        .iter()
        .find(|s| s.player.eq_ignore_ascii_case("hero"))
        .map(|s| s.seat)
}

pub fn hero_cards(block: &str) -> String {
    HOLE_CARDS_RE
        .captures(block)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub flop: String,
    pub turn: String,
    pub river: String,
}

/// Board cards per street. On turn and river lines the first bracket holds
/// the earlier board, so only the last bracket is the street's new card.
pub fn board(block: &str) -> Board {
    let last_group = |re: &Regex| {
        re.captures(block)
            .and_then(|c| c.get(2).map(|m| m.as_str().trim().to_string()))
            .unwrap_or_default()
    };

    Board {
        flop: FLOP_RE
            .captures(block)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default(),
        turn: last_group(&TURN_RE),
        river: last_group(&RIVER_RE),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryTotals {
    pub total_pot: f64,
    pub rake: f64,
    pub jackpot: f64,
}

/// Text from `*** SUMMARY ***` to end of block, if the section exists.
pub fn summary_section(block: &str) -> Option<&str> {
    block.find(SUMMARY).map(|idx| &block[idx..])
}

/// Pot, rake and jackpot from the summary section; each 0.0 when missing.
pub fn summary_totals(block: &str) -> SummaryTotals {
    let Some(summary) = summary_section(block) else {
        return SummaryTotals::default();
    };
    let amount = |re: &Regex| {
        re.captures(summary)
            .and_then(|c| c[1].parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    SummaryTotals {
        total_pot: amount(&POT_RE),
        rake: amount(&RAKE_RE),
        jackpot: amount(&JACKPOT_RE),
    }
}

pub fn hero_starting_stack(block: &str) -> f64 {
    block
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("Seat") && line.contains("Hero"))
        .find_map(|line| HERO_STACK_RE.captures(line))
        .and_then(|c| c[1].parse::<f64>().ok())
        .unwrap_or(0.0)
}
