//! Preflop scenario labels and the opportunity flags Hero faced.

use crate::record::PreflopScenario;
use crate::streets::HOLE_CARDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreflopRead {
    pub scenario: PreflopScenario,
    pub had_rfi_opportunity: u8,
    pub had_3bet_op: u8,
    pub had_4bet_op: u8,
}

fn is_street_end(line: &str) -> bool {
    line.starts_with("***")
        && (line.contains("flop") || line.contains("summary") || line.contains("show"))
}

/// Ordered, lowercased preflop action lines after `*** HOLE CARDS ***`,
/// without dealt-cards and uncalled-bet lines. `None` if the marker is absent.
fn action_lines(preflop: &str) -> Option<Vec<String>> {
    let mut lines = preflop.lines();
    lines.by_ref().find(|line| line.contains(HOLE_CARDS))?;

    let mut actions = Vec::new();
    for line in lines {
        let line = line.trim().to_lowercase();
        if line.is_empty() || line.starts_with("dealt to") {
            continue;
        }
        if is_street_end(&line) {
            break;
        }
        if line.contains("uncalled bet") {
            continue;
        }
        if line.contains(": ") {
            actions.push(line);
        }
    }
    Some(actions)
}

fn is_hero(line: &str) -> bool {
    line.starts_with("hero:")
}

/// Label Hero's preflop line by Hero's last action and the raise count.
pub fn classify(preflop: &str) -> PreflopScenario {
    let Some(actions) = action_lines(preflop) else {
        return PreflopScenario::NoAction;
    };
    let total_raises = actions.iter().filter(|l| l.contains("raises")).count();
    let Some(last) = actions.iter().rev().find(|l| is_hero(l)) else {
        return PreflopScenario::NoAction;
    };

    if last.contains("raises") {
        match total_raises {
            1 => PreflopScenario::Open,
            2 => PreflopScenario::ThreeBet,
            3 => PreflopScenario::FourBet,
            _ => PreflopScenario::FiveBetPlus,
        }
    } else if last.contains("calls") {
        match total_raises {
            0 => PreflopScenario::NoAction,
            1 => PreflopScenario::CallVsOpen,
            2 => PreflopScenario::CallVsThreeBet,
            _ => PreflopScenario::CallVsFourBetPlus,
        }
    } else if last.contains("checks") {
        if total_raises > 0 {
            PreflopScenario::CheckVsOpen
        } else {
            PreflopScenario::Limp
        }
    } else if last.contains("folds") {
        PreflopScenario::Fold
    } else {
        PreflopScenario::NoAction
    }
}

/// Raises seen before Hero's first action, or `None` if Hero never acts.
///
/// A Hero with no preflop action (all-in straddle, say) gets no 3-bet or
/// 4-bet opportunity even when exactly one raise went in.
fn raises_before_hero(actions: &[String]) -> Option<usize> {
    let entry = actions.iter().position(|l| is_hero(l))?;
    Some(actions[..entry].iter().filter(|l| l.contains("raises")).count())
}

fn refund_to_hero(preflop: &str) -> bool {
    preflop.lines().any(|line| {
        let line = line.to_lowercase();
        line.contains("uncalled bet") && line.contains("returned to hero")
    })
}

/// Scenario plus the RFI / 3-bet / 4-bet opportunity flags.
///
/// The flags describe the action in front of Hero's first decision and say
/// nothing about what Hero chose.
pub fn read_preflop(preflop: &str) -> PreflopRead {
    let scenario = classify(preflop);
    let actions = action_lines(preflop).unwrap_or_default();

    let had_rfi_opportunity = if refund_to_hero(preflop) {
        0
    } else {
        let raised_in_front = actions
            .iter()
            .take_while(|l| !is_hero(l))
            .any(|l| l.contains("raises"));
        u8::from(!raised_in_front)
    };

    let before = raises_before_hero(&actions);
    PreflopRead {
        scenario,
        had_rfi_opportunity,
        had_3bet_op: u8::from(before == Some(1)),
        had_4bet_op: u8::from(before == Some(2)),
    }
}
