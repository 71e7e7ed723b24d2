//! Hero's net result and the rake/jackpot share rebated back when Hero won.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract::SummaryTotals;
use crate::money::round2;
use crate::streets::count_numbered_showdowns;

static HERO_COLLECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Hero(?:: | )(?:collected \$|Receives Cashout \(?)\$?(\d+(?:\.\d+)?)\)?")
        .expect("static hero collect pattern")
});

static HERO_SUMMARY_WIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Seat\s+\d+:\s+Hero.*(?:won|collected)\s+\(\$(\d+(?:\.\d+)?)\)")
        .expect("static hero summary win pattern")
});

// Best effort: names with spaces or unusual cashout phrasing can misfire.
static WINNER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Seat \d+: )?(\w+)(?:.*?) (?:collected|won) (?:\()?\$(\d+(?:\.\d+)?)(?:\))?")
        .expect("static winner pattern")
});

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Profit {
    pub hero_winnings: f64,
    pub hero_contribution: f64,
    pub hero_profit: f64,
    pub hero_profit_with_rake: f64,
    pub paid_rake: f64,
}

fn sum_captures(re: &Regex, text: &str) -> (usize, f64) {
    re.captures_iter(text)
        .filter_map(|c| c[1].parse::<f64>().ok())
        .fold((0, 0.0), |(n, sum), amount| (n + 1, sum + amount))
}

/// Distinct (lowercased) names with a positive collected/won amount.
pub fn distinct_winners(block: &str) -> usize {
    WINNER_RE
        .captures_iter(block)
        .filter(|c| c[2].parse::<f64>().map(|a| a > 0.0).unwrap_or(false))
        .map(|c| c[1].to_lowercase())
        .collect::<HashSet<_>>()
        .len()
}

/// Rake + jackpot share attributed to Hero once Hero has won something.
fn rake_share(block: &str, hero_collects: usize, rake_and_jackpot: f64) -> f64 {
    let showdowns = count_numbered_showdowns(block);
    if showdowns <= 1 {
        let winners = distinct_winners(block);
        if winners > 1 {
            rake_and_jackpot / winners as f64
        } else {
            rake_and_jackpot
        }
    } else if hero_collects > 0 {
        hero_collects as f64 / showdowns as f64 * rake_and_jackpot
    } else {
        0.0
    }
}

/// Combine Hero's collected amounts with `contribution` into profit figures.
///
/// Every figure is rounded to cents here, once.
pub fn reconstruct(block: &str, contribution: f64, totals: &SummaryTotals) -> Profit {
    let (hero_collects, mut hero_winnings) = sum_captures(&HERO_COLLECT_RE, block);
    if hero_collects == 0 {
        hero_winnings = sum_captures(&HERO_SUMMARY_WIN_RE, block).1;
    }

    let hero_contribution = round2(contribution);
    if hero_winnings <= 0.0 {
        let hero_profit = round2(-contribution);
        return Profit {
            hero_winnings,
            hero_contribution,
            hero_profit,
            hero_profit_with_rake: hero_profit,
            paid_rake: 0.0,
        };
    }

    let hero_profit = round2(hero_winnings - contribution);
    let share = rake_share(block, hero_collects, totals.rake + totals.jackpot);
    let (hero_profit_with_rake, paid_rake) = if share > 0.0 {
        (round2(hero_profit + share), round2(share))
    } else {
        (hero_profit, 0.0)
    };

    Profit {
        hero_winnings,
        hero_contribution,
        hero_profit,
        hero_profit_with_rake,
        paid_rake,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(rake: f64, jackpot: f64) -> SummaryTotals {
        SummaryTotals {
            total_pot: 0.0,
            rake,
            jackpot,
        }
    }

    #[test]
    fn test_uncontested_win() {
        let block = "Hero: raises $0.50 to $0.75\nV1: folds\nHero collected $1.15 from pot\n*** SUMMARY ***\nTotal pot $1.20 | Rake $0.05\nSeat 4: Hero (UTG) collected ($1.15)";
        let p = reconstruct(block, 0.75, &totals(0.05, 0.0));
        assert_eq!(p.hero_winnings, 1.15);
        assert_eq!(p.hero_contribution, 0.75);
        assert_eq!(p.hero_profit, 0.4);
        assert_eq!(p.hero_profit_with_rake, 0.45);
        assert_eq!(p.paid_rake, 0.05);
    }

    #[test]
    fn test_loss() {
        let block = "V1 collected $1.45 from pot\n*** SUMMARY ***\nSeat 1: V1 showed [Ah Ad] and won ($1.45)";
        let p = reconstruct(block, 0.75, &totals(0.05, 0.0));
        assert_eq!(p.hero_profit, -0.75);
        assert_eq!(p.hero_profit_with_rake, -0.75);
        assert_eq!(p.paid_rake, 0.0);
    }

    #[test]
    fn test_summary_fallback() {
        let block = "*** SUMMARY ***\nTotal pot $4 | Rake $0.20\nSeat 2: Hero (big blind) showed [Ah Kd] and won ($3.80)";
        let p = reconstruct(block, 2.0, &totals(0.2, 0.0));
        assert_eq!(p.hero_winnings, 3.8);
        assert_eq!(p.hero_profit, 1.8);
        assert_eq!(p.hero_profit_with_rake, 2.0);
    }

    #[test]
    fn test_split_pot_divides_rebate() {
        let block = "Hero collected $1.90 from pot\nV1 collected $1.90 from pot\n*** SUMMARY ***\nTotal pot $4 | Rake $0.20\nSeat 1: V1 showed [Ah Kd] and won ($1.90)\nSeat 2: Hero showed [Ac Kc] and won ($1.90)";
        assert_eq!(distinct_winners(block), 2);
        let p = reconstruct(block, 2.0, &totals(0.2, 0.0));
        assert_eq!(p.hero_profit, -0.1);
        assert_eq!(p.hero_profit_with_rake, 0.0);
        assert_eq!(p.paid_rake, 0.1);
    }

    #[test]
    fn test_run_it_twice_proportion() {
        let block = "*** FIRST SHOWDOWN ***\nHero collected $4.75 from pot\n*** SECOND SHOWDOWN ***\nV1 collected $4.75 from pot\n*** SUMMARY ***\nTotal pot $10 | Rake $0.40 | Jackpot $0.10";
        let p = reconstruct(block, 5.0, &totals(0.4, 0.1));
        assert_eq!(p.hero_profit, -0.25);
        assert_eq!(p.hero_profit_with_rake, 0.0);
        assert_eq!(p.paid_rake, 0.25);
    }

    #[test]
    fn test_run_it_twice_only_summary_win() {
        let block = "*** FIRST SHOWDOWN ***\n*** SECOND SHOWDOWN ***\n*** SUMMARY ***\nSeat 2: Hero showed [Ac Kc] and won ($9.50)";
        let p = reconstruct(block, 5.0, &totals(0.5, 0.0));
        assert_eq!(p.hero_profit, 4.5);
        assert_eq!(p.hero_profit_with_rake, 4.5);
        assert_eq!(p.paid_rake, 0.0);
    }

    #[test]
    fn test_cashout_counts_as_winnings() {
        let block = "Hero: Receives Cashout ($7.80)\n*** SUMMARY ***\nTotal pot $16 | Rake $0.40";
        let p = reconstruct(block, 5.0, &totals(0.4, 0.0));
        assert_eq!(p.hero_winnings, 7.8);
        assert_eq!(p.hero_profit, 2.8);
    }

    #[test]
    fn test_rebate_bound_single_winner() {
        let block = "Hero collected $9.55 from pot\n*** SUMMARY ***\nSeat 3: Hero (button) collected ($9.55)";
        let t = totals(0.45, 0.05);
        let p = reconstruct(block, 4.0, &t);
        let rebate = p.hero_profit_with_rake - p.hero_profit;
        assert!(rebate >= 0.0 && rebate <= t.rake + t.jackpot + 1e-9);
    }
}
