//! Dollar amounts: parsing, cent rounding and display.

use once_cell::sync::Lazy;
use regex::Regex;

static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\d+(?:\.\d+)?)").expect("static amount pattern"));

/// Every `$<amount>` in `text`, in order of appearance.
pub fn parse_amounts(text: &str) -> Vec<f64> {
    AMOUNT_RE
        .captures_iter(text)
        .filter_map(|c| c[1].parse::<f64>().ok())
        .collect()
}

pub fn first_amount(text: &str) -> Option<f64> {
    parse_amounts(text).first().copied()
}

pub fn last_amount(text: &str) -> Option<f64> {
    parse_amounts(text).last().copied()
}

/// Round to cents on the exact decimal value of `x`.
///
/// Stored figures are rounded once, at assignment, and aggregate stats sum
/// them as-is, so every money field goes through here.
pub fn round2(x: f64) -> f64 {
    let r = format!("{:.2}", x).parse::<f64>().unwrap_or(x);
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

/// Parse a `"$SB/$BB"` stake string into its two blind values.
pub fn parse_stake(stake: &str) -> Option<(f64, f64)> {
    let cleaned = stake.replace('$', "");
    let mut parts = cleaned.split('/');
    let sb = parts.next()?.trim().parse::<f64>().ok()?;
    let bb = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((sb, bb))
}

pub fn fmt_money(x: f64) -> String {
    let abs_val = x.abs();
    let mut dollars = abs_val as i64;
    let mut cents = ((abs_val - dollars as f64) * 100.0).round() as i64;
    if cents == 100 {
        dollars += 1;
        cents = 0;
    }

    let s = dollars.to_string();
    let len = s.len();
    let mut dollars_str = String::with_capacity(len + len / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            dollars_str.push(',');
        }
        dollars_str.push(c);
    }

    let formatted = format!("${}.{:02}", dollars_str, cents);
    if x < 0.0 && (dollars > 0 || cents > 0) {
        format!("-{}", formatted)
    } else {
        formatted
    }
}
