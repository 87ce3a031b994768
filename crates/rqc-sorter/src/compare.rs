//! Comparators: natural string ordering and type-aware state coercion

use std::cmp::Ordering;

use rqc_core::{MatchRecord, SortBy, SortValue};

/// Sentinel for `unavailable`/`unknown` states during state comparison.
///
/// Under ascending order this places them before low numeric and
/// boolean-like states, since -999 < 0. Intentional, pinned by tests.
const UNAVAILABLE_SENTINEL: f64 = -999.0;

/// Boolean-like states and their numeric stand-ins
const BOOLEAN_STATES: &[(&str, f64)] = &[
    ("on", 1.0),
    ("off", 0.0),
    ("true", 1.0),
    ("false", 0.0),
    ("open", 1.0),
    ("closed", 0.0),
    ("locked", 1.0),
    ("unlocked", 0.0),
    ("home", 1.0),
    ("away", 0.0),
    ("available", 1.0),
];

/// Compare two records on their current sort values
///
/// A missing value sorts after any defined value; two missing values compare
/// equal. Defined values are compared per key: name uses natural string
/// ordering, state coerces both sides first, last_changed subtracts
/// millisecond timestamps.
pub fn compare_records(a: &MatchRecord, b: &MatchRecord, sort_by: SortBy) -> Ordering {
    match (&a.sort_value, &b.sort_value) {
        (SortValue::Missing, SortValue::Missing) => return Ordering::Equal,
        (SortValue::Missing, _) => return Ordering::Greater,
        (_, SortValue::Missing) => return Ordering::Less,
        _ => {}
    }

    match sort_by {
        SortBy::Name => natural_cmp(&a.sort_value.as_text(), &b.sort_value.as_text()),
        SortBy::State => compare_states(&a.sort_value, &b.sort_value),
        SortBy::LastChanged => compare_numbers(&a.sort_value, &b.sort_value),
    }
}

/// Case-insensitive string comparison with numeric-substring awareness
///
/// Digit runs are compared by value, so "item2" sorts before "item10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let run_a = digit_run(&a, &mut i);
            let run_b = digit_run(&b, &mut j);
            // Equal-length runs without leading zeros compare numerically
            // via plain lexicographic order.
            let ord = run_a
                .len()
                .cmp(&run_b.len())
                .then_with(|| run_a.cmp(run_b));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = a[i].cmp(&b[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }

    (a.len() - i).cmp(&(b.len() - j))
}

/// Consume a digit run starting at `pos`, returning it without leading zeros
fn digit_run<'a>(chars: &'a [char], pos: &mut usize) -> &'a [char] {
    let start = *pos;
    while *pos < chars.len() && chars[*pos].is_ascii_digit() {
        *pos += 1;
    }
    let run = &chars[start..*pos];
    let significant = run
        .iter()
        .position(|c| *c != '0')
        .unwrap_or(run.len().saturating_sub(1));
    &run[significant..]
}

fn compare_numbers(a: &SortValue, b: &SortValue) -> Ordering {
    match (a, b) {
        (SortValue::Number(x), SortValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        _ => natural_cmp(&a.as_text(), &b.as_text()),
    }
}

fn compare_states(a: &SortValue, b: &SortValue) -> Ordering {
    let a = comparable_state(&a.as_text());
    let b = comparable_state(&b.as_text());

    match (&a, &b) {
        (Comparable::Number(x), Comparable::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        _ => natural_cmp(&a.as_text(), &b.as_text()),
    }
}

/// A state value reduced to a comparable form
enum Comparable {
    Number(f64),
    Text(String),
}

impl Comparable {
    fn as_text(&self) -> String {
        match self {
            Comparable::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Comparable::Text(s) => s.clone(),
        }
    }
}

/// Coerce a raw state string to a comparable value
///
/// A leading numeric parse wins. `unavailable`/`unknown` collapse to the
/// sentinel. Boolean-like states map to 0/1. Everything else compares as
/// lower-cased text.
fn comparable_state(raw: &str) -> Comparable {
    let lower = raw.to_lowercase();

    if let Some(n) = parse_leading_float(&lower) {
        return Comparable::Number(n);
    }

    if lower == "unavailable" || lower == "unknown" {
        return Comparable::Number(UNAVAILABLE_SENTINEL);
    }

    if let Some((_, value)) = BOOLEAN_STATES.iter().find(|(name, _)| *name == lower) {
        return Comparable::Number(*value);
    }

    Comparable::Text(lower)
}

/// Parse a float from the leading characters of a string
///
/// Mirrors lenient host-engine parsing: "22.5 °C" yields 22.5, "on" yields
/// nothing. At least one digit must appear before any trailing garbage.
fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut saw_digit = end > int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || saw_digit {
            end = frac_end;
            saw_digit |= frac_end > frac_start;
        }
    }

    if !saw_digit {
        return None;
    }

    // Optional exponent, only consumed when complete.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
