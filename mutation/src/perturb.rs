//! Type-aware value synthesis.

use chrono::{Datelike, Days, Local, NaiveDate};
use dcim_core::Value;
use rand::Rng;

/// Earliest year a perturbed date may land in.
pub const MIN_YEAR: i32 = 1921;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Which side of a reference value to synthesize on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Above,
    Below,
}

/// A small random change to a non-null value:
///
/// - string: append one ASCII letter
/// - integer: one decimal digit moves up or down by one, wrapping 9 and 0
/// - float: the same on its decimal text, never touching the sign or point
/// - date: a new day, month or year, kept valid and within
///   `MIN_YEAR..=` the current year
///
/// Returns None for null and non-finite values.
pub fn perturb<R: Rng + ?Sized>(value: &Value, rng: &mut R) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Value::String(format!("{}{}", s, random_letter(rng)))),
        Value::Int(i) => {
            let text = perturb_digits(&i.to_string(), rng)?;
            text.parse::<i64>().ok().map(Value::Int)
        }
        Value::Float(f) if f.is_finite() => {
            let text = perturb_digits(&f.to_string(), rng)?;
            text.parse::<f64>().ok().map(Value::Float)
        }
        Value::Float(_) => None,
        Value::Date(d) => Some(Value::Date(perturb_date(*d, rng))),
    }
}

/// A value strictly on the `direction` side of `reference`: numbers and
/// dates move by a random offset in `[1, 100]`, strings gain or lose their
/// last character.
pub fn step_beyond<R: Rng + ?Sized>(reference: &Value, direction: Direction, rng: &mut R) -> Option<Value> {
    let candidate = match (reference, direction) {
        (Value::Int(i), Direction::Above) => i.checked_add(rng.gen_range(1..=100)).map(Value::Int),
        (Value::Int(i), Direction::Below) => i.checked_sub(rng.gen_range(1..=100)).map(Value::Int),
        (Value::Float(f), Direction::Above) if f.is_finite() => Some(Value::Float(rng.gen_range(f + 1.0..=f + 100.0))),
        (Value::Float(f), Direction::Below) if f.is_finite() => Some(Value::Float(rng.gen_range(f - 100.0..=f - 1.0))),
        (Value::Date(d), Direction::Above) => d.checked_add_days(Days::new(rng.gen_range(1..=100))).map(Value::Date),
        (Value::Date(d), Direction::Below) => d.checked_sub_days(Days::new(rng.gen_range(1..=100))).map(Value::Date),
        (Value::String(s), Direction::Above) => Some(Value::String(format!("{}{}", s, random_letter(rng)))),
        (Value::String(s), Direction::Below) => {
            let mut shorter = s.clone();
            shorter.pop().map(|_| Value::String(shorter))
        }
        _ => None,
    }?;

    // Large floats can absorb the offset entirely.
    let expected = match direction {
        Direction::Above => std::cmp::Ordering::Greater,
        Direction::Below => std::cmp::Ordering::Less,
    };
    (candidate.compare(reference) == Some(expected)).then_some(candidate)
}

fn random_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    LETTERS[rng.gen_range(0..LETTERS.len())] as char
}

/// Move one random digit of `text` up or down by one, wrapping 9 and 0.
fn perturb_digits<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Option<String> {
    let positions: Vec<usize> = text
        .char_indices()
        .filter(|(_, c)| c.is_ascii_digit())
        .map(|(i, _)| i)
        .collect();
    if positions.is_empty() {
        return None;
    }
    let at = positions[rng.gen_range(0..positions.len())];
    let digit = text.as_bytes()[at] - b'0';
    let replaced = if rng.gen_bool(0.5) {
        (digit + 1) % 10
    } else {
        (digit + 9) % 10
    };

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..at]);
    out.push((b'0' + replaced) as char);
    out.push_str(&text[at + 1..]);
    Some(out)
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap(year) => 29,
        _ => 28,
    }
}

fn perturb_date<R: Rng + ?Sized>(date: NaiveDate, rng: &mut R) -> NaiveDate {
    let (mut year, mut month, mut day) = (date.year(), date.month(), date.day());
    match rng.gen_range(0..3) {
        0 => day = rng.gen_range(1..=days_in_month(year, month)),
        1 => month = rng.gen_range(1..=12),
        _ => year = rng.gen_range(MIN_YEAR..=Local::now().year().max(MIN_YEAR)),
    }
    day = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}
