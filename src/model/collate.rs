//! String collation used when ordering buffer names and filenames
//!
//! The host may plug in its own locale-aware ordering through `Collator`.
//! `NaturalCollator` is the default: case-insensitive, digit runs compared
//! by numeric value, remaining ties broken by code point.

use std::cmp::Ordering;

pub trait Collator {
    fn collate(&self, a: &str, b: &str) -> Ordering;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalCollator;

impl Collator for NaturalCollator {
    fn collate(&self, a: &str, b: &str) -> Ordering {
        natural_cmp(a, b).then_with(|| a.cmp(b))
    }
}

/// Case-insensitive comparison with embedded numbers ordered numerically
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let da = take_digits(&mut a);
                let db = take_digits(&mut b);
                let ord = compare_digit_runs(&da, &db);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ca), Some(cb)) => {
                let ord = ca.to_lowercase().cmp(cb.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        // "007" after "7"
        .then_with(|| a.len().cmp(&b.len()))
}
