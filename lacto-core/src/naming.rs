//! Placeholder names for ferments saved without one.
//!
//! Names look like `K417`: one uppercase letter followed by a number
//! from 100 to 999.

use rand::Rng;
use std::collections::HashSet;

use crate::models::FermentEntry;

/// Random draws tried before falling back to a deterministic scan.
pub const MAX_RANDOM_ATTEMPTS: usize = 1_000;

const NUMBERS: std::ops::RangeInclusive<u16> = 100..=999;

/// Returns a name not used by any entry in `existing`.
pub fn generate_ferment_name<R: Rng + ?Sized>(existing: &[FermentEntry], rng: &mut R) -> String {
    let taken: HashSet<&str> = existing
        .iter()
        .filter_map(|e| e.ferment_name.as_deref())
        .collect();
    unique_name(&taken, rng)
}

/// Random candidates first, then every `A100..Z999` in order, then a
/// numbered suffix once the whole name space is used up.
pub fn unique_name<R: Rng + ?Sized>(taken: &HashSet<&str>, rng: &mut R) -> String {
    for _ in 0..MAX_RANDOM_ATTEMPTS {
        let candidate = random_candidate(rng);
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
    }

    tracing::warn!(
        taken = taken.len(),
        attempts = MAX_RANDOM_ATTEMPTS,
        "Random ferment names exhausted, scanning"
    );

    for letter in 'A'..='Z' {
        for number in NUMBERS {
            let candidate = format!("{}{}", letter, number);
            if !taken.contains(candidate.as_str()) {
                return candidate;
            }
        }
    }

    let mut counter = 2usize;
    let mut candidate = format!("A100-{}", counter);
    while taken.contains(candidate.as_str()) {
        counter += 1;
        candidate = format!("A100-{}", counter);
    }
    candidate
}

fn random_candidate<R: Rng + ?Sized>(rng: &mut R) -> String {
    let letter = char::from(b'A' + rng.random_range(0..26u8));
    let number = rng.random_range(NUMBERS);
    format!("{}{}", letter, number)
}
