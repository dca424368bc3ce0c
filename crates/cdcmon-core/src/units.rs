//! Size/byte quantity normalization.
//!
//! Upstream tools report sizes in wildly different shapes: raw byte counters
//! from database catalog queries, decimal-unit strings ("1.2 GB") from cloud
//! tooling, binary-unit strings ("100.00MiB") from the container runtime.
//! Everything downstream (aggregation, deltas, comparisons) operates on one
//! canonical unit: the kibibyte.
//!
//! Decimal input units use 1000-based multipliers, binary input units use
//! 1024-based multipliers, and the output unit is always KiB. That asymmetry
//! is intentional and matches the conventions of the tools being parsed.

use std::iter::Sum;
use std::ops::Add;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A non-negative size expressed in kibibytes, rounded to two decimal places
/// at construction (half away from zero).
///
/// All size arithmetic and comparison in the monitor goes through this type;
/// raw strings and mixed-unit numbers never travel past the normalizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct SizeQuantity {
    kib: f64,
}

impl SizeQuantity {
    /// The zero quantity, used as the neutral fallback for unparsable input.
    pub const ZERO: SizeQuantity = SizeQuantity { kib: 0.0 };

    /// Construct from a raw KiB value, applying canonical rounding.
    pub fn from_kib(kib: f64) -> Self {
        Self {
            kib: round2(kib.max(0.0)),
        }
    }

    /// Construct from an exact byte count.
    pub fn from_bytes(bytes: u64) -> Self {
        Self::from_kib(bytes as f64 / 1024.0)
    }

    /// Parse any textual size representation into a quantity.
    ///
    /// Total function: empty, unknown-unit or otherwise unparsable input
    /// yields [`SizeQuantity::ZERO`]. Accepted forms:
    ///
    /// * a bare non-negative integer, read as a byte count;
    /// * `<number><unit>` with an optional space, `,` thousands separators
    ///   and a case-insensitive unit. `B`/`bytes`/`KB`/`MB`/`GB`/`TB` are
    ///   decimal (factor 1000 per step), `KiB`/`MiB`/`GiB`/`TiB` are binary.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::ZERO;
        }

        let re = Regex::new(r"^([0-9][0-9,]*(?:\.[0-9]+)?)\s*([A-Za-z]+)?$")
            .expect("regex is valid");
        let caps = match re.captures(trimmed) {
            Some(c) => c,
            None => return Self::ZERO,
        };

        let number: f64 = match caps[1].replace(',', "").parse() {
            Ok(n) => n,
            Err(_) => return Self::ZERO,
        };

        match caps.get(2) {
            // No unit: a bare number is a byte count.
            None => Self::from_kib(number / 1024.0),
            Some(unit) => match unit.as_str().to_ascii_lowercase().as_str() {
                // Decimal units, converted via bytes.
                "b" | "bytes" => Self::from_kib(number / 1024.0),
                "kb" => Self::from_kib(number * 1_000.0 / 1024.0),
                "mb" => Self::from_kib(number * 1_000_000.0 / 1024.0),
                "gb" => Self::from_kib(number * 1_000_000_000.0 / 1024.0),
                "tb" => Self::from_kib(number * 1_000_000_000_000.0 / 1024.0),
                // Binary units, native powers of 1024.
                "kib" => Self::from_kib(number),
                "mib" => Self::from_kib(number * 1024.0),
                "gib" => Self::from_kib(number * 1024.0 * 1024.0),
                "tib" => Self::from_kib(number * 1024.0 * 1024.0 * 1024.0),
                _ => Self::ZERO,
            },
        }
    }

    /// The value in KiB.
    pub fn kib(&self) -> f64 {
        self.kib
    }

    /// Whether this is the zero quantity.
    pub fn is_zero(&self) -> bool {
        self.kib == 0.0
    }
}

impl Add for SizeQuantity {
    type Output = SizeQuantity;

    fn add(self, rhs: SizeQuantity) -> SizeQuantity {
        // Re-round so accumulated float dust never leaks into comparisons.
        SizeQuantity::from_kib(self.kib + rhs.kib)
    }
}

impl Sum for SizeQuantity {
    fn sum<I: Iterator<Item = SizeQuantity>>(iter: I) -> SizeQuantity {
        iter.fold(SizeQuantity::ZERO, |acc, q| acc + q)
    }
}

impl std::fmt::Display for SizeQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} KiB", self.kib)
    }
}

/// Round to two decimal places, half away from zero.
///
/// A half-ULP nudge keeps IEEE 754 representations of exact midpoints (like
/// 1.005, stored just below the midpoint) rounding the way the decimal value
/// would.
fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    let epsilon = f64::EPSILON * scaled.abs();
    (scaled + epsilon).round() / 100.0
}

// ── Tests ─────────────────────────────────────────────────────────────────────
