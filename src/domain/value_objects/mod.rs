//! Value Objects for the storefront

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog product identifier. Not unique per cart line: variants share it.
pub type ProductId = u32;

/// Vietnamese dong suffix as rendered by the `vi-VN` currency format.
pub const CURRENCY_SUFFIX: &str = "\u{a0}₫";

/// Money value object, whole dong only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vnd(u64);

impl Vnd {
    pub const ZERO: Vnd = Vnd(0);

    pub const fn new(amount: u64) -> Self { Self(amount) }
    pub fn parse(text: &str) -> Self { Self(parse_price(text)) }
    pub fn amount(&self) -> u64 { self.0 }
    pub fn is_zero(&self) -> bool { self.0 == 0 }
    pub fn add(&self, other: Vnd) -> Vnd { Vnd(self.0.saturating_add(other.0)) }
    pub fn times(&self, qty: u32) -> Vnd { Vnd(self.0.saturating_mul(u64::from(qty))) }
}

impl fmt::Display for Vnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&format_price(self.0)) }
}

impl std::iter::Sum for Vnd {
    fn sum<I: Iterator<Item = Vnd>>(iter: I) -> Self { iter.fold(Vnd::ZERO, |acc, v| acc.add(v)) }
}

/// Reads a display price such as `"7.500.000 đ"` back into a whole amount.
///
/// Every character that is not an ASCII digit is dropped and the rest is read
/// as an integer, so separators and currency marks of any locale are ignored.
/// No digits at all reads as zero. Values past `u64::MAX` saturate.
pub fn parse_price(text: &str) -> u64 {
    text.chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d)))
}

/// Renders an amount the way `Intl.NumberFormat('vi-VN', { currency: 'VND' })` does:
/// dot-grouped thousands, a non-breaking space and the dong sign.
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + CURRENCY_SUFFIX.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out.push_str(CURRENCY_SUFFIX);
    out
}
