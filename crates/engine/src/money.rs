use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

const CENTS_PER_PESO: i64 = 100;

/// Signed cash amount in hundredths.
///
/// Cash movements are typed by hand and may carry decimals, so they use this
/// type instead of the whole-unit prices of deliveries. It prints and parses
/// in the local style: `.` groups thousands, `,` starts the decimals.
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(123_450);
/// assert_eq!(amount.to_string(), "$1.234,50");
/// assert_eq!("$1.234,50".parse::<Money>().unwrap(), amount);
/// assert_eq!("10.000".parse::<Money>().unwrap(), Money::from_major(10_000));
/// assert_eq!("10.5".parse::<Money>().unwrap().minor(), 1050);
/// assert!("12,345".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Whole pesos.
    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self(major * CENTS_PER_PESO)
    }

    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }
}

/// Formats whole currency units the way delivery sheets show them:
/// `10000` becomes `$10.000`.
#[must_use]
pub fn format_amount(amount: u64) -> String {
    format!("${}", group_thousands(amount))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let pesos = group_thousands(abs / CENTS_PER_PESO.unsigned_abs());
        match abs % CENTS_PER_PESO.unsigned_abs() {
            0 => write!(f, "{sign}${pesos}"),
            cents => write!(f, "{sign}${pesos},{cents:02}"),
        }
    }
}

/// Splits `text` at its decimal separator. A comma always is one; a lone dot
/// only when one or two digits follow it, otherwise dots group thousands.
fn split_decimals(text: &str) -> (&str, Option<&str>) {
    if let Some((whole, decimals)) = text.rsplit_once(',') {
        return (whole, Some(decimals));
    }
    match text.split_once('.') {
        Some((whole, decimals)) if !decimals.contains('.') && decimals.len() <= 2 => {
            (whole, Some(decimals))
        }
        _ => (text, None),
    }
}

/// Digits of the whole part with the thousands dots removed. Every group
/// after the first must hold exactly three digits.
fn ungroup(whole: &str) -> Option<String> {
    let mut groups = whole.split('.');
    let first = groups.next().filter(|g| !g.is_empty())?;
    let mut digits = first.to_string();
    let mut grouped = false;
    for group in groups {
        if group.len() != 3 {
            return None;
        }
        digits.push_str(group);
        grouped = true;
    }
    if grouped && first.len() > 3 {
        return None;
    }
    digits.chars().all(|c| c.is_ascii_digit()).then_some(digits)
}

impl FromStr for Money {
    type Err = EngineError;

    /// Reads what [`Display`](fmt::Display) prints, plus a plain `10.5`.
    /// The `$` and the sign are optional; more than two decimals are
    /// rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let reject = |reason: &str| EngineError::validation("amount", format!("{reason}: '{s}'"));

        let text = s.trim();
        let (negative, text) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let text = text.trim_start();
        let text = text.strip_prefix('$').unwrap_or(text);
        if text.is_empty() {
            return Err(reject("empty amount"));
        }

        let (whole, decimals) = split_decimals(text);
        let pesos: i64 = ungroup(whole)
            .ok_or_else(|| reject("invalid amount"))?
            .parse()
            .map_err(|_| reject("amount too large"))?;
        let cents: i64 = match decimals {
            None | Some("") => 0,
            Some(d) if d.len() > 2 => return Err(reject("at most two decimals")),
            Some(d) if d.chars().all(|c| c.is_ascii_digit()) => {
                let value: i64 = d.parse().map_err(|_| reject("invalid amount"))?;
                if d.len() == 1 { value * 10 } else { value }
            }
            Some(_) => return Err(reject("invalid amount")),
        };

        let total = pesos
            .checked_mul(CENTS_PER_PESO)
            .and_then(|minor| minor.checked_add(cents))
            .ok_or_else(|| reject("amount too large"))?;
        Ok(Money(if negative { -total } else { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Money::new(0).to_string(), "$0");
        assert_eq!(Money::new(5).to_string(), "$0,05");
        assert_eq!(Money::from_major(1_500).to_string(), "$1.500");
        assert_eq!(Money::new(123_456_789).to_string(), "$1.234.567,89");
        assert_eq!(Money::new(-1_050).to_string(), "-$10,50");
    }

    #[test]
    fn format_amount_matches_delivery_sheets() {
        assert_eq!(format_amount(0), "$0");
        assert_eq!(format_amount(999), "$999");
        assert_eq!(format_amount(10_000), "$10.000");
        assert_eq!(format_amount(1_234_567), "$1.234.567");
    }

    #[test]
    fn parse_reads_what_display_prints() {
        for minor in [0, 5, 1_050, 150_000, 123_456_789, -1_050] {
            let money = Money::new(minor);
            assert_eq!(money.to_string().parse::<Money>().unwrap(), money);
        }
    }

    #[test]
    fn parse_accepts_plain_input() {
        assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().minor(), -1);
        assert_eq!("+1.00".parse::<Money>().unwrap().minor(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().minor(), 230);
        assert_eq!("12.345".parse::<Money>().unwrap().minor(), 1_234_500);
        assert_eq!("15000".parse::<Money>().unwrap().minor(), 1_500_000);
    }

    #[test]
    fn parse_rejects_garbage() {
        for raw in [
            "", "-", "$", "abc", "12,345", "1.2.3", "1.23.456", "1234.567", "1,2,3", "1.000,5x",
        ] {
            let err = raw.parse::<Money>().unwrap_err();
            assert!(err.is_validation(), "{raw}");
        }
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        let max = Money::new(i64::MAX);
        assert_eq!(max.checked_add(Money::new(1)), None);
        assert_eq!(Money::new(i64::MIN).checked_sub(Money::new(1)), None);
        assert_eq!(
            Money::new(500).checked_sub(Money::new(800)),
            Some(Money::new(-300))
        );
    }
}
