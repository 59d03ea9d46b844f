use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Direction of a period-over-period change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeType::Positive => write!(f, "positive"),
            ChangeType::Negative => write!(f, "negative"),
            ChangeType::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageChange {
    pub value: String,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
}

/// Format an amount as whole US dollars: `1234.56` → `$1,235`.
///
/// Midpoints round away from zero, matching the `en-US` number formatter the
/// dashboard widgets were built against. Negative amounts render as `-$1,235`,
/// including those that round to zero (`-0.2` → `-$0`).
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if value < Decimal::ZERO { "-" } else { "" };
    let digits = rounded.abs().trunc().normalize().to_string();
    format!("{sign}${}", group_thousands(&digits))
}

/// Percentage change from `previous` to `current`, one decimal digit.
///
/// A zero `previous` short-circuits to `"0%"` / neutral. Non-negative changes
/// always carry a leading `+`, so an unchanged value renders `"+0.0%"` while
/// still being classified neutral. Negative changes keep their `-` even when
/// they round to zero (`"-0.0%"`). Changes beyond the `Decimal` range saturate
/// at `Decimal::MAX` / `Decimal::MIN` instead of overflowing.
pub fn calculate_percentage_change(current: Decimal, previous: Decimal) -> PercentageChange {
    if previous.is_zero() {
        return PercentageChange {
            value: "0%".into(),
            change_type: ChangeType::Neutral,
        };
    }

    let change = relative_change_pct(current, previous);

    let mut rounded = change
        .abs()
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);

    let sign = if change >= Decimal::ZERO { "+" } else { "-" };

    let change_type = if change > Decimal::ZERO {
        ChangeType::Positive
    } else if change < Decimal::ZERO {
        ChangeType::Negative
    } else {
        ChangeType::Neutral
    };

    PercentageChange {
        value: format!("{sign}{rounded}%"),
        change_type,
    }
}

/// `(current - previous) / previous * 100`, saturating on overflow.
fn relative_change_pct(current: Decimal, previous: Decimal) -> Decimal {
    let diff = current.saturating_sub(previous);
    let saturated = |negative: bool| if negative { Decimal::MIN } else { Decimal::MAX };
    let negative = !diff.is_zero() && (diff.is_sign_negative() != previous.is_sign_negative());

    diff.checked_div(previous)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| saturated(negative))
}

/// Render an APY-style rate with two decimals: `4.5` → `4.50%`.
pub fn format_percent(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("{rounded}%")
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
