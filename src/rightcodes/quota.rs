//! Quota summary from a `/subscriptions/list` payload.
//!
//! Accounts are assumed to hold a single plan: the first subscription with
//! usable quota numbers is summarized as `rc $used/$total R|NR`.

use serde_json::Value;
use std::fmt;

/// Usage of one subscription, in dollars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaSummary {
    pub used: f64,
    pub total: f64,
    /// Whether the quota was reset today
    pub reset_today: bool,
}

impl fmt::Display for QuotaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rc {}/{} {}",
            format_quota_amount(self.used),
            format_quota_amount(self.total),
            if self.reset_today { "R" } else { "NR" }
        )
    }
}

/// Summarizes the first subscription with numeric `total_quota` and `remaining_quota`.
///
/// Returns `None` when the payload has no such subscription.
pub fn summarize_subscription(payload: &Value) -> Option<QuotaSummary> {
    payload
        .get("subscriptions")?
        .as_array()?
        .iter()
        .filter_map(Value::as_object)
        .find_map(|sub| {
            let total = sub.get("total_quota").and_then(number)?;
            let remaining = sub.get("remaining_quota").and_then(number)?;
            Some(QuotaSummary {
                used: (total - remaining).max(0.0),
                total,
                reset_today: sub
                    .get("reset_today")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            })
        })
}

/// Accepts JSON numbers and numbers encoded as strings.
fn number(value: &Value) -> Option<f64> {
    if let Some(n) = value.as_f64() {
        return Some(n);
    }
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse().ok()
}

/// `$` amount with thousands separators; whole values drop the fraction, others keep 5 decimals.
pub fn format_quota_amount(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        return format!("${}", group_thousands(&format!("{rounded:.0}")));
    }
    let fixed = format!("{value:.5}");
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    format!("${}.{fraction}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
