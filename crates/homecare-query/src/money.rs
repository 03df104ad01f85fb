//! Money display: `"{CODE} 1,234.50"`, with the sign in front of the code.

use homecare_core::{AppState, DEFAULT_CURRENCY};

/// Group the digits of a non-negative integer string in threes.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an amount in the given ISO 4217 currency with two decimals.
///
/// A non-finite amount is shown as zero. A blank currency falls back to
/// the default code.
pub fn format_money(amount: f64, currency: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let code = match currency.trim() {
        "" => DEFAULT_CURRENCY,
        code => code,
    };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}{code} {}.{cents}", group_thousands(whole))
}

/// Format an amount in the installation's configured currency.
pub fn money(state: &AppState, amount: f64) -> String {
    format_money(amount, state.currency())
}
