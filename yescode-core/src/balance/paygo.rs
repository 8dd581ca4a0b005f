//! Pay-as-you-go balance calculator.

use super::format::{dollars, fixed};
use super::{BalanceKind, BalanceResult};
use crate::models::ProfileResponse;

/// Renders the raw pay-as-you-go balance. Never fails and has no reverse
/// variant.
pub fn calculate_paygo(profile: &ProfileResponse) -> BalanceResult {
    let balance = profile.pay_as_you_go_balance;
    BalanceResult {
        kind: BalanceKind::PayGo,
        percentage: balance,
        display_text: format!("YesCode Pgo: ${}", fixed(balance, 1)),
        tooltip: format!("Pay-as-you-go Mode\nBalance: {}", dollars(balance)),
    }
}
