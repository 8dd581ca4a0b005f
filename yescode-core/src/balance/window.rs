//! Daily/weekly window rendering shared by the subscription and team
//! calculators.

use chrono::{DateTime, Utc};

use super::format::{date_with_relative, dollars, fixed, whole_percent};
use super::{BalanceKind, BalanceResult};

/// A spend window with a budget.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Window {
    pub remaining: f64,
    pub budget: f64,
}

impl Window {
    /// Remaining share of the budget in percent; an empty budget counts as
    /// exhausted.
    pub fn remaining_percent(&self) -> f64 {
        if self.budget > 0.0 {
            self.remaining / self.budget * 100.0
        } else {
            0.0
        }
    }

    pub fn used(&self) -> f64 {
        self.budget - self.remaining
    }

    fn tooltip_line(&self, label: &str, reverse: bool) -> String {
        let (amount, percent) = if reverse {
            (self.used(), 100.0 - self.remaining_percent())
        } else {
            (self.remaining, self.remaining_percent())
        };
        format!(
            "{label}: {} / {} ({}%)",
            dollars(amount),
            dollars(self.budget),
            fixed(percent, 1)
        )
    }
}

/// Everything needed to render a daily/weekly balance.
pub(crate) struct QuotaView<'a> {
    /// `Subs` or `Team`.
    pub short_label: &'static str,
    /// First tooltip line.
    pub mode_label: &'static str,
    /// `Plan` or `Group`.
    pub owner_label: &'static str,
    pub owner_name: &'a str,
    pub daily: Window,
    pub weekly: Window,
    pub next_reset: Option<DateTime<Utc>>,
    pub expiry: Option<DateTime<Utc>>,
}

impl QuotaView<'_> {
    /// Picks the tighter window (ties go to daily) and renders it.
    pub fn render(&self, reverse: bool, now: DateTime<Utc>) -> BalanceResult {
        let daily_pct = self.daily.remaining_percent();
        let weekly_pct = self.weekly.remaining_percent();

        let (kind, percentage) = if daily_pct <= weekly_pct {
            (BalanceKind::Daily, daily_pct)
        } else {
            (BalanceKind::Weekly, weekly_pct)
        };

        let remaining = whole_percent(percentage);
        let shown = if reverse { 100 - remaining } else { remaining };

        let tooltip = [
            self.mode_label.to_string(),
            format!("{}: {}", self.owner_label, self.owner_name),
            self.daily.tooltip_line("Daily", reverse),
            self.weekly.tooltip_line("Weekly", reverse),
            format!("Reset: {}", date_with_relative(self.next_reset, now)),
            format!("Expiry: {}", date_with_relative(self.expiry, now)),
        ]
        .join("\n");

        BalanceResult {
            kind,
            percentage,
            display_text: format!("YesCode {}: {shown}%", self.short_label),
            tooltip,
        }
    }
}
