//! Text output formatting with progress bars and colors.

use yescode_core::{BalanceKind, BalanceResult};
use yescode_core::balance::LOW_PERCENT_THRESHOLD;

use crate::presenter::{Choice, NotifyLevel};
use crate::status_bar::{RefreshState, StatusBar};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Text formatter with optional colors.
#[derive(Debug, Clone)]
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 10,
        }
    }

    /// Whether output contains ANSI colors.
    pub fn use_colors(&self) -> bool {
        self.use_colors
    }

    /// Formats the status line and its tooltip.
    ///
    /// ```text
    /// YesCode Subs: 42%
    ///   Subscription Mode (Pro)
    ///   Daily: $4.20 / $10.00 (42%)
    /// ```
    pub fn format_status(&self, bar: &StatusBar) -> String {
        let mut lines = vec![self.headline(bar)];

        if let (RefreshState::Success, Some(result)) = (&bar.state, &bar.last_result) {
            if result.kind != BalanceKind::PayGo {
                lines[0].push_str(&format!("  {}", self.progress_bar(result.percentage)));
            }
        }

        for line in bar.tooltip.lines().filter(|l| !l.is_empty() && *l != bar.text) {
            lines.push(format!("  {}", self.dim(line)));
        }

        lines.join("\n")
    }

    /// Formats a balance without the surrounding status bar.
    pub fn format_balance(&self, result: &BalanceResult) -> String {
        let mut lines = Vec::new();

        let headline = if result.is_low() {
            self.red(&result.display_text)
        } else {
            self.bold(&result.display_text)
        };
        if result.kind == BalanceKind::PayGo {
            lines.push(headline);
        } else {
            lines.push(format!("{headline}  {}", self.progress_bar(result.percentage)));
        }

        for line in result.tooltip.lines() {
            lines.push(format!("  {}", self.dim(line)));
        }

        lines.join("\n")
    }

    /// Formats a progress bar.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn progress_bar(&self, percent_remaining: f64) -> String {
        let clamped = percent_remaining.clamp(0.0, 100.0);
        let filled = ((clamped / 100.0) * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.color_for_percent(clamped, &bar)
    }

    /// Formats one row of a pick list.
    ///
    /// Separators render as section headers. Rows stay on one line so the
    /// list can be redrawn in place.
    pub fn format_menu_item(&self, choice: &Choice) -> String {
        if choice.separator {
            return self.bold(&format!("── {} ──", choice.label));
        }

        let marker = if choice.current { self.green("✓ ") } else { String::new() };
        let mut line = format!("{marker}{}", choice.label);
        if let Some(description) = &choice.description {
            line.push_str(&format!("  {}", self.cyan(description)));
        }
        if let Some(detail) = &choice.detail {
            line.push_str(&format!("  {}", self.dim(detail)));
        }
        line
    }

    /// Formats a notification.
    pub fn format_notice(&self, level: NotifyLevel, message: &str) -> String {
        match level {
            NotifyLevel::Info => message.to_string(),
            NotifyLevel::Warning => format!("{} {message}", self.yellow("Warning:")),
            NotifyLevel::Error => format!("{} {message}", self.red("Error:")),
        }
    }

    /// Formats a section header with an underline.
    pub fn format_header(&self, title: &str) -> String {
        format!("{}\n{}", self.bold(title), "─".repeat(40))
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn headline(&self, bar: &StatusBar) -> String {
        match &bar.state {
            RefreshState::Idle | RefreshState::Fetching => self.dim(&bar.text),
            RefreshState::Retrying { .. } => self.yellow(&bar.text),
            _ if bar.warning => self.red(&self.bold(&bar.text)),
            _ => self.bold(&bar.text),
        }
    }

    fn color_for_percent(&self, percent: f64, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        if percent < LOW_PERCENT_THRESHOLD {
            self.red(text)
        } else if percent < 50.0 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}
