//! Text progress bar

/// A fixed-width text progress bar over a known number of steps.
///
/// Rendered as `"<label>: <pct>% |<bar>| <status>"`. Created up front by the
/// listener that owns it and rewound with [`ProgressBar::reset`] each epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBar {
    label: String,
    total: usize,
    width: usize,
    position: usize,
}

impl ProgressBar {
    /// Create a bar at position 0.
    #[must_use]
    pub fn new(label: impl Into<String>, total: usize, width: usize) -> Self {
        Self {
            label: label.into(),
            total,
            width,
            position: 0,
        }
    }

    /// Steps completed since the last reset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Total steps per pass.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Complete one step and render the bar.
    pub fn advance(&mut self, status: &str) -> String {
        self.position += 1;
        self.render(status)
    }

    /// Rewind to position 0.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Completion percentage, clamped to 100. An empty pass is complete.
    #[must_use]
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 100;
        }
        (self.position.saturating_mul(100) / self.total).min(100)
    }

    /// Render the bar at the current position.
    #[must_use]
    pub fn render(&self, status: &str) -> String {
        let percent = self.percent();
        let filled = percent * self.width / 100;
        let bar = format!("{}{}", "=".repeat(filled), " ".repeat(self.width - filled));

        if status.is_empty() {
            format!("{}: {percent:>3}% |{bar}|", self.label)
        } else {
            format!("{}: {percent:>3}% |{bar}| {status}", self.label)
        }
    }
}
