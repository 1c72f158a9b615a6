//! Terminal spinner for long engine runs

use hashkeep_engine::ProgressSink;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Spinner on stderr showing the path being processed
#[derive(Clone)]
pub struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    pub fn new(action: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {prefix} [{pos}] {wide_msg}") {
            bar.set_style(style);
        }
        bar.set_prefix(action.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// No drawing at all, for JSON output and non-terminals
    pub fn hidden() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        Self { bar }
    }
}

impl ProgressSink for SpinnerProgress {
    fn status(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
