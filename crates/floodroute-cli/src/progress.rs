use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a progress bar for determinate progress
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{msg}\n[{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Finish a progress bar with success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a progress bar with error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✗ {}", message));
}

/// Terminal progress for one assessment run
///
/// A spinner covers resolving and routing; once sampling starts it is
/// replaced by a bar over the sample count. Hidden in JSON mode.
pub struct AssessProgress {
    hidden: bool,
    current: ProgressBar,
}

impl AssessProgress {
    pub fn new(hidden: bool) -> Self {
        let current = if hidden { ProgressBar::hidden() } else { create_spinner("Starting...") };
        Self { hidden, current }
    }

    pub fn stage(&self, message: &str) {
        self.current.set_message(message.to_string());
    }

    /// Swap the spinner for a bar; its length is set by the first sample
    pub fn start_sampling(&mut self, message: &str) {
        finish_success(&self.current, "Route obtained");
        self.current = if self.hidden {
            ProgressBar::hidden()
        } else {
            create_progress_bar(0, message)
        };
    }

    pub fn sample_done(&self, total: usize) {
        self.current.set_length(total as u64);
        self.current.inc(1);
    }

    /// Print a line to stdout without tearing the bar
    pub fn println(&self, line: impl AsRef<str>) {
        if !self.hidden {
            self.current.suspend(|| println!("{}", line.as_ref()));
        }
    }

    pub fn finish(&self, message: &str) {
        finish_success(&self.current, message);
    }

    pub fn fail(&self, message: &str) {
        finish_error(&self.current, message);
    }
}
