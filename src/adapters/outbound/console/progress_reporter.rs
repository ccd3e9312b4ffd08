use crate::ports::outbound::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::cell::RefCell;

/// StderrProgressReporter adapter reporting target progress on stderr
///
/// Keeps stdout free for the summary. The bar advances once per target.
pub struct StderrProgressReporter {
    progress_bar: RefCell<Option<ProgressBar>>,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self {
            progress_bar: RefCell::new(None),
        }
    }

    fn bar(&self, total: usize) -> ProgressBar {
        let mut slot = self.progress_bar.borrow_mut();
        if let Some(bar) = slot.as_ref() {
            return bar.clone();
        }
        let style = ProgressStyle::default_bar()
            .template("   {spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} - {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = ProgressBar::new(total as u64);
        bar.set_style(style);
        *slot = Some(bar.clone());
        bar
    }

    fn finish(&self) {
        if let Some(bar) = self.progress_bar.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        match self.progress_bar.borrow().as_ref() {
            Some(bar) => bar.println(message),
            None => eprintln!("{}", message),
        }
    }

    fn report_target(&self, current: usize, total: usize, target: &str) {
        let bar = self.bar(total);
        bar.set_position(current.saturating_sub(1) as u64);
        bar.set_message(format!("generating {}", target));
    }

    fn report_error(&self, message: &str) {
        let line = format!("❌ {}", message.red());
        match self.progress_bar.borrow().as_ref() {
            Some(bar) => bar.println(line),
            None => eprintln!("{}", line),
        }
    }

    fn report_completion(&self, message: &str) {
        self.finish();
        eprintln!("{}", message);
    }
}
