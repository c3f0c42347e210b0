//! Console Progress Bar
//!
//! Renders generation progress estimates on a single, rewritten line.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::orchestration::ProgressCallback;

/// Single-line progress bar fed by a [`ProgressCallback`]
#[derive(Clone)]
pub struct ConsoleProgress {
    label: String,
    started: Instant,
    /// Last rendered whole percent, to skip duplicate redraws
    last: Arc<AtomicU32>,
    drawn: Arc<AtomicBool>,
    enabled: bool,
}

impl ConsoleProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started: Instant::now(),
            last: Arc::new(AtomicU32::new(u32::MAX)),
            drawn: Arc::new(AtomicBool::new(false)),
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Callback to hand to the enhancer
    pub fn callback(&self) -> ProgressCallback {
        let this = self.clone();
        Arc::new(move |percent| this.update(percent))
    }

    pub fn update(&self, percent: f32) {
        if !self.enabled {
            return;
        }
        let whole = percent.clamp(0.0, 100.0) as u32;
        if self.last.swap(whole, Ordering::SeqCst) == whole {
            return;
        }
        self.drawn.store(true, Ordering::SeqCst);
        print!(
            "\r\x1B[K{}",
            render_line(&self.label, percent, self.started.elapsed().as_secs())
        );
        use std::io::Write;
        let _ = std::io::stdout().flush();
    }

    /// End the progress line if anything was drawn
    pub fn finish(&self) {
        if self.drawn.swap(false, Ordering::SeqCst) {
            println!();
        }
    }
}

fn render_line(label: &str, percent: f32, elapsed_secs: u64) -> String {
    format!(
        "{} {} {:>3.0}% ({})",
        label,
        render_progress_bar(percent, 30),
        percent.clamp(0.0, 100.0),
        format_duration(elapsed_secs)
    )
}

/// Render a simple progress bar
fn render_progress_bar(percent: f32, width: usize) -> String {
    let progress = (percent / 100.0).clamp(0.0, 1.0);
    let filled = (progress * width as f32) as usize;
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Format duration as human-readable string
fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(render_progress_bar(0.0, 4), "[░░░░]");
        assert_eq!(render_progress_bar(50.0, 4), "[██░░]");
        assert_eq!(render_progress_bar(150.0, 4), "[████]");
    }

    #[test]
    fn test_render_line() {
        let line = render_line("Generating", 95.0, 61);
        assert!(line.starts_with("Generating ["));
        assert!(line.contains(" 95%"));
        assert!(line.ends_with("(1m 1s)"));
    }

    #[test]
    fn test_disabled_progress_draws_nothing() {
        let progress = ConsoleProgress::new("x").enabled(false);
        (progress.callback())(40.0);
        assert!(!progress.drawn.load(Ordering::SeqCst));
    }
}
