//! Progress of a batch analysis, as seen by whoever is waiting on it.
//!
//! Hooks fire from the collecting task, never from the blocking workers.

use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}";

pub trait ProgressReporter: Send + Sync {
    /// A batch of `total` files is about to be analyzed.
    fn batch_started(&self, total: usize);

    /// One file completed, in completion order rather than request order.
    fn file_finished(&self, path: &str, analyzed: bool);

    fn batch_finished(&self, failed: usize);
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn batch_started(&self, _total: usize) {}
    fn file_finished(&self, _path: &str, _analyzed: bool) {}
    fn batch_finished(&self, _failed: usize) {}
}

/// Draws a bar on stderr naming the file that finished last. Files that
/// fail are echoed above the bar so they stay visible after it clears.
#[derive(Debug)]
pub struct IndicatifReporter {
    bar: ProgressBar,
}

impl IndicatifReporter {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(0))
    }

    /// Never draws. Used for `--quiet` and in tests.
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for IndicatifReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for IndicatifReporter {
    fn batch_started(&self, total: usize) {
        self.bar.reset();
        self.bar.set_length(total as u64);
    }

    fn file_finished(&self, path: &str, analyzed: bool) {
        let name = path.rsplit('/').next().unwrap_or(path);
        if !analyzed {
            self.bar.println(format!("failed: {path}"));
        }
        self.bar.set_message(name.to_string());
        self.bar.inc(1);
    }

    fn batch_finished(&self, failed: usize) {
        if failed > 0 {
            self.bar.println(format!("{failed} file(s) could not be analyzed"));
        }
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_reporter_tracks_finished_files() {
        let reporter = IndicatifReporter::hidden();
        reporter.batch_started(3);
        reporter.file_finished("/p/app/components/a.js", true);
        reporter.file_finished("/p/app/components/b.hbs", false);
        assert_eq!(reporter.bar.position(), 2);
        assert_eq!(reporter.bar.length(), Some(3));
        assert_eq!(reporter.bar.message(), "b.hbs");
        reporter.batch_finished(1);
        assert!(reporter.bar.is_finished());
    }

    #[test]
    fn restarting_a_batch_resets_the_count() {
        let reporter = IndicatifReporter::hidden();
        reporter.batch_started(1);
        reporter.file_finished("a.js", true);
        reporter.batch_started(4);
        assert_eq!(reporter.bar.position(), 0);
        assert_eq!(reporter.bar.length(), Some(4));
    }
}
