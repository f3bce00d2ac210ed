use std::time::Duration;

use harvester_engine::{HarvestEvent, HarvestResult, ProgressSink, Stage};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const PROGRESS_TEMPLATE: &str = "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}";

/// Renders harvest events as a single terminal progress bar.
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    /// Starts hidden; [`TerminalProgress::start`] puts it on stderr.
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        bar.set_style(style);
        Self { bar }
    }

    /// Handle shared with the terminal logger.
    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    pub fn start(&self) {
        self.bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(5));
        self.bar.enable_steady_tick(Duration::from_millis(200));
        self.bar.set_message("discovering results");
    }

    pub fn finish(&self, stored: usize, attempted: usize) {
        self.bar
            .finish_with_message(format!("{stored} of {attempted} stored"));
    }

    fn describe(stage: Stage, bytes: Option<u64>) -> String {
        match (stage, bytes) {
            (Stage::Resolving, _) => "resolving".to_string(),
            (Stage::Downloading, Some(bytes)) => format!("downloading {} KiB", bytes / 1024),
            (Stage::Downloading, None) => "downloading".to_string(),
            (Stage::Writing, _) => "writing".to_string(),
            (Stage::Transforming, _) => "transforming".to_string(),
        }
    }
}

impl ProgressSink for TerminalProgress {
    fn emit(&self, event: HarvestEvent) {
        match event {
            HarvestEvent::DiscoveryFinished { planned, .. } => {
                self.bar.set_length(planned);
                self.bar.set_position(0);
            }
            HarvestEvent::Progress(progress) => self.bar.set_message(format!(
                "#{} {}",
                progress.ordinal,
                Self::describe(progress.stage, progress.bytes)
            )),
            HarvestEvent::ItemCompleted { ordinal, result } => {
                if let HarvestResult::Skipped(reason) = result {
                    self.bar.println(format!("#{ordinal} skipped: {reason}"));
                }
                self.bar.inc(1);
            }
        }
    }
}
