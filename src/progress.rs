//! Scan progress display.
//!
//! The renderer only consumes [`ProgressEvent`]s. The backend exposes no
//! progress endpoint, so the event source used today is an estimator that
//! walks a fixed list of stages on a timer; output says it is an estimate.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started { job_id: String, total: usize },
    Stage { index: usize, message: String },
    Completed { message: String },
    Failed { error: String },
}

#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub message: &'static str,
    pub expected: Duration,
}

/// Typical stage timings of a single immediate scan.
pub const ESTIMATED_STAGES: &[Stage] = &[
    Stage { message: "Running Lighthouse accessibility scan...", expected: Duration::from_secs(8) },
    Stage { message: "Processing Lighthouse results...", expected: Duration::from_secs(3) },
    Stage { message: "Running additional accessibility checks...", expected: Duration::from_secs(5) },
    Stage { message: "Generating and sending email report...", expected: Duration::from_secs(6) },
];

pub const COMPLETED_MESSAGE: &str = "Scan should be complete. Check your email for the report.";

/// Emit estimated progress for `job_id` on a channel. The task ends early,
/// without a completion event, when `cancel` fires.
pub fn spawn_estimator(
    job_id: String,
    stages: &'static [Stage],
    cancel: CancellationToken,
) -> mpsc::Receiver<ProgressEvent> {
    let (tx, rx) = mpsc::channel(stages.len() + 2);
    tokio::spawn(async move {
        if tx.send(ProgressEvent::Started { job_id, total: stages.len() }).await.is_err() {
            return;
        }
        for (index, stage) in stages.iter().enumerate() {
            let event = ProgressEvent::Stage { index: index + 1, message: stage.message.to_string() };
            if tx.send(event).await.is_err() {
                return;
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(stage.expected) => {}
            }
        }
        let _ = tx.send(ProgressEvent::Completed { message: COMPLETED_MESSAGE.to_string() }).await;
    });
    rx
}

/// Terminal progress bar fed by progress events.
pub struct ScanProgress {
    bar: ProgressBar,
}

impl ScanProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.cyan} {bar:30.cyan/dark_gray} {pos}/{len} | {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self { bar: ProgressBar::hidden() }
    }

    pub fn handle_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { job_id, total } => {
                self.bar.set_length(*total as u64);
                self.bar.set_position(0);
                self.bar.println(format!(
                    "  {} Estimated progress for job {}",
                    style("ℹ").cyan(),
                    job_id
                ));
            }
            ProgressEvent::Stage { index, message } => {
                self.bar.set_position(index.saturating_sub(1) as u64);
                self.bar.set_message(message.clone());
            }
            ProgressEvent::Completed { message } => {
                if let Some(len) = self.bar.length() {
                    self.bar.set_position(len);
                }
                self.bar.finish_with_message(message.clone());
            }
            ProgressEvent::Failed { error } => {
                self.bar.abandon_with_message(format!("Failed: {}", error));
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }

    /// Drain `events` into the display until the source closes.
    pub async fn follow(&self, mut events: mpsc::Receiver<ProgressEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(&event);
        }
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}
