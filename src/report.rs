/*!
 * Reporting functionality for glm
 *
 * Renders live transfer progress with indicatif and a summary of the
 * finished transfer using the tabled library.
 */

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::transfer::{CopyProgress, ExecutionSummary, ProgressReporter};
use crate::types::PlanSummary;
use crate::utils::{format_file_size, truncate_name};

const BAR_TEMPLATE: &str = "[{bar:20.green}] {percent}% - {binary_bytes_per_sec} - ETA {eta} - {msg}";

/// Progress bar fed by executor chunk events
///
/// The bar accumulates chunk sizes; indicatif derives rate and ETA from them.
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    /// Bar sized for `bytes_to_copy` bytes
    pub fn new(bytes_to_copy: u64) -> Self {
        let bar = ProgressBar::new(bytes_to_copy);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Bar that never draws, for tests and non-interactive output
    pub fn hidden(bytes_to_copy: u64) -> Self {
        let bar = ProgressBar::with_draw_target(Some(bytes_to_copy), ProgressDrawTarget::hidden());
        Self { bar }
    }

    /// Bytes accumulated so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Clear the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for BarReporter {
    fn report(&self, progress: &CopyProgress) {
        // Zero-size nodes (the manifest) are not part of the bar length
        if progress.file_size > 0 {
            self.bar.inc(progress.chunk_bytes);
        }
        self.bar.set_message(format!(
            "{} {} {}",
            progress.position(),
            progress.formatted_size(),
            truncate_name(&progress.file_name, 40)
        ));
    }
}

/// Statistics for a finished transfer
#[derive(Debug, Clone)]
pub struct TransferReport {
    /// Display name of the package
    pub package: String,
    /// Totals from the plan
    pub plan: PlanSummary,
    /// What execution did
    pub summary: ExecutionSummary,
    /// Wall time spent executing
    pub duration: Duration,
}

impl TransferReport {
    fn rows(&self) -> Vec<SummaryRow> {
        let rate = if self.duration.as_secs_f64() > 0.0 {
            format!(
                "{}/s",
                format_file_size((self.summary.bytes_copied as f64 / self.duration.as_secs_f64()) as u64)
            )
        } else {
            "-".to_string()
        };

        vec![
            SummaryRow::new("Package", self.package.clone()),
            SummaryRow::new("Package Size", format_file_size(self.plan.total_bytes)),
            SummaryRow::new("Files Copied", self.summary.files_copied.to_string()),
            SummaryRow::new("Files Skipped", self.summary.files_skipped.to_string()),
            SummaryRow::new("Directories Created", self.summary.dirs_created.to_string()),
            SummaryRow::new("Bytes Copied", format_file_size(self.summary.bytes_copied)),
            SummaryRow::new("Process Time", format!("{:.2?}", self.duration)),
            SummaryRow::new("Throughput", rate),
        ]
    }

    /// Render the report as a table
    pub fn render(&self) -> String {
        let mut table = Table::new(self.rows());
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    key: String,

    #[tabled(rename = "Value")]
    value: String,
}

impl SummaryRow {
    fn new(key: &str, value: String) -> Self {
        Self {
            key: key.to_string(),
            value,
        }
    }
}

/// Render a plan summary for the confirmation prompt
pub fn describe_plan(name: &str, plan: &PlanSummary) -> String {
    format!(
        "{} ({}, {} to copy in {} files)",
        name,
        format_file_size(plan.total_bytes),
        format_file_size(plan.bytes_to_copy),
        plan.file_count
    )
}
