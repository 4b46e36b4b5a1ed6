//! Multi-file progress tracking, one tick per pipeline stage

use crate::algorithm::executor::Stage;
use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "[{{elapsed_precise}}] [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{prefix}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Coordinates progress display for batch operations
///
/// The bar advances once per stage of every file, so long extractions still
/// show movement.
pub struct ProgressManager {
    bar: ProgressBar,
    file_count: usize,
    completed: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a hidden progress manager; call `initialize` to show it
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            file_count: 0,
            completed: 0,
        }
    }

    /// Size the bar for `file_count` files
    pub fn initialize(&mut self, file_count: usize) {
        self.file_count = file_count;
        self.completed = 0;
        let total = (file_count * Stage::ALL.len()) as u64;
        self.bar = ProgressBar::new(total);
        self.bar.set_style(PROGRESS_STYLE.clone());
    }

    /// Show which file is being processed
    pub fn start_file(&self, index: usize, path: &Path) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        self.bar
            .set_prefix(format!("{}/{} {display_name}", index + 1, self.file_count));
        self.bar.set_position((index * Stage::ALL.len()) as u64);
    }

    /// Report the stage about to run
    pub fn stage(&self, stage: Stage) {
        self.bar.set_message(stage.to_string());
        self.bar.inc(1);
    }

    /// Mark the current file as completed
    pub fn complete_file(&mut self) {
        self.completed += 1;
        self.bar
            .set_position((self.completed * Stage::ALL.len()) as u64);
        self.bar.set_message("done");
    }

    /// Number of files completed so far
    pub const fn completed(&self) -> usize {
        self.completed
    }

    /// Clean up the progress display
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
