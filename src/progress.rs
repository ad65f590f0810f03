//! Progress bar display for multi-module syncs

use indicatif::{ProgressBar, ProgressStyle};

/// Progress across the modules of a `sync all` or `unsync all`
pub struct SyncProgress {
    module_pb: ProgressBar,
}

impl SyncProgress {
    /// Create a progress display with the total module count
    pub fn new(total_modules: u64) -> Self {
        let module_pb = ProgressBar::new(total_modules);
        if let Ok(style) = ProgressStyle::default_bar().template("[{bar:40.cyan/blue}] {pos}/{len} {msg}") {
            module_pb.set_style(style.progress_chars("#>-"));
        }
        Self { module_pb }
    }

    /// A display that draws nothing, for single-module runs
    pub fn hidden() -> Self {
        Self {
            module_pb: ProgressBar::hidden(),
        }
    }

    /// Show the module currently being processed
    pub fn update_module(&self, key: &str, current: usize, total: usize) {
        self.module_pb
            .set_message(format!("({current}/{total}) {key}"));
    }

    /// Print a line to stdout without tearing the bar
    pub fn println(&self, line: impl AsRef<str>) {
        self.module_pb.suspend(|| println!("{}", line.as_ref()));
    }

    pub fn inc_module(&self) {
        self.module_pb.inc(1);
    }

    pub fn finish(&self) {
        self.module_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.module_pb.abandon();
    }
}
