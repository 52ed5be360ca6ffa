//! CLI command handlers, one per file.

mod extract;
mod merge;
mod run;

pub use extract::run_extract;
pub use merge::run_merge;
pub use run::{collect_sources, run_pipeline};

use bidfetch_core::observer::RunObserver;

/// Prints log lines as they arrive; progress is not shown.
struct StdoutObserver;

impl RunObserver for StdoutObserver {
    fn log(&self, line: String) {
        println!("{}", line);
    }

    fn progress(&self, _current: usize, _total: usize) {}
}
