//! Display-ready view records, the per-view state machine and the loader that
//! fills them.

pub mod analytics;
pub mod loader;
pub mod path_overview;
pub mod progress_dashboard;
pub mod state;

pub use analytics::{Analytics, StyleShare};
pub use loader::ViewLoader;
pub use path_overview::{CurrentResource, PathEntry, PathOverview, PathPreview};
pub use progress_dashboard::{LearnerSummary, ProgressDashboard, QuizEntry};
pub use state::{ViewError, ViewState};

#[cfg(test)]
pub(crate) mod capture {
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` under a scoped subscriber and count the WARN lines it emits.
    pub(crate) fn warn_lines<R>(f: impl FnOnce() -> R) -> (R, usize) {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let count = text.lines().filter(|line| line.contains("WARN")).count();
        (out, count)
    }
}
