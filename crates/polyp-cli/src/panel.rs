//! Console rendering of the current patient.

use std::io::Write;

use polyp_core::RefreshListener;
use polyp_model::SessionState;

/// One-line panel: patient label followed by the three counts.
pub fn render_panel(state: &SessionState) -> String {
    let record = state.current_record();
    format!(
        "{} | Total: {} | Serrated: {} | Adenomatous: {}",
        state.current,
        record.total(),
        record.serrated(),
        record.adenomatous()
    )
}

/// Writes the panel line after every refresh.
pub struct ConsolePanel<W: Write> {
    out: W,
}

impl<W: Write> ConsolePanel<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RefreshListener for ConsolePanel<W> {
    fn refresh(&mut self, state: &SessionState) {
        if let Err(error) = writeln!(self.out, "{}", render_panel(state)) {
            tracing::warn!(%error, "failed to write panel");
        }
    }
}
