//! Status surface the widget renders into.
//!
//! The browser original toggled a status element, the submit button's
//! disabled flag, and the input field. [`StatusSink`] abstracts those four
//! operations so the submit flow can be driven against a terminal or a
//! recording test double.

/// Visual category of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// The widget's UI surface.
pub trait StatusSink: Send + Sync {
    /// Show a status message, replacing any current one.
    fn show_status(&self, message: &str, kind: StatusKind);

    /// Hide the current status message.
    fn clear_status(&self);

    /// Disable the submit control and swap its label to the in-progress
    /// text (`true`), or restore it (`false`).
    fn set_submitting(&self, submitting: bool);

    /// Clear the email input after a confirmed submission.
    fn clear_input(&self);
}

/// Terminal-backed [`StatusSink`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalStatus;

#[allow(clippy::print_stdout)]
impl StatusSink for TerminalStatus {
    fn show_status(&self, message: &str, kind: StatusKind) {
        match kind {
            StatusKind::Success => println!("[ok] {message}"),
            StatusKind::Error => println!("[error] {message}"),
        }
    }

    fn clear_status(&self) {
        // Printed lines cannot be retracted from a terminal.
    }

    fn set_submitting(&self, submitting: bool) {
        if submitting {
            println!("Joining...");
        }
    }

    fn clear_input(&self) {}
}
