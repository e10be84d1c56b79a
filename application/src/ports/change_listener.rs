//! Change listener port
//!
//! Anything that wants to react to log buffer mutations (a console view,
//! a UI panel, a test probe) implements [`ChangeListener`] and registers
//! itself through [`Logger::subscribe`](crate::use_cases::logger::Logger::subscribe).

use outlog_domain::ChangeSignal;

/// Receiver of change signals
///
/// Called synchronously on the thread that mutated the buffer, after the
/// mutation has been written.
pub trait ChangeListener: Send + Sync {
    fn on_change(&self, signal: ChangeSignal);
}

impl<F> ChangeListener for F
where
    F: Fn(ChangeSignal) + Send + Sync,
{
    fn on_change(&self, signal: ChangeSignal) {
        self(signal)
    }
}
