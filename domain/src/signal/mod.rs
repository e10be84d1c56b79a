//! Change notification value objects.
//!
//! - [`ChangeSignal`]: payload-free notice that the log buffer changed
//! - [`SignalName`]: the name under which the signal is announced

mod change_signal;
mod signal_name;

pub use change_signal::ChangeSignal;
pub use signal_name::SignalName;
