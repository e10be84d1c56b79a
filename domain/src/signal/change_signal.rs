//! ChangeSignal

/// Notification fired after each mutation of the log buffer.
///
/// Carries no payload: listeners that need the new content read it from
/// the logger. A signal only exists for the duration of one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChangeSignal;

impl ChangeSignal {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_is_zero_sized() {
        assert_eq!(std::mem::size_of::<ChangeSignal>(), 0);
        assert_eq!(ChangeSignal::new(), ChangeSignal::default());
    }
}
