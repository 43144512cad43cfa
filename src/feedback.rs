use std::io::{self, Write};

use crate::quiz::Outcome;

/// Platform feedback collaborator: fire-and-forget notifications on how a
/// round resolved. Implementations must never fail the game loop; errors
/// are swallowed.
pub trait Notifier {
    fn correct(&self) {}
    fn wrong(&self) {}
    fn time_up(&self) {}
}

/// Dispatch a round outcome to the matching notification
pub fn notify(notifier: &dyn Notifier, outcome: Outcome) {
    match outcome {
        Outcome::Correct => notifier.correct(),
        Outcome::Wrong => notifier.wrong(),
        Outcome::TimedOut => notifier.time_up(),
    }
}

/// Rings the terminal bell. BEL leaves the alternate screen untouched, so
/// this is safe mid-frame.
pub struct BellNotifier;

impl BellNotifier {
    fn ring(&self) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(b"\x07").and_then(|_| stdout.flush());
    }
}

impl Notifier for BellNotifier {
    fn correct(&self) {
        self.ring();
    }

    fn wrong(&self) {
        self.ring();
    }

    fn time_up(&self) {
        self.ring();
    }
}

/// Swallows everything; used when the bell is disabled
pub struct SilentNotifier;

impl Notifier for SilentNotifier {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<&'static str>>,
    }

    impl Notifier for Recorder {
        fn correct(&self) {
            self.calls.borrow_mut().push("correct");
        }

        fn wrong(&self) {
            self.calls.borrow_mut().push("wrong");
        }

        fn time_up(&self) {
            self.calls.borrow_mut().push("time_up");
        }
    }

    #[test]
    fn test_notify_dispatches_by_outcome() {
        let recorder = Recorder::default();

        notify(&recorder, Outcome::Correct);
        notify(&recorder, Outcome::Wrong);
        notify(&recorder, Outcome::TimedOut);

        assert_eq!(
            *recorder.calls.borrow(),
            vec!["correct", "wrong", "time_up"]
        );
    }

    #[test]
    fn test_silent_notifier_is_a_no_op() {
        // default trait methods do nothing; this must not panic
        let silent = SilentNotifier;
        notify(&silent, Outcome::Correct);
        notify(&silent, Outcome::Wrong);
        notify(&silent, Outcome::TimedOut);
    }
}
