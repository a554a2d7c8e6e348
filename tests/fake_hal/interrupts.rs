use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// How long another thread may wait to enter the critical section before it
/// counts as held.
const HELD_AFTER: Duration = Duration::from_millis(500);

/// Whether another thread can enter the critical section, i.e. nobody is
/// holding interrupts off.
///
/// The host implementation lets the owning thread re-enter, so the check has
/// to run elsewhere.
pub fn enabled() -> bool {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        critical_section::with(|_| ());
        let _ = sender.send(());
    });
    receiver.recv_timeout(HELD_AFTER).is_ok()
}
