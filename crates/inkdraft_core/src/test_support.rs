//! Shared test-only helpers for inkdraft_core.

use crate::config::Config;
use crate::draft::DraftEditor;
use crate::worker::SaveEvent;
use crossbeam_channel::Receiver;
use std::thread;
use std::time::{Duration, Instant};

const EVENT_TIMEOUT: Duration = Duration::from_secs(2);

/// Config with the given autosave delay and an unused draft path.
pub(crate) fn test_config(autosave_delay_ms: u64) -> Config {
    Config {
        draft_path: String::new(),
        autosave_delay_ms,
        history_limit: 50,
        render_embeds: true,
    }
}

/// Receive one worker event or fail the test.
///
/// # Panics
/// Panics when no event arrives within two seconds.
pub(crate) fn recv_event(rx: &Receiver<SaveEvent>) -> SaveEvent {
    rx.recv_timeout(EVENT_TIMEOUT)
        .expect("expected save worker event")
}

/// Tick `editor` until `done` holds.
///
/// # Panics
/// Panics when the condition is not reached within two seconds.
pub(crate) fn tick_until<F>(editor: &mut DraftEditor, done: F)
where
    F: Fn(&DraftEditor) -> bool,
{
    let deadline = Instant::now() + EVENT_TIMEOUT;
    while !done(&*editor) {
        assert!(
            Instant::now() < deadline,
            "condition not reached; status {:?}",
            editor.status()
        );
        editor.tick(Instant::now());
        thread::sleep(Duration::from_millis(5));
    }
}
