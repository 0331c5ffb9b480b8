//! Background worker thread for draft persistence.
//!
//! The editing thread never blocks on storage; it sends [`SaveCmd`] values and
//! polls [`SaveEvent`] replies.

use crate::store::ContentStore;
use chrono::{DateTime, Utc};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

/// Commands issued by the editing thread.
#[derive(Debug)]
pub enum SaveCmd {
    /// Persist `content`, tagged with the session revision it was taken at.
    Persist { revision: u64, content: String },
}

/// Replies produced by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveEvent {
    Saved {
        revision: u64,
        saved_at: DateTime<Utc>,
    },
    Failed {
        revision: u64,
        message: String,
    },
}

impl SaveEvent {
    pub fn revision(&self) -> u64 {
        match self {
            Self::Saved { revision, .. } | Self::Failed { revision, .. } => *revision,
        }
    }
}

/// Handle for sending commands to, and receiving events from, the save worker.
pub struct SaveWorkerHandle {
    pub cmd_tx: Sender<SaveCmd>,
    pub evt_rx: Receiver<SaveEvent>,
}

/// Spawn the worker thread that owns `store`.
///
/// The thread exits once every command sender is dropped.
///
/// # Panics
/// Panics if the worker thread cannot be spawned.
pub fn spawn_save_worker<S: ContentStore>(store: S) -> SaveWorkerHandle {
    let (cmd_tx, cmd_rx) = unbounded::<SaveCmd>();
    let (evt_tx, evt_rx) = unbounded();

    thread::Builder::new()
        .name("inkdraft-save-worker".to_string())
        .spawn(move || {
            for cmd in cmd_rx.iter() {
                match cmd {
                    SaveCmd::Persist { revision, content } => {
                        let started = Instant::now();
                        let event = match store.persist(&content) {
                            Ok(()) => {
                                info!(
                                    revision,
                                    bytes = content.len(),
                                    elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                                    "draft saved"
                                );
                                SaveEvent::Saved {
                                    revision,
                                    saved_at: Utc::now(),
                                }
                            }
                            Err(err) => {
                                warn!(revision, error = %err, "draft save failed");
                                SaveEvent::Failed {
                                    revision,
                                    message: err.to_string(),
                                }
                            }
                        };
                        if evt_tx.send(event).is_err() {
                            break;
                        }
                    }
                }
            }
        })
        .expect("spawn save worker");

    SaveWorkerHandle { cmd_tx, evt_rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_support::recv_event;

    #[test]
    fn worker_persists_and_acknowledges() {
        let store = MemoryStore::default();
        let worker = spawn_save_worker(store.clone());
        worker
            .cmd_tx
            .send(SaveCmd::Persist {
                revision: 7,
                content: "body".to_string(),
            })
            .expect("send persist");

        match recv_event(&worker.evt_rx) {
            SaveEvent::Saved { revision, .. } => assert_eq!(revision, 7),
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(store.content().as_deref(), Some("body"));
    }

    #[test]
    fn worker_reports_failures() {
        let store = MemoryStore::default();
        store.fail_next_save();
        let worker = spawn_save_worker(store.clone());
        worker
            .cmd_tx
            .send(SaveCmd::Persist {
                revision: 1,
                content: "lost".to_string(),
            })
            .expect("send persist");

        match recv_event(&worker.evt_rx) {
            SaveEvent::Failed { revision, message } => {
                assert_eq!(revision, 1);
                assert!(message.contains("simulated storage outage"), "{}", message);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(store.content(), None);
    }
}
