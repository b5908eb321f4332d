//! Background autosave
//!
//! A tokio task that waits for mutations and writes the snapshot once the
//! session has been quiet for the autosave interval. Hosts without a tokio
//! runtime can drive [`SessionManager::flush_if_due`] from their own timer
//! instead.

use tokio::task::JoinHandle;

use crate::manager::SessionManager;

/// Aborts the autosave task when dropped
pub struct AutosaveHandle {
    task: JoinHandle<()>,
}

impl AutosaveHandle {
    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn the autosave loop on the current tokio runtime
pub fn spawn_autosave(manager: SessionManager) -> AutosaveHandle {
    let signal = manager.persist_signal();
    let interval = manager.autosave_interval();

    let task = tokio::spawn(async move {
        loop {
            signal.notified().await;

            // Every further mutation restarts the quiet period
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => break,
                    _ = signal.notified() => continue,
                }
            }

            if manager.flush_pending() {
                tracing::trace!("Autosave flushed session");
            }
        }
    });

    AutosaveHandle { task }
}
