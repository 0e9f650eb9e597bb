//! Keeps the public view's comment list live by polling the store.
//!
//! Every loop is stamped with an epoch. `stop` advances the epoch but lets an
//! in-flight fetch finish; its result is then dropped at render time because
//! its epoch is no longer current.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use shared::{domain::BoardId, protocol::Comment};
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, warn};

use crate::{
    error::{ClientError, Result},
    machine::DisplayState,
    presenter::Presenter,
    store::RemoteStore,
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
struct SyncState {
    epoch: u64,
    last_rendered_count: Option<usize>,
}

struct ActiveLoop {
    epoch: u64,
    board_id: BoardId,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

/// Polling loop context. Cloned into each spawned loop.
#[derive(Clone)]
struct Poller {
    store: Arc<dyn RemoteStore>,
    presenter: Arc<dyn Presenter>,
    display: watch::Receiver<DisplayState>,
    state: Arc<Mutex<SyncState>>,
}

pub struct ViewSynchronizer {
    poller: Poller,
    interval: Duration,
    active: Option<ActiveLoop>,
}

fn lock(state: &Mutex<SyncState>) -> MutexGuard<'_, SyncState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ViewSynchronizer {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        presenter: Arc<dyn Presenter>,
        display: watch::Receiver<DisplayState>,
        interval: Duration,
    ) -> Self {
        Self {
            poller: Poller {
                store,
                presenter,
                display,
                state: Arc::new(Mutex::new(SyncState::default())),
            },
            interval,
            active: None,
        }
    }

    /// Stops any running loop, then starts polling `board_id`. The first
    /// fetch happens immediately. Must be called inside a tokio runtime.
    pub fn start(&mut self, board_id: BoardId) -> u64 {
        self.stop();

        let epoch = {
            let mut state = lock(&self.poller.state);
            state.epoch += 1;
            state.last_rendered_count = None;
            state.epoch
        };
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let poller = self.poller.clone();
        let task = tokio::spawn(poller.run(
            epoch,
            board_id.clone(),
            self.interval,
            shutdown_rx,
        ));
        debug!(%board_id, epoch, "sync: started");

        self.active = Some(ActiveLoop {
            epoch,
            board_id,
            shutdown: Some(shutdown_tx),
            task,
        });
        epoch
    }

    /// Cancels future ticks. Safe to call when nothing is running.
    pub fn stop(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        {
            let mut state = lock(&self.poller.state);
            if state.epoch == active.epoch {
                state.epoch += 1;
            }
        }
        if let Some(shutdown) = active.shutdown.take() {
            let _ = shutdown.send(());
        }
        debug!(board_id = %active.board_id, epoch = active.epoch, "sync: stopped");
    }

    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.task.is_finished())
    }

    pub fn board_id(&self) -> Option<&BoardId> {
        self.active.as_ref().map(|active| &active.board_id)
    }

    pub fn current_epoch(&self) -> u64 {
        lock(&self.poller.state).epoch
    }

    /// Number of comments in the last applied render, `None` before the first.
    pub fn last_rendered_count(&self) -> Option<usize> {
        lock(&self.poller.state).last_rendered_count
    }

    /// Applies a fetch result issued under `epoch`. Used by the loop; exposed
    /// so late results can be fed through the same staleness guard.
    pub fn apply(&self, epoch: u64, comments: &[Comment]) -> Result<()> {
        self.poller.apply(epoch, comments)
    }
}

impl Drop for ViewSynchronizer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Poller {
    async fn run(
        self,
        epoch: u64,
        board_id: BoardId,
        interval: Duration,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            if *self.display.borrow() != DisplayState::View {
                debug!(%board_id, epoch, "sync: view inactive, skipping poll");
                continue;
            }

            // Not raced against shutdown: a fetch that is already in flight
            // completes and is discarded by `apply`.
            match self.store.list_comments(&board_id).await {
                Ok(comments) => match self.apply(epoch, &comments) {
                    Ok(()) => {}
                    Err(ClientError::Stale { issued, current }) => {
                        debug!(%board_id, issued, current, "sync: dropped stale result");
                    }
                    Err(err) => warn!(%board_id, %err, "sync: render rejected"),
                },
                Err(err) => warn!(%board_id, epoch, %err, "sync: poll failed"),
            }
        }
    }

    fn apply(&self, epoch: u64, comments: &[Comment]) -> Result<()> {
        let mut state = lock(&self.state);
        if state.epoch != epoch {
            return Err(ClientError::Stale {
                issued: epoch,
                current: state.epoch,
            });
        }
        if *self.display.borrow() != DisplayState::View {
            return Err(ClientError::Stale {
                issued: epoch,
                current: state.epoch,
            });
        }

        if comments.is_empty() {
            self.presenter.show_empty_state();
        } else {
            self.presenter.render_comment_list(comments);
        }
        state.last_rendered_count = Some(comments.len());
        debug!(epoch, count = comments.len(), "sync: rendered comments");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;
