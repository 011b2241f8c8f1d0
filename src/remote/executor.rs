use crate::core::document::Document;
use crate::remote::{ApiError, SharedApi};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Outcome of one remote call, delivered back to the engine's thread.
#[derive(Debug)]
pub enum Completion {
    Loaded(Document),
    LoadFailed(ApiError),
    Saved,
    SaveFailed(ApiError),
}

/// Runs remote calls off the engine thread and hands completions back over
/// a channel. Requests are never de-duplicated or cancelled: re-triggering
/// an action while one is in flight races, and the last completion to be
/// drained wins.
pub struct RemoteExecutor {
    completion_tx: Sender<Completion>,
    completion_rx: Receiver<Completion>,
}

impl RemoteExecutor {
    pub fn new() -> Self {
        let (completion_tx, completion_rx) = mpsc::channel::<Completion>();
        Self {
            completion_tx,
            completion_rx,
        }
    }

    pub fn spawn_get(&self, api: SharedApi, id: String) {
        let completion_tx = self.completion_tx.clone();
        std::thread::spawn(move || {
            let completion = match api.get_record(&id) {
                Ok(document) => Completion::Loaded(document),
                Err(err) => Completion::LoadFailed(err),
            };
            let _ = completion_tx.send(completion);
        });
    }

    pub fn spawn_save(&self, api: SharedApi, document: Document) {
        let completion_tx = self.completion_tx.clone();
        std::thread::spawn(move || {
            let completion = match api.save_record(&document) {
                Ok(()) => Completion::Saved,
                Err(err) => Completion::SaveFailed(err),
            };
            let _ = completion_tx.send(completion);
        });
    }

    pub fn drain_ready(&self) -> Vec<Completion> {
        let mut out = Vec::<Completion>::new();
        loop {
            match self.completion_rx.try_recv() {
                Ok(completion) => out.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}

impl Default for RemoteExecutor {
    fn default() -> Self {
        Self::new()
    }
}
