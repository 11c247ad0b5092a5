use crate::WorldError;
use diorama_assets::{ModelAsset, load_model};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// A model being loaded on a background thread.
#[derive(Debug)]
pub struct ModelLoad {
    path: PathBuf,
    receiver: Receiver<Result<ModelAsset, WorldError>>,
}

impl ModelLoad {
    pub fn spawn(path: PathBuf) -> Self {
        let (sender, receiver) = mpsc::channel();
        let thread_path = path.clone();
        let spawned = thread::Builder::new()
            .name("model-loader".into())
            .spawn(move || {
                let result = load_model(&thread_path).map_err(WorldError::from);
                // the world may have been dropped in the meantime
                let _ = sender.send(result);
            });
        if let Err(e) = spawned {
            tracing::error!("failed to start model loader: {e}");
        }
        tracing::info!("loading model {} in the background", path.display());
        Self { path, receiver }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Non-blocking check for the load result.
    pub fn poll(&self) -> Option<Result<ModelAsset, WorldError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(WorldError::LoaderStopped)),
        }
    }
}
