//! Asynchronous model loading
//!
//! The model file is the only thing the card waits on across real time.
//! Parsing happens on a worker thread that owns no session state; the
//! session polls for the result once per frame on the UI thread, so
//! completion handling is always single-threaded with respect to scene
//! and GPU state.
//!
//! The load is parameterized by a [`LoadToken`]: a capability standing
//! for "this session is still alive". Stopping the session revokes the
//! token, making any later completion a no-op. Combined with the session
//! dropping its [`PendingLoad`] on stop, a load can never attach late to
//! a torn-down scene, no matter how the load and the stop race.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use cgmath::Rad;

use crate::{
    asset::{model::ModelAsset, normalize::NormalizedTransform},
    error::VitrineError,
};

/// Capability token representing a live session
#[derive(Clone, Debug)]
pub struct LoadToken {
    alive: Arc<AtomicBool>,
}

impl LoadToken {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Revokes the token. Idempotent.
    pub fn revoke(&self) {
        self.alive.store(false, Ordering::Release);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

impl Default for LoadToken {
    fn default() -> Self {
        Self::new()
    }
}

/// A loaded asset together with its derived placement transform
pub type LoadedModel = (Box<ModelAsset>, NormalizedTransform);

/// Outcome of polling a pending load
pub enum LoadProgress {
    /// The worker has not finished yet
    Pending,
    /// The normalized asset is ready to attach
    Ready(LoadedModel),
    /// The load failed; the session clears its loading flag and keeps an
    /// empty scene
    Failed(VitrineError),
    /// The owning session stopped; the result (if any) was discarded
    Abandoned,
}

/// A load in flight, owned by exactly one session
pub struct PendingLoad {
    receiver: Receiver<Result<LoadedModel, VitrineError>>,
    token: LoadToken,
}

impl PendingLoad {
    /// Starts loading the model file on a worker thread.
    ///
    /// On success the worker also derives the asset's
    /// [`NormalizedTransform`]; a zero-extent bounding box surfaces as
    /// [`VitrineError::DegenerateAsset`] like any other load failure.
    pub fn spawn(path: PathBuf, target_size: f32, tilt: Rad<f32>, token: LoadToken) -> Self {
        Self::spawn_with(token, move || {
            let asset = ModelAsset::import(&path)?;
            let placement = NormalizedTransform::from_bounds(&asset.bounds, target_size, tilt)?;
            Ok((Box::new(asset), placement))
        })
    }

    /// Runs an arbitrary producer on the worker thread. The indirection
    /// keeps the delivery and abandonment semantics testable without a
    /// model file on disk.
    pub(crate) fn spawn_with<F>(token: LoadToken, load: F) -> Self
    where
        F: FnOnce() -> Result<LoadedModel, VitrineError> + Send + 'static,
    {
        let (sender, receiver) = channel();
        let worker_token = token.clone();

        thread::spawn(move || {
            let result = load();
            if let Err(ref err) = result {
                log::warn!("model load failed: {}", err);
            }
            if worker_token.is_alive() {
                // A failed send means the receiver is gone, which is the
                // session telling us it already stopped.
                let _ = sender.send(result);
            }
        });

        Self { receiver, token }
    }

    /// Polls for completion. Called once per frame from the UI thread.
    pub fn poll(&mut self) -> LoadProgress {
        if !self.token.is_alive() {
            return LoadProgress::Abandoned;
        }

        match self.receiver.try_recv() {
            Ok(Ok(loaded)) => LoadProgress::Ready(loaded),
            Ok(Err(err)) => LoadProgress::Failed(err),
            Err(TryRecvError::Empty) => LoadProgress::Pending,
            Err(TryRecvError::Disconnected) => LoadProgress::Failed(VitrineError::AssetLoad(
                "loader thread exited without a result".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{model::MaterialData, normalize::Aabb};
    use std::time::Duration;

    fn stub_loaded() -> LoadedModel {
        let asset = ModelAsset {
            name: "stub".to_string(),
            nodes: vec![],
            traversal: vec![],
            meshes: vec![],
            materials: vec![MaterialData::default()],
            clips: vec![],
            bounds: Aabb::empty(),
        };
        let placement = NormalizedTransform {
            translation: cgmath::Vector3::new(0.0, 0.0, 0.0),
            scale: 1.0,
            tilt: Rad(0.0),
        };
        (Box::new(asset), placement)
    }

    fn poll_until_settled(pending: &mut PendingLoad) -> LoadProgress {
        for _ in 0..500 {
            match pending.poll() {
                LoadProgress::Pending => std::thread::sleep(Duration::from_millis(2)),
                settled => return settled,
            }
        }
        panic!("load never settled");
    }

    #[test]
    fn test_successful_load_is_delivered() {
        let token = LoadToken::new();
        let mut pending = PendingLoad::spawn_with(token, || Ok(stub_loaded()));

        match poll_until_settled(&mut pending) {
            LoadProgress::Ready((asset, _)) => assert_eq!(asset.name, "stub"),
            _ => panic!("expected a ready asset"),
        }
    }

    #[test]
    fn test_failed_load_is_delivered() {
        let token = LoadToken::new();
        let mut pending =
            PendingLoad::spawn_with(token, || Err(VitrineError::AssetLoad("boom".to_string())));

        match poll_until_settled(&mut pending) {
            LoadProgress::Failed(VitrineError::AssetLoad(msg)) => assert_eq!(msg, "boom"),
            _ => panic!("expected a load failure"),
        }
    }

    #[test]
    fn test_missing_file_reports_load_error() {
        let token = LoadToken::new();
        let mut pending = PendingLoad::spawn(
            PathBuf::from("/definitely/not/a/real/model.glb"),
            1.5,
            Rad(0.0),
            token,
        );

        match poll_until_settled(&mut pending) {
            LoadProgress::Failed(VitrineError::AssetLoad(_)) => {}
            _ => panic!("expected a load failure"),
        }
    }

    #[test]
    fn test_degenerate_bounds_fail_like_any_load() {
        let token = LoadToken::new();
        let mut pending =
            PendingLoad::spawn_with(token, || Err(VitrineError::DegenerateAsset));

        match poll_until_settled(&mut pending) {
            LoadProgress::Failed(VitrineError::DegenerateAsset) => {}
            _ => panic!("expected a degenerate-asset failure"),
        }
    }

    #[test]
    fn test_revoked_token_abandons_completion() {
        let (gate_tx, gate_rx) = channel::<()>();
        let token = LoadToken::new();
        let mut pending = PendingLoad::spawn_with(token.clone(), move || {
            // Hold the worker until the session has stopped
            let _ = gate_rx.recv();
            Ok(stub_loaded())
        });

        token.revoke();
        gate_tx.send(()).unwrap();

        // However the delivery races with the revocation, the completion
        // must never surface as a ready asset.
        for _ in 0..100 {
            match pending.poll() {
                LoadProgress::Abandoned => {}
                LoadProgress::Ready(_) => panic!("stopped session saw a completed load"),
                LoadProgress::Failed(_) | LoadProgress::Pending => {
                    panic!("revoked token must abandon the load")
                }
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let token = LoadToken::new();
        token.revoke();
        token.revoke();
        assert!(!token.is_alive());
    }
}
