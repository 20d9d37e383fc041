//! Background persistence of settled entity locations.
//!
//! The engine issues `save_location` on its hot path; this wrapper turns the
//! write into a channel send and lets a worker thread talk to the real store.
//! A failed write is logged and dropped — in-memory simulation state stays
//! authoritative until the next successful write.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use veldt_core::error::StoreError;
use veldt_core::store::{CharacterRecord, CharacterStore};
use veldt_core::types::Position;

/// One deferred location write.
#[derive(Debug, Clone)]
struct LocationWrite {
    character_id: String,
    scene_id: String,
    position: Position,
}

/// `CharacterStore` wrapper that passes reads through and defers writes to a
/// worker thread.
pub struct DeferredCharacterStore {
    inner: Arc<dyn CharacterStore>,
    tx: Mutex<mpsc::Sender<LocationWrite>>,
}

impl DeferredCharacterStore {
    /// Wrap `inner`, spawning the worker thread that applies writes.
    pub fn spawn(inner: Arc<dyn CharacterStore>) -> Self {
        let (tx, rx) = mpsc::channel::<LocationWrite>();

        let worker_store = Arc::clone(&inner);
        std::thread::Builder::new()
            .name("veldt-persist".into())
            .spawn(move || {
                for write in rx {
                    if let Err(err) = worker_store.save_location(
                        &write.character_id,
                        &write.scene_id,
                        write.position,
                    ) {
                        tracing::warn!(
                            %err,
                            character = %write.character_id,
                            "deferred location write failed"
                        );
                    }
                }
            })
            .expect("Failed to spawn persistence worker thread");

        Self {
            inner,
            tx: Mutex::new(tx),
        }
    }
}

impl CharacterStore for DeferredCharacterStore {
    fn load(&self, character_id: &str) -> Result<CharacterRecord, StoreError> {
        self.inner.load(character_id)
    }

    fn save_location(
        &self,
        character_id: &str,
        scene_id: &str,
        position: Position,
    ) -> Result<(), StoreError> {
        let write = LocationWrite {
            character_id: character_id.to_owned(),
            scene_id: scene_id.to_owned(),
            position,
        };
        if let Ok(tx) = self.tx.lock() {
            let _ = tx.send(write);
        }
        Ok(())
    }
}
