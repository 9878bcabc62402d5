//! Atomically swappable read-only snapshots
//!
//! Readers clone the inner `Arc` and keep using it for the rest of their
//! evaluation; writers replace the pointer in one step. A reader therefore
//! sees either the old value or the new one, never a mix.

use crate::error::{Result, RuntimeError};
use std::sync::{Arc, RwLock};

pub struct Snapshot<T> {
    current: RwLock<Arc<T>>,
}

impl<T> Snapshot<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(value)),
        }
    }

    /// Current snapshot
    pub fn load(&self) -> Result<Arc<T>> {
        self.current
            .read()
            .map(|guard| Arc::clone(&guard))
            .map_err(|e| RuntimeError::SnapshotPoisoned(e.to_string()))
    }

    /// Publish a new snapshot, returning the one it replaced
    pub fn store(&self, value: Arc<T>) -> Result<Arc<T>> {
        let mut guard = self
            .current
            .write()
            .map_err(|e| RuntimeError::SnapshotPoisoned(e.to_string()))?;
        Ok(std::mem::replace(&mut *guard, value))
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot").field("current", &self.current).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_load_and_store() {
        let snapshot = Snapshot::new(vec![1, 2, 3]);
        let before = snapshot.load().unwrap();

        let previous = snapshot.store(Arc::new(vec![4])).unwrap();
        assert_eq!(*previous, vec![1, 2, 3]);

        // The reader that loaded earlier still holds the old value
        assert_eq!(*before, vec![1, 2, 3]);
        assert_eq!(*snapshot.load().unwrap(), vec![4]);
    }

    #[test]
    fn test_concurrent_readers_see_whole_values() {
        let snapshot = Arc::new(Snapshot::new(vec![0u32; 64]));
        let writer = {
            let snapshot = Arc::clone(&snapshot);
            thread::spawn(move || {
                for i in 1..200u32 {
                    snapshot.store(Arc::new(vec![i; 64])).unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let snapshot = Arc::clone(&snapshot);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let current = snapshot.load().unwrap();
                        let first = current[0];
                        assert!(current.iter().all(|v| *v == first));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
