use std::sync::{Arc, PoisonError, RwLock};

use crate::dataset::Dataset;

/// The dataset currently served. Readers clone the `Arc` and never block a
/// replacement for longer than the pointer swap.
#[derive(Debug, Default)]
pub struct Snapshot {
    current: RwLock<Option<Arc<Dataset>>>,
}

impl Snapshot {
    pub fn new(dataset: Option<Dataset>) -> Self {
        Self {
            current: RwLock::new(dataset.map(Arc::new)),
        }
    }

    pub fn current(&self) -> Option<Arc<Dataset>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace(&self, dataset: Dataset) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(dataset));
    }
}
