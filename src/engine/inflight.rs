use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::{AbortHandle, Abortable};
use uuid::Uuid;

use crate::error::Error;

type Handles = HashMap<Uuid, AbortHandle>;

/// Outbound lookups currently running, so shutdown can cancel them.
#[derive(Debug, Default)]
pub struct InFlight {
    handles: Mutex<Handles>,
    closed: AtomicBool,
}

struct Registration<'a> {
    registry: &'a InFlight,
    id: Uuid,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.registry.handles().remove(&self.id);
    }
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    fn handles(&self) -> MutexGuard<'_, Handles> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.handles().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `lookup` until it completes or `cancel_all` is called.
    pub async fn run<T, F>(&self, lookup: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::cancelled_error());
        }

        let (handle, registration) = AbortHandle::new_pair();
        let id = Uuid::new_v4();
        self.handles().insert(id, handle);
        let _registered = Registration { registry: self, id };

        Abortable::new(lookup, registration).await?
    }

    pub fn cancel_all(&self) {
        self.closed.store(true, Ordering::SeqCst);

        let handles: Vec<AbortHandle> = self.handles().drain().map(|(_, handle)| handle).collect();

        if !handles.is_empty() {
            tracing::info!(count = handles.len(), "cancelling in-flight lookups");
        }

        for handle in handles {
            handle.abort();
        }
    }
}
