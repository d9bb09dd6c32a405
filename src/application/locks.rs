//! Write serialization for aggregates.
//!
//! Every mutation of a cart runs under that cart's lock, and every mutation
//! of the vault under the vault lock. A handler that needs both takes the
//! vault lock first.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::CartId;

/// Per-aggregate async locks shared by all handlers of one process.
#[derive(Debug, Default)]
pub struct WriteLocks {
    vault: Arc<AsyncMutex<()>>,
    carts: Mutex<HashMap<CartId, Arc<AsyncMutex<()>>>>,
}

impl WriteLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive write access to the vault.
    pub async fn lock_vault(&self) -> OwnedMutexGuard<()> {
        Arc::clone(&self.vault).lock_owned().await
    }

    /// Waits for exclusive write access to one cart.
    pub async fn lock_cart(&self, cart_id: CartId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut carts = self.carts.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(carts.entry(cart_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Drops the lock entry of a deleted cart.
    pub fn forget_cart(&self, cart_id: CartId) {
        self.carts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&cart_id);
    }

    /// Number of carts with a lock entry.
    pub fn tracked_carts(&self) -> usize {
        self.carts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
