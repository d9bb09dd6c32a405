//! Plumbing shared by the handlers: loading, saving and publishing.

use std::sync::Arc;

use crate::domain::cart::{Cart, CartError, CartEvent};
use crate::domain::catalog::{CatalogError, CatalogEvent, Vault};
use crate::domain::foundation::{CartId, CommandMetadata, DomainError, EventEnvelope};
use crate::ports::{CartRepository, EventPublisher, VaultRepository};

use super::{HandlerError, WriteLocks};

pub(crate) fn cart_envelopes(events: &[CartEvent]) -> Result<Vec<EventEnvelope>, DomainError> {
    events.iter().map(CartEvent::to_envelope).collect()
}

pub(crate) fn catalog_envelopes(
    events: &[CatalogEvent],
) -> Result<Vec<EventEnvelope>, DomainError> {
    events.iter().map(CatalogEvent::to_envelope).collect()
}

/// Stamps every envelope with one shared correlation ID and publishes them.
pub(crate) async fn publish_envelopes(
    publisher: &dyn EventPublisher,
    metadata: &CommandMetadata,
    envelopes: Vec<EventEnvelope>,
) -> Result<(), HandlerError> {
    if envelopes.is_empty() {
        return Ok(());
    }
    let metadata = metadata.resolved();
    let stamped = envelopes.into_iter().map(|e| metadata.stamp(e)).collect();
    publisher.publish_all(stamped).await?;
    Ok(())
}

pub(crate) async fn load_cart(
    carts: &dyn CartRepository,
    cart_id: CartId,
) -> Result<Cart, HandlerError> {
    carts
        .find_by_id(cart_id)
        .await?
        .ok_or(HandlerError::CartNotFound(cart_id))
}

/// Runs one cart mutation: lock, load, apply, save, publish.
#[derive(Clone)]
pub(crate) struct CartWriter {
    carts: Arc<dyn CartRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    locks: Arc<WriteLocks>,
}

impl CartWriter {
    pub(crate) fn new(
        carts: Arc<dyn CartRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        locks: Arc<WriteLocks>,
    ) -> Self {
        Self {
            carts,
            event_publisher,
            locks,
        }
    }

    /// Applies `apply` to the stored cart under its write lock.
    ///
    /// A rejected mutation leaves storage untouched. Returns the updated
    /// cart (with its events drained) and whatever `apply` produced.
    pub(crate) async fn modify<T, F>(
        &self,
        cart_id: CartId,
        metadata: &CommandMetadata,
        operation: &'static str,
        apply: F,
    ) -> Result<(Cart, T), HandlerError>
    where
        F: FnOnce(&mut Cart) -> Result<T, CartError>,
    {
        let _guard = self.locks.lock_cart(cart_id).await;
        let mut cart = load_cart(self.carts.as_ref(), cart_id).await?;

        let value = apply(&mut cart).map_err(|err| {
            tracing::warn!(cart_id = %cart_id, operation, error = %err, "Cart command rejected");
            err
        })?;

        let events = cart.take_events();
        if events.is_empty() {
            tracing::debug!(cart_id = %cart_id, operation, "Cart command changed nothing");
            return Ok((cart, value));
        }

        self.carts.save(&cart).await?;
        publish_envelopes(
            self.event_publisher.as_ref(),
            metadata,
            cart_envelopes(&events)?,
        )
        .await?;

        tracing::info!(
            cart_id = %cart_id,
            operation,
            events = events.len(),
            status = %cart.status(),
            "Cart updated"
        );
        Ok((cart, value))
    }
}

/// Runs one vault mutation: lock, load, apply, save, publish.
#[derive(Clone)]
pub(crate) struct VaultWriter {
    vault: Arc<dyn VaultRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    locks: Arc<WriteLocks>,
}

impl VaultWriter {
    pub(crate) fn new(
        vault: Arc<dyn VaultRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        locks: Arc<WriteLocks>,
    ) -> Self {
        Self {
            vault,
            event_publisher,
            locks,
        }
    }

    /// Applies `apply` to the stored vault under the vault lock.
    pub(crate) async fn modify<T, F>(
        &self,
        metadata: &CommandMetadata,
        operation: &'static str,
        apply: F,
    ) -> Result<(Vault, T), HandlerError>
    where
        F: FnOnce(&mut Vault) -> Result<T, CatalogError>,
    {
        let _guard = self.locks.lock_vault().await;
        let mut vault = self.vault.load().await?;

        let value = apply(&mut vault).map_err(|err| {
            tracing::warn!(operation, error = %err, "Catalog command rejected");
            err
        })?;

        // Category changes record no event, so the vault is always saved.
        let events = vault.take_events();
        self.vault.save(&vault).await?;
        publish_envelopes(
            self.event_publisher.as_ref(),
            metadata,
            catalog_envelopes(&events)?,
        )
        .await?;

        tracing::info!(operation, events = events.len(), "Catalog updated");
        Ok((vault, value))
    }
}
