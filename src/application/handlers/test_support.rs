//! Shared fixture for handler tests: in-memory adapters plus shortcuts that
//! set up state directly in the repositories, without publishing events.

use std::sync::Arc;

use crate::adapters::{InMemoryCartRepository, InMemoryEventBus, InMemoryVaultRepository};
use crate::application::WriteLocks;
use crate::domain::cart::{Cart, CartError};
use crate::domain::foundation::{CartId, CartItemId, ItemId};
use crate::ports::{CartRepository, EventPublisher, VaultRepository};

pub(crate) struct Fixture {
    pub vault_repo: Arc<InMemoryVaultRepository>,
    pub cart_repo: Arc<InMemoryCartRepository>,
    pub bus: Arc<InMemoryEventBus>,
    pub lock_table: Arc<WriteLocks>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            vault_repo: Arc::new(InMemoryVaultRepository::new()),
            cart_repo: Arc::new(InMemoryCartRepository::new()),
            bus: Arc::new(InMemoryEventBus::new()),
            lock_table: Arc::new(WriteLocks::new()),
        }
    }

    pub fn vault(&self) -> Arc<dyn VaultRepository> {
        self.vault_repo.clone()
    }

    pub fn carts(&self) -> Arc<dyn CartRepository> {
        self.cart_repo.clone()
    }

    pub fn publisher(&self) -> Arc<dyn EventPublisher> {
        self.bus.clone()
    }

    pub fn locks(&self) -> Arc<WriteLocks> {
        self.lock_table.clone()
    }

    /// Adds an item filed under "Groceries", priced per "ea".
    pub async fn catalog_item(&self, name: &str, store: &str, price: f64) -> ItemId {
        let mut vault = self.vault_repo.load().await.unwrap();
        let id = vault.add_item(name, "Groceries", store, price, "ea").unwrap();
        self.vault_repo.save(&vault).await.unwrap();
        id
    }

    pub async fn planning_cart(&self, name: &str, budget: f64) -> CartId {
        let cart = Cart::new(name, budget).unwrap();
        self.cart_repo.save(&cart).await.unwrap();
        cart.id()
    }

    pub async fn shopping_cart(&self, name: &str, budget: f64) -> CartId {
        let id = self.planning_cart(name, budget).await;
        self.begin(id).await;
        id
    }

    pub async fn begin(&self, cart_id: CartId) {
        let vault = self.vault_repo.load().await.unwrap();
        self.mutate(cart_id, |cart| cart.begin_shopping(&vault)).await
    }

    pub async fn add_line(&self, cart_id: CartId, item_id: ItemId, quantity: f64) -> CartItemId {
        let vault = self.vault_repo.load().await.unwrap();
        let item = vault.find_item_by_id(item_id).unwrap();
        self.mutate(cart_id, |cart| cart.add_catalog_item(item, quantity, None))
            .await
    }

    pub async fn mutate<T>(
        &self,
        cart_id: CartId,
        apply: impl FnOnce(&mut Cart) -> Result<T, CartError>,
    ) -> T {
        let mut cart = self.stored_cart(cart_id).await;
        let value = apply(&mut cart).unwrap();
        self.cart_repo.save(&cart).await.unwrap();
        value
    }

    pub async fn stored_cart(&self, cart_id: CartId) -> Cart {
        self.cart_repo.find_by_id(cart_id).await.unwrap().unwrap()
    }
}
