//! File-based repositories.
//!
//! Stores the vault and each cart as YAML files under a data directory:
//!
//! ```text
//! <data_dir>/vault.yaml
//! <data_dir>/carts/<cart_id>.yaml
//! ```
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! crash mid-write never leaves a truncated aggregate behind.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::cart::Cart;
use crate::domain::catalog::Vault;
use crate::domain::foundation::{CartId, DomainError, ErrorCode};
use crate::ports::{CartRepository, VaultRepository};

const VAULT_FILE: &str = "vault.yaml";
const CARTS_DIR: &str = "carts";

fn io_error(action: &str, path: &Path, err: std::io::Error) -> DomainError {
    DomainError::storage(format!("Failed to {} {}: {}", action, path.display(), err))
        .with_detail("path", path.display().to_string())
}

async fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), DomainError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error("create", parent, e))?;
    }
    let yaml = serde_yaml::to_string(value)
        .map_err(|e| DomainError::storage(format!("Failed to encode {}: {}", path.display(), e)))?;

    let tmp = path.with_extension("yaml.tmp");
    fs::write(&tmp, yaml)
        .await
        .map_err(|e| io_error("write", &tmp, e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| io_error("replace", path, e))
}

/// Reads and decodes a YAML file; `None` if it does not exist.
async fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, DomainError> {
    let yaml = match fs::read_to_string(path).await {
        Ok(yaml) => yaml,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error("read", path, e)),
    };
    serde_yaml::from_str(&yaml)
        .map(Some)
        .map_err(|e| DomainError::storage(format!("Failed to decode {}: {}", path.display(), e)))
}

/// YAML file storage for the vault.
#[derive(Debug, Clone)]
pub struct FileVaultRepository {
    path: PathBuf,
}

impl FileVaultRepository {
    /// Stores the vault as `vault.yaml` inside `data_dir`.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            path: data_dir.as_ref().join(VAULT_FILE),
        }
    }
}

#[async_trait]
impl VaultRepository for FileVaultRepository {
    async fn load(&self) -> Result<Vault, DomainError> {
        let vault = read_yaml(&self.path).await?;
        if vault.is_none() {
            tracing::debug!(path = %self.path.display(), "No vault file yet, starting empty");
        }
        Ok(vault.unwrap_or_default())
    }

    async fn save(&self, vault: &Vault) -> Result<(), DomainError> {
        write_yaml(&self.path, vault).await?;
        tracing::debug!(path = %self.path.display(), items = vault.item_count(), "Vault saved");
        Ok(())
    }
}

/// YAML file storage for carts, one file per cart.
#[derive(Debug, Clone)]
pub struct FileCartRepository {
    dir: PathBuf,
}

impl FileCartRepository {
    /// Stores carts under `data_dir/carts/`.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            dir: data_dir.as_ref().join(CARTS_DIR),
        }
    }

    fn cart_path(&self, id: CartId) -> PathBuf {
        self.dir.join(format!("{}.yaml", id))
    }
}

#[async_trait]
impl CartRepository for FileCartRepository {
    async fn save(&self, cart: &Cart) -> Result<(), DomainError> {
        write_yaml(&self.cart_path(cart.id()), cart).await?;
        tracing::debug!(cart_id = %cart.id(), "Cart saved");
        Ok(())
    }

    async fn find_by_id(&self, id: CartId) -> Result<Option<Cart>, DomainError> {
        read_yaml(&self.cart_path(id)).await
    }

    async fn find_all(&self) -> Result<Vec<Cart>, DomainError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list", &self.dir, e)),
        };

        let mut carts = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error("list", &self.dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("yaml") {
                continue;
            }
            if let Some(cart) = read_yaml::<Cart>(&path).await? {
                carts.push(cart);
            }
        }
        carts.sort_by_key(|c| std::cmp::Reverse(c.created_at()));
        Ok(carts)
    }

    async fn exists(&self, id: CartId) -> Result<bool, DomainError> {
        fs::try_exists(self.cart_path(id))
            .await
            .map_err(|e| io_error("check", &self.cart_path(id), e))
    }

    async fn delete(&self, id: CartId) -> Result<(), DomainError> {
        let path = self.cart_path(id);
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(cart_id = %id, "Cart file removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DomainError::new(
                ErrorCode::CartNotFound,
                format!("Cart not found: {}", id),
            )),
            Err(e) => Err(io_error("remove", &path, e)),
        }
    }
}
