use std::collections::BTreeMap;
use thiserror::Error;
use time::OffsetDateTime;

use crate::product::{Product, ProductId};

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("Product code already taken: {0}")]
    DuplicateCode(String),

    #[error("Product has not been saved yet")]
    NotPersisted,

    #[error("Product id out of range: {0}")]
    IdOutOfRange(ProductId),

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse stored product: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence for products. Each call is atomic on its own; callers never
/// hold a store lock across calls.
pub trait ProductStore: Send + Sync {
    /// All products ordered by id.
    fn all(&self) -> Result<Vec<Product>>;

    fn find(&self, id: ProductId) -> Result<Product>;

    fn find_by_code(&self, code: &str) -> Result<Option<Product>>;

    /// Stores a transient product, assigning its id and timestamps.
    fn insert(&self, product: Product) -> Result<Product>;

    /// Overwrites a persisted product, refreshing `updated_at`.
    fn update(&self, product: Product) -> Result<Product>;

    fn delete(&self, id: ProductId) -> Result<()>;

    fn count(&self) -> Result<usize>;
}

/// Ordered rows plus the id sequence, shared by the store implementations.
#[derive(Debug, Clone)]
pub(crate) struct Table {
    rows: BTreeMap<ProductId, Product>,
    next_id: u64,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl Table {
    pub(crate) fn from_rows(rows: Vec<Product>) -> Result<Self> {
        let mut table = Table::default();
        for row in rows {
            let id = row.id.ok_or(StoreError::NotPersisted)?;
            let after = id.get().checked_add(1).ok_or(StoreError::IdOutOfRange(id))?;
            table.next_id = table.next_id.max(after);
            table.rows.insert(id, row);
        }
        Ok(table)
    }

    pub(crate) fn all(&self) -> Vec<Product> {
        self.rows.values().cloned().collect()
    }

    pub(crate) fn find(&self, id: ProductId) -> Result<Product> {
        self.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    pub(crate) fn find_by_code(&self, code: &str) -> Option<Product> {
        self.rows.values().find(|p| p.code == code).cloned()
    }

    pub(crate) fn count(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn insert(&mut self, mut product: Product) -> Result<Product> {
        self.ensure_code_free(&product.code, None)?;

        let id = ProductId::new(self.next_id);
        let after = self
            .next_id
            .checked_add(1)
            .ok_or(StoreError::IdOutOfRange(id))?;

        let now = OffsetDateTime::now_utc();
        product.id = Some(id);
        product.created_at = Some(now);
        product.updated_at = Some(now);

        self.next_id = after;
        self.rows.insert(id, product.clone());
        Ok(product)
    }

    pub(crate) fn update(&mut self, mut product: Product) -> Result<Product> {
        let id = product.id.ok_or(StoreError::NotPersisted)?;
        let created_at = self
            .rows
            .get(&id)
            .ok_or(StoreError::NotFound(id))?
            .created_at;
        self.ensure_code_free(&product.code, Some(id))?;

        product.created_at = created_at;
        product.updated_at = Some(OffsetDateTime::now_utc());

        self.rows.insert(id, product.clone());
        Ok(product)
    }

    pub(crate) fn delete(&mut self, id: ProductId) -> Result<Product> {
        self.rows.remove(&id).ok_or(StoreError::NotFound(id))
    }

    fn ensure_code_free(&self, code: &str, owner: Option<ProductId>) -> Result<()> {
        let taken = self
            .rows
            .values()
            .any(|p| p.code == code && p.id != owner);
        if taken {
            return Err(StoreError::DuplicateCode(code.to_string()));
        }
        Ok(())
    }
}
