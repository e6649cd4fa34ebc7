use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{ProductStore, Result, StoreError, Table};
use crate::product::{Product, ProductId};

/// In-memory store for tests and for running without a data file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RwLock<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Table>> {
        self.table.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Table>> {
        self.table.write().map_err(|_| StoreError::Poisoned)
    }
}

impl ProductStore for MemoryStore {
    fn all(&self) -> Result<Vec<Product>> {
        Ok(self.read()?.all())
    }

    fn find(&self, id: ProductId) -> Result<Product> {
        self.read()?.find(id)
    }

    fn find_by_code(&self, code: &str) -> Result<Option<Product>> {
        Ok(self.read()?.find_by_code(code))
    }

    fn insert(&self, product: Product) -> Result<Product> {
        self.write()?.insert(product)
    }

    fn update(&self, product: Product) -> Result<Product> {
        self.write()?.update(product)
    }

    fn delete(&self, id: ProductId) -> Result<()> {
        self.write()?.delete(id).map(|_| ())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.read()?.count())
    }
}
