use std::fs;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::{ProductStore, Result, StoreError, Table};
use crate::product::{Product, ProductId};

/// Products kept in memory and mirrored to a JSON-lines file, one product
/// per line. Every mutation rewrites the whole file via a temp file and a
/// rename, so a crash never leaves a half-written data file behind.
#[derive(Debug)]
pub struct JsonlStore {
    path: PathBuf,
    table: Mutex<Table>,
}

impl JsonlStore {
    /// Opens `path`, treating a missing file as an empty catalog.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let rows = match fs::File::open(&path) {
            Ok(file) => read_rows(BufReader::new(file))?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), products = rows.len(), "opened product file");

        Ok(Self {
            path,
            table: Mutex::new(Table::from_rows(rows)?),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>> {
        self.table.lock().map_err(|_| StoreError::Poisoned)
    }

    fn flush(&self, table: &Table) -> Result<()> {
        let tmp = self.path.with_extension("jsonl.tmp");
        let written = write_rows(&tmp, table)
            .and_then(|()| fs::rename(&tmp, &self.path).map_err(StoreError::from));
        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written
    }

    /// Applies `op` to a scratch copy and only swaps it in once the file is
    /// written, so memory and disk never disagree.
    fn mutate<T>(&self, op: impl FnOnce(&mut Table) -> Result<T>) -> Result<T> {
        let mut table = self.lock()?;
        let mut next = table.clone();
        let out = op(&mut next)?;
        self.flush(&next)?;
        *table = next;
        Ok(out)
    }
}

fn write_rows(path: &Path, table: &Table) -> Result<()> {
    let mut file = fs::File::create(path)?;
    for row in table.all() {
        serde_json::to_writer(&mut file, &row)?;
        file.write_all(b"\n")?;
    }
    file.sync_all()?;
    Ok(())
}

fn read_rows(reader: impl BufRead) -> Result<Vec<Product>> {
    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let product: Product = serde_json::from_str(&line)?;
        rows.push(product);
    }
    Ok(rows)
}

impl ProductStore for JsonlStore {
    fn all(&self) -> Result<Vec<Product>> {
        Ok(self.lock()?.all())
    }

    fn find(&self, id: ProductId) -> Result<Product> {
        self.lock()?.find(id)
    }

    fn find_by_code(&self, code: &str) -> Result<Option<Product>> {
        Ok(self.lock()?.find_by_code(code))
    }

    fn insert(&self, product: Product) -> Result<Product> {
        self.mutate(|table| table.insert(product))
    }

    fn update(&self, product: Product) -> Result<Product> {
        self.mutate(|table| table.update(product))
    }

    fn delete(&self, id: ProductId) -> Result<()> {
        self.mutate(|table| table.delete(id).map(|_| ()))
    }

    fn count(&self) -> Result<usize> {
        Ok(self.lock()?.count())
    }
}
