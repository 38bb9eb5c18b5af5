use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product};

/// Repository trait for Product persistence
///
/// Every service operation opens one unit of work with [`begin`](Self::begin)
/// and either commits it or drops it. Dropping an uncommitted unit of work
/// discards everything it staged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Open a unit of work bound to `cancel`.
    async fn begin(&self, cancel: &CancellationToken) -> ProductResult<Box<dyn ProductUnitOfWork>>;
}

/// One repository session. Reads see the session's own staged writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductUnitOfWork: Send {
    /// All products, id ascending
    async fn get_all(&mut self) -> ProductResult<Vec<Product>>;

    async fn get_by_id(&mut self, id: i32) -> ProductResult<Option<Product>>;

    /// Stage an insert; the returned product carries its assigned id.
    async fn add(&mut self, product: NewProduct) -> ProductResult<Product>;

    async fn update(&mut self, product: &Product) -> ProductResult<()>;

    async fn remove(&mut self, product: &Product) -> ProductResult<()>;

    /// Make staged writes durable; the unit of work is spent afterwards.
    async fn commit(&mut self) -> ProductResult<()>;
}

/// Race `operation` against `cancel`; cancellation wins ties.
pub(crate) async fn cancellable<T, F>(cancel: &CancellationToken, operation: F) -> ProductResult<T>
where
    F: Future<Output = ProductResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ProductError::Cancelled),
        result = operation => result,
    }
}

#[derive(Debug, Default)]
struct Store {
    products: BTreeMap<i32, Product>,
    next_id: i32,
}

/// In-memory implementation of ProductRepository (for development/testing)
///
/// Ids start at 1 and are never reused, also when a unit of work that
/// reserved one is rolled back.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed product count.
    pub async fn len(&self) -> usize {
        self.store.read().await.products.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn begin(&self, cancel: &CancellationToken) -> ProductResult<Box<dyn ProductUnitOfWork>> {
        if cancel.is_cancelled() {
            return Err(ProductError::Cancelled);
        }
        Ok(Box::new(InMemoryUnitOfWork {
            store: Arc::clone(&self.store),
            cancel: cancel.clone(),
            staged: BTreeMap::new(),
            inserted: BTreeSet::new(),
            committed: false,
        }))
    }
}

enum Staged {
    Upsert(Product),
    Delete,
}

struct InMemoryUnitOfWork {
    store: Arc<RwLock<Store>>,
    cancel: CancellationToken,
    staged: BTreeMap<i32, Staged>,
    // Ids reserved by this unit of work's own `add` calls
    inserted: BTreeSet<i32>,
    committed: bool,
}

impl InMemoryUnitOfWork {
    fn ensure_active(&self) -> ProductResult<()> {
        if self.committed {
            return Err(ProductError::Internal("unit of work already committed".into()));
        }
        if self.cancel.is_cancelled() {
            return Err(ProductError::Cancelled);
        }
        Ok(())
    }
}

#[async_trait]
impl ProductUnitOfWork for InMemoryUnitOfWork {
    async fn get_all(&mut self) -> ProductResult<Vec<Product>> {
        self.ensure_active()?;
        let store = self.store.read().await;

        let mut merged = store.products.clone();
        for (id, change) in &self.staged {
            match change {
                Staged::Upsert(product) => {
                    merged.insert(*id, product.clone());
                }
                Staged::Delete => {
                    merged.remove(id);
                }
            }
        }
        Ok(merged.into_values().collect())
    }

    async fn get_by_id(&mut self, id: i32) -> ProductResult<Option<Product>> {
        self.ensure_active()?;
        match self.staged.get(&id) {
            Some(Staged::Upsert(product)) => Ok(Some(product.clone())),
            Some(Staged::Delete) => Ok(None),
            None => Ok(self.store.read().await.products.get(&id).cloned()),
        }
    }

    async fn add(&mut self, product: NewProduct) -> ProductResult<Product> {
        self.ensure_active()?;
        let id = {
            let mut store = self.store.write().await;
            store.next_id = store
                .next_id
                .checked_add(1)
                .ok_or_else(|| ProductError::Internal("product id space exhausted".into()))?;
            store.next_id
        };

        let product = product.with_id(id);
        self.inserted.insert(id);
        self.staged.insert(id, Staged::Upsert(product.clone()));
        Ok(product)
    }

    async fn update(&mut self, product: &Product) -> ProductResult<()> {
        self.ensure_active()?;
        self.staged.insert(product.id, Staged::Upsert(product.clone()));
        Ok(())
    }

    async fn remove(&mut self, product: &Product) -> ProductResult<()> {
        self.ensure_active()?;
        self.staged.insert(product.id, Staged::Delete);
        Ok(())
    }

    async fn commit(&mut self) -> ProductResult<()> {
        self.ensure_active()?;
        let mut store = self.store.write().await;

        // A product deleted by another unit of work since it was read stays deleted
        for (id, change) in &self.staged {
            if matches!(change, Staged::Upsert(_))
                && !self.inserted.contains(id)
                && !store.products.contains_key(id)
            {
                return Err(ProductError::NotFound(*id));
            }
        }

        for (id, change) in std::mem::take(&mut self.staged) {
            match change {
                Staged::Upsert(product) => {
                    store.products.insert(id, product);
                }
                Staged::Delete => {
                    store.products.remove(&id);
                }
            }
        }
        self.committed = true;
        Ok(())
    }
}
