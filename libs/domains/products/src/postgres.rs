use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryOrder,
    TransactionTrait,
};
use tokio_util::sync::CancellationToken;

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{NewProduct, Product},
    repository::{ProductRepository, ProductUnitOfWork, cancellable},
};

/// PostgreSQL-backed repository. Each unit of work is one database
/// transaction; dropping it without a commit rolls the transaction back.
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn begin(&self, cancel: &CancellationToken) -> ProductResult<Box<dyn ProductUnitOfWork>> {
        let txn = cancellable(cancel, async { Ok(self.db.begin().await?) }).await?;
        Ok(Box::new(PgProductUnitOfWork {
            txn: Some(txn),
            cancel: cancel.clone(),
        }))
    }
}

struct PgProductUnitOfWork {
    txn: Option<DatabaseTransaction>,
    cancel: CancellationToken,
}

impl PgProductUnitOfWork {
    fn txn(&self) -> ProductResult<&DatabaseTransaction> {
        self.txn
            .as_ref()
            .ok_or_else(|| ProductError::Internal("unit of work already committed".into()))
    }
}

#[async_trait]
impl ProductUnitOfWork for PgProductUnitOfWork {
    async fn get_all(&mut self) -> ProductResult<Vec<Product>> {
        let txn = self.txn()?;
        let models = cancellable(&self.cancel, async {
            Ok(entity::Entity::find()
                .order_by_asc(entity::Column::Id)
                .all(txn)
                .await?)
        })
        .await?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn get_by_id(&mut self, id: i32) -> ProductResult<Option<Product>> {
        let txn = self.txn()?;
        let model = cancellable(&self.cancel, async {
            Ok(entity::Entity::find_by_id(id).one(txn).await?)
        })
        .await?;

        Ok(model.map(Product::from))
    }

    async fn add(&mut self, product: NewProduct) -> ProductResult<Product> {
        let txn = self.txn()?;
        let active_model = entity::ActiveModel::from(product);
        let model = cancellable(&self.cancel, async { Ok(active_model.insert(txn).await?) }).await?;

        tracing::debug!(product_id = model.id, "Staged product insert");
        Ok(model.into())
    }

    async fn update(&mut self, product: &Product) -> ProductResult<()> {
        let txn = self.txn()?;
        let id = product.id;
        let active_model = entity::ActiveModel::from(product);
        cancellable(&self.cancel, async {
            // No row matched: removed since it was read
            active_model.update(txn).await.map_err(|e| match e {
                DbErr::RecordNotUpdated => ProductError::NotFound(id),
                other => other.into(),
            })
        })
        .await?;
        Ok(())
    }

    async fn remove(&mut self, product: &Product) -> ProductResult<()> {
        let txn = self.txn()?;
        let id = product.id;
        cancellable(&self.cancel, async {
            Ok(entity::Entity::delete_by_id(id).exec(txn).await?)
        })
        .await?;
        Ok(())
    }

    async fn commit(&mut self) -> ProductResult<()> {
        if self.cancel.is_cancelled() {
            return Err(ProductError::Cancelled);
        }
        let txn = self
            .txn
            .take()
            .ok_or_else(|| ProductError::Internal("unit of work already committed".into()))?;
        txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn model(id: i32, name: &str) -> entity::Model {
        entity::Model {
            id,
            name: name.to_string(),
            description: String::new(),
            price: dec!(9.99),
            stock: 5,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_reads_go_through_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, "Widget"), model(2, "Gadget")]])
            .append_query_results([vec![model(2, "Gadget")]])
            .into_connection();
        let repo = PgProductRepository::new(db);
        let cancel = CancellationToken::new();

        let mut uow = repo.begin(&cancel).await.unwrap();
        let all = uow.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Widget");

        let found = uow.get_by_id(2).await.unwrap().unwrap();
        assert_eq!(found.name, "Gadget");
        uow.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_and_commit() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let mut uow = repo.begin(&CancellationToken::new()).await.unwrap();
        uow.remove(&model(1, "Widget").into()).await.unwrap();
        uow.commit().await.unwrap();
        assert!(matches!(uow.commit().await, Err(ProductError::Internal(_))));
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let mut uow = repo.begin(&CancellationToken::new()).await.unwrap();
        let err = uow.update(&model(4, "Gone").into()).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(4)));
    }

    #[tokio::test]
    async fn test_cancelled_before_begin() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgProductRepository::new(db);
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert!(matches!(repo.begin(&cancel).await, Err(ProductError::Cancelled)));
    }
}
