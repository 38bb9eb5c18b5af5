use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::factory::ProductFactory;
use crate::models::{CreateProduct, Patch, PatchProduct, Product, ProductView, ReplaceProduct};
use crate::repository::{ProductRepository, ProductUnitOfWork};
use crate::validation::{self, FieldViolations};

/// Service layer for Product business logic
///
/// Each operation runs in its own unit of work. A failure at any step drops
/// the unit of work, so nothing it staged becomes visible.
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Every product, id ascending
    #[instrument(skip(self, cancel))]
    pub async fn list(&self, cancel: &CancellationToken) -> ProductResult<Vec<Product>> {
        let mut uow = self.repository.begin(cancel).await?;
        uow.get_all().await
    }

    /// Get a product by ID
    #[instrument(skip(self, cancel))]
    pub async fn get(&self, id: i32, cancel: &CancellationToken) -> ProductResult<ProductView> {
        FieldViolations::new()
            .check("id", validation::validate_id(id))
            .finish()?;

        let mut uow = self.repository.begin(cancel).await?;
        let product = uow.get_by_id(id).await?.ok_or(ProductError::NotFound(id))?;
        Ok(product.into())
    }

    /// Create a new product
    #[instrument(skip(self, input, cancel), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: CreateProduct,
        cancel: &CancellationToken,
    ) -> ProductResult<Product> {
        let name = input.name.trim().to_string();
        let description = input.description.trim().to_string();
        check_fields(&name, &description, &input.price, &input.stock)?;

        let new_product = ProductFactory::create(name, description, input.price, input.stock)?;

        let mut uow = self.repository.begin(cancel).await?;
        let product = uow.add(new_product).await?;
        commit(uow.as_mut(), cancel).await?;

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    /// Overwrite every mutable field of a product
    #[instrument(skip(self, input, cancel))]
    pub async fn replace(
        &self,
        id: i32,
        input: ReplaceProduct,
        cancel: &CancellationToken,
    ) -> ProductResult<Product> {
        let mut uow = self.repository.begin(cancel).await?;
        let mut product = uow.get_by_id(id).await?.ok_or(ProductError::NotFound(id))?;

        let name = input.name.trim().to_string();
        let description = input.description.trim().to_string();
        check_fields(&name, &description, &input.price, &input.stock)?;

        product.name = name;
        product.description = description;
        product.price = input.price;
        product.stock = input.stock;

        uow.update(&product).await?;
        commit(uow.as_mut(), cancel).await?;

        tracing::info!(product_id = id, "Replaced product");
        Ok(product)
    }

    /// Overwrite only the supplied fields of a product
    #[instrument(skip(self, input, cancel))]
    pub async fn patch(
        &self,
        id: i32,
        input: PatchProduct,
        cancel: &CancellationToken,
    ) -> ProductResult<Product> {
        let mut uow = self.repository.begin(cancel).await?;
        let mut product = uow.get_by_id(id).await?.ok_or(ProductError::NotFound(id))?;

        if input.is_empty() {
            return Ok(product);
        }

        let name = trimmed(input.name);
        let description = trimmed(input.description);

        let mut violations = FieldViolations::new();
        if let Patch::Present(name) = &name {
            violations.check("name", validation::validate_name(name));
        }
        if let Patch::Present(description) = &description {
            violations.check("description", validation::validate_description(description));
        }
        if let Patch::Present(price) = &input.price {
            violations.check("price", validation::validate_price(price));
        }
        if let Patch::Present(stock) = &input.stock {
            violations.check("stock", validation::validate_stock(*stock));
        }
        violations.finish()?;

        if let Patch::Present(name) = name {
            product.name = name;
        }
        if let Patch::Present(description) = description {
            product.description = description;
        }
        if let Patch::Present(price) = input.price {
            product.price = price;
        }
        if let Patch::Present(stock) = input.stock {
            product.stock = stock;
        }

        uow.update(&product).await?;
        commit(uow.as_mut(), cancel).await?;

        tracing::info!(product_id = id, "Patched product");
        Ok(product)
    }

    /// Delete a product. Returns false when there was nothing to delete.
    #[instrument(skip(self, cancel))]
    pub async fn remove(&self, id: i32, cancel: &CancellationToken) -> ProductResult<bool> {
        let mut uow = self.repository.begin(cancel).await?;
        let Some(product) = uow.get_by_id(id).await? else {
            return Ok(false);
        };

        uow.remove(&product).await?;
        commit(uow.as_mut(), cancel).await?;

        tracing::info!(product_id = id, "Deleted product");
        Ok(true)
    }
}

fn check_fields(
    name: &str,
    description: &str,
    price: &rust_decimal::Decimal,
    stock: &i32,
) -> ProductResult<()> {
    FieldViolations::new()
        .check("name", validation::validate_name(name))
        .check("description", validation::validate_description(description))
        .check("price", validation::validate_price(price))
        .check("stock", validation::validate_stock(*stock))
        .finish()
}

fn trimmed(value: Patch<String>) -> Patch<String> {
    match value {
        Patch::Present(s) => Patch::Present(s.trim().to_string()),
        Patch::Absent => Patch::Absent,
    }
}

// Last chance to observe cancellation; after this the writes are durable.
async fn commit(
    uow: &mut dyn ProductUnitOfWork,
    cancel: &CancellationToken,
) -> ProductResult<()> {
    if cancel.is_cancelled() {
        return Err(ProductError::Cancelled);
    }
    uow.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewProduct;
    use crate::repository::{
        InMemoryProductRepository, MockProductRepository, MockProductUnitOfWork,
    };
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn service() -> (ProductService<InMemoryProductRepository>, InMemoryProductRepository) {
        let repo = InMemoryProductRepository::new();
        (ProductService::new(repo.clone()), repo)
    }

    fn create_input(name: &str, price: Decimal, stock: i32) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: String::new(),
            price,
            stock,
        }
    }

    fn fields(err: ProductError) -> axum_helpers::FieldErrors {
        match err {
            ProductError::Validation(fields) => fields,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_trims_and_assigns_id() {
        let (service, _) = service();
        let cancel = CancellationToken::new();

        let input = CreateProduct {
            name: "  Widget  ".into(),
            description: " A small widget ".into(),
            price: dec!(9.99),
            stock: 5,
        };
        let product = service.create(input, &cancel).await.unwrap();

        assert!(product.id > 0);
        assert_eq!(product.name, "Widget");
        assert_eq!(product.description, "A small widget");
        assert!(product.created_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_create_names_every_bad_field() {
        let (service, repo) = service();
        let err = service
            .create(create_input("ab", dec!(0), -1), &CancellationToken::new())
            .await
            .unwrap_err();

        let fields = fields(err);
        assert_eq!(
            fields.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["name", "price", "stock"]
        );
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_rejects_non_positive_id() {
        let (service, _) = service();
        let err = service.get(0, &CancellationToken::new()).await.unwrap_err();
        assert_eq!(fields(err)["id"], vec!["Id must be greater than zero."]);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (service, _) = service();
        let err = service.get(99, &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(99)));
        assert_eq!(err.to_string(), "Product with ID '99' was not found");
    }

    #[tokio::test]
    async fn test_get_returns_view() {
        let (service, _) = service();
        let cancel = CancellationToken::new();
        let created = service
            .create(create_input("Widget", dec!(9.99), 0), &cancel)
            .await
            .unwrap();

        let view = service.get(created.id, &cancel).await.unwrap();
        assert_eq!(view.name, "Widget");
        assert!(!view.in_stock);
    }

    #[tokio::test]
    async fn test_list_in_id_order() {
        let (service, _) = service();
        let cancel = CancellationToken::new();
        for name in ["Widget", "Gadget", "Gizmo"] {
            service
                .create(create_input(name, dec!(1.00), 1), &cancel)
                .await
                .unwrap();
        }

        let products = service.list(&cancel).await.unwrap();
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Widget", "Gadget", "Gizmo"]);
    }

    #[tokio::test]
    async fn test_patch_stock_only() {
        let (service, _) = service();
        let cancel = CancellationToken::new();
        let created = service
            .create(create_input("Widget", dec!(9.99), 5), &cancel)
            .await
            .unwrap();

        let patch = PatchProduct {
            stock: Patch::Present(10),
            ..Default::default()
        };
        let patched = service.patch(created.id, patch, &cancel).await.unwrap();

        assert_eq!(patched.stock, 10);
        assert_eq!(patched.id, created.id);
        assert_eq!(patched.name, created.name);
        assert_eq!(patched.description, created.description);
        assert_eq!(patched.price, created.price);
        assert_eq!(patched.created_at, created.created_at);
    }

    async fn assert_replace_rejected(field: &str, input: ReplaceProduct) {
        let (service, _) = service();
        let cancel = CancellationToken::new();
        let created = service
            .create(
                CreateProduct {
                    name: "Widget".into(),
                    description: "A small widget".into(),
                    price: dec!(9.99),
                    stock: 5,
                },
                &cancel,
            )
            .await
            .unwrap();

        let err = service.replace(created.id, input, &cancel).await.unwrap_err();
        let fields = fields(err);
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec![field]);

        let view = service.get(created.id, &cancel).await.unwrap();
        assert_eq!(view, ProductView::from(created));
    }

    #[tokio::test]
    async fn test_replace_with_bad_price_leaves_product_unchanged() {
        assert_replace_rejected(
            "price",
            ReplaceProduct {
                name: "Gizmo".into(),
                description: "Changed".into(),
                price: dec!(0),
                stock: 7,
            },
        )
        .await;
    }

    #[tokio::test]
    async fn test_replace_with_negative_stock_leaves_product_unchanged() {
        assert_replace_rejected(
            "stock",
            ReplaceProduct {
                name: "Gizmo".into(),
                description: "Changed".into(),
                price: dec!(19.99),
                stock: -1,
            },
        )
        .await;
    }

    #[tokio::test]
    async fn test_patch_with_bad_price_changes_nothing() {
        let (service, _) = service();
        let cancel = CancellationToken::new();
        let created = service
            .create(create_input("Widget", dec!(9.99), 5), &cancel)
            .await
            .unwrap();

        let patch = PatchProduct {
            name: Patch::Present("Renamed".into()),
            price: Patch::Present(dec!(-1)),
            ..Default::default()
        };
        let err = service.patch(created.id, patch, &cancel).await.unwrap_err();
        assert!(fields(err).contains_key("price"));

        let view = service.get(created.id, &cancel).await.unwrap();
        assert_eq!(view.name, "Widget");
        assert_eq!(view.price, dec!(9.99));
    }

    #[tokio::test]
    async fn test_repeated_patch_is_idempotent() {
        let (service, _) = service();
        let cancel = CancellationToken::new();
        let created = service
            .create(create_input("Widget", dec!(9.99), 5), &cancel)
            .await
            .unwrap();

        let patch = PatchProduct {
            description: Patch::Present("Blue".into()),
            ..Default::default()
        };
        let first = service.patch(created.id, patch.clone(), &cancel).await.unwrap();
        let second = service.patch(created.id, patch, &cancel).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_patch_and_replace_missing_are_not_found() {
        let (service, _) = service();
        let cancel = CancellationToken::new();

        let err = service
            .patch(5, PatchProduct::default(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::NotFound(5)));

        let replace = ReplaceProduct {
            name: "Widget".into(),
            description: String::new(),
            price: dec!(1),
            stock: 1,
        };
        let err = service.replace(-3, replace, &cancel).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(-3)));
    }

    #[tokio::test]
    async fn test_remove_then_get_is_not_found() {
        let (service, _) = service();
        let cancel = CancellationToken::new();
        let created = service
            .create(create_input("Widget", dec!(9.99), 5), &cancel)
            .await
            .unwrap();

        assert!(service.remove(created.id, &cancel).await.unwrap());
        assert!(matches!(
            service.get(created.id, &cancel).await,
            Err(ProductError::NotFound(_))
        ));
        assert!(!service.remove(created.id, &cancel).await.unwrap());
    }

    #[tokio::test]
    async fn test_widget_lifecycle() {
        let (service, _) = service();
        let cancel = CancellationToken::new();

        let widget = service
            .create(create_input("Widget", dec!(9.99), 5), &cancel)
            .await
            .unwrap();

        let patch = PatchProduct {
            stock: Patch::Present(10),
            ..Default::default()
        };
        service.patch(widget.id, patch, &cancel).await.unwrap();

        let replace = ReplaceProduct {
            name: String::new(),
            description: String::new(),
            price: dec!(9.99),
            stock: 3,
        };
        let err = service.replace(widget.id, replace, &cancel).await.unwrap_err();
        assert_eq!(fields(err)["name"], vec!["Name is required."]);

        let view = service.get(widget.id, &cancel).await.unwrap();
        assert_eq!(view.stock, 10);
        assert_eq!(view.name, "Widget");
    }

    #[tokio::test]
    async fn test_cancelled_create_leaves_store_empty() {
        let (service, repo) = service();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = service
            .create(create_input("Widget", dec!(9.99), 5), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Cancelled));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates_as_internal() {
        let mut repo = MockProductRepository::new();
        repo.expect_begin().returning(|_| {
            let mut uow = MockProductUnitOfWork::new();
            uow.expect_get_all()
                .returning(|| Err(ProductError::Database("connection reset".into())));
            Ok(Box::new(uow) as Box<dyn ProductUnitOfWork>)
        });

        let service = ProductService::new(repo);
        let err = service.list(&CancellationToken::new()).await.unwrap_err();
        assert!(!err.is_business());
    }

    #[tokio::test]
    async fn test_failed_update_never_commits() {
        let existing = NewProduct {
            name: "Widget".into(),
            description: String::new(),
            price: dec!(9.99),
            stock: 5,
            created_at: Utc::now(),
        }
        .with_id(1);

        let mut repo = MockProductRepository::new();
        repo.expect_begin().returning(move |_| {
            let mut uow = MockProductUnitOfWork::new();
            let found = existing.clone();
            uow.expect_get_by_id()
                .returning(move |_| Ok(Some(found.clone())));
            uow.expect_update()
                .returning(|_| Err(ProductError::Database("deadlock detected".into())));
            uow.expect_commit().never();
            Ok(Box::new(uow) as Box<dyn ProductUnitOfWork>)
        });

        let service = ProductService::new(repo);
        let patch = PatchProduct {
            stock: Patch::Present(7),
            ..Default::default()
        };
        let err = service
            .patch(1, patch, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Database(_)));
    }

    #[tokio::test]
    async fn test_cancellation_before_commit_skips_commit() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();

        let mut repo = MockProductRepository::new();
        repo.expect_begin().returning(move |_| {
            let mut uow = MockProductUnitOfWork::new();
            let trigger = trigger.clone();
            uow.expect_add().returning(move |product| {
                trigger.cancel();
                Ok(product.with_id(1))
            });
            uow.expect_commit().never();
            Ok(Box::new(uow) as Box<dyn ProductUnitOfWork>)
        });

        let service = ProductService::new(repo);
        let err = service
            .create(create_input("Widget", dec!(9.99), 5), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::Cancelled));
    }
}
