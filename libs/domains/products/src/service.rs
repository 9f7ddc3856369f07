use std::sync::Arc;
use tracing::warn;
use validator::Validate;

use crate::category::CategoryProvider;
use crate::error::{ProductError, ProductResult};
use crate::events::ChangePublisher;
use crate::models::{Product, ProductChanged, ProductDto, ProductInput};
use crate::repository::ProductRepository;

/// Service layer for product business logic.
///
/// Orchestrates the repository, the category-name enrichment, and the
/// best-effort product-changed events. Both the HTTP handlers and the
/// order consumer write through this layer.
pub struct ProductService<R, C>
where
    R: ProductRepository,
    C: CategoryProvider,
{
    repository: Arc<R>,
    categories: Arc<C>,
    publisher: Option<Arc<dyn ChangePublisher>>,
}

impl<R, C> Clone for ProductService<R, C>
where
    R: ProductRepository,
    C: CategoryProvider,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            categories: Arc::clone(&self.categories),
            publisher: self.publisher.clone(),
        }
    }
}

impl<R, C> ProductService<R, C>
where
    R: ProductRepository,
    C: CategoryProvider,
{
    pub fn new(repository: R, categories: C) -> Self {
        Self {
            repository: Arc::new(repository),
            categories: Arc::new(categories),
            publisher: None,
        }
    }

    /// Attach a change-event publisher. Without one, create/update skip
    /// event publishing entirely.
    pub fn with_publisher(mut self, publisher: Arc<dyn ChangePublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// List all products, enriching each with its category name.
    pub async fn list(&self, token: Option<&str>) -> ProductResult<Vec<ProductDto>> {
        let products = self.repository.list().await?;
        Ok(self.enrich_all(products, token).await)
    }

    /// List products in one category, enriched.
    pub async fn list_by_category(
        &self,
        category_id: i32,
        token: Option<&str>,
    ) -> ProductResult<Vec<ProductDto>> {
        let products = self.repository.list_by_category(category_id).await?;
        Ok(self.enrich_all(products, token).await)
    }

    /// Get a product by ID, enriched with its category name.
    pub async fn get(&self, id: i32, token: Option<&str>) -> ProductResult<ProductDto> {
        let product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        Ok(self.enrich(product, token).await)
    }

    /// Un-enriched lookup, used by the order consumer.
    pub async fn find(&self, id: i32) -> ProductResult<Option<Product>> {
        self.repository.find_by_id(id).await
    }

    /// Create a product, publish a change event (best-effort), then enrich
    /// the response.
    pub async fn create(
        &self,
        input: ProductInput,
        token: Option<&str>,
    ) -> ProductResult<ProductDto> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let product = self.repository.insert(input).await?;
        self.publish_changed(&product).await;

        Ok(self.enrich(product, token).await)
    }

    /// Replace a product's fields, publishing a change event (best-effort).
    pub async fn update(&self, id: i32, input: ProductInput) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let product = self
            .repository
            .update(id, input)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        self.publish_changed(&product).await;
        Ok(product)
    }

    /// Hard-delete a product.
    pub async fn delete(&self, id: i32) -> ProductResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }

    async fn enrich(&self, product: Product, token: Option<&str>) -> ProductDto {
        let category_name = self
            .categories
            .category_name(product.category_id, token)
            .await;
        ProductDto::from_product(product, category_name)
    }

    async fn enrich_all(&self, products: Vec<Product>, token: Option<&str>) -> Vec<ProductDto> {
        // One lookup per product; the category service has no batch read
        let mut dtos = Vec::with_capacity(products.len());
        for product in products {
            dtos.push(self.enrich(product, token).await);
        }
        dtos
    }

    async fn publish_changed(&self, product: &Product) {
        let Some(publisher) = &self.publisher else {
            return;
        };

        let event = ProductChanged::snapshot(product);
        if let Err(e) = publisher.publish_changed(&event).await {
            warn!(
                product_id = product.id,
                error = %e,
                "Failed to publish product-changed event"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::MockCategoryProvider;
    use crate::events::MockChangePublisher;
    use crate::repository::MockProductRepository;
    use amqp_bus::BusError;
    use rust_decimal::Decimal;

    fn sample_product(id: i32, stock: i32) -> Product {
        Product {
            id,
            name: "Keyboard".to_string(),
            description: Some("Mechanical".to_string()),
            price: Decimal::new(4999, 2),
            stock,
            image_url: None,
            category_id: 3,
        }
    }

    fn sample_input() -> ProductInput {
        ProductInput {
            name: "Keyboard".to_string(),
            description: Some("Mechanical".to_string()),
            price: Decimal::new(4999, 2),
            stock: 10,
            image_url: None,
            category_id: 3,
        }
    }

    #[tokio::test]
    async fn test_create_returns_enriched_dto() {
        let mut repo = MockProductRepository::new();
        repo.expect_insert()
            .returning(|_| Ok(sample_product(1, 10)));

        let mut categories = MockCategoryProvider::new();
        categories
            .expect_category_name()
            .returning(|_, _| "Electronics".to_string());

        let service = ProductService::new(repo, categories);
        let dto = service.create(sample_input(), Some("token")).await.unwrap();

        assert_eq!(dto.id, 1);
        assert_eq!(dto.category_name, "Electronics");
        assert_eq!(dto.stock, 10);
    }

    #[tokio::test]
    async fn test_create_publishes_snapshot_event() {
        let mut repo = MockProductRepository::new();
        repo.expect_insert()
            .returning(|_| Ok(sample_product(1, 10)));

        let mut categories = MockCategoryProvider::new();
        categories
            .expect_category_name()
            .returning(|_, _| String::new());

        let mut publisher = MockChangePublisher::new();
        publisher
            .expect_publish_changed()
            .withf(|event| {
                event.product_id == 1
                    && event.price == Decimal::new(4999, 2)
                    && event.category_id == 3
            })
            .times(1)
            .returning(|_| Ok(()));

        let service =
            ProductService::new(repo, categories).with_publisher(Arc::new(publisher));

        service.create(sample_input(), None).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_succeeds_when_publish_fails() {
        let mut repo = MockProductRepository::new();
        repo.expect_insert()
            .returning(|_| Ok(sample_product(1, 10)));

        let mut categories = MockCategoryProvider::new();
        categories
            .expect_category_name()
            .returning(|_, _| String::new());

        let mut publisher = MockChangePublisher::new();
        publisher
            .expect_publish_changed()
            .returning(|_| Err(BusError::Processing("broker down".to_string())));

        let service =
            ProductService::new(repo, categories).with_publisher(Arc::new(publisher));

        let dto = service.create(sample_input(), None).await.unwrap();
        assert_eq!(dto.id, 1);
    }

    #[tokio::test]
    async fn test_enrichment_failure_degrades_to_empty_name() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(sample_product(1, 10))));

        let mut categories = MockCategoryProvider::new();
        categories
            .expect_category_name()
            .returning(|_, _| String::new());

        let service = ProductService::new(repo, categories);
        let dto = service.get(1, None).await.unwrap();

        assert_eq!(dto.category_name, "");
    }

    #[tokio::test]
    async fn test_get_missing_returns_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = ProductService::new(repo, MockCategoryProvider::new());
        let result = service.get(42, None).await;

        assert!(matches!(result, Err(ProductError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_update_missing_returns_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_update().returning(|_, _| Ok(None));

        let service = ProductService::new(repo, MockCategoryProvider::new());
        let result = service.update(42, sample_input()).await;

        assert!(matches!(result, Err(ProductError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_update_publishes_event() {
        let mut repo = MockProductRepository::new();
        repo.expect_update()
            .returning(|_, _| Ok(Some(sample_product(1, 6))));

        let mut publisher = MockChangePublisher::new();
        publisher
            .expect_publish_changed()
            .withf(|event| event.product_id == 1)
            .times(1)
            .returning(|_| Ok(()));

        let service = ProductService::new(repo, MockCategoryProvider::new())
            .with_publisher(Arc::new(publisher));

        let product = service.update(1, sample_input()).await.unwrap();
        assert_eq!(product.stock, 6);
    }

    #[tokio::test]
    async fn test_delete_missing_returns_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let service = ProductService::new(repo, MockCategoryProvider::new());
        let result = service.delete(42).await;

        assert!(matches!(result, Err(ProductError::NotFound(42))));
    }
}
