use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ProductResult;
use crate::models::{Product, ProductInput};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// List all products
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// List products referencing a category
    async fn list_by_category(&self, category_id: i32) -> ProductResult<Vec<Product>>;

    /// Get a product by ID
    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    /// Insert a new product; the store assigns the identity key
    async fn insert(&self, input: ProductInput) -> ProductResult<Product>;

    /// Replace a product's mutable fields. Returns None when the ID does
    /// not exist.
    async fn update(&self, id: i32, input: ProductInput) -> ProductResult<Option<Product>>;

    /// Delete a product by ID. Returns whether a row was removed.
    async fn delete(&self, id: i32) -> ProductResult<bool>;
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<i32, Product>>>,
    next_id: AtomicI32,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI32::new(0),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products.values().cloned().collect();
        result.sort_by_key(|p| p.id);

        Ok(result)
    }

    async fn list_by_category(&self, category_id: i32) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect();
        result.sort_by_key(|p| p.id);

        Ok(result)
    }

    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn insert(&self, input: ProductInput) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let product = Product {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            image_url: input.image_url,
            category_id: input.category_id,
        };
        products.insert(id, product.clone());

        tracing::info!(product_id = %id, "Created product");
        Ok(product)
    }

    async fn update(&self, id: i32, input: ProductInput) -> ProductResult<Option<Product>> {
        let mut products = self.products.write().await;

        let Some(product) = products.get_mut(&id) else {
            return Ok(None);
        };

        product.name = input.name;
        product.description = input.description;
        product.price = input.price;
        product.stock = input.stock;
        product.image_url = input.image_url;
        product.category_id = input.category_id;

        tracing::info!(product_id = %id, "Updated product");
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
