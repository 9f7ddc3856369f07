use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{Product, ProductInput},
    repository::ProductRepository,
};

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: sea_orm::DbErr) -> ProductError {
    ProductError::Internal(format!("Database error: {}", e))
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn list_by_category(&self, category_id: i32) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .filter(entity::Column::CategoryId.eq(category_id))
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(|m| m.into()))
    }

    async fn insert(&self, input: ProductInput) -> ProductResult<Product> {
        let active_model: entity::ActiveModel = input.into();

        let model = active_model.insert(&self.db).await.map_err(db_err)?;

        tracing::info!(product_id = %model.id, "Created product");
        Ok(model.into())
    }

    async fn update(&self, id: i32, input: ProductInput) -> ProductResult<Option<Product>> {
        // Explicit read-modify-write; no change tracking and no concurrency
        // token, conflicting writers last-write-wins.
        let existing = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Ok(None);
        }

        let active_model = entity::ActiveModel {
            id: Set(id),
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            stock: Set(input.stock),
            image_url: Set(input.image_url),
            category_id: Set(input.category_id),
        };

        let updated = active_model.update(&self.db).await.map_err(db_err)?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(Some(updated.into()))
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
