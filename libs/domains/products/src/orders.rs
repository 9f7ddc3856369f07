//! Order-placed consumer: decrements stock through the service layer.

use amqp_bus::{BusError, QueueProcessor};
use async_trait::async_trait;
use tracing::{info, warn};

use crate::category::CategoryProvider;
use crate::models::{OrderPlaced, ProductInput};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// Handles order-placed events from the queue.
///
/// For each event: resolve the product, check stock, and write the
/// decremented level back through [`ProductService::update`] so the same
/// change event fires as for an HTTP update.
///
/// Deliveries are acknowledged before this runs; an unprocessable event is
/// logged and dropped, never redelivered. Stock is never driven negative:
/// an order for more than the available stock is skipped entirely.
pub struct OrderProcessor<R, C>
where
    R: ProductRepository,
    C: CategoryProvider,
{
    service: ProductService<R, C>,
}

impl<R, C> OrderProcessor<R, C>
where
    R: ProductRepository,
    C: CategoryProvider,
{
    pub fn new(service: ProductService<R, C>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<R, C> QueueProcessor<OrderPlaced> for OrderProcessor<R, C>
where
    R: ProductRepository + 'static,
    C: CategoryProvider + 'static,
{
    async fn process(&self, message: &OrderPlaced) -> Result<(), BusError> {
        info!(
            order_id = message.order_id,
            product_id = message.product_id,
            quantity = message.quantity_ordered,
            "Received order-placed event"
        );

        let product = self
            .service
            .find(message.product_id)
            .await
            .map_err(|e| BusError::Processing(e.to_string()))?;

        let Some(product) = product else {
            warn!(
                order_id = message.order_id,
                product_id = message.product_id,
                "Product not found, dropping order event"
            );
            return Ok(());
        };

        if product.stock < message.quantity_ordered {
            warn!(
                order_id = message.order_id,
                product_id = product.id,
                stock = product.stock,
                requested = message.quantity_ordered,
                "Insufficient stock, dropping order event"
            );
            return Ok(());
        }

        let new_stock = product.stock - message.quantity_ordered;
        let input = ProductInput {
            name: product.name,
            description: product.description,
            price: product.price,
            stock: new_stock,
            image_url: product.image_url,
            category_id: product.category_id,
        };

        self.service
            .update(message.product_id, input)
            .await
            .map_err(|e| BusError::Processing(e.to_string()))?;

        info!(
            order_id = message.order_id,
            product_id = message.product_id,
            new_stock,
            "Stock decremented"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "OrderProcessor"
    }
}
