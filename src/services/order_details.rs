use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, instrument};

use super::orders::{line_total, OrderLineWithProduct, OrderWithCustomer};
use crate::db::DbPool;
use crate::entities::{customer, order, order_detail, product};
use crate::errors::ServiceError;

#[derive(Clone, Debug)]
pub struct OrderDetailInput {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Order line with its parent order (including the order's customer) and
/// product embedded.
#[derive(Debug, Serialize)]
pub struct OrderDetailWithRelations {
    #[serde(flatten)]
    pub line: order_detail::Model,
    pub order: Option<OrderWithCustomer>,
    pub product: Option<product::Model>,
}

#[derive(Debug, Serialize)]
pub struct OrderOption {
    pub id: i64,
    pub display_text: String,
}

#[derive(Debug, Serialize)]
pub struct ProductOption {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
}

/// Reference data for order-line entry forms: active orders and products.
#[derive(Debug, Serialize)]
pub struct OrderDetailLookups {
    pub orders: Vec<OrderOption>,
    pub products: Vec<ProductOption>,
}

/// Service for managing order lines independently of their order
#[derive(Clone)]
pub struct OrderDetailService {
    db: Arc<DbPool>,
}

impl OrderDetailService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<OrderLineWithProduct>, u64), ServiceError> {
        let paginator = order_detail::Entity::find()
            .find_also_related(product::Entity)
            .order_by_asc(order_detail::Column::Id)
            .paginate(&*self.db, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        let items = rows
            .into_iter()
            .map(|(line, product)| OrderLineWithProduct { line, product })
            .collect();
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<OrderDetailWithRelations, ServiceError> {
        let (line, product_row) = order_detail::Entity::find_by_id(id)
            .find_also_related(product::Entity)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order detail not found".to_string()))?;
        let order_row = order::Entity::find_by_id(line.order_id)
            .find_also_related(customer::Entity)
            .one(&*self.db)
            .await?
            .map(|(order, customer)| OrderWithCustomer { order, customer });
        Ok(OrderDetailWithRelations {
            line,
            order: order_row,
            product: product_row,
        })
    }

    /// Active orders and products, shaped for dropdowns.
    #[instrument(skip(self))]
    pub async fn lookups(&self) -> Result<OrderDetailLookups, ServiceError> {
        let orders = order::Entity::find()
            .filter(order::Column::IsActive.eq(true))
            .find_also_related(customer::Entity)
            .order_by_asc(order::Column::Id)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|(order, customer)| OrderOption {
                id: order.id,
                display_text: format!(
                    "Order #{} - {}",
                    order.id,
                    customer.map(|c| c.name).unwrap_or_default()
                ),
            })
            .collect();
        let products = product::Entity::find()
            .filter(product::Column::IsActive.eq(true))
            .order_by_asc(product::Column::Name)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|p| ProductOption {
                id: p.id,
                name: p.name,
                price: p.price,
            })
            .collect();
        Ok(OrderDetailLookups { orders, products })
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        actor: &str,
        input: OrderDetailInput,
    ) -> Result<OrderDetailWithRelations, ServiceError> {
        let txn = self.db.begin().await?;
        ensure_order_exists(&txn, input.order_id).await?;
        ensure_product_exists(&txn, input.product_id).await?;

        let created = order_detail::ActiveModel {
            quantity: Set(input.quantity),
            unit_price: Set(input.unit_price),
            total_price: Set(line_total(input.quantity, input.unit_price)),
            order_id: Set(input.order_id),
            product_id: Set(input.product_id),
            created_by: Set(actor.to_string()),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        refresh_order_total(&txn, actor, input.order_id).await?;
        txn.commit().await?;

        info!(order_detail_id = created.id, "order detail created");
        self.get(created.id).await
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        actor: &str,
        id: i64,
        input: OrderDetailInput,
    ) -> Result<OrderDetailWithRelations, ServiceError> {
        let txn = self.db.begin().await?;
        let existing = order_detail::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order detail not found".to_string()))?;
        ensure_order_exists(&txn, input.order_id).await?;
        ensure_product_exists(&txn, input.product_id).await?;

        let previous_order_id = existing.order_id;
        let mut active: order_detail::ActiveModel = existing.into();
        active.order_id = Set(input.order_id);
        active.product_id = Set(input.product_id);
        active.quantity = Set(input.quantity);
        active.unit_price = Set(input.unit_price);
        active.total_price = Set(line_total(input.quantity, input.unit_price));
        active.updated_by = Set(Some(actor.to_string()));
        if let Err(err) = active.update(&txn).await {
            drop(txn);
            return Err(self.stale_write_error(id, err).await);
        }

        refresh_order_total(&txn, actor, input.order_id).await?;
        if previous_order_id != input.order_id {
            refresh_order_total(&txn, actor, previous_order_id).await?;
        }
        txn.commit().await?;

        info!(order_detail_id = id, "order detail updated");
        self.get(id).await
    }

    /// Hard delete; the parent order total is refreshed in the same
    /// transaction.
    #[instrument(skip(self))]
    pub async fn delete(&self, actor: &str, id: i64) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        let existing = order_detail::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order detail not found".to_string()))?;
        let order_id = existing.order_id;
        existing.delete(&txn).await?;
        refresh_order_total(&txn, actor, order_id).await?;
        txn.commit().await?;
        info!(order_detail_id = id, "order detail deleted");
        Ok(())
    }

    async fn stale_write_error(&self, id: i64, err: DbErr) -> ServiceError {
        if !matches!(err, DbErr::RecordNotUpdated) {
            return ServiceError::Database(err);
        }
        match order_detail::Entity::find_by_id(id).one(&*self.db).await {
            Ok(None) => ServiceError::NotFound("Order detail not found".to_string()),
            Ok(Some(_)) => {
                ServiceError::Conflict("Order detail was modified by another request".to_string())
            }
            Err(db_err) => ServiceError::Database(db_err),
        }
    }
}

async fn ensure_order_exists(txn: &DatabaseTransaction, order_id: i64) -> Result<(), ServiceError> {
    if order::Entity::find_by_id(order_id).one(txn).await?.is_none() {
        return Err(ServiceError::InvalidInput(format!(
            "Order {order_id} does not exist"
        )));
    }
    Ok(())
}

async fn ensure_product_exists(
    txn: &DatabaseTransaction,
    product_id: i64,
) -> Result<(), ServiceError> {
    if product::Entity::find_by_id(product_id)
        .one(txn)
        .await?
        .is_none()
    {
        return Err(ServiceError::InvalidInput(format!(
            "Product {product_id} does not exist"
        )));
    }
    Ok(())
}

/// Re-derive the parent order's `total_amount` from its persisted lines.
async fn refresh_order_total(
    txn: &DatabaseTransaction,
    actor: &str,
    order_id: i64,
) -> Result<(), ServiceError> {
    let lines = order_detail::Entity::find()
        .filter(order_detail::Column::OrderId.eq(order_id))
        .all(txn)
        .await?;
    let total: Decimal = lines.iter().map(|line| line.total_price).sum();

    let Some(order_row) = order::Entity::find_by_id(order_id).one(txn).await? else {
        return Ok(());
    };
    let mut active: order::ActiveModel = order_row.into();
    active.total_amount = Set(total);
    active.updated_by = Set(Some(actor.to_string()));
    active.update(txn).await?;
    Ok(())
}
