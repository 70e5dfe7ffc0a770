use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::{customer, order, order_detail, product, OrderStatus};
use crate::errors::ServiceError;

/// One line of an order write request. `id` is `Some` when the line already
/// exists; lines missing from the submitted set are removed on update.
#[derive(Clone, Debug)]
pub struct OrderLineInput {
    pub id: Option<i64>,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Clone, Debug)]
pub struct CreateOrderInput {
    pub customer_id: i64,
    pub order_date: Option<DateTime<Utc>>,
    pub status: Option<OrderStatus>,
    pub lines: Vec<OrderLineInput>,
}

#[derive(Clone, Debug)]
pub struct UpdateOrderInput {
    pub customer_id: i64,
    pub order_date: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub lines: Vec<OrderLineInput>,
}

/// Order row with its customer embedded, as list endpoints return it.
#[derive(Debug, Serialize)]
pub struct OrderWithCustomer {
    #[serde(flatten)]
    pub order: order::Model,
    pub customer: Option<customer::Model>,
}

#[derive(Debug, Serialize)]
pub struct OrderLineWithProduct {
    #[serde(flatten)]
    pub line: order_detail::Model,
    pub product: Option<product::Model>,
}

/// Full order graph: header, customer and lines with their products.
#[derive(Debug, Serialize)]
pub struct OrderWithRelations {
    #[serde(flatten)]
    pub order: order::Model,
    pub customer: Option<customer::Model>,
    pub lines: Vec<OrderLineWithProduct>,
}

/// Line totals are derived server side; client-supplied values never survive.
pub(crate) fn line_total(quantity: i32, unit_price: Decimal) -> Decimal {
    Decimal::from(quantity) * unit_price
}

/// Service for managing orders and their lines as one unit of work
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<OrderWithCustomer>, u64), ServiceError> {
        let paginator = order::Entity::find()
            .find_also_related(customer::Entity)
            .order_by_asc(order::Column::Id)
            .paginate(&*self.db, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        let items = rows
            .into_iter()
            .map(|(order, customer)| OrderWithCustomer { order, customer })
            .collect();
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<OrderWithRelations, ServiceError> {
        let (order_row, customer_row) = order::Entity::find_by_id(id)
            .find_also_related(customer::Entity)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;
        let lines = order_detail::Entity::find()
            .filter(order_detail::Column::OrderId.eq(id))
            .find_also_related(product::Entity)
            .order_by_asc(order_detail::Column::Id)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|(line, product)| OrderLineWithProduct { line, product })
            .collect();
        Ok(OrderWithRelations {
            order: order_row,
            customer: customer_row,
            lines,
        })
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        actor: &str,
        input: CreateOrderInput,
    ) -> Result<OrderWithRelations, ServiceError> {
        self.ensure_customer_exists(input.customer_id).await?;
        self.ensure_products_exist(&input.lines).await?;

        let total: Decimal = input
            .lines
            .iter()
            .map(|line| line_total(line.quantity, line.unit_price))
            .sum();

        let txn = self.db.begin().await?;
        let order_row = order::ActiveModel {
            order_date: match input.order_date {
                Some(date) => Set(date),
                None => Set(Utc::now()),
            },
            total_amount: Set(total),
            status: Set(input.status.unwrap_or_default()),
            customer_id: Set(input.customer_id),
            created_by: Set(actor.to_string()),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for line in &input.lines {
            order_detail::ActiveModel {
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
                total_price: Set(line_total(line.quantity, line.unit_price)),
                order_id: Set(order_row.id),
                product_id: Set(line.product_id),
                created_by: Set(actor.to_string()),
                is_active: Set(true),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        info!(order_id = order_row.id, "order created");
        self.get(order_row.id).await
    }

    /// Full overwrite of the order and its line set. Persisted lines absent
    /// from the submitted set are removed; submitted lines without an id are
    /// inserted. Totals are recomputed before the single commit.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        actor: &str,
        id: i64,
        input: UpdateOrderInput,
    ) -> Result<OrderWithRelations, ServiceError> {
        self.ensure_customer_exists(input.customer_id).await?;
        self.ensure_products_exist(&input.lines).await?;

        let txn = self.db.begin().await?;
        let existing = order::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        let persisted = order_detail::Entity::find()
            .filter(order_detail::Column::OrderId.eq(id))
            .all(&txn)
            .await?;

        let submitted: Vec<i64> = input.lines.iter().filter_map(|line| line.id).collect();
        for stale in persisted.iter().filter(|line| !submitted.contains(&line.id)) {
            order_detail::Entity::delete_by_id(stale.id).exec(&txn).await?;
        }

        let mut total = Decimal::ZERO;
        for line in &input.lines {
            let amount = line_total(line.quantity, line.unit_price);
            total += amount;
            match line.id {
                Some(line_id) => {
                    let current = persisted
                        .iter()
                        .find(|persisted_line| persisted_line.id == line_id)
                        .cloned()
                        .ok_or_else(|| {
                            ServiceError::InvalidInput(format!(
                                "Order line {line_id} does not belong to order {id}"
                            ))
                        })?;
                    let mut active: order_detail::ActiveModel = current.into();
                    active.product_id = Set(line.product_id);
                    active.quantity = Set(line.quantity);
                    active.unit_price = Set(line.unit_price);
                    active.total_price = Set(amount);
                    active.updated_by = Set(Some(actor.to_string()));
                    active.update(&txn).await?;
                }
                None => {
                    order_detail::ActiveModel {
                        quantity: Set(line.quantity),
                        unit_price: Set(line.unit_price),
                        total_price: Set(amount),
                        order_id: Set(id),
                        product_id: Set(line.product_id),
                        created_by: Set(actor.to_string()),
                        is_active: Set(true),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await?;
                }
            }
        }

        let mut active: order::ActiveModel = existing.into();
        active.customer_id = Set(input.customer_id);
        active.status = Set(input.status);
        if let Some(date) = input.order_date {
            active.order_date = Set(date);
        }
        active.total_amount = Set(total);
        active.updated_by = Set(Some(actor.to_string()));
        if let Err(err) = active.update(&txn).await {
            // Dropping the transaction rolls the line changes back.
            drop(txn);
            return Err(self.stale_write_error(id, err).await);
        }
        txn.commit().await?;

        info!(order_id = id, "order updated");
        self.get(id).await
    }

    /// Hard delete of the order and its lines in one transaction.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        let existing = order::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;
        order_detail::Entity::delete_many()
            .filter(order_detail::Column::OrderId.eq(id))
            .exec(&txn)
            .await?;
        existing.delete(&txn).await?;
        txn.commit().await?;
        info!(order_id = id, "order deleted");
        Ok(())
    }

    async fn ensure_customer_exists(&self, customer_id: i64) -> Result<(), ServiceError> {
        if customer::Entity::find_by_id(customer_id)
            .one(&*self.db)
            .await?
            .is_none()
        {
            return Err(ServiceError::InvalidInput(format!(
                "Customer {customer_id} does not exist"
            )));
        }
        Ok(())
    }

    async fn ensure_products_exist(&self, lines: &[OrderLineInput]) -> Result<(), ServiceError> {
        let mut ids: Vec<i64> = lines.iter().map(|line| line.product_id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(());
        }
        let found: Vec<i64> = product::Entity::find()
            .filter(product::Column::Id.is_in(ids.clone()))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        if let Some(missing) = ids.into_iter().find(|id| !found.contains(id)) {
            return Err(ServiceError::InvalidInput(format!(
                "Product {missing} does not exist"
            )));
        }
        Ok(())
    }

    async fn stale_write_error(&self, id: i64, err: DbErr) -> ServiceError {
        if !matches!(err, DbErr::RecordNotUpdated) {
            return ServiceError::Database(err);
        }
        match order::Entity::find_by_id(id).one(&*self.db).await {
            Ok(None) => ServiceError::NotFound("Order not found".to_string()),
            Ok(Some(_)) => {
                ServiceError::Conflict("Order was modified by another request".to_string())
            }
            Err(db_err) => ServiceError::Database(db_err),
        }
    }
}
