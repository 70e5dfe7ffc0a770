use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::{category, product, supplier};
use crate::errors::ServiceError;

#[derive(Clone, Debug)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: i64,
    pub supplier_id: i64,
}

/// Product row together with its category and supplier.
#[derive(Debug, Serialize)]
pub struct ProductWithRelations {
    #[serde(flatten)]
    pub product: product::Model,
    pub category: Option<category::Model>,
    pub supplier: Option<supplier::Model>,
}

/// Service for managing the product catalog
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<ProductWithRelations>, u64), ServiceError> {
        let paginator = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .paginate(&*self.db, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;

        let category_ids: Vec<i64> = rows.iter().map(|p| p.category_id).collect();
        let supplier_ids: Vec<i64> = rows.iter().map(|p| p.supplier_id).collect();
        let categories = category::Entity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(&*self.db)
            .await?;
        let suppliers = supplier::Entity::find()
            .filter(supplier::Column::Id.is_in(supplier_ids))
            .all(&*self.db)
            .await?;

        let items = rows
            .into_iter()
            .map(|row| {
                let category = categories.iter().find(|c| c.id == row.category_id).cloned();
                let supplier = suppliers.iter().find(|s| s.id == row.supplier_id).cloned();
                ProductWithRelations {
                    product: row,
                    category,
                    supplier,
                }
            })
            .collect();
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<ProductWithRelations, ServiceError> {
        let row = product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))?;
        let category = category::Entity::find_by_id(row.category_id)
            .one(&*self.db)
            .await?;
        let supplier = supplier::Entity::find_by_id(row.supplier_id)
            .one(&*self.db)
            .await?;
        Ok(ProductWithRelations {
            product: row,
            category,
            supplier,
        })
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        actor: &str,
        input: ProductInput,
    ) -> Result<ProductWithRelations, ServiceError> {
        self.ensure_references_exist(input.category_id, input.supplier_id)
            .await?;
        let created = product::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            stock_quantity: Set(input.stock_quantity),
            category_id: Set(input.category_id),
            supplier_id: Set(input.supplier_id),
            created_by: Set(actor.to_string()),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        info!(product_id = created.id, "product created");
        self.get(created.id).await
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        actor: &str,
        id: i64,
        input: ProductInput,
    ) -> Result<ProductWithRelations, ServiceError> {
        let existing = product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))?;
        self.ensure_references_exist(input.category_id, input.supplier_id)
            .await?;
        let mut active: product::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.price = Set(input.price);
        active.stock_quantity = Set(input.stock_quantity);
        active.category_id = Set(input.category_id);
        active.supplier_id = Set(input.supplier_id);
        active.updated_by = Set(Some(actor.to_string()));
        match active.update(&*self.db).await {
            Ok(_) => {
                info!(product_id = id, "product updated");
                self.get(id).await
            }
            Err(err) => Err(self.stale_write_error(id, err).await),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existing = product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))?;
        existing.delete(&*self.db).await?;
        info!(product_id = id, "product deleted");
        Ok(())
    }

    async fn ensure_references_exist(
        &self,
        category_id: i64,
        supplier_id: i64,
    ) -> Result<(), ServiceError> {
        if category::Entity::find_by_id(category_id)
            .one(&*self.db)
            .await?
            .is_none()
        {
            return Err(ServiceError::InvalidInput(format!(
                "Category {category_id} does not exist"
            )));
        }
        if supplier::Entity::find_by_id(supplier_id)
            .one(&*self.db)
            .await?
            .is_none()
        {
            return Err(ServiceError::InvalidInput(format!(
                "Supplier {supplier_id} does not exist"
            )));
        }
        Ok(())
    }

    async fn stale_write_error(&self, id: i64, err: DbErr) -> ServiceError {
        if !matches!(err, DbErr::RecordNotUpdated) {
            return ServiceError::Database(err);
        }
        match product::Entity::find_by_id(id).one(&*self.db).await {
            Ok(None) => ServiceError::NotFound("Product not found".to_string()),
            Ok(Some(_)) => {
                ServiceError::Conflict("Product was modified by another request".to_string())
            }
            Err(db_err) => ServiceError::Database(db_err),
        }
    }
}
