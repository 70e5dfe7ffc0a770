use std::sync::Arc;

use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder, Set};
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::supplier;
use crate::errors::ServiceError;

#[derive(Clone, Debug)]
pub struct SupplierInput {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
}

/// Service for managing suppliers
#[derive(Clone)]
pub struct SupplierService {
    db: Arc<DbPool>,
}

impl SupplierService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<supplier::Model>, u64), ServiceError> {
        let paginator = supplier::Entity::find()
            .order_by_asc(supplier::Column::Id)
            .paginate(&*self.db, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<supplier::Model, ServiceError> {
        supplier::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Supplier not found".to_string()))
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        actor: &str,
        input: SupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        let created = supplier::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            mobile: Set(input.mobile),
            address: Set(input.address),
            created_by: Set(actor.to_string()),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        info!(supplier_id = created.id, "supplier created");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        actor: &str,
        id: i64,
        input: SupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        let existing = self.get(id).await?;
        let mut active: supplier::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.email = Set(input.email);
        active.mobile = Set(input.mobile);
        active.address = Set(input.address);
        active.updated_by = Set(Some(actor.to_string()));
        match active.update(&*self.db).await {
            Ok(updated) => {
                info!(supplier_id = id, "supplier updated");
                Ok(updated)
            }
            Err(err) => Err(self.stale_write_error(id, err).await),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        existing.delete(&*self.db).await?;
        info!(supplier_id = id, "supplier deleted");
        Ok(())
    }

    async fn stale_write_error(&self, id: i64, err: DbErr) -> ServiceError {
        if !matches!(err, DbErr::RecordNotUpdated) {
            return ServiceError::Database(err);
        }
        match supplier::Entity::find_by_id(id).one(&*self.db).await {
            Ok(None) => ServiceError::NotFound("Supplier not found".to_string()),
            Ok(Some(_)) => {
                ServiceError::Conflict("Supplier was modified by another request".to_string())
            }
            Err(db_err) => ServiceError::Database(db_err),
        }
    }
}
