use std::sync::Arc;

use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder, Set};
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::customer;
use crate::errors::ServiceError;

/// Mutable customer fields, applied wholesale on create and update.
#[derive(Clone, Debug)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
}

/// Service for managing customers
#[derive(Clone)]
pub struct CustomerService {
    db: Arc<DbPool>,
}

impl CustomerService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<customer::Model>, u64), ServiceError> {
        let paginator = customer::Entity::find()
            .order_by_asc(customer::Column::Id)
            .paginate(&*self.db, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<customer::Model, ServiceError> {
        customer::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Customer not found".to_string()))
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        actor: &str,
        input: CustomerInput,
    ) -> Result<customer::Model, ServiceError> {
        let created = customer::ActiveModel {
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
        info!(customer_id = created.id, "customer created");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        actor: &str,
        id: i64,
        input: CustomerInput,
    ) -> Result<customer::Model, ServiceError> {
        let existing = self.get(id).await?;
        let mut active: customer::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.email = Set(input.email);
        active.mobile = Set(input.mobile);
        active.address = Set(input.address);
        active.updated_by = Set(Some(actor.to_string()));
        match active.update(&*self.db).await {
            Ok(updated) => {
                info!(customer_id = id, "customer updated");
                Ok(updated)
            }
            Err(err) => Err(self.stale_write_error(id, err).await),
        }
    }

    /// Hard delete; `is_active` is never consulted here.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        existing.delete(&*self.db).await?;
        info!(customer_id = id, "customer deleted");
        Ok(())
    }

    /// The update matched zero rows: re-check existence to decide between
    /// "gone" and "changed underneath us".
    async fn stale_write_error(&self, id: i64, err: DbErr) -> ServiceError {
        if !matches!(err, DbErr::RecordNotUpdated) {
            return ServiceError::Database(err);
        }
        match customer::Entity::find_by_id(id).one(&*self.db).await {
            Ok(None) => ServiceError::NotFound("Customer not found".to_string()),
            Ok(Some(_)) => {
                ServiceError::Conflict("Customer was modified by another request".to_string())
            }
            Err(db_err) => ServiceError::Database(db_err),
        }
    }
}
