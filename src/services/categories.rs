use std::sync::Arc;

use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder, Set};
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::category;
use crate::errors::ServiceError;

#[derive(Clone, Debug)]
pub struct CategoryInput {
    pub name: String,
    pub description: String,
}

/// Service for managing product categories
#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DbPool>,
}

impl CategoryService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<category::Model>, u64), ServiceError> {
        let paginator = category::Entity::find()
            .order_by_asc(category::Column::Id)
            .paginate(&*self.db, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<category::Model, ServiceError> {
        category::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Category not found".to_string()))
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        actor: &str,
        input: CategoryInput,
    ) -> Result<category::Model, ServiceError> {
        let created = category::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            created_by: Set(actor.to_string()),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        info!(category_id = created.id, "category created");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        actor: &str,
        id: i64,
        input: CategoryInput,
    ) -> Result<category::Model, ServiceError> {
        let existing = self.get(id).await?;
        let mut active: category::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.updated_by = Set(Some(actor.to_string()));
        match active.update(&*self.db).await {
            Ok(updated) => {
                info!(category_id = id, "category updated");
                Ok(updated)
            }
            Err(err) => Err(self.stale_write_error(id, err).await),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        existing.delete(&*self.db).await?;
        info!(category_id = id, "category deleted");
        Ok(())
    }

    async fn stale_write_error(&self, id: i64, err: DbErr) -> ServiceError {
        if !matches!(err, DbErr::RecordNotUpdated) {
            return ServiceError::Database(err);
        }
        match category::Entity::find_by_id(id).one(&*self.db).await {
            Ok(None) => ServiceError::NotFound("Category not found".to_string()),
            Ok(Some(_)) => {
                ServiceError::Conflict("Category was modified by another request".to_string())
            }
            Err(db_err) => ServiceError::Database(db_err),
        }
    }
}
