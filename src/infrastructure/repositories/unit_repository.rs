//! SeaORM implementation of UnitRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set};

use crate::domain::{ownership, DomainError, Unit, UnitRepository};
use crate::models::unit::{self, ActiveModel, Entity as UnitEntity};

/// SeaORM-based implementation of UnitRepository
pub struct SeaOrmUnitRepository {
    db: DatabaseConnection,
}

impl SeaOrmUnitRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetch a unit and evaluate the ownership predicate.
    /// Foreign units come back as `None`, same as absent ones.
    async fn visible_unit(
        &self,
        caller_id: i32,
        id: i32,
    ) -> Result<Option<unit::Model>, DomainError> {
        let found = UnitEntity::find_by_id(id).one(&self.db).await?;
        Ok(found.filter(|u| ownership::owned_by(caller_id, u.user_id)))
    }
}

fn to_domain(model: unit::Model) -> Unit {
    Unit {
        id: model.id,
        name: model.name,
    }
}

#[async_trait]
impl UnitRepository for SeaOrmUnitRepository {
    async fn find_all(&self, caller_id: i32) -> Result<Vec<Unit>, DomainError> {
        let units = UnitEntity::find()
            .filter(unit::Column::UserId.eq(caller_id))
            .all(&self.db)
            .await?;

        Ok(units.into_iter().map(to_domain).collect())
    }

    async fn find_by_id(&self, caller_id: i32, id: i32) -> Result<Option<Unit>, DomainError> {
        Ok(self.visible_unit(caller_id, id).await?.map(to_domain))
    }

    async fn create(&self, caller_id: i32, name: String) -> Result<Unit, DomainError> {
        let new_unit = ActiveModel {
            user_id: Set(caller_id),
            name: Set(name),
            ..Default::default()
        };

        let result = new_unit.insert(&self.db).await?;
        Ok(to_domain(result))
    }

    async fn update(
        &self,
        caller_id: i32,
        id: i32,
        name: Option<String>,
    ) -> Result<Unit, DomainError> {
        let existing = self
            .visible_unit(caller_id, id)
            .await?
            .ok_or(DomainError::NotFound)?;

        let name = match name {
            Some(n) => n,
            None => return Ok(to_domain(existing)),
        };

        let mut active: ActiveModel = existing.into();
        active.name = Set(name);
        let updated = active.update(&self.db).await?;

        Ok(to_domain(updated))
    }

    async fn delete(&self, caller_id: i32, id: i32) -> Result<(), DomainError> {
        let existing = self
            .visible_unit(caller_id, id)
            .await?
            .ok_or(DomainError::NotFound)?;

        existing.delete(&self.db).await?;
        Ok(())
    }
}
