//! SeaORM implementation of SubtopicRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, ModelTrait,
    QueryFilter, QuerySelect, RelationTrait, Set,
};

use crate::domain::{
    ownership, CreateSubtopicInput, DomainError, Subtopic, SubtopicRepository,
    UpdateSubtopicInput,
};
use crate::models::pdf::{self, Entity as PdfEntity};
use crate::models::subtopic::{self, ActiveModel, Entity as SubtopicEntity};
use crate::models::unit::{self, Entity as UnitEntity};

use super::pdf_repository::pdf_to_domain;

/// SeaORM-based implementation of SubtopicRepository
pub struct SeaOrmSubtopicRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubtopicRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Walk the chain subtopic -> unit and evaluate the ownership predicate.
    async fn visible_subtopic(
        &self,
        caller_id: i32,
        id: i32,
    ) -> Result<Option<subtopic::Model>, DomainError> {
        let Some(sub) = SubtopicEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let unit = UnitEntity::find_by_id(sub.unit_id).one(&self.db).await?;
        match unit {
            Some(u) if ownership::owned_by(caller_id, u.user_id) => Ok(Some(sub)),
            _ => Ok(None),
        }
    }

    async fn unit_is_visible(&self, caller_id: i32, unit_id: i32) -> Result<bool, DomainError> {
        let unit = UnitEntity::find_by_id(unit_id).one(&self.db).await?;
        Ok(matches!(unit, Some(u) if ownership::owned_by(caller_id, u.user_id)))
    }

    /// Assemble the full representation, nested PDF list included.
    async fn with_pdfs(&self, sub: subtopic::Model) -> Result<Subtopic, DomainError> {
        let pdfs = PdfEntity::find()
            .filter(pdf::Column::SubtopicId.eq(sub.id))
            .all(&self.db)
            .await?;

        Ok(Subtopic {
            id: sub.id,
            unit: sub.unit_id,
            title: sub.title,
            notes: sub.notes,
            pdfs: pdfs.into_iter().map(pdf_to_domain).collect(),
        })
    }
}

#[async_trait]
impl SubtopicRepository for SeaOrmSubtopicRepository {
    async fn find_all(&self, caller_id: i32) -> Result<Vec<Subtopic>, DomainError> {
        let subs = SubtopicEntity::find()
            .join(JoinType::InnerJoin, subtopic::Relation::Unit.def())
            .filter(unit::Column::UserId.eq(caller_id))
            .all(&self.db)
            .await?;

        // Fetch each subtopic's PDFs individually (N+1 query for now)
        let mut result = Vec::new();
        for sub in subs {
            result.push(self.with_pdfs(sub).await?);
        }

        Ok(result)
    }

    async fn find_by_id(
        &self,
        caller_id: i32,
        id: i32,
    ) -> Result<Option<Subtopic>, DomainError> {
        match self.visible_subtopic(caller_id, id).await? {
            Some(sub) => Ok(Some(self.with_pdfs(sub).await?)),
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        caller_id: i32,
        input: CreateSubtopicInput,
    ) -> Result<Subtopic, DomainError> {
        if !self.unit_is_visible(caller_id, input.unit_id).await? {
            return Err(DomainError::NotFound);
        }

        let new_subtopic = ActiveModel {
            unit_id: Set(input.unit_id),
            title: Set(input.title),
            notes: Set(input.notes),
            ..Default::default()
        };

        let result = new_subtopic.insert(&self.db).await?;

        Ok(Subtopic {
            id: result.id,
            unit: result.unit_id,
            title: result.title,
            notes: result.notes,
            pdfs: Vec::new(),
        })
    }

    async fn update(
        &self,
        caller_id: i32,
        id: i32,
        input: UpdateSubtopicInput,
    ) -> Result<Subtopic, DomainError> {
        let existing = self
            .visible_subtopic(caller_id, id)
            .await?
            .ok_or(DomainError::NotFound)?;

        // Moving a subtopic only works between the caller's own units
        if let Some(target_unit) = input.unit_id {
            if !self.unit_is_visible(caller_id, target_unit).await? {
                return Err(DomainError::NotFound);
            }
        }

        if input.unit_id.is_none() && input.title.is_none() && input.notes.is_none() {
            return self.with_pdfs(existing).await;
        }

        let mut active: ActiveModel = existing.into();
        if let Some(unit_id) = input.unit_id {
            active.unit_id = Set(unit_id);
        }
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }

        let updated = active.update(&self.db).await?;
        self.with_pdfs(updated).await
    }

    async fn delete(&self, caller_id: i32, id: i32) -> Result<(), DomainError> {
        let existing = self
            .visible_subtopic(caller_id, id)
            .await?
            .ok_or(DomainError::NotFound)?;

        existing.delete(&self.db).await?;
        Ok(())
    }
}
