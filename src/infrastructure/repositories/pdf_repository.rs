//! SeaORM implementation of PdfRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, ModelTrait,
    QueryFilter, QuerySelect, RelationTrait, Set,
};

use crate::domain::{
    ownership, CreatePdfInput, DomainError, Pdf, PdfRepository, UpdatePdfInput,
};
use crate::models::pdf::{self, ActiveModel, Entity as PdfEntity};
use crate::models::subtopic::{self, Entity as SubtopicEntity};
use crate::models::unit::{self, Entity as UnitEntity};

pub(crate) fn pdf_to_domain(model: pdf::Model) -> Pdf {
    Pdf {
        id: model.id,
        title: model.title,
        file: model.file,
        uploaded_at: model.uploaded_at,
        subtopic: model.subtopic_id,
    }
}

/// SeaORM-based implementation of PdfRepository
pub struct SeaOrmPdfRepository {
    db: DatabaseConnection,
}

impl SeaOrmPdfRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Walk the chain pdf -> subtopic -> unit and evaluate the ownership
    /// predicate against the unit's owner.
    async fn visible_pdf(
        &self,
        caller_id: i32,
        id: i32,
    ) -> Result<Option<pdf::Model>, DomainError> {
        let Some(record) = PdfEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        if self
            .subtopic_is_visible(caller_id, record.subtopic_id)
            .await?
        {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    async fn subtopic_is_visible(
        &self,
        caller_id: i32,
        subtopic_id: i32,
    ) -> Result<bool, DomainError> {
        let Some(sub) = SubtopicEntity::find_by_id(subtopic_id).one(&self.db).await? else {
            return Ok(false);
        };

        let unit = UnitEntity::find_by_id(sub.unit_id).one(&self.db).await?;
        Ok(matches!(unit, Some(u) if ownership::owned_by(caller_id, u.user_id)))
    }
}

#[async_trait]
impl PdfRepository for SeaOrmPdfRepository {
    async fn find_all(&self, caller_id: i32) -> Result<Vec<Pdf>, DomainError> {
        let pdfs = PdfEntity::find()
            .join(JoinType::InnerJoin, pdf::Relation::Subtopic.def())
            .join(JoinType::InnerJoin, subtopic::Relation::Unit.def())
            .filter(unit::Column::UserId.eq(caller_id))
            .all(&self.db)
            .await?;

        Ok(pdfs.into_iter().map(pdf_to_domain).collect())
    }

    async fn find_by_id(&self, caller_id: i32, id: i32) -> Result<Option<Pdf>, DomainError> {
        Ok(self.visible_pdf(caller_id, id).await?.map(pdf_to_domain))
    }

    async fn create(&self, caller_id: i32, input: CreatePdfInput) -> Result<Pdf, DomainError> {
        if !self.subtopic_is_visible(caller_id, input.subtopic_id).await? {
            return Err(DomainError::NotFound);
        }

        let new_pdf = ActiveModel {
            subtopic_id: Set(input.subtopic_id),
            title: Set(input.title),
            file: Set(input.file_url),
            uploaded_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let result = new_pdf.insert(&self.db).await?;
        Ok(pdf_to_domain(result))
    }

    async fn update(
        &self,
        caller_id: i32,
        id: i32,
        input: UpdatePdfInput,
    ) -> Result<Pdf, DomainError> {
        let existing = self
            .visible_pdf(caller_id, id)
            .await?
            .ok_or(DomainError::NotFound)?;

        // Re-parenting only works onto the caller's own subtopics
        if let Some(target) = input.subtopic_id {
            if !self.subtopic_is_visible(caller_id, target).await? {
                return Err(DomainError::NotFound);
            }
        }

        if input.subtopic_id.is_none() && input.title.is_none() && input.file_url.is_none() {
            return Ok(pdf_to_domain(existing));
        }

        let mut active: ActiveModel = existing.into();
        if let Some(subtopic_id) = input.subtopic_id {
            active.subtopic_id = Set(subtopic_id);
        }
        if let Some(title) = input.title {
            active.title = Set(Some(title));
        }
        if let Some(file_url) = input.file_url {
            active.file = Set(file_url);
        }

        let updated = active.update(&self.db).await?;
        Ok(pdf_to_domain(updated))
    }

    async fn delete(&self, caller_id: i32, id: i32) -> Result<(), DomainError> {
        let existing = self
            .visible_pdf(caller_id, id)
            .await?
            .ok_or(DomainError::NotFound)?;

        existing.delete(&self.db).await?;
        Ok(())
    }
}
