use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `file` stores the public URL returned by the object storage adapter.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pdfs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub subtopic_id: i32,
    pub title: Option<String>,
    pub file: String,
    pub uploaded_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subtopic::Entity",
        from = "Column::SubtopicId",
        to = "super::subtopic::Column::Id"
    )]
    Subtopic,
}

impl Related<super::subtopic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subtopic.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
