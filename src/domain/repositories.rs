//! Repository trait definitions
//!
//! These traits define the contract for data access. Every method takes the
//! caller's user id and is scoped to that user's ownership chain:
//! records owned by anyone else behave as if they do not exist.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;

/// Unit data for API responses
#[derive(Debug, Clone, serde::Serialize)]
pub struct Unit {
    pub id: i32,
    pub name: String,
}

/// PDF data for API responses. `file` is always a fully-qualified URL.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Pdf {
    pub id: i32,
    pub title: Option<String>,
    pub file: String,
    pub uploaded_at: String,
    pub subtopic: i32,
}

/// Subtopic data for API responses, always carrying its nested PDF list.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Subtopic {
    pub id: i32,
    pub unit: i32,
    pub title: String,
    pub notes: String,
    pub pdfs: Vec<Pdf>,
}

/// Input for creating a subtopic
#[derive(Debug, Clone)]
pub struct CreateSubtopicInput {
    pub unit_id: i32,
    pub title: String,
    pub notes: String,
}

/// Input for updating a subtopic; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateSubtopicInput {
    pub unit_id: Option<i32>,
    pub title: Option<String>,
    pub notes: Option<String>,
}

/// Input for creating a PDF record; the binary is already stored and
/// `file_url` is the public URL the storage adapter returned for it
#[derive(Debug, Clone)]
pub struct CreatePdfInput {
    pub subtopic_id: i32,
    pub title: Option<String>,
    pub file_url: String,
}

/// Input for updating a PDF; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdatePdfInput {
    pub subtopic_id: Option<i32>,
    pub title: Option<String>,
    pub file_url: Option<String>,
}

/// Repository trait for Unit entity
#[async_trait]
pub trait UnitRepository: Send + Sync {
    /// Find all units owned by the caller
    async fn find_all(&self, caller_id: i32) -> Result<Vec<Unit>, DomainError>;

    /// Find a unit by ID; `None` if absent or owned by someone else
    async fn find_by_id(&self, caller_id: i32, id: i32) -> Result<Option<Unit>, DomainError>;

    /// Create a unit owned by the caller
    async fn create(&self, caller_id: i32, name: String) -> Result<Unit, DomainError>;

    /// Rename a unit
    async fn update(
        &self,
        caller_id: i32,
        id: i32,
        name: Option<String>,
    ) -> Result<Unit, DomainError>;

    /// Delete a unit; cascades to its subtopics and their PDFs
    async fn delete(&self, caller_id: i32, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for Subtopic entity
#[async_trait]
pub trait SubtopicRepository: Send + Sync {
    /// Find all subtopics under the caller's units
    async fn find_all(&self, caller_id: i32) -> Result<Vec<Subtopic>, DomainError>;

    /// Find a subtopic by ID, scoped through its unit's owner
    async fn find_by_id(&self, caller_id: i32, id: i32)
        -> Result<Option<Subtopic>, DomainError>;

    /// Create a subtopic under one of the caller's units
    async fn create(
        &self,
        caller_id: i32,
        input: CreateSubtopicInput,
    ) -> Result<Subtopic, DomainError>;

    /// Update a subtopic; moving it to a foreign unit is `NotFound`
    async fn update(
        &self,
        caller_id: i32,
        id: i32,
        input: UpdateSubtopicInput,
    ) -> Result<Subtopic, DomainError>;

    /// Delete a subtopic; cascades to its PDFs
    async fn delete(&self, caller_id: i32, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for PDF entity
#[async_trait]
pub trait PdfRepository: Send + Sync {
    /// Find all PDFs under the caller's ownership chain
    async fn find_all(&self, caller_id: i32) -> Result<Vec<Pdf>, DomainError>;

    /// Find a PDF by ID, scoped through subtopic -> unit -> owner
    async fn find_by_id(&self, caller_id: i32, id: i32) -> Result<Option<Pdf>, DomainError>;

    /// Create a PDF record under one of the caller's subtopics
    async fn create(&self, caller_id: i32, input: CreatePdfInput) -> Result<Pdf, DomainError>;

    /// Update a PDF's metadata and/or file reference
    async fn update(
        &self,
        caller_id: i32,
        id: i32,
        input: UpdatePdfInput,
    ) -> Result<Pdf, DomainError>;

    /// Delete a PDF record (the stored object is left in place)
    async fn delete(&self, caller_id: i32, id: i32) -> Result<(), DomainError>;
}
