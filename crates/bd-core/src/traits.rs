//! Core traits shared by all BatiDevis crates
//!
//! Includes the entity traits implemented by the domain models and the
//! persistence-collaborator traits implemented outside this workspace.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::result::BdResult;

/// Primary key type for persisted entities
pub type Id = i64;

/// Trait for entities that have a primary key
pub trait Identifiable {
    fn id(&self) -> Option<Id>;

    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }

    fn is_new_record(&self) -> bool {
        !self.is_persisted()
    }
}

/// Trait for entities with timestamps (created_at, updated_at)
pub trait Timestamped {
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn updated_at(&self) -> Option<DateTime<Utc>>;
}

/// Trait for documents addressed by a human-facing number
/// (quotes and projects, per the external numbering convention)
pub trait Numbered {
    fn number(&self) -> &str;
}

/// Persistence collaborator for id-keyed entities.
///
/// The core never touches files or the network; the surrounding
/// application implements this against whatever storage it uses.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Find by primary key
    async fn find(&self, id: Id) -> BdResult<T>;

    /// Find by primary key, returning None if not found
    async fn find_optional(&self, id: Id) -> BdResult<Option<T>>;

    /// Persist the entity
    async fn save(&self, entity: &T) -> BdResult<()>;

    /// Delete the entity
    async fn delete(&self, id: Id) -> BdResult<()>;
}

/// Persistence collaborator for number-keyed documents (quotes, projects)
#[async_trait]
pub trait DocumentStore<T: Numbered>: Send + Sync {
    /// Load a document by its number
    async fn load(&self, number: &str) -> BdResult<T>;

    /// Persist the document
    async fn save(&self, document: &T) -> BdResult<()>;
}

/// Read-only collaborator exposing the priced catalog
/// (items and assemblies are maintained outside the core)
#[async_trait]
pub trait CatalogSource<T>: Send + Sync {
    async fn list(&self) -> BdResult<Vec<T>>;
}
