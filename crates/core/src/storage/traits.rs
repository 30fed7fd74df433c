//! Storage repository traits
//!
//! These traits define the storage interface, allowing for different
//! implementations (SQLite, mock).

use uuid::Uuid;

use crate::error::Result;
use crate::models::Hall;

/// Hall repository operations
pub trait HallRepository {
    /// All saved Halls, sorted by name
    fn load_halls(&self) -> Result<Vec<Hall>>;

    /// Insert or overwrite a Hall
    fn save_hall(&self, hall: &Hall) -> Result<()>;

    /// Delete a Hall
    fn delete_hall(&self, hall_id: Uuid) -> Result<()>;

    /// Find Hall by ID
    fn find_hall(&self, id: Uuid) -> Result<Option<Hall>>;
}
