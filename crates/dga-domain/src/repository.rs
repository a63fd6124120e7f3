//! Sample Repository Port

use crate::sample::Sample;

/// Read-only access to stored oil samples.
///
/// Implemented by the persistence collaborator; the diagnostic core only
/// reads through this port and never writes to the store.
pub trait SampleRepository: Send + Sync {
    /// All stored samples
    fn get_all(&self) -> Vec<Sample>;

    /// Sample by persistent id, if present
    fn get_by_id(&self, id: i64) -> Option<Sample>;

    /// All samples belonging to one transformer
    fn get_by_transformer(&self, transformer_id: i64) -> Vec<Sample>;
}
