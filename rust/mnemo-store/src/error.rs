//! Store-level error definitions.

use mnemo_search::FilterTarget;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A filter set compiled for one collection was executed against the
    /// other.
    #[error("filter set targets {actual:?}, but the search ran over {expected:?}")]
    TargetMismatch {
        expected: FilterTarget,
        actual: FilterTarget,
    },

    /// A record referenced another record the store has never seen.
    #[error("unknown {entity} reference {id}")]
    UnknownReference { entity: &'static str, id: String },
}
