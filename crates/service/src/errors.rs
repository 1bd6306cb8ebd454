use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the person store. Both kinds are deterministic:
/// retrying the same call yields the same outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("duplicate key: person {0} already exists")]
    DuplicateKey(Uuid),
    #[error("not found: person {0}")]
    NotFound(Uuid),
}
