//! Service layer for the persons API.
//! - `person::repository`: the concurrent in-memory store and its trait.
//! - `person::service`: the pass-through facade used by the HTTP layer.
//! - `pagination`: request-side page normalization.

pub mod errors;
pub mod pagination;
pub mod person;
