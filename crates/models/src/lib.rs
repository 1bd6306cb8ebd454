//! Domain types for the persons API.
//! - `person`: the stored record and the create/replace payload with its validation.
//! - `metadata`: pagination descriptor returned alongside list results.

pub mod errors;
pub mod metadata;
pub mod person;

pub use metadata::{Metadata, PersonPage};
pub use person::{Person, PersonInput};
