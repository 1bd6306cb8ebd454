//! Person storage and the facade the HTTP layer talks to.

pub mod repository;
pub mod seed;
pub mod service;

pub use repository::{InMemoryPersonRepository, PersonRepository};
pub use service::{PersonService, PersonServiceApi};
