use std::sync::Arc;

use async_trait::async_trait;
use models::{Person, PersonPage};
use tracing::instrument;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::person::repository::PersonRepository;

/// Operations the HTTP layer depends on. Implemented by `PersonService`;
/// tests substitute their own implementations.
#[async_trait]
pub trait PersonServiceApi: Send + Sync {
    async fn create(&self, person: Person) -> Result<Person, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Person, ServiceError>;
    async fn list(&self, page: u64, page_size: u64) -> Result<PersonPage, ServiceError>;
    async fn update(&self, person: Person) -> Result<Person, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<(), ServiceError>;
}

/// Pass-through facade over a `PersonRepository`. Adds no rules of its own;
/// results and errors are forwarded unchanged.
pub struct PersonService<R: PersonRepository> {
    repo: Arc<R>,
}

impl<R: PersonRepository> PersonService<R> {
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use models::Person;
    /// use service::person::{InMemoryPersonRepository, PersonService, PersonServiceApi};
    ///
    /// let svc = PersonService::new(Arc::new(InMemoryPersonRepository::new()));
    /// let created = tokio_test::block_on(svc.create(Person::new("Ada", 36, vec!["Math".into()]))).unwrap();
    /// let fetched = tokio_test::block_on(svc.get(created.id)).unwrap();
    /// assert_eq!(fetched, created);
    /// ```
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }
}

#[async_trait]
impl<R: PersonRepository> PersonServiceApi for PersonService<R> {
    #[instrument(level = "debug", skip(self, person), fields(id = %person.id))]
    async fn create(&self, person: Person) -> Result<Person, ServiceError> {
        self.repo.add(person.clone()).await?;
        Ok(person)
    }

    #[instrument(level = "debug", skip(self))]
    async fn get(&self, id: Uuid) -> Result<Person, ServiceError> {
        self.repo.get(id).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn list(&self, page: u64, page_size: u64) -> Result<PersonPage, ServiceError> {
        self.repo.list(page, page_size).await
    }

    #[instrument(level = "debug", skip(self, person), fields(id = %person.id))]
    async fn update(&self, person: Person) -> Result<Person, ServiceError> {
        self.repo.update(person.clone()).await?;
        Ok(person)
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.repo.delete(id).await
    }
}
