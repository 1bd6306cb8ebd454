use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use models::{Metadata, Person, PersonPage};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Storage contract for person records.
///
/// Implementations own their records exclusively and hand out clones only.
/// `add` never generates identifiers; callers supply fresh ones.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Store a new record. `DuplicateKey` if the id is already present.
    async fn add(&self, person: Person) -> Result<(), ServiceError>;
    /// Clone of the stored record. `NotFound` if absent.
    async fn get(&self, id: Uuid) -> Result<Person, ServiceError>;
    /// Zero-based `page` of `page_size` records in insertion order. A page
    /// past the end is empty, not an error.
    async fn list(&self, page: u64, page_size: u64) -> Result<PersonPage, ServiceError>;
    /// Whole-record replace. `NotFound` if absent; never inserts.
    async fn update(&self, person: Person) -> Result<(), ServiceError>;
    /// Remove the record. `NotFound` if absent.
    async fn delete(&self, id: Uuid) -> Result<(), ServiceError>;
}

#[derive(Default)]
struct Store {
    next_seq: u64,
    /// Insertion sequence -> record; iteration order is listing order.
    records: BTreeMap<u64, Person>,
    /// Identifier -> insertion sequence.
    index: HashMap<Uuid, u64>,
}

/// In-memory store guarded by a single reader-writer lock.
/// Mutations take the write lock; `get`/`list` share the read lock.
#[derive(Default)]
pub struct InMemoryPersonRepository {
    inner: RwLock<Store>,
}

impl InMemoryPersonRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.index.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn add(&self, person: Person) -> Result<(), ServiceError> {
        let mut store = self.inner.write().await;
        if store.index.contains_key(&person.id) {
            return Err(ServiceError::DuplicateKey(person.id));
        }
        let seq = store.next_seq;
        store.next_seq += 1;
        store.index.insert(person.id, seq);
        store.records.insert(seq, person);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Person, ServiceError> {
        let store = self.inner.read().await;
        store
            .index
            .get(&id)
            .and_then(|seq| store.records.get(seq))
            .cloned()
            .ok_or(ServiceError::NotFound(id))
    }

    async fn list(&self, page: u64, page_size: u64) -> Result<PersonPage, ServiceError> {
        let store = self.inner.read().await;
        let total = store.records.len() as u64;
        let meta = Metadata::calculate(total, page, page_size);

        let offset = page.saturating_mul(page_size);
        if offset >= total {
            return Ok(PersonPage { meta, persons: Vec::new() });
        }

        // offset < total, so both fit in usize
        let persons = store
            .records
            .values()
            .skip(offset as usize)
            .take(usize::try_from(page_size).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(PersonPage { meta, persons })
    }

    async fn update(&self, person: Person) -> Result<(), ServiceError> {
        let mut store = self.inner.write().await;
        let seq = *store.index.get(&person.id).ok_or(ServiceError::NotFound(person.id))?;
        store.records.insert(seq, person);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let mut store = self.inner.write().await;
        let seq = store.index.remove(&id).ok_or(ServiceError::NotFound(id))?;
        store.records.remove(&seq);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn person(name: &str, age: i32) -> Person {
        Person::new(name, age, vec!["Reading".into(), "Swimming".into()])
    }

    async fn repo_with(n: usize) -> (InMemoryPersonRepository, Vec<Person>) {
        let repo = InMemoryPersonRepository::new();
        let mut added = Vec::with_capacity(n);
        for i in 0..n {
            let p = person(&format!("person-{i}"), 20 + i as i32);
            repo.add(p.clone()).await.unwrap();
            added.push(p);
        }
        (repo, added)
    }

    #[tokio::test]
    async fn add_then_get_returns_equal_record() {
        let repo = InMemoryPersonRepository::new();
        let p = person("John D", 30);
        repo.add(p.clone()).await.unwrap();
        assert_eq!(repo.get(p.id).await.unwrap(), p);
    }

    #[tokio::test]
    async fn duplicate_add_keeps_first_record() {
        let repo = InMemoryPersonRepository::new();
        let first = person("John Doe", 30);
        repo.add(first.clone()).await.unwrap();

        let second = Person { name: "Impostor".into(), ..first.clone() };
        assert_eq!(repo.add(second).await, Err(ServiceError::DuplicateKey(first.id)));
        assert_eq!(repo.get(first.id).await.unwrap(), first);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let repo = InMemoryPersonRepository::new();
        let ghost = person("Charlie", 32);
        assert_eq!(repo.get(ghost.id).await, Err(ServiceError::NotFound(ghost.id)));
        assert_eq!(repo.update(ghost.clone()).await, Err(ServiceError::NotFound(ghost.id)));
        assert_eq!(repo.delete(ghost.id).await, Err(ServiceError::NotFound(ghost.id)));
        assert!(repo.is_empty().await, "update must not upsert");
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let repo = InMemoryPersonRepository::new();
        let original = Person::new("Alice", 28, vec!["Traveling".into(), "Cooking".into()]);
        repo.add(original.clone()).await.unwrap();

        let replacement = Person { id: original.id, name: "Alicia".into(), age: 29, hobbies: vec![] };
        repo.update(replacement.clone()).await.unwrap();
        assert_eq!(repo.get(original.id).await.unwrap(), replacement);
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let (repo, added) = repo_with(2).await;
        let id = added[0].id;
        repo.delete(id).await.unwrap();
        assert_eq!(repo.get(id).await, Err(ServiceError::NotFound(id)));
        assert_eq!(repo.delete(id).await, Err(ServiceError::NotFound(id)));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn list_pages_over_five_records() {
        let (repo, added) = repo_with(5).await;

        let page = repo.list(0, 2).await.unwrap();
        assert_eq!(page.persons, added[0..2].to_vec());
        assert_eq!(page.meta.total_records, 5);
        assert_eq!(page.meta.last_page, 3);

        let page = repo.list(2, 2).await.unwrap();
        assert_eq!(page.persons, added[4..5].to_vec());

        let page = repo.list(3, 2).await.unwrap();
        assert!(page.persons.is_empty());
        assert_eq!(page.meta.total_records, 5);

        for size in [5, 10] {
            let page = repo.list(0, size).await.unwrap();
            assert_eq!(page.persons, added);
            assert_eq!(page.meta.last_page, 1);
        }
    }

    #[tokio::test]
    async fn list_on_empty_store_has_single_page() {
        let repo = InMemoryPersonRepository::new();
        let page = repo.list(0, 10).await.unwrap();
        assert!(page.persons.is_empty());
        assert_eq!(page.meta.total_records, 0);
        assert_eq!(page.meta.last_page, 1);
    }

    #[tokio::test]
    async fn list_handles_extreme_arguments() {
        let (repo, _) = repo_with(3).await;
        assert!(repo.list(u64::MAX, u64::MAX).await.unwrap().persons.is_empty());
        assert!(repo.list(0, 0).await.unwrap().persons.is_empty());
        assert_eq!(repo.list(0, u64::MAX).await.unwrap().persons.len(), 3);
    }

    #[tokio::test]
    async fn list_order_is_stable_and_survives_updates() {
        let (repo, added) = repo_with(6).await;
        let first = repo.list(0, 6).await.unwrap();
        let second = repo.list(0, 6).await.unwrap();
        assert_eq!(first, second);

        let changed = Person { name: "renamed".into(), ..added[2].clone() };
        repo.update(changed.clone()).await.unwrap();
        let after = repo.list(0, 6).await.unwrap();
        assert_eq!(after.persons[2], changed);

        repo.delete(added[0].id).await.unwrap();
        let ids: Vec<Uuid> = repo.list(0, 6).await.unwrap().persons.iter().map(|p| p.id).collect();
        let expected: Vec<Uuid> = added[1..].iter().map(|p| p.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn returned_records_are_copies() {
        let repo = InMemoryPersonRepository::new();
        let p = person("Copy", 40);
        repo.add(p.clone()).await.unwrap();
        let mut fetched = repo.get(p.id).await.unwrap();
        fetched.hobbies.push("Mutated".into());
        assert_eq!(repo.get(p.id).await.unwrap(), p);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_lose_nothing() {
        let repo = Arc::new(InMemoryPersonRepository::new());
        let n = 200;
        let handles: Vec<_> = (0..n)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.add(person(&format!("p{i}"), i % 100)).await })
            })
            .collect();
        for h in handles {
            h.await.unwrap().unwrap();
        }
        assert_eq!(repo.len().await, n as usize);
        assert_eq!(repo.list(0, 1000).await.unwrap().meta.total_records, n as u64);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicate_adds_have_one_winner() {
        let repo = Arc::new(InMemoryPersonRepository::new());
        let p = person("Racer", 33);
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = Arc::clone(&repo);
                let p = p.clone();
                tokio::spawn(async move { repo.add(p).await })
            })
            .collect();
        let mut ok = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(()) => ok += 1,
                Err(e) => assert_eq!(e, ServiceError::DuplicateKey(p.id)),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_leave_one_attempt() {
        let repo = Arc::new(InMemoryPersonRepository::new());
        let base = person("Base", 1);
        repo.add(base.clone()).await.unwrap();

        let attempts: Vec<Person> = (0..32)
            .map(|i| Person {
                id: base.id,
                name: format!("writer-{i}"),
                age: i,
                hobbies: vec![format!("hobby-{i}"); (i % 4 + 1) as usize],
            })
            .collect();
        let handles: Vec<_> = attempts
            .iter()
            .cloned()
            .map(|p| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.update(p).await })
            })
            .collect();
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let stored = repo.get(base.id).await.unwrap();
        assert!(attempts.contains(&stored), "stored record is a hybrid: {stored:?}");
    }
}
