//! Named groups of students owned by a faculty member

use common::error::{DatabaseError, DatabaseResult};
use std::{collections::HashSet, future::Future};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        batch::{BatchRequest, BatchSummary},
        student::StudentSummary,
    },
};

/// Storage for batches and their members
pub trait BatchStore {
    /// Batches of `faculty_id` in creation order, then id
    fn list_batches(
        &self,
        faculty_id: Uuid,
    ) -> impl Future<Output = DatabaseResult<Vec<BatchSummary>>> + Send;

    /// The subset of `ids` that belong to existing students
    fn resolve_students(
        &self,
        ids: &[Uuid],
    ) -> impl Future<Output = DatabaseResult<Vec<Uuid>>> + Send;

    fn insert_batch(
        &self,
        faculty_id: Uuid,
        batchname: &str,
        members: &[Uuid],
    ) -> impl Future<Output = DatabaseResult<BatchSummary>> + Send;

    /// Rename the batch and replace its member set
    fn replace_batch(
        &self,
        batch_id: Uuid,
        batchname: &str,
        members: &[Uuid],
    ) -> impl Future<Output = DatabaseResult<()>> + Send;

    /// Members of a batch owned by `faculty_id`, or `None` if there is no such batch
    fn batch_members(
        &self,
        faculty_id: Uuid,
        batch_id: Uuid,
    ) -> impl Future<Output = DatabaseResult<Option<Vec<StudentSummary>>>> + Send;
}

#[derive(Clone)]
pub struct BatchManager<S> {
    store: S,
}

fn duplicate_as_conflict(e: DatabaseError) -> ApiError {
    if e.is_duplicate() {
        ApiError::Conflict("Batch already exists".to_string())
    } else {
        ApiError::Database(e)
    }
}

impl<S: BatchStore + Sync> BatchManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Existing students among `ids`, first occurrence order kept
    async fn resolve(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, ApiError> {
        let mut seen = HashSet::new();
        let unique: Vec<Uuid> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let resolved = self.store.resolve_students(&unique).await?;
        if resolved.is_empty() {
            return Err(ApiError::NotFound("Students not found".to_string()));
        }

        let resolved: HashSet<Uuid> = resolved.into_iter().collect();
        let dropped = unique.len() - resolved.len();
        if dropped > 0 {
            info!("Dropping {} unknown students from batch", dropped);
        }
        Ok(unique.into_iter().filter(|id| resolved.contains(id)).collect())
    }

    pub async fn create(
        &self,
        faculty_id: Uuid,
        request: &BatchRequest,
    ) -> Result<BatchSummary, ApiError> {
        let existing = self.store.list_batches(faculty_id).await?;
        if existing.iter().any(|b| b.batchname == request.batchname) {
            return Err(ApiError::Conflict("Batch already exists".to_string()));
        }

        let members = self.resolve(&request.students).await?;
        self.store
            .insert_batch(faculty_id, &request.batchname, &members)
            .await
            .map_err(duplicate_as_conflict)
    }

    pub async fn update(
        &self,
        faculty_id: Uuid,
        batch_id: Uuid,
        request: &BatchRequest,
    ) -> Result<BatchSummary, ApiError> {
        let existing = self.store.list_batches(faculty_id).await?;
        if !existing.iter().any(|b| b.id == batch_id) {
            return Err(ApiError::NotFound("Batch not found".to_string()));
        }
        if existing
            .iter()
            .any(|b| b.id != batch_id && b.batchname == request.batchname)
        {
            return Err(ApiError::Conflict("Batch already exists".to_string()));
        }

        let members = self.resolve(&request.students).await?;
        self.store
            .replace_batch(batch_id, &request.batchname, &members)
            .await
            .map_err(duplicate_as_conflict)?;

        Ok(BatchSummary {
            id: batch_id,
            batchname: request.batchname.clone(),
        })
    }

    pub async fn list_mine(&self, faculty_id: Uuid) -> Result<Vec<BatchSummary>, ApiError> {
        Ok(self.store.list_batches(faculty_id).await?)
    }

    pub async fn list_members(
        &self,
        faculty_id: Uuid,
        batch_id: Uuid,
    ) -> Result<Vec<StudentSummary>, ApiError> {
        match self.store.batch_members(faculty_id, batch_id).await? {
            None => Err(ApiError::NotFound("Batch not found".to_string())),
            Some(members) if members.is_empty() => {
                Err(ApiError::NotFound("Students not found".to_string()))
            }
            Some(members) => Ok(members),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, sync::Mutex};

    struct StoredBatch {
        id: Uuid,
        faculty_id: Uuid,
        batchname: String,
        members: Vec<Uuid>,
    }

    #[derive(Default)]
    struct MemoryStore {
        students: HashMap<Uuid, StudentSummary>,
        batches: Mutex<Vec<StoredBatch>>,
    }

    impl BatchStore for MemoryStore {
        async fn list_batches(&self, faculty_id: Uuid) -> DatabaseResult<Vec<BatchSummary>> {
            Ok(self
                .batches
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.faculty_id == faculty_id)
                .map(|b| BatchSummary {
                    id: b.id,
                    batchname: b.batchname.clone(),
                })
                .collect())
        }

        async fn resolve_students(&self, ids: &[Uuid]) -> DatabaseResult<Vec<Uuid>> {
            Ok(ids
                .iter()
                .copied()
                .filter(|id| self.students.contains_key(id))
                .collect())
        }

        async fn insert_batch(
            &self,
            faculty_id: Uuid,
            batchname: &str,
            members: &[Uuid],
        ) -> DatabaseResult<BatchSummary> {
            let id = Uuid::new_v4();
            self.batches.lock().unwrap().push(StoredBatch {
                id,
                faculty_id,
                batchname: batchname.to_string(),
                members: members.to_vec(),
            });
            Ok(BatchSummary {
                id,
                batchname: batchname.to_string(),
            })
        }

        async fn replace_batch(
            &self,
            batch_id: Uuid,
            batchname: &str,
            members: &[Uuid],
        ) -> DatabaseResult<()> {
            let mut batches = self.batches.lock().unwrap();
            if let Some(batch) = batches.iter_mut().find(|b| b.id == batch_id) {
                batch.batchname = batchname.to_string();
                batch.members = members.to_vec();
            }
            Ok(())
        }

        async fn batch_members(
            &self,
            faculty_id: Uuid,
            batch_id: Uuid,
        ) -> DatabaseResult<Option<Vec<StudentSummary>>> {
            Ok(self
                .batches
                .lock()
                .unwrap()
                .iter()
                .find(|b| b.id == batch_id && b.faculty_id == faculty_id)
                .map(|b| {
                    b.members
                        .iter()
                        .filter_map(|id| self.students.get(id).cloned())
                        .collect()
                }))
        }
    }

    struct Fixture {
        manager: BatchManager<MemoryStore>,
        faculty: Uuid,
        students: Vec<Uuid>,
    }

    fn fixture() -> Fixture {
        let mut store = MemoryStore::default();
        let mut students = Vec::new();
        for prn in ["A1", "A2", "A3"] {
            let id = Uuid::new_v4();
            store.students.insert(
                id,
                StudentSummary {
                    id,
                    name: format!("Student {}", prn),
                    email: format!("{}@college.edu", prn.to_lowercase()),
                    prn: prn.to_string(),
                },
            );
            students.push(id);
        }
        Fixture {
            manager: BatchManager::new(store),
            faculty: Uuid::new_v4(),
            students,
        }
    }

    fn request(batchname: &str, students: &[Uuid]) -> BatchRequest {
        BatchRequest {
            batchname: batchname.to_string(),
            students: students.to_vec(),
        }
    }

    #[tokio::test]
    async fn create_rejects_an_existing_name() {
        let f = fixture();
        f.manager
            .create(f.faculty, &request("T1", &f.students[..1]))
            .await
            .unwrap();

        let again = f.manager.create(f.faculty, &request("T1", &f.students)).await;
        assert!(matches!(again, Err(ApiError::Conflict(_))));

        // names are case-sensitive and scoped per faculty
        f.manager
            .create(f.faculty, &request("t1", &f.students))
            .await
            .unwrap();
        f.manager
            .create(Uuid::new_v4(), &request("T1", &f.students))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unresolved_students_are_dropped_or_rejected() {
        let f = fixture();
        let stranger = Uuid::new_v4();

        let batch = f
            .manager
            .create(f.faculty, &request("T1", &[stranger, f.students[1], f.students[1]]))
            .await
            .unwrap();
        let members = f.manager.list_members(f.faculty, batch.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].prn, "A2");

        let none = f.manager.create(f.faculty, &request("T2", &[stranger])).await;
        assert!(matches!(none, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_enforces_ownership_and_name_rules() {
        let f = fixture();
        let t1 = f.manager.create(f.faculty, &request("T1", &f.students)).await.unwrap();
        let t2 = f.manager.create(f.faculty, &request("T2", &f.students)).await.unwrap();

        let taken = f.manager.update(f.faculty, t2.id, &request("T1", &f.students)).await;
        assert!(matches!(taken, Err(ApiError::Conflict(_))));

        let same_name = f
            .manager
            .update(f.faculty, t1.id, &request("T1", &f.students[..2]))
            .await
            .unwrap();
        assert_eq!(same_name.batchname, "T1");
        assert_eq!(f.manager.list_members(f.faculty, t1.id).await.unwrap().len(), 2);

        let foreign = f.manager.update(Uuid::new_v4(), t1.id, &request("X", &f.students)).await;
        assert!(matches!(foreign, Err(ApiError::NotFound(_))));

        let unknown = f.manager.update(f.faculty, Uuid::new_v4(), &request("X", &f.students)).await;
        assert!(matches!(unknown, Err(ApiError::NotFound(_))));

        let empty = f.manager.update(f.faculty, t1.id, &request("T1", &[])).await;
        assert!(matches!(empty, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_mine_is_stable() {
        let f = fixture();
        for name in ["Morning", "Lab A", "Lab B"] {
            f.manager.create(f.faculty, &request(name, &f.students)).await.unwrap();
        }

        let first = f.manager.list_mine(f.faculty).await.unwrap();
        let second = f.manager.list_mine(f.faculty).await.unwrap();
        assert_eq!(first, second);
        let names: Vec<&str> = first.iter().map(|b| b.batchname.as_str()).collect();
        assert_eq!(names, vec!["Morning", "Lab A", "Lab B"]);
    }

    #[tokio::test]
    async fn members_of_unknown_batch_are_not_found() {
        let f = fixture();
        let result = f.manager.list_members(f.faculty, Uuid::new_v4()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
