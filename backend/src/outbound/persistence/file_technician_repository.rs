//! File-backed [`TechnicianRepository`].

use std::sync::Arc;

use record_store::{Collection, EntityStore, Record, StoreError};

use super::TECHNICIANS_FILE;
use crate::domain::ports::{TechnicianPersistenceError, TechnicianRepository};
use crate::domain::{AccountId, NewTechnician, Technician};

const TECHNICIAN_PREFIX: &str = "T";

impl Record for Technician {
    fn record_id(&self) -> &str {
        self.id().as_str()
    }
}

fn map_store_error(error: StoreError) -> TechnicianPersistenceError {
    TechnicianPersistenceError::write(error.to_string())
}

fn same_specialization(technician: &Technician, specialization: &str) -> bool {
    technician.specialization().trim().to_lowercase() == specialization.trim().to_lowercase()
}

/// Technicians stored in `technicians.json`.
#[derive(Debug, Clone)]
pub struct FileTechnicianRepository {
    technicians: Collection<Technician>,
}

impl FileTechnicianRepository {
    /// Bind the repository to `store`.
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self {
            technicians: Collection::new(store, TECHNICIANS_FILE),
        }
    }
}

impl TechnicianRepository for FileTechnicianRepository {
    fn find_all(&self) -> Vec<Technician> {
        self.technicians.find_all()
    }

    fn find_by_id(&self, id: &AccountId) -> Option<Technician> {
        self.technicians.find_by_id(id.as_str())
    }

    fn find_by_email(&self, email: &str) -> Option<Technician> {
        self.technicians
            .find_all()
            .into_iter()
            .find(|technician| technician.user().has_email(email))
    }

    fn find_by_specialization(&self, specialization: &str) -> Vec<Technician> {
        self.technicians
            .find_where(|technician| same_specialization(technician, specialization))
    }

    fn find_least_loaded_by_specialization(&self, specialization: &str) -> Option<Technician> {
        // `min_by_key` keeps the first of equal minima, so ties go to stored order.
        self.find_by_specialization(specialization)
            .into_iter()
            .min_by_key(Technician::workload)
    }

    fn create(&self, technician: NewTechnician) -> Result<Technician, TechnicianPersistenceError> {
        self.technicians
            .create(TECHNICIAN_PREFIX, |id| {
                technician.into_technician(AccountId::new(id))
            })
            .map_err(map_store_error)
    }

    fn update(
        &self,
        technician: &Technician,
    ) -> Result<Option<Technician>, TechnicianPersistenceError> {
        self.technicians
            .update(technician.clone())
            .map_err(map_store_error)
    }

    fn delete(&self, id: &AccountId) -> Result<bool, TechnicianPersistenceError> {
        self.technicians
            .delete(id.as_str())
            .map_err(map_store_error)
    }
}

#[cfg(test)]
mod tests {
    //! Selection rules over a real data directory.
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;

    use crate::domain::TechnicianProfile;

    fn repository() -> (tempfile::TempDir, FileTechnicianRepository) {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 path");
        let store = Arc::new(EntityStore::open(&root).expect("open store"));
        (dir, FileTechnicianRepository::new(store))
    }

    fn add(repo: &FileTechnicianRepository, name: &str, specialization: &str, workload: u32) {
        let mut technician = repo
            .create(NewTechnician {
                name: name.to_owned(),
                email: format!("{}@desk.io", name.to_lowercase()),
                password: "pw".to_owned(),
                profile: TechnicianProfile::new(specialization),
            })
            .expect("technician stored");
        for _ in 0..workload {
            technician.increment_workload();
        }
        repo.update(&technician).expect("workload stored");
    }

    #[rstest]
    fn least_loaded_prefers_earliest_on_ties() {
        let (_dir, repo) = repository();
        add(&repo, "Ana", "Network", 2);
        add(&repo, "Ben", "network", 1);
        add(&repo, "Cai", "Network", 1);
        add(&repo, "Dee", "Hardware", 0);

        let chosen = repo
            .find_least_loaded_by_specialization(" NETWORK ")
            .expect("a network technician");

        assert_eq!(chosen.id().as_str(), "T002");
    }

    #[rstest]
    fn least_loaded_is_none_without_match() {
        let (_dir, repo) = repository();
        add(&repo, "Ana", "Network", 0);

        assert!(repo.find_least_loaded_by_specialization("Database").is_none());
    }
}
