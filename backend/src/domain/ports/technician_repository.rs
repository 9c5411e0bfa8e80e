//! Port abstraction for technician accounts.

use crate::domain::{AccountId, NewTechnician, Technician};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by technician repository adapters.
    pub enum TechnicianPersistenceError {
        /// The technician collection could not be written.
        Write { message: String } => "technician repository write failed: {message}",
    }
}

/// Port for reading and writing technicians.
#[cfg_attr(test, mockall::automock)]
pub trait TechnicianRepository: Send + Sync {
    /// Every technician in stored order.
    fn find_all(&self) -> Vec<Technician>;

    /// The technician with `id`, if any.
    fn find_by_id(&self, id: &AccountId) -> Option<Technician>;

    /// The technician whose email matches, ignoring case.
    fn find_by_email(&self, email: &str) -> Option<Technician>;

    /// Technicians whose specialization matches, ignoring case.
    fn find_by_specialization(&self, specialization: &str) -> Vec<Technician>;

    /// Technician with the smallest workload among those matching
    /// `specialization`. Ties go to the earliest stored record.
    fn find_least_loaded_by_specialization(&self, specialization: &str) -> Option<Technician>;

    /// Store a new technician under a fresh `T` id.
    fn create(&self, technician: NewTechnician) -> Result<Technician, TechnicianPersistenceError>;

    /// Replace the stored technician with the same id.
    fn update(
        &self,
        technician: &Technician,
    ) -> Result<Option<Technician>, TechnicianPersistenceError>;

    /// Remove the technician with `id`, reporting whether one was removed.
    fn delete(&self, id: &AccountId) -> Result<bool, TechnicianPersistenceError>;
}
