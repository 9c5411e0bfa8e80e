//! Port abstraction for ticket responses.

use crate::domain::{AccountId, NewResponse, Response, ResponseId, TicketId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by response repository adapters.
    pub enum ResponsePersistenceError {
        /// The response collection could not be written.
        Write { message: String } => "response repository write failed: {message}",
    }
}

/// Port for reading and writing responses.
#[cfg_attr(test, mockall::automock)]
pub trait ResponseRepository: Send + Sync {
    /// Every response in stored order.
    fn find_all(&self) -> Vec<Response>;

    /// The response with `id`, if any.
    fn find_by_id(&self, id: &ResponseId) -> Option<Response>;

    /// Responses on `ticket_id` in stored order.
    fn find_by_ticket(&self, ticket_id: &TicketId) -> Vec<Response>;

    /// Responses written by `author`.
    fn find_by_author(&self, author: &AccountId) -> Vec<Response>;

    /// Store a new response under a fresh `R` id.
    fn create(&self, response: NewResponse) -> Result<Response, ResponsePersistenceError>;

    /// Replace the stored response with the same id.
    fn update(&self, response: &Response) -> Result<Option<Response>, ResponsePersistenceError>;

    /// Remove the response with `id`, reporting whether one was removed.
    fn delete(&self, id: &ResponseId) -> Result<bool, ResponsePersistenceError>;
}
