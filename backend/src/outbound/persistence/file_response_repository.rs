//! File-backed [`ResponseRepository`].

use std::sync::Arc;

use record_store::{Collection, EntityStore, Record, StoreError};

use super::RESPONSES_FILE;
use crate::domain::ports::{ResponsePersistenceError, ResponseRepository};
use crate::domain::{AccountId, NewResponse, Response, ResponseId, TicketId};

const RESPONSE_PREFIX: &str = "R";

impl Record for Response {
    fn record_id(&self) -> &str {
        self.id().as_str()
    }
}

fn map_store_error(error: StoreError) -> ResponsePersistenceError {
    ResponsePersistenceError::write(error.to_string())
}

/// Responses stored in `responses.json`.
#[derive(Debug, Clone)]
pub struct FileResponseRepository {
    responses: Collection<Response>,
}

impl FileResponseRepository {
    /// Bind the repository to `store`.
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self {
            responses: Collection::new(store, RESPONSES_FILE),
        }
    }
}

impl ResponseRepository for FileResponseRepository {
    fn find_all(&self) -> Vec<Response> {
        self.responses.find_all()
    }

    fn find_by_id(&self, id: &ResponseId) -> Option<Response> {
        self.responses.find_by_id(id.as_str())
    }

    fn find_by_ticket(&self, ticket_id: &TicketId) -> Vec<Response> {
        self.responses
            .find_where(|response| response.ticket_id() == ticket_id)
    }

    fn find_by_author(&self, author: &AccountId) -> Vec<Response> {
        self.responses
            .find_where(|response| response.author() == author)
    }

    fn create(&self, response: NewResponse) -> Result<Response, ResponsePersistenceError> {
        self.responses
            .create(RESPONSE_PREFIX, |id| {
                response.into_response(ResponseId::new(id))
            })
            .map_err(map_store_error)
    }

    fn update(&self, response: &Response) -> Result<Option<Response>, ResponsePersistenceError> {
        self.responses
            .update(response.clone())
            .map_err(map_store_error)
    }

    fn delete(&self, id: &ResponseId) -> Result<bool, ResponsePersistenceError> {
        self.responses
            .delete(id.as_str())
            .map_err(map_store_error)
    }
}
