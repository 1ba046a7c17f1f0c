//! In-memory transport serving canned responses.

use std::sync::Mutex;

use rustc_hash::FxHashMap;
use serde_json::Value;

use super::{ApiRequest, Transport};
use crate::error::PanoError;
use crate::util::lock::lock;

/// Canned outcome for one path.
#[derive(Debug, Clone)]
enum Canned {
    Payload(Value),
    Status(u16),
}

/// Transport backed by a path → response table, recording every request.
///
/// Paths without a canned response answer with an empty payload.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    responses: Mutex<FxHashMap<String, Canned>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MemoryTransport {
    /// Transport with no canned responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests to `path` with `payload`.
    pub fn respond(&self, path: &str, payload: Value) {
        let _ = lock(&self.responses)
            .insert(path.to_owned(), Canned::Payload(payload));
    }

    /// Fail requests to `path` with HTTP `status`.
    pub fn fail(&self, path: &str, status: u16) {
        let _ = lock(&self.responses)
            .insert(path.to_owned(), Canned::Status(status));
    }

    /// Every request seen so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    /// Most recent request.
    #[must_use]
    pub fn last_request(&self) -> Option<ApiRequest> {
        lock(&self.requests).last().cloned()
    }
}

impl Transport for MemoryTransport {
    fn get(&self, request: &ApiRequest) -> Result<Option<Value>, PanoError> {
        log::debug!("GET {} {:?} (memory)", request.path, request.query);
        lock(&self.requests).push(request.clone());
        match lock(&self.responses).get(&request.path) {
            Some(Canned::Payload(value)) if !value.is_null() => {
                Ok(Some(value.clone()))
            }
            Some(Canned::Status(status)) => Err(PanoError::Status {
                status: *status,
                path: request.path.clone(),
            }),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::route::Params;

    fn request(path: &str) -> ApiRequest {
        ApiRequest {
            path: path.to_owned(),
            query: Params::new(),
            authenticated: false,
        }
    }

    #[test]
    fn serves_canned_payloads_and_records_requests() {
        let transport = MemoryTransport::new();
        transport.respond("/a", json!({"x": 1}));

        assert_eq!(transport.get(&request("/a")).unwrap(), Some(json!({"x": 1})));
        assert_eq!(transport.get(&request("/b")).unwrap(), None);
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(transport.last_request().unwrap().path, "/b");
    }

    #[test]
    fn canned_status_is_an_error() {
        let transport = MemoryTransport::new();
        transport.fail("/a", 503);
        assert!(matches!(
            transport.get(&request("/a")),
            Err(PanoError::Status { status: 503, .. })
        ));
    }
}
