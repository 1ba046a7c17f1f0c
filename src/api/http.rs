//! Blocking HTTP transport for the scene API.

use serde_json::Value;

use super::{unwrap_envelope, ApiRequest, Transport};
use crate::config::StoreConfig;
use crate::error::PanoError;

/// [`Transport`] issuing real GET requests with `ureq`.
pub struct HttpTransport {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
    success_code: i64,
}

impl HttpTransport {
    /// Transport for the backend described by `config`.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: config.token.clone(),
            success_code: config.success_code,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Transport for HttpTransport {
    fn get(&self, request: &ApiRequest) -> Result<Option<Value>, PanoError> {
        let url = self.url(&request.path);
        log::debug!("GET {url} {:?}", request.query);

        let mut builder = self.agent.get(&url);
        for (key, value) in &request.query {
            builder = builder.query(key, value);
        }
        if request.authenticated {
            if let Some(token) = &self.token {
                builder = builder.header("Authorization", format!("Bearer {token}"));
            }
        }

        let body = builder
            .call()
            .map_err(|e| match e {
                ureq::Error::StatusCode(status) => PanoError::Status {
                    status,
                    path: request.path.clone(),
                },
                other => PanoError::Transport(other.to_string()),
            })?
            .into_body()
            .read_to_string()
            .map_err(|e| PanoError::Transport(e.to_string()))?;

        unwrap_envelope(&body, self.success_code)
    }
}
