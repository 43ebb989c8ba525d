//! Mock transport for testing without network access.
//!
//! Serves queued response bodies in order and records every parameter set
//! it was asked to submit.

use std::collections::VecDeque;
use std::path::Path;

use tokio::sync::Mutex;

use crate::domain::TransportParams;

use super::error::EfaError;
use super::transport::Transport;

/// A queued reply.
#[derive(Debug, Clone)]
enum MockReply {
    Body(String),
    Failure { status: u16, message: String },
}

/// Transport that replays canned responses.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    submitted: Mutex<Vec<TransportParams>>,
}

impl MockTransport {
    /// Create a transport with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.replies.get_mut().push_back(MockReply::Body(body.into()));
        self
    }

    /// Queue a provider failure.
    pub fn with_failure(mut self, status: u16, message: impl Into<String>) -> Self {
        self.replies.get_mut().push_back(MockReply::Failure {
            status,
            message: message.into(),
        });
        self
    }

    /// Queue every `.html` and `.json` file in a directory, in file name
    /// order.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, EfaError> {
        let data_dir = data_dir.as_ref();

        let entries = std::fs::read_dir(data_dir).map_err(|e| EfaError::Api {
            status: 0,
            message: format!("Failed to read mock data directory: {}", e),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| EfaError::Api {
                status: 0,
                message: format!("Failed to read directory entry: {}", e),
            })?;

            let path = entry.path();
            let extension = path.extension().and_then(|s| s.to_str());
            if path.is_file() && matches!(extension, Some("html") | Some("json")) {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(EfaError::Api {
                status: 0,
                message: format!("No mock response files found in {:?}", data_dir),
            });
        }

        let mut mock = Self::new();
        for path in paths {
            let body = std::fs::read_to_string(&path).map_err(|e| EfaError::Api {
                status: 0,
                message: format!("Failed to read {:?}: {}", path, e),
            })?;
            mock = mock.with_body(body);
        }

        Ok(mock)
    }

    /// Every parameter set submitted so far, oldest first.
    pub async fn submitted(&self) -> Vec<TransportParams> {
        self.submitted.lock().await.clone()
    }

    /// Number of replies not yet served.
    pub async fn remaining(&self) -> usize {
        self.replies.lock().await.len()
    }
}

impl Transport for MockTransport {
    async fn submit(&self, params: &TransportParams) -> Result<String, EfaError> {
        self.submitted.lock().await.push(params.clone());

        match self.replies.lock().await.pop_front() {
            Some(MockReply::Body(body)) => Ok(body),
            Some(MockReply::Failure { status, message }) => Err(EfaError::Api { status, message }),
            None => Err(EfaError::Api {
                status: 404,
                message: "No mock response queued".to_string(),
            }),
        }
    }
}
