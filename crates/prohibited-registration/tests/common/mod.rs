//! Common test utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use prohibited_registration::{
    api::{create_router, AppState},
    config::QueueConfig,
    AlertSink, AuditSink, Member, ServiceError, Sinks,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Audit sink that keeps rows in memory.
pub struct MemoryAuditSink {
    configured: bool,
    failure: Option<String>,
    rows: Mutex<Vec<Member>>,
}

impl MemoryAuditSink {
    pub fn working() -> Arc<Self> {
        Arc::new(Self {
            configured: true,
            failure: None,
            rows: Mutex::new(Vec::new()),
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            configured: false,
            failure: None,
            rows: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            configured: true,
            failure: Some(message.to_string()),
            rows: Mutex::new(Vec::new()),
        })
    }

    pub fn rows(&self) -> Vec<Member> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn record(&self, member: &Member) -> Result<(), ServiceError> {
        if !self.configured {
            return Err(ServiceError::StorageUnavailable);
        }
        if let Some(message) = &self.failure {
            return Err(ServiceError::Storage(message.clone()));
        }
        self.rows.lock().unwrap().push(member.clone());
        Ok(())
    }
}

/// Alert sink that counts notifications.
pub struct MemoryAlertSink {
    failure: Option<u16>,
    sent: Mutex<Vec<Member>>,
}

impl MemoryAlertSink {
    pub fn working() -> Arc<Self> {
        Arc::new(Self {
            failure: None,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn rejecting(status: u16) -> Arc<Self> {
        Arc::new(Self {
            failure: Some(status),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<Member> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertSink for MemoryAlertSink {
    fn is_configured(&self) -> bool {
        true
    }

    async fn notify(&self, member: &Member) -> Result<(), ServiceError> {
        self.sent.lock().unwrap().push(member.clone());
        match self.failure {
            Some(status) => Err(ServiceError::AlertDelivery {
                status,
                body: "invalid_payload".into(),
            }),
            None => Ok(()),
        }
    }
}

/// Build a router over the given sinks.
pub fn test_app(audit: Arc<dyn AuditSink>, alert: Arc<dyn AlertSink>) -> Router {
    let state = AppState::new(Sinks::new(audit, alert), QueueConfig::default());
    create_router(state)
}

/// POST a raw body to `uri`.
pub async fn post(
    app: Router,
    uri: &str,
    content_type: &str,
    body: impl Into<Body>,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", content_type)
            .body(body.into())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn assert_status(response: &Response<Body>, status: StatusCode) {
    assert_eq!(response.status(), status);
}
