use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use serde_with::skip_serializing_none;
use uuid::Uuid;

use crate::error::ToolError;
use crate::models::ToolId;
use crate::normalize::ValidationWarning;
use crate::tools::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Request/result state of one open tool.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSession {
    pub id: Uuid,
    pub tool: ToolId,
    pub status: SessionStatus,
    pub result: Option<Value>,
    pub text: String,
    pub warnings: Vec<ValidationWarning>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ToolSession {
    fn new(tool: ToolId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tool,
            status: SessionStatus::Idle,
            result: None,
            text: String::new(),
            warnings: Vec::new(),
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// In-memory sessions. Never hold the lock across an await.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, ToolSession>>>,
}

impl SessionStore {
    pub fn create(&self, tool: ToolId) -> ToolSession {
        let session = ToolSession::new(tool);
        self.inner.write().insert(session.id, session.clone());
        session
    }

    pub fn get(&self, id: Uuid) -> Option<ToolSession> {
        self.inner.read().get(&id).cloned()
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.inner.write().remove(&id).is_some()
    }

    /// Marks a session as loading. Streaming runs start with empty text.
    pub fn begin(&self, id: Uuid, tool: ToolId, streaming: bool) -> Result<(), ToolError> {
        let mut guard = self.inner.write();
        let session = guard.get_mut(&id).ok_or(ToolError::NotFound(id))?;
        if session.tool != tool {
            return Err(ToolError::ToolMismatch { expected: session.tool, got: tool });
        }
        if session.status == SessionStatus::Loading {
            return Err(ToolError::Busy(id));
        }
        session.status = SessionStatus::Loading;
        session.last_error = None;
        if streaming {
            session.text.clear();
        }
        session.updated_at = Utc::now();
        Ok(())
    }

    /// Replaces the previous result. Returns the updated session if it still exists.
    pub fn complete(&self, id: Uuid, outcome: Outcome) -> Option<ToolSession> {
        self.update(id, |s| {
            s.status = SessionStatus::Ready;
            s.result = Some(outcome.result);
            s.warnings = outcome.warnings;
        })
    }

    /// Clears the loading flag. The previous result is kept.
    pub fn fail(&self, id: Uuid, error: &ToolError) -> Option<ToolSession> {
        self.update(id, |s| {
            s.status = SessionStatus::Failed;
            s.last_error = Some(error.to_string());
        })
    }

    /// Appends one stream fragment. `begin` has already cleared the text.
    pub fn append_text(&self, id: Uuid, fragment: &str) {
        self.update(id, |s| s.text.push_str(fragment));
    }

    pub fn finish_text(&self, id: Uuid, text: String) -> Option<ToolSession> {
        self.update(id, |s| {
            s.status = SessionStatus::Ready;
            s.text = text;
        })
    }

    fn update(&self, id: Uuid, f: impl FnOnce(&mut ToolSession)) -> Option<ToolSession> {
        let mut guard = self.inner.write();
        let session = guard.get_mut(&id)?;
        f(session);
        session.updated_at = Utc::now();
        Some(session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome(value: Value) -> Outcome {
        Outcome { result: value, warnings: Vec::new() }
    }

    #[test]
    fn one_request_in_flight_per_session() {
        let store = SessionStore::default();
        let session = store.create(ToolId::AdsWaste);
        store.begin(session.id, ToolId::AdsWaste, false).unwrap();
        let err = store.begin(session.id, ToolId::AdsWaste, false).unwrap_err();
        assert!(matches!(err, ToolError::Busy(_)));

        store.complete(session.id, outcome(json!({ "negatives": [] })));
        assert!(store.begin(session.id, ToolId::AdsWaste, false).is_ok());
    }

    #[test]
    fn sessions_are_isolated() {
        let store = SessionStore::default();
        let a = store.create(ToolId::AdsWaste);
        let b = store.create(ToolId::AdsWaste);
        store.begin(a.id, ToolId::AdsWaste, false).unwrap();
        assert!(store.begin(b.id, ToolId::AdsWaste, false).is_ok());
    }

    #[test]
    fn failure_keeps_previous_result() {
        let store = SessionStore::default();
        let id = store.create(ToolId::ReviewAnalyzer).id;
        store.begin(id, ToolId::ReviewAnalyzer, false).unwrap();
        store.complete(id, outcome(json!({ "pros": ["soft"] })));

        store.begin(id, ToolId::ReviewAnalyzer, false).unwrap();
        let failed = store.fail(id, &ToolError::Parse("bad".into())).unwrap();
        assert_eq!(failed.status, SessionStatus::Failed);
        assert_eq!(failed.result, Some(json!({ "pros": ["soft"] })));
        assert_eq!(failed.last_error.as_deref(), Some("parse error: bad"));
    }

    #[test]
    fn rejects_input_for_another_tool_and_unknown_sessions() {
        let store = SessionStore::default();
        let id = store.create(ToolId::BrandVoice).id;
        assert!(matches!(
            store.begin(id, ToolId::AdsWaste, false),
            Err(ToolError::ToolMismatch { .. })
        ));
        assert!(matches!(
            store.begin(Uuid::new_v4(), ToolId::AdsWaste, false),
            Err(ToolError::NotFound(_))
        ));
    }

    #[test]
    fn streaming_runs_reset_text() {
        let store = SessionStore::default();
        let id = store.create(ToolId::BrandVoice).id;
        store.begin(id, ToolId::BrandVoice, true).unwrap();
        store.append_text(id, "Hello ");
        store.append_text(id, "world");
        assert_eq!(store.get(id).unwrap().text, "Hello world");
        store.finish_text(id, "Hello world".into());

        store.begin(id, ToolId::BrandVoice, true).unwrap();
        let session = store.get(id).unwrap();
        assert_eq!(session.text, "");
        assert_eq!(session.status, SessionStatus::Loading);
    }

    #[test]
    fn removed_sessions_ignore_late_updates() {
        let store = SessionStore::default();
        let id = store.create(ToolId::AdsWaste).id;
        store.begin(id, ToolId::AdsWaste, false).unwrap();
        assert!(store.remove(id));
        assert!(store.complete(id, outcome(json!({}))).is_none());
        assert!(store.get(id).is_none());
        assert!(!store.remove(id));
    }

    #[test]
    fn serializes_for_the_dashboard() {
        let store = SessionStore::default();
        let session = store.create(ToolId::ImageListing);
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["tool"], "IMAGE_LISTING");
        assert_eq!(value["status"], "idle");
        assert!(value.get("result").is_none());
        assert!(value.get("lastError").is_none());
        assert!(value.get("createdAt").is_some());
    }
}
