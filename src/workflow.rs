//! Request lifecycle state machine.
//!
//! ```text
//! idle ──submit()──► submitting ──► succeeded
//!   ▲                    │    └───► failed
//!   └──(validation reject)┘
//! ```
//!
//! - **idle**: no submission yet (or the last attempt was rejected before
//!   reaching the wire). No outcome is held.
//! - **submitting**: exactly one request is in flight. A second `submit()`
//!   during this window is a no-op.
//! - **succeeded** / **failed**: the outcome of the latest settled
//!   submission; `submit()` starts over from here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{info, error};
use uuid::Uuid;

use crate::models::{Field, GenerationRequest, Language, Phase, WorkflowSnapshot};
use crate::service::{GenerateError, GenerationService};

struct WorkflowState {
    request: GenerationRequest,
    phase: Phase,
    result: Option<Value>,
    error_message: Option<String>,
    updated_at: DateTime<Utc>,
}

/// Owns the in-flight request's input, status and outcome.
///
/// All operations take `&self`, so a presentation layer can hold the
/// workflow behind an `Arc` and poll it while a submission is in flight.
pub struct RequestWorkflow {
    state: RwLock<WorkflowState>,
    service: Arc<dyn GenerationService>,
}

impl RequestWorkflow {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self {
            state: RwLock::new(WorkflowState {
                request: GenerationRequest::default(),
                phase: Phase::Idle,
                result: None,
                error_message: None,
                updated_at: Utc::now(),
            }),
            service,
        }
    }

    /// Replace exactly one field of the request, preserving the others.
    ///
    /// No validation happens here; the outcome of an earlier completed
    /// submission stays visible until the next one starts.
    pub fn update_field(&self, field: Field, value: impl Into<String>) {
        let value = value.into();
        let mut state = self.state.write();
        match field {
            Field::Url => state.request.url = value,
            Field::Platform => state.request.platform = value,
            Field::FormName => state.request.form_name = value,
            Field::Language => state.request.language = value,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.read().phase
    }

    pub fn request(&self) -> GenerationRequest {
        self.state.read().request.clone()
    }

    pub fn result(&self) -> Option<Value> {
        self.state.read().result.clone()
    }

    pub fn error_message(&self) -> Option<String> {
        self.state.read().error_message.clone()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let state = self.state.read();
        WorkflowSnapshot {
            request: state.request.clone(),
            phase: state.phase,
            result: state.result.clone(),
            error_message: state.error_message.clone(),
            updated_at: state.updated_at,
        }
    }

    /// Drive one submission to completion.
    ///
    /// An incomplete request (empty field, language outside the supported
    /// set) is rejected with [`GenerateError::Validation`] before any
    /// network call; the workflow reverts to `idle`. While a submission is
    /// already in flight the call is a no-op and returns
    /// `Ok(Phase::Submitting)`. Transport and service failures never
    /// propagate out of this method: they settle the workflow into `failed`
    /// with an operator-facing message, and the returned phase is the
    /// settled one.
    pub async fn submit(&self) -> Result<Phase, GenerateError> {
        let request = {
            let mut state = self.state.write();
            if state.phase == Phase::Submitting {
                info!("submission already in flight, ignoring submit");
                return Ok(Phase::Submitting);
            }
            if let Err(e) = validate(&state.request) {
                state.phase = Phase::Idle;
                state.result = None;
                state.error_message = None;
                state.updated_at = Utc::now();
                return Err(e);
            }
            state.phase = Phase::Submitting;
            state.result = None;
            state.error_message = None;
            state.updated_at = Utc::now();
            state.request.clone()
        };

        let submission = Uuid::new_v4();
        info!(%submission, url = %request.url, platform = %request.platform,
              form_name = %request.form_name, language = %request.language,
              "🚀 Submitting generation request");

        let outcome = self.service.generate(&request).await;

        let mut state = self.state.write();
        match outcome {
            Ok(payload) => {
                info!(%submission, "✅ Generation succeeded");
                state.result = Some(payload);
                state.phase = Phase::Succeeded;
            }
            Err(e) => {
                error!(%submission, "❌ Generation failed: {}", e);
                state.error_message = Some(e.display_message());
                state.phase = Phase::Failed;
            }
        }
        state.updated_at = Utc::now();
        Ok(state.phase)
    }
}

fn validate(request: &GenerationRequest) -> Result<(), GenerateError> {
    if request.url.is_empty() {
        return Err(GenerateError::Validation("url must not be empty".into()));
    }
    if request.platform.is_empty() {
        return Err(GenerateError::Validation("platform must not be empty".into()));
    }
    if request.form_name.is_empty() {
        return Err(GenerateError::Validation("form_name must not be empty".into()));
    }
    request.language.parse::<Language>()
        .map_err(|e| GenerateError::Validation(e.to_string()))?;
    Ok(())
}
