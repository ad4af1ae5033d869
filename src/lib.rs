//! Client-side orchestrator for the ART code generation service.
//!
//! Collects the four request fields, drives one submission to the remote
//! `/generate` endpoint and exposes the observable lifecycle
//! (`idle → submitting → succeeded | failed`) to whatever presentation
//! layer sits on top.

pub mod models;
pub mod service;
pub mod workflow;

pub use models::{Field, GenerationRequest, Language, Phase, WorkflowSnapshot};
pub use service::{GenerateError, GenerationService, HttpGenerationService, ServiceHealth};
pub use workflow::RequestWorkflow;
