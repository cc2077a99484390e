//! Permission Request Workflow Engine
//!
//! The engine validates request drafts, stores submitted requests and
//! advances them through the fixed approval pipeline
//! `Business → Technical → AM Team`.
//!
//! # Architecture
//!
//! The [`PermitController`] owns every piece of state and is the only
//! mutation entry point. It composes:
//!
//! - [`PermissionCatalog`]: The static list of requestable permissions
//! - [`validation`]: Pre-submission rules and advisory warnings
//! - [`ApprovalStateMachine`]: Legal approve/deny transitions
//! - [`ApproverDirectory`]: Who decides at each stage
//! - [`RequestIdGenerator`]: `REQ-` identifiers
//! - [`RequestStore`]: Submitted requests, newest first
//!
//! # Example
//!
//! ```rust
//! use permit_engine::{EngineConfig, PermitController};
//! use permit_types::*;
//! use std::collections::HashMap;
//!
//! let mut controller = PermitController::new(EngineConfig::default());
//!
//! let selected = vec!["User.Read".to_string()];
//! let types = HashMap::from([("User.Read".to_string(), AccessType::Delegated)]);
//! let justifications =
//!     HashMap::from([("User.Read".to_string(), "needed for login".to_string())]);
//!
//! let request = controller.submit(&selected, &types, &justifications).unwrap();
//! assert_eq!(request.current_stage(), ApprovalStage::Business);
//!
//! let updated = controller
//!     .approve(&request.id, ApprovalStage::Business, "ok")
//!     .unwrap();
//! assert_eq!(updated.current_stage(), ApprovalStage::Technical);
//! assert_eq!(updated.approver, "Jane Smith");
//! ```

#![deny(unsafe_code)]

pub mod approvers;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod id_generator;
pub mod state_machine;
pub mod store;
pub mod validation;

// Re-export main types
pub use approvers::{ApproverDirectory, StaticApproverDirectory};
pub use catalog::PermissionCatalog;
pub use config::{EngineConfig, StageApprovers};
pub use controller::PermitController;
pub use id_generator::{RequestIdGenerator, SequentialIdGenerator, TimestampIdGenerator};
pub use state_machine::{ApprovalStateMachine, Transition};
pub use store::{RequestStore, StoreSummary};
pub use validation::{advisories, validate, validate_draft, Advisory};
