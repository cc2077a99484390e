//! Permission Request Domain Types
//!
//! A permission request asks for one or more Microsoft Graph permissions
//! and travels through a fixed approval pipeline before it is granted.
//!
//! # Key Concepts
//!
//! - **Permission**: An immutable catalog entry (`User.Read`, `Mail.Send`, ...)
//!   carrying its native kind and review flags (GLR, API scan).
//! - **AccessType**: The access the requester asks for per permission:
//!   Application, Delegated, Both (a flagged conflict) or None.
//! - **ApprovalStage**: One station of the ordered pipeline
//!   `Business → Technical → AM Team`.
//! - **RequestState**: Pending at a stage, Approved, or Denied at a stage.
//!   Terminal states freeze the stage.
//! - **ApprovalHistoryEntry**: An append-only record of one decision.
//! - **RequestDraft**: The editable form that becomes a request on submission.
//!
//! # Design Principles
//!
//! 1. Stages, statuses and access types are closed enums, never strings.
//! 2. History is append-only: one entry per decision, in decision order.
//! 3. A request leaves Pending exactly once.

#![deny(unsafe_code)]

mod draft;
mod errors;
mod ids;
mod permission;
mod request;
mod stage;
mod validation;

pub use draft::*;
pub use errors::*;
pub use ids::*;
pub use permission::*;
pub use request::*;
pub use stage::*;
pub use validation::*;
