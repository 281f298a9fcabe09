//! # personafill Protocols
//!
//! Core protocol definitions for the personafill form filler.
//! Contains only data types and interface definitions - no engine logic.
//!
//! ## Core Types
//!
//! - [`Profile`] - Read-only bag of profile attributes supplied by the user
//! - [`PageSnapshot`] - Serialized capture of a live document
//! - [`CandidateField`] - A discovered, labeled, fillable element
//! - [`WritePlan`] - Pure description of one field write
//! - [`FillReport`] - Result of one fill invocation
//!
//! ## Core Traits
//!
//! - [`FormPage`] - The live page: snapshot, emptiness re-check, write application

pub mod error;
pub mod field;
pub mod message;
pub mod page;
pub mod profile;
pub mod report;
pub mod snapshot;
pub mod write;

pub use error::{DiscoveryError, PageError, ProfileError, WriteError};
pub use field::{CandidateField, FieldKind, FieldSignals};
pub use message::{FillRequest, FillResponse};
pub use page::FormPage;
pub use profile::{Profile, ProfileAttribute};
pub use report::{FillOutcome, FillReport, FilledField, SkippedField};
pub use snapshot::{
    ComputedStyle, NodeId, NodeKind, PageSnapshot, Rect, SelectOption, SnapshotBuilder,
    SnapshotNode,
};
pub use write::{DomEvent, Highlight, NativeSetter, WriteAction, WritePlan, WriteReceipt};
