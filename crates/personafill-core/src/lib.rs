//! # personafill Core
//!
//! Field detection and attribute-matching engine for the personafill form
//! filler.
//!
//! ## Components
//!
//! - [`Document`] - Indexed, read-only view over a page snapshot
//! - [`Discovery`] - Finds labeled, fillable fields in reading order
//! - [`Matcher`] - Chooses a profile value for a field
//! - [`plan_write`] - Turns a match into a write plan
//! - [`FillEngine`] - Runs one fill invocation against a [`FormPage`]
//! - [`MemoryPage`] - [`FormPage`] over an owned snapshot
//!
//! [`FormPage`]: personafill_protocols::FormPage

pub mod discovery;
pub mod dom;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod memory;
pub mod selector;
pub mod writer;

pub use discovery::{Discovery, Strategy};
pub use dom::Document;
pub use engine::{FillEngine, InspectedField, Inspection};
pub use error::EngineError;
pub use matcher::{MatchTier, MatchedValue, Matcher};
pub use memory::{MemoryPage, RecordedEvent};
pub use selector::Selector;
pub use writer::{plan_write, preferred_option, resolve_target};
