//! Error types for the personafill protocol layer.

mod discovery;
mod page;
mod profile;
mod write;

pub use discovery::*;
pub use page::*;
pub use profile::*;
pub use write::*;
