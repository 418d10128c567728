//! Host model seam.
//!
//! Groups are inserted into a host model, committed, tagged with user
//! properties and looked up again by variant flows. [`MemoryModel`] is the
//! in-memory host used by tests and by callers without a CAD host.

pub mod host;
pub mod memory;

pub use host::{GroupId, HostModel, PropertyValue, CREATING_METHOD, PARENT_ELEMENT};
pub use memory::{MemoryModel, Transaction};
