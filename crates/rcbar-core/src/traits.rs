use crate::error::Result;

/// Validate structural invariants of a profile, rule or group.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
