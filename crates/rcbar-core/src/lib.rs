pub mod error;
pub mod id;
pub mod params;
pub mod tolerance;
pub mod traits;

pub use error::{RcbarError, Result};
pub use id::ElementId;
pub use params::ParameterMap;
pub use tolerance::Tolerance;
pub use traits::Validate;
