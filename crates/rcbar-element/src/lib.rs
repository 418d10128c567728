//! RCBar element orchestration.
//!
//! An [`Element`] loads its [`ElementConfig`], builds its profile and then
//! synthesizes and inserts the fixed sequence of reinforcement groups of its
//! family into a [`rcbar_model::HostModel`]. Variant flows in [`variant`]
//! edit an assembled element in place.

pub mod assembler;
pub mod config;
pub mod element;
pub mod export;
pub mod kind;
pub mod settings;
pub mod synth;
pub mod variant;

pub use assembler::{Assembler, GroupFailure};
pub use config::{load_parameters, parse_parameters, ElementConfig, DEFAULT_COVER};
pub use element::{Element, ElementState};
pub use export::{ElementReport, GroupEntry, LayerEntry};
pub use kind::{AbutmentGroup, End, FootingGroup, GroupKind, WallGroup};
pub use settings::GroupSettings;
pub use synth::SynthContext;
pub use variant::{lookup, MirroredWing, VariantReport, WingAttachment};
