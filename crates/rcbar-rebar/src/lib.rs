//! Reinforcement data model and the shared construction idioms.
//!
//! A [`ReinforcementGroup`] is a set of bent bars defined by generating
//! faces, a placement guideline with a spacing rule, and modifiers attached
//! after insertion. [`layout::realize`] turns a group into placed bars.

pub mod construct;
pub mod face;
pub mod group;
pub mod guideline;
pub mod layout;
pub mod modifier;
pub mod spacing;

pub use face::GeneratingFace;
pub use group::{BarProperties, ReinforcementGroup};
pub use guideline::{PlacementGuideline, SecondaryGuideline};
pub use layout::{realize, PlacedBar};
pub use modifier::{
    BarSubset, HookShape, LapPlacement, LapSide, LengthAdjustment, Modifier, ReferenceCurve,
    splitter_pair,
};
pub use spacing::{ExtentType, OffsetType, PitchType, SpacingLayout, SpacingRule, SpacingZone};
