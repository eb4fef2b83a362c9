//! Target configuration subsystem.
//!
//! # Data Flow
//! ```text
//! [defaults] table ──┐
//!                    ├→ raw.rs (presence-aware decode)
//! [[targets]] table ─┘    → merge.rs (layer override over base)
//!                         → email.rs (normalize addresses)
//!                         → model.rs Target { settings, schedule, state }
//! ```
//!
//! # Design Decisions
//! - Raw tables stay untyped until this point so one bad entry fails alone
//! - Merging is field-by-field and explicit
//! - Settings are immutable and shared via Arc; schedule and state are owned

pub mod email;
pub mod error;
pub mod merge;
pub mod model;
pub mod raw;

pub use error::TargetError;
pub use merge::{merge, resolve, resolve_base, resolve_targets};
pub use model::{Schedule, Target, TargetSettings, TargetState, Transition};
pub use raw::RawTarget;
