//! Prelude module for convenient imports.

pub use crate::canonical::{CanonicalRoute, canonicalize};
pub use crate::corrector::{Correction, FeeAwareCorrector, PassthroughReason};
pub use crate::engine::QuoteEngine;
pub use crate::error::QuoteError;
pub use crate::policy::{CorrectionPolicy, HopStability, SingleHopPolicy};
