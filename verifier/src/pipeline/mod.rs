//! @ai:module:intent Per-patch verification pipeline: reset, apply, compile, validate, classify
//! @ai:module:layer application
//! @ai:module:public_api PatchVerifier, VerificationReport, Stage, ProjectResetter, PatchApplier, TriggerTestDiscoverer

pub mod applier;
pub mod project;
pub mod triggers;
pub mod verifier;

pub use applier::{ApplyAttempt, ApplyReport, PatchApplier};
pub use project::{ProjectResetter, ResetMode, ResetReport};
pub use triggers::{TriggerTestDiscoverer, TriggeringTests};
pub use verifier::{PatchVerifier, Stage, VerificationReport};
