//! @ai:module:intent Patch candidate discovery and diff artifact resolution
//! @ai:module:layer domain
//! @ai:module:public_api PatchCandidate, PatchArtifact, scan_patches, SortKey

pub mod artifact;
pub mod scanner;

pub use artifact::{locate_diff, PatchArtifact, PatchCandidate, PREFERRED_DIFF_NAME};
pub use scanner::{scan_patches, sort_key, SortKey};
