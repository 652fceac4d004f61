//! @ai:module:intent Error types for conditions the batch distinguishes from ordinary failures
//! @ai:module:layer domain
//! @ai:module:public_api VerifierError
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Environment and configuration errors raised before or outside a single patch
#[derive(Error, Debug)]
pub enum VerifierError {
    /// A configured input directory does not exist; the whole batch is abandoned.
    #[error("{role} directory not found: {}", path.display())]
    MissingDirectory { role: &'static str, path: PathBuf },

    #[error("Unknown placeholder {{{placeholder}}} in command template `{template}`")]
    Template {
        template: String,
        placeholder: String,
    },
}
