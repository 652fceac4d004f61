//! @ai:module:intent Enumerate and order patch candidate directories
//! @ai:module:layer domain
//! @ai:module:public_api scan_patches, sort_key, SortKey
//! @ai:module:stateless true

use crate::patches::artifact::PatchCandidate;
use anyhow::{Context, Result};
use std::path::Path;
use walkdir::WalkDir;

/// @ai:intent Processing order key; numeric suffixes sort before plain names
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Numeric(u64),
    Lexical(String),
}

/// @ai:intent Key from the segment after the first underscore when it is all digits
/// @ai:effects pure
pub fn sort_key(name: &str) -> SortKey {
    name.split('_')
        .nth(1)
        .filter(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|segment| segment.parse().ok())
        .map(SortKey::Numeric)
        .unwrap_or_else(|| SortKey::Lexical(name.to_string()))
}

/// @ai:intent List immediate subdirectories of the patches root in processing order
/// @ai:effects fs:read
pub fn scan_patches(patches_dir: &Path) -> Result<Vec<PatchCandidate>> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(patches_dir).min_depth(1).max_depth(1) {
        let entry = entry
            .with_context(|| format!("Failed to list patches in {}", patches_dir.display()))?;

        if entry.path().is_dir() {
            candidates.push(PatchCandidate::from_dir(entry.path()));
        }
    }

    candidates.sort_by(|a, b| {
        sort_key(&a.name)
            .cmp(&sort_key(&b.name))
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(candidates)
}
