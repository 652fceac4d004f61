//! @ai:module:intent Patch candidate directories and the diff file inside each
//! @ai:module:layer domain
//! @ai:module:public_api PatchCandidate, PatchArtifact, locate_diff
//! @ai:module:stateless true

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name checked before scanning a candidate directory.
pub const PREFERRED_DIFF_NAME: &str = "diff";

const DIFF_EXTENSIONS: &[&str] = &[".patch", ".diff"];

/// @ai:intent A subdirectory of the patches root, not yet known to hold a diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchCandidate {
    pub name: String,
    pub dir: PathBuf,
}

/// @ai:intent A candidate whose diff file has been found; immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchArtifact {
    pub name: String,
    pub dir: PathBuf,
    pub diff_file: PathBuf,
}

impl PatchCandidate {
    /// @ai:intent Build a candidate from its directory, naming it after the last component
    /// @ai:effects pure
    pub fn from_dir(dir: &Path) -> Self {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());

        Self {
            name,
            dir: dir.to_path_buf(),
        }
    }

    /// @ai:intent Resolve the candidate into an artifact
    /// @ai:post Ok(None) when the directory holds no diff file
    /// @ai:effects fs:read
    pub fn resolve(&self) -> Result<Option<PatchArtifact>> {
        let diff_file = locate_diff(&self.dir)
            .with_context(|| format!("Failed to read patch directory {}", self.dir.display()))?;

        Ok(diff_file.map(|diff_file| PatchArtifact {
            name: self.name.clone(),
            dir: self.dir.clone(),
            diff_file,
        }))
    }
}

fn is_diff_name(name: &str) -> bool {
    name == PREFERRED_DIFF_NAME || DIFF_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// @ai:intent Find the diff file of a patch directory
/// @ai:post prefers `diff`; otherwise the first `*.patch`/`*.diff` file by name
/// @ai:effects fs:read
pub fn locate_diff(dir: &Path) -> Result<Option<PathBuf>> {
    let preferred = dir.join(PREFERRED_DIFF_NAME);
    if preferred.is_file() {
        return Ok(Some(preferred));
    }

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy();

        if entry.path().is_file() && is_diff_name(&name) {
            return Ok(Some(entry.path().to_path_buf()));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_prefers_file_named_diff() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.patch"), "").unwrap();
        std::fs::write(temp.path().join("diff"), "").unwrap();

        assert_eq!(
            locate_diff(temp.path()).unwrap(),
            Some(temp.path().join("diff"))
        );
    }

    #[test]
    fn test_falls_back_to_extension() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("notes.txt"), "").unwrap();
        std::fs::write(temp.path().join("fix.diff"), "").unwrap();
        std::fs::write(temp.path().join("zz.patch"), "").unwrap();

        assert_eq!(
            locate_diff(temp.path()).unwrap(),
            Some(temp.path().join("fix.diff"))
        );
    }

    #[test]
    fn test_directory_named_like_diff_is_ignored() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("diff")).unwrap();
        std::fs::create_dir(temp.path().join("old.patch")).unwrap();

        assert_eq!(locate_diff(temp.path()).unwrap(), None);
    }

    #[test]
    fn test_resolve_without_diff() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("Patch_7");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("README"), "no diff here").unwrap();

        let candidate = PatchCandidate::from_dir(&dir);
        assert_eq!(candidate.name, "Patch_7");
        assert_eq!(candidate.resolve().unwrap(), None);
    }

    #[test]
    fn test_resolve_with_diff() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("Patch_8");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("diff"), "--- a\n+++ b\n").unwrap();

        let artifact = PatchCandidate::from_dir(&dir).resolve().unwrap().unwrap();
        assert_eq!(artifact.name, "Patch_8");
        assert_eq!(artifact.diff_file, dir.join("diff"));
    }
}
