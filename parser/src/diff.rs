//! @ai:module:intent Parse unified diffs and compute path-strip levels for the patch tool
//! @ai:module:layer domain
//! @ai:module:public_api parse_diff, UnifiedDiff, FilePatch, strip_path, project_strip_level, candidate_strip_levels
//! @ai:module:stateless true

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, MAIN_SEPARATOR};

/// @ai:intent One file section of a unified diff
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilePatch {
    pub old_path: String,
    pub new_path: String,
    pub hunks: usize,
    pub added: usize,
    pub removed: usize,
}

impl FilePatch {
    /// @ai:intent Path the patch tool will modify (the old path for deletions)
    /// @ai:effects pure
    pub fn target(&self) -> &str {
        if self.new_path == "/dev/null" {
            &self.old_path
        } else {
            &self.new_path
        }
    }

    /// @ai:intent Target path after stripping `level` leading components
    /// @ai:effects pure
    pub fn target_at(&self, level: usize) -> Option<String> {
        strip_path(self.target(), level)
    }
}

/// @ai:intent A parsed unified diff
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnifiedDiff {
    pub files: Vec<FilePatch>,
}

impl UnifiedDiff {
    /// @ai:intent Total number of hunks across all files
    pub fn hunk_count(&self) -> usize {
        self.files.iter().map(|f| f.hunks).sum()
    }

    /// @ai:intent Whether every file header uses an absolute path
    /// @ai:effects pure
    pub fn has_absolute_paths(&self) -> bool {
        !self.files.is_empty() && self.files.iter().all(|f| f.target().starts_with('/'))
    }
}

/// @ai:intent Parse the text of a unified diff into per-file sections
/// @ai:pre text is the content of a unified diff (other noise lines are ignored)
/// @ai:post every FilePatch has at least one header pair
/// @ai:effects pure
pub fn parse_diff(text: &str) -> Result<UnifiedDiff> {
    let hunk_header = Regex::new(r"^@@ -\d+(?:,(\d+))? \+\d+(?:,(\d+))? @@")
        .expect("hunk header regex is valid");

    let mut diff = UnifiedDiff::default();
    let mut lines = text.lines().enumerate().peekable();
    let mut old_remaining = 0usize;
    let mut new_remaining = 0usize;

    while let Some((index, line)) = lines.next() {
        let line_no = index + 1;

        if old_remaining > 0 || new_remaining > 0 {
            let Some(current) = diff.files.last_mut() else {
                return Err(Error::InvalidDiff {
                    line: line_no,
                    message: "hunk body outside of a file section".to_string(),
                });
            };

            match line.chars().next() {
                Some('+') => {
                    current.added += 1;
                    new_remaining = new_remaining.saturating_sub(1);
                }
                Some('-') => {
                    current.removed += 1;
                    old_remaining = old_remaining.saturating_sub(1);
                }
                Some('\\') => {}
                // Some generators drop the leading space on empty context lines
                Some(' ') | None => {
                    old_remaining = old_remaining.saturating_sub(1);
                    new_remaining = new_remaining.saturating_sub(1);
                }
                Some(_) => {
                    return Err(Error::InvalidDiff {
                        line: line_no,
                        message: format!("unexpected line inside hunk: {line}"),
                    });
                }
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("--- ") {
            let old_path = header_path(rest);
            let new_path = match lines.peek() {
                Some((_, next)) if next.starts_with("+++ ") => {
                    let path = header_path(&next[4..]);
                    lines.next();
                    path
                }
                _ => {
                    return Err(Error::InvalidDiff {
                        line: line_no,
                        message: "'---' header not followed by '+++' header".to_string(),
                    });
                }
            };

            diff.files.push(FilePatch {
                old_path,
                new_path,
                hunks: 0,
                added: 0,
                removed: 0,
            });
            continue;
        }

        if let Some(caps) = hunk_header.captures(line) {
            let Some(current) = diff.files.last_mut() else {
                return Err(Error::InvalidDiff {
                    line: line_no,
                    message: "hunk header before any file header".to_string(),
                });
            };

            current.hunks += 1;
            old_remaining = hunk_length(caps.get(1).map(|m| m.as_str()));
            new_remaining = hunk_length(caps.get(2).map(|m| m.as_str()));
        }
    }

    Ok(diff)
}

/// Header paths may carry a tab-separated timestamp.
fn header_path(rest: &str) -> String {
    rest.split('\t').next().unwrap_or(rest).trim().to_string()
}

/// An omitted hunk length means one line.
fn hunk_length(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.parse().ok()).unwrap_or(1)
}

/// @ai:intent Strip `level` leading path components the way `patch -pN` does
/// @ai:post None when the path has fewer than `level` separators
/// @ai:effects pure
/// @ai:example strip_path("/home/x/Math_2/src/A.java", 4) -> Some("src/A.java")
pub fn strip_path(path: &str, level: usize) -> Option<String> {
    if level == 0 {
        return Some(path.to_string());
    }

    let mut seen = 0;

    for (idx, ch) in path.char_indices() {
        if ch == '/' {
            seen += 1;

            if seen == level {
                return Some(path[idx + 1..].to_string());
            }
        }
    }

    None
}

/// @ai:intent Strip level that removes an absolute project directory prefix from diff headers
/// @ai:pre project_dir is absolute
/// @ai:post result = number of separators in project_dir + 1
/// @ai:effects pure
pub fn project_strip_level(project_dir: &Path) -> usize {
    project_dir
        .to_string_lossy()
        .matches(MAIN_SEPARATOR)
        .count()
        + 1
}

/// @ai:intent Ordered strip levels the applier tries: project-derived, absolute, conventional
/// @ai:pre project_dir is absolute
/// @ai:effects pure
pub fn candidate_strip_levels(project_dir: &Path) -> [usize; 3] {
    [project_strip_level(project_dir), 0, 1]
}
