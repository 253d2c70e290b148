//! Per-file classification of template paths.
//! Decides whether a file is rendered, copied byte-for-byte, or skipped,
//! based on the spec's `raw-copy` and `init-only` glob sets and the run mode.
//!
//! Glob matching is anchored at the spec's `directory` and case-sensitive;
//! `*` stays within one path component while `**` crosses directory
//! boundaries.

use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

/// The active run mode of an apply call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Init,
    Update,
}

/// What to do with one template file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Substitute placeholders and write the result.
    Render,
    /// Copy bytes verbatim, no substitution attempted.
    RawCopy,
    /// Leave the output path completely untouched: no read, no write.
    Skip,
}

/// Compiled glob sets for one template spec.
pub struct Classifier {
    raw_copy: GlobSet,
    init_only: GlobSet,
}

impl Classifier {
    pub fn new(raw_copy: &[String], init_only: &[String]) -> Result<Self> {
        Ok(Self { raw_copy: build_glob_set(raw_copy)?, init_only: build_glob_set(init_only)? })
    }

    /// Classifies a path relative to the spec's `directory`.
    ///
    /// An `init-only` match in Update mode wins over everything else; it is
    /// what keeps first-run-only files safe across updates. Otherwise a
    /// `raw-copy` match copies and anything else renders.
    pub fn classify<P: AsRef<Path>>(&self, relative_path: P, mode: Mode) -> Classification {
        let relative_path = relative_path.as_ref();
        if mode == Mode::Update && self.init_only.is_match(relative_path) {
            return Classification::Skip;
        }
        if self.raw_copy.is_match(relative_path) {
            Classification::RawCopy
        } else {
            Classification::Render
        }
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| Error::ConfigError(format!("invalid glob pattern '{}': {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::ConfigError(format!("cannot compile glob set: {}", e)))
}
