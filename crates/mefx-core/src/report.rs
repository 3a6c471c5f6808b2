//! Composition reports written by the composition engine.
//!
//! A report carries the discovered parts and, when composition failed, the
//! stack of error levels. Level 0 in the file is the first level the engine
//! reported; later levels hold failures discovered further down the stack.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use mefx_error::{Error, Result};

use crate::part::{PartCatalog, PartRef};

/// One raw `(message, part)` entry as stored in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionEntry {
    pub message: String,
    pub part: String,
}

impl RejectionEntry {
    pub fn new(message: impl Into<String>, part: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            part: part.into(),
        }
    }
}

/// A rejection entry resolved against the catalog.
#[derive(Debug, Clone, Copy)]
pub struct Rejection<'p> {
    pub message: &'p str,
    pub part: &'p PartRef,
}

/// All rejections the engine reported at one depth of its error stack.
pub type ErrorLevel<'p> = Vec<Rejection<'p>>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct RawReport {
    #[serde(default)]
    parts: Vec<PartRef>,
    #[serde(default)]
    levels: Vec<Vec<RejectionEntry>>,
}

/// Parts plus the leveled error stack of one or more composition attempts.
#[derive(Debug, Default)]
pub struct CompositionReport {
    catalog: PartCatalog,
    levels: Vec<Vec<RejectionEntry>>,
}

impl CompositionReport {
    pub fn new(catalog: PartCatalog, levels: Vec<Vec<RejectionEntry>>) -> Self {
        Self { catalog, levels }
    }

    /// Decode a report from its JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawReport = serde_json::from_str(text).map_err(|err| {
            Error::deserialization_failed(err.to_string())
                .with_operation("report::from_json_str")
                .set_source(err)
        })?;

        let mut catalog = PartCatalog::new();
        for part in raw.parts {
            let name = part.name.clone();
            if !catalog.insert(part) {
                warn!(part = %name, "duplicate part definition in report, keeping the first");
            }
        }

        Ok(Self {
            catalog,
            levels: raw.levels,
        })
    }

    /// Read and decode a report file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            Error::from(err)
                .with_operation("report::load")
                .with_context("path", path.display().to_string())
        })?;

        let report = Self::from_json_str(&text)
            .map_err(|err| err.with_context("path", path.display().to_string()))?;
        debug!(
            path = %path.display(),
            parts = report.catalog.len(),
            levels = report.levels.len(),
            "loaded composition report"
        );
        Ok(report)
    }

    /// Fold another report into this one.
    ///
    /// Parts are unioned with the first definition of a name winning. Error
    /// levels are merged index by index.
    pub fn merge(&mut self, other: CompositionReport) {
        for part in other.catalog.parts().iter().cloned() {
            let name = part.name.clone();
            if !self.catalog.insert(part) {
                warn!(part = %name, "part defined by several reports, keeping the first");
            }
        }

        for (index, level) in other.levels.into_iter().enumerate() {
            match self.levels.get_mut(index) {
                Some(existing) => existing.extend(level),
                None => self.levels.push(level),
            }
        }
    }

    pub fn catalog(&self) -> &PartCatalog {
        &self.catalog
    }

    pub fn raw_levels(&self) -> &[Vec<RejectionEntry>] {
        &self.levels
    }

    /// True if the engine reported no rejections at all.
    pub fn is_clean(&self) -> bool {
        self.levels.iter().all(Vec::is_empty)
    }

    /// Resolve every level entry against the catalog.
    ///
    /// Entries with an empty part name carry no identity and are skipped.
    /// An entry naming a part the catalog does not know is an error.
    pub fn error_levels(&self) -> Result<Vec<ErrorLevel<'_>>> {
        let mut resolved = Vec::with_capacity(self.levels.len());
        for (index, level) in self.levels.iter().enumerate() {
            let mut rejections = Vec::with_capacity(level.len());
            for entry in level {
                if entry.part.is_empty() {
                    warn!(level = index + 1, "skipping rejection without a part name");
                    continue;
                }
                let part = self.catalog.get(&entry.part).ok_or_else(|| {
                    Error::part_not_found(entry.part.clone())
                        .with_operation("report::error_levels")
                        .with_context("level", (index + 1).to_string())
                })?;
                rejections.push(Rejection {
                    message: &entry.message,
                    part,
                });
            }
            resolved.push(rejections);
        }
        Ok(resolved)
    }
}
