//! Whitelists of parts whose rejection is expected.
//!
//! A whitelist file holds one entry per line. In exact mode an entry is a part
//! name; in regex mode it is a pattern that must match the whole part name,
//! ignoring case. The strategy is picked once and handed to the graph builder.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use mefx_error::{Error, Result};

/// Time budget for a single pattern match.
///
/// The match is not interrupted: a result that arrives after the budget is
/// discarded and counts as a miss. Matching itself runs in time linear in
/// the part name, and `PATTERN_SIZE_LIMIT` bounds the compiled pattern.
pub const MAX_MATCH_TIME: Duration = Duration::from_secs(5);

/// Compiled program size limit for one whitelist pattern. Larger patterns
/// fail to compile and are skipped.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Decides whether a rejected part was expected to fail.
pub trait Whitelist {
    fn is_whitelisted(&self, part_name: &str) -> bool;
}

impl<F> Whitelist for F
where
    F: Fn(&str) -> bool,
{
    fn is_whitelisted(&self, part_name: &str) -> bool {
        self(part_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhitelistMode {
    #[default]
    Exact,
    Regex,
}

/// Exact, case-sensitive part-name membership.
#[derive(Debug, Clone, Default)]
pub struct ExactWhitelist {
    names: HashSet<String>,
}

impl ExactWhitelist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Whitelist for ExactWhitelist {
    fn is_whitelisted(&self, part_name: &str) -> bool {
        self.names.contains(part_name)
    }
}

/// Anchored, case-insensitive pattern matching with a per-match time cap.
#[derive(Debug, Clone)]
pub struct RegexWhitelist {
    patterns: Vec<Regex>,
    max_match_time: Duration,
}

impl Default for RegexWhitelist {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            max_match_time: MAX_MATCH_TIME,
        }
    }
}

impl RegexWhitelist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile one whitelist entry into a full-match pattern.
    pub fn compile(entry: &str) -> Result<Regex> {
        RegexBuilder::new(&format!("^(?:{entry})$"))
            .case_insensitive(true)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
            .map_err(|err| {
                Error::invalid_pattern(entry)
                    .with_operation("whitelist::compile")
                    .set_source(err)
            })
    }

    /// Build from whitelist lines. Patterns that fail to compile are logged
    /// and skipped; the remaining ones stay active.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut whitelist = Self::new();
        for line in lines {
            let entry = line.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            match Self::compile(entry) {
                Ok(pattern) => whitelist.patterns.push(pattern),
                Err(err) => warn!(error = %err, "skipping whitelist pattern"),
            }
        }
        whitelist
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Whitelist for RegexWhitelist {
    fn is_whitelisted(&self, part_name: &str) -> bool {
        for pattern in &self.patterns {
            let start = Instant::now();
            let matched = pattern.is_match(part_name);
            if start.elapsed() > self.max_match_time {
                warn!(
                    pattern = pattern.as_str(),
                    part = part_name,
                    "whitelist match exceeded its time limit, treating as no match"
                );
                continue;
            }
            if matched {
                return true;
            }
        }
        false
    }
}

/// Read a whitelist file and build the strategy for `mode`.
pub fn load_whitelist(path: impl AsRef<Path>, mode: WhitelistMode) -> Result<Box<dyn Whitelist>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| {
        Error::from(err)
            .with_operation("whitelist::load")
            .with_context("path", path.display().to_string())
    })?;

    let whitelist: Box<dyn Whitelist> = match mode {
        WhitelistMode::Exact => {
            let exact = ExactWhitelist::from_lines(text.lines());
            debug!(entries = exact.len(), "loaded exact whitelist");
            Box::new(exact)
        }
        WhitelistMode::Regex => {
            let regex = RegexWhitelist::from_lines(text.lines());
            debug!(patterns = regex.len(), "loaded regex whitelist");
            Box::new(regex)
        }
    };
    Ok(whitelist)
}
