//! Per-project record of the committers currently working together.
//!
//! Each line of the `committersset` file looks like
//! `initials1,...,initialsN,<epoch-millis>,<project root>`. The project root is
//! the last field so paths containing commas still round trip.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use super::committer::Committer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitterSetRecord {
    pub initials: Vec<String>,
    pub set_at_millis: u128,
    pub project_root: PathBuf,
}

impl CommitterSetRecord {
    pub fn new(committers: &[Committer], set_at_millis: u128, project_root: &Path) -> Self {
        Self {
            initials: committers
                .iter()
                .map(|c| c.initials().to_string())
                .collect(),
            set_at_millis,
            project_root: project_root.to_path_buf(),
        }
    }

    pub fn parse(line: &str) -> Result<Self> {
        let (rest, root) = line
            .rsplit_once(',')
            .ok_or_else(|| anyhow!("malformed committer set record: '{line}'"))?;
        let (initials, millis) = rest
            .rsplit_once(',')
            .ok_or_else(|| anyhow!("malformed committer set record: '{line}'"))?;
        let set_at_millis = millis
            .trim()
            .parse::<u128>()
            .with_context(|| format!("parse timestamp in committer set record '{line}'"))?;
        let initials: Vec<String> = initials
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if initials.is_empty() {
            return Err(anyhow!("committer set record has no initials: '{line}'"));
        }
        Ok(Self {
            initials,
            set_at_millis,
            project_root: PathBuf::from(root),
        })
    }

    pub fn to_line(&self) -> String {
        format!(
            "{},{},{}",
            self.initials.join(","),
            self.set_at_millis,
            self.project_root.display()
        )
    }
}

/// Find the record for `project_root`, skipping lines that do not parse.
pub fn find_record(lines: &[String], project_root: &Path) -> Option<CommitterSetRecord> {
    lines
        .iter()
        .filter_map(|line| CommitterSetRecord::parse(line).ok())
        .find(|record| record.project_root == project_root)
}

/// Replace the record for `record.project_root`, keeping every other line.
pub fn replace_record(lines: &[String], record: &CommitterSetRecord) -> Vec<String> {
    let mut out: Vec<String> = lines
        .iter()
        .filter(|line| {
            CommitterSetRecord::parse(line)
                .map(|existing| existing.project_root != record.project_root)
                .unwrap_or(true)
        })
        .filter(|line| !line.trim().is_empty())
        .cloned()
        .collect();
    out.push(record.to_line());
    out
}

/// Move the first committer to the back so the next one authors.
pub fn rotate(committers: &[Committer]) -> Vec<Committer> {
    let mut rotated = committers.to_vec();
    if !rotated.is_empty() {
        rotated.rotate_left(1);
    }
    rotated
}
