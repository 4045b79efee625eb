//! Flow log processing: one streaming pass accumulating tag counts,
//! port/protocol counts, and the untagged count.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};

use crate::{
    lookup::{FlowKey, LookupTable},
    protocols,
};

/// Records with fewer fields than this are structurally invalid.
const MIN_FIELDS: usize = 8;
// 0-indexed positions of the fields this utility cares about.
const DSTPORT_FIELD: usize = 5;
const PROTOCOL_FIELD: usize = 7;

#[derive(Debug, Snafu)]
pub enum FlowError {
    #[snafu(display("Failed to open flow log {}: {}", path.display(), source))]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to read flow log {}: {}", path.display(), source))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Counts accumulated over one pass of a flow log. Both mappings preserve
/// first-seen insertion order, which fixes the report's row order.
#[derive(Debug, Default)]
pub struct FlowStats {
    /// Records per tag.
    pub tag_counts: IndexMap<String, u64>,
    /// Records per (destination port, protocol) pair, tagged or not.
    pub port_protocol_counts: IndexMap<FlowKey, u64>,
    /// Records whose key has no lookup table entry.
    pub untagged: u64,
    skipped: usize,
}

impl FlowStats {
    /// Total structurally valid records processed. Always equal to the sum
    /// of the tag counts plus the untagged count.
    pub fn records(&self) -> u64 {
        self.port_protocol_counts.values().sum()
    }
}

/// Streams the flow log at `path`, classifying each record against `lookup`.
///
/// Records are whitespace-delimited, one per line, and valid only with at
/// least [`MIN_FIELDS`] fields; shorter lines are skipped with a warning and
/// counted nowhere. Each valid record increments exactly one port/protocol
/// count and exactly one of a tag count or the untagged count.
pub fn process(path: impl AsRef<Path>, lookup: &LookupTable) -> Result<FlowStats, FlowError> {
    let path = path.as_ref();
    let file = File::open(path).context(OpenSnafu { path })?;
    let reader = BufReader::new(file);

    let mut stats = FlowStats::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line.context(ReadSnafu { path })?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_FIELDS {
            warn!(
                message = "Skipping flow log record with too few fields.",
                line = index + 1,
                fields = fields.len(),
            );
            stats.skipped += 1;
            continue;
        }

        let protocol = protocols::protocol_name(fields[PROTOCOL_FIELD]);
        let key = FlowKey::new(fields[DSTPORT_FIELD], protocol);

        match lookup.get(&key) {
            Some(tag) => *stats.tag_counts.entry(tag.to_string()).or_insert(0) += 1,
            None => stats.untagged += 1,
        }
        *stats.port_protocol_counts.entry(key).or_insert(0) += 1;
    }

    debug!(
        message = "Flow log processed.",
        records = stats.records(),
        skipped = stats.skipped,
    );
    Ok(stats)
}
