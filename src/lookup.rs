//! The tag lookup table, loaded once per run from a CSV reference file.

use std::{
    collections::HashMap,
    fmt,
    fs::File,
    path::{Path, PathBuf},
};

use snafu::{ResultExt, Snafu};
use tracing::warn;

/// The join key between flow log records and the lookup table: destination
/// port and protocol name, both lowercased on construction so matching is
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlowKey {
    pub port: String,
    pub protocol: String,
}

impl FlowKey {
    pub fn new(port: &str, protocol: &str) -> Self {
        Self {
            port: port.to_lowercase(),
            protocol: protocol.to_lowercase(),
        }
    }
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.port, self.protocol)
    }
}

#[derive(Debug, Snafu)]
pub enum LookupError {
    #[snafu(display("Failed to open lookup table {}: {}", path.display(), source))]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to read lookup table {}: {}", path.display(), source))]
    Read { path: PathBuf, source: csv::Error },
}

/// Mapping from [`FlowKey`] to the user-assigned tag. Read-only once loaded.
#[derive(Debug, Default)]
pub struct LookupTable {
    mappings: HashMap<FlowKey, String>,
    skipped: usize,
}

impl LookupTable {
    /// Loads the table from a CSV file with one header row (discarded
    /// unconditionally) followed by `dstport,protocol,tag` rows. Rows with
    /// any other field count are skipped with a warning. When the same key
    /// appears more than once, the last row in file order wins. Tags are
    /// stored verbatim; only the key is lowercased.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LookupError> {
        let path = path.as_ref();
        let file = File::open(path).context(OpenSnafu { path })?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let mut table = Self::default();
        for record in reader.records() {
            let record = record.context(ReadSnafu { path })?;
            if record.len() != 3 {
                let line = record.position().map_or(0, csv::Position::line);
                warn!(
                    message = "Skipping lookup table row with unexpected field count.",
                    line = line,
                    fields = record.len(),
                    row = ?record,
                );
                table.skipped += 1;
                continue;
            }
            table.insert(FlowKey::new(&record[0], &record[1]), record[2].to_string());
        }
        Ok(table)
    }

    fn insert(&mut self, key: FlowKey, tag: String) {
        self.mappings.insert(key, tag);
    }

    pub fn get(&self, key: &FlowKey) -> Option<&str> {
        self.mappings.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Number of malformed rows dropped while loading.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl FromIterator<(FlowKey, String)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (FlowKey, String)>>(iter: I) -> Self {
        Self {
            mappings: iter.into_iter().collect(),
            skipped: 0,
        }
    }
}
