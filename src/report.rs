//! Serialization of the accumulated counts into the two-section CSV report.

use std::{
    fs,
    path::{Path, PathBuf},
};

use snafu::{ResultExt, Snafu};

use crate::flow::FlowStats;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Failed to serialize report row: {source}"))]
    Serialize { source: csv::Error },

    #[snafu(display("Failed to write report to {}: {}", path.display(), source))]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Renders the report: tag counts (with the `Untagged` row always present,
/// even at zero), a blank separator row, then port/protocol counts. Rows
/// follow the accumulators' insertion order.
pub fn render(stats: &FlowStats) -> Result<String, ReportError> {
    let mut tags = Vec::with_capacity(stats.tag_counts.len() + 2);
    tags.push(vec!["Tag".to_string(), "Count".to_string()]);
    for (tag, count) in &stats.tag_counts {
        tags.push(vec![tag.clone(), count.to_string()]);
    }
    tags.push(vec!["Untagged".to_string(), stats.untagged.to_string()]);

    let mut pairs = Vec::with_capacity(stats.port_protocol_counts.len() + 1);
    pairs.push(vec![
        "Port".to_string(),
        "Protocol".to_string(),
        "Count".to_string(),
    ]);
    for (key, count) in &stats.port_protocol_counts {
        pairs.push(vec![key.port.clone(), key.protocol.clone(), count.to_string()]);
    }

    Ok([render_section(tags)?, render_section(pairs)?].join("\n"))
}

/// Renders the report and writes it to `path` in one shot. On failure,
/// whatever made it to disk stays there; there is no cleanup.
pub fn write(path: impl AsRef<Path>, stats: &FlowStats) -> Result<(), ReportError> {
    let path = path.as_ref();
    let contents = render(stats)?;
    fs::write(path, contents).context(WriteSnafu { path })
}

fn render_section(rows: Vec<Vec<String>>) -> Result<String, ReportError> {
    let mut buffer = Vec::new();
    let mut writer = csv::Writer::from_writer(&mut buffer);
    for row in rows {
        writer.write_record(&row).context(SerializeSnafu)?;
    }
    // The writer flushes on drop, and flushing into a Vec cannot fail.
    drop(writer);
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
