use anyhow::Result;

use crate::{OutputFormat, Properties, RepositorySnapshot};

/// Renders the snapshot the way `format` asks for, without a trailing newline
pub fn render(
    snapshot: &RepositorySnapshot,
    format: OutputFormat,
    property_prefix: Option<&str>,
) -> Result<String> {
    let out = match format {
        OutputFormat::Properties => Properties::from_snapshot(snapshot, property_prefix)
            .to_string()
            .trim_end()
            .to_string(),
        OutputFormat::Text => snapshot.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(snapshot)?,
        OutputFormat::Version => snapshot.version(),
    };
    Ok(out)
}
