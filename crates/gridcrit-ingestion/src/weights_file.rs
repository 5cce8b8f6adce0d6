//! Weight file I/O (`Variavel,Peso` CSV).

use anyhow::{Context, Result};
use gridcrit_ranker::weights::{WeightEntry, WeightTable};
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Parse a weight table. Duplicates, negative and non-finite weights are rejected.
pub fn read_weights<R: Read>(reader: R) -> Result<WeightTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let entries = rdr
        .deserialize::<WeightEntry>()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("Invalid weight row {}", i + 1)))
        .collect::<Result<Vec<_>>>()?;
    Ok(WeightTable::new(entries)?)
}

pub fn write_weights<W: Write>(writer: W, weights: &WeightTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in weights.entries() {
        wtr.serialize(entry)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn load_weights(path: &Path) -> Result<WeightTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open weight file {}", path.display()))?;
    let weights = read_weights(file)
        .with_context(|| format!("Failed to parse weight file {}", path.display()))?;
    info!(path = %path.display(), n_weights = weights.len(), "Weights loaded");
    Ok(weights)
}

/// Write `weights` to `path`, replacing any existing file.
pub fn save_weights(path: &Path, weights: &WeightTable) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create weight file {}", path.display()))?;
    write_weights(file, weights)?;
    info!(path = %path.display(), "Weights saved");
    Ok(())
}

/// Load the weight file, or write the default table there first when it does
/// not exist yet. The flag tells whether the file was created.
pub fn load_or_create(path: &Path) -> Result<(WeightTable, bool)> {
    if path.exists() {
        return Ok((load_weights(path)?, false));
    }
    let weights = WeightTable::default();
    save_weights(path, &weights)?;
    info!(path = %path.display(), "No weight file found, default weights written");
    Ok((weights, true))
}
