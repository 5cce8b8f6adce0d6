//! Run configuration for a criticality analysis.
//!
//! Every file location is an explicit setting here; nothing in the workspace
//! hardcodes a path. Loadable from TOML, YAML or JSON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration for one invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Input and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Column names and derivations used by the scoring engine
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Synthetic dataset generation
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Report options
    #[serde(default)]
    pub output: OutputConfig,
}

// ── Paths ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory the file names below are resolved against
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Interruption records (CSV)
    #[serde(default = "default_dataset_file")]
    pub dataset_file: PathBuf,

    /// Weight table (CSV, `Variavel,Peso`)
    #[serde(default = "default_weights_file")]
    pub weights_file: PathBuf,

    /// Ranked result (CSV), replaced on every run
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
}

fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_dataset_file() -> PathBuf { PathBuf::from("interrupcoes_light.csv") }
fn default_weights_file() -> PathBuf { PathBuf::from("pesos_anal_criticidade.csv") }
fn default_output_file() -> PathBuf { PathBuf::from("matriz_priorizacao.csv") }

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            dataset_file: default_dataset_file(),
            weights_file: default_weights_file(),
            output_file: default_output_file(),
        }
    }
}

impl PathsConfig {
    pub fn dataset_path(&self) -> PathBuf {
        self.resolve(&self.dataset_file)
    }

    pub fn weights_path(&self) -> PathBuf {
        self.resolve(&self.weights_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_file)
    }

    /// Absolute file names are used as-is.
    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_dir.join(file)
        }
    }
}

// ── Scoring ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Column that identifies each record
    #[serde(default = "default_identifier_column")]
    pub identifier_column: String,

    /// Asset type column shown next to the identifier in reports
    #[serde(default = "default_asset_column")]
    pub asset_column: String,

    /// Derive the combined DEC+FEC impact before normalisation
    #[serde(default = "default_true")]
    pub combined_impact: bool,

    #[serde(default = "default_combined_column")]
    pub combined_column: String,

    #[serde(default = "default_dec_column")]
    pub dec_column: String,

    #[serde(default = "default_fec_column")]
    pub fec_column: String,

    /// Known criticality to compare the computed index against, when present
    #[serde(default = "default_reference_column")]
    pub reference_column: String,

    /// Suffix appended to a variable name for its normalised column
    #[serde(default = "default_norm_suffix")]
    pub norm_suffix: String,

    #[serde(default = "default_index_column")]
    pub index_column: String,
}

fn default_true() -> bool { true }
fn default_identifier_column() -> String { "Trecho".to_string() }
fn default_asset_column() -> String { "Ativo".to_string() }
fn default_combined_column() -> String { "Impacto_DEC_FEC".to_string() }
fn default_dec_column() -> String { "Impacto_DEC".to_string() }
fn default_fec_column() -> String { "Impacto_FEC".to_string() }
fn default_reference_column() -> String { "Criticidade_REAL".to_string() }
fn default_norm_suffix() -> String { "_Norm".to_string() }
fn default_index_column() -> String { "Indice_Criticidade".to_string() }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            identifier_column: default_identifier_column(),
            asset_column: default_asset_column(),
            combined_impact: default_true(),
            combined_column: default_combined_column(),
            dec_column: default_dec_column(),
            fec_column: default_fec_column(),
            reference_column: default_reference_column(),
            norm_suffix: default_norm_suffix(),
            index_column: default_index_column(),
        }
    }
}

// ── Generator ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of synthetic records
    #[serde(default = "default_records")]
    pub records: usize,

    /// Fixed seed for reproducible datasets; random when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// First interruption date (YYYY-MM-DD)
    #[serde(default = "default_start_date")]
    pub start_date: String,

    /// Last interruption date (YYYY-MM-DD)
    #[serde(default = "default_end_date")]
    pub end_date: String,

    /// Share of values inflated into outliers
    #[serde(default = "default_outlier_ratio")]
    pub outlier_ratio: f64,
}

fn default_records() -> usize { 200 }
fn default_start_date() -> String { "2023-01-01".to_string() }
fn default_end_date() -> String { "2024-12-31".to_string() }
fn default_outlier_ratio() -> f64 { 0.05 }

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            records: default_records(),
            seed: None,
            start_date: default_start_date(),
            end_date: default_end_date(),
            outlier_ratio: default_outlier_ratio(),
        }
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Rows shown in the terminal ranking
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Decimal places for the index in reports
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_top_n() -> usize { 20 }
fn default_precision() -> usize { 2 }

impl Default for OutputConfig {
    fn default() -> Self {
        Self { top_n: default_top_n(), precision: default_precision() }
    }
}

// ── Helper Methods ─────────────────────────────────────────────────────────────

impl RunConfig {
    /// Load from a file, picking the format from its extension
    /// (`.toml`, `.yaml`/`.yml`, `.json`).
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            Some("toml") | None => Self::from_toml_str(&content),
            Some(other) => anyhow::bail!("Unsupported config format: .{other}"),
        }
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Save as TOML
    pub fn to_toml(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.scoring.identifier_column, "Trecho");
        assert_eq!(config.scoring.norm_suffix, "_Norm");
        assert!(config.scoring.combined_impact);
        assert_eq!(config.generator.records, 200);
        assert_eq!(
            config.paths.dataset_path(),
            PathBuf::from("data").join("interrupcoes_light.csv")
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RunConfig::from_toml_str(
            r#"
            [paths]
            data_dir = "/srv/grid"

            [scoring]
            combined_impact = false
            "#,
        )
        .unwrap();
        assert_eq!(config.paths.weights_path(), PathBuf::from("/srv/grid/pesos_anal_criticidade.csv"));
        assert!(!config.scoring.combined_impact);
        assert_eq!(config.scoring.index_column, "Indice_Criticidade");
        assert_eq!(config.output.top_n, 20);
    }

    #[test]
    fn test_absolute_file_ignores_data_dir() {
        let paths = PathsConfig {
            output_file: PathBuf::from("/tmp/out.csv"),
            ..Default::default()
        };
        assert_eq!(paths.output_path(), PathBuf::from("/tmp/out.csv"));
    }

    #[test]
    fn test_yaml_and_json() {
        let yaml = RunConfig::from_yaml_str("generator:\n  records: 50\n  seed: 7\n").unwrap();
        assert_eq!(yaml.generator.records, 50);
        assert_eq!(yaml.generator.seed, Some(7));

        let json = RunConfig::from_json_str(r#"{"output": {"top_n": 5}}"#).unwrap();
        assert_eq!(json.output.top_n, 5);
        assert_eq!(json.output.precision, 2);
    }

    #[test]
    fn test_from_path_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gridcrit.toml");
        let mut config = RunConfig::default();
        config.output.top_n = 3;
        config.to_toml(&path).unwrap();

        let loaded = RunConfig::from_path(&path).unwrap();
        assert_eq!(loaded.output.top_n, 3);

        let bad = dir.path().join("gridcrit.ini");
        std::fs::write(&bad, "").unwrap();
        assert!(RunConfig::from_path(&bad).is_err());
    }
}
