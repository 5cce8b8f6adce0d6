//! End-to-end criticality run.
//!
//! Strictly linear: validate → derive combined impact → normalise → score → rank.
//! Each stage returns a new dataset; the input is never modified. Any error
//! ends the run. No I/O happens here: callers pass already-loaded tables.

use chrono::{DateTime, Utc};
use gridcrit_common::{CriticalityError, Dataset, Result, ScoringConfig};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::normalise::normalise_dataset;
use crate::rank::{rank_by_index, RankedResult};
use crate::reference::{compare_with_reference, ReferenceComparison};
use crate::schema::validate_schema;
use crate::scorer::{check_combined_inputs, compute_index, derive_combined_impact, CombinedImpact};
use crate::weights::WeightTable;

/// Options for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Derived before normalisation when set
    pub combined_impact: Option<CombinedImpact>,
    pub norm_suffix: String,
    pub index_column: String,
    /// Compared against the index when the dataset has this column
    pub reference_column: Option<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&ScoringConfig::default())
    }
}

impl PipelineOptions {
    /// Plain scoring: no derived columns, no reference comparison.
    pub fn scoring_only() -> Self {
        Self {
            combined_impact: None,
            reference_column: None,
            ..Self::default()
        }
    }
}

impl From<&ScoringConfig> for PipelineOptions {
    fn from(cfg: &ScoringConfig) -> Self {
        Self {
            combined_impact: cfg.combined_impact.then(|| CombinedImpact {
                output: cfg.combined_column.clone(),
                left: cfg.dec_column.clone(),
                right: cfg.fec_column.clone(),
            }),
            norm_suffix: cfg.norm_suffix.clone(),
            index_column: cfg.index_column.clone(),
            reference_column: Some(cfg.reference_column.clone()),
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct CriticalityRun {
    pub run_id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub ranked: RankedResult,
    /// Weighted variables whose column was constant (normalised to 0)
    pub degenerate: Vec<String>,
    pub reference: Option<ReferenceComparison>,
}

/// Every input check made before any column is computed: a non-empty dataset,
/// all weighted variables available (derived ones included) and, when the
/// combined impact is enabled, its inputs present and its output free.
/// `run_criticality` starts with this, so passing it means scoring will not
/// fail on the schema.
pub fn preflight(dataset: &Dataset, weights: &WeightTable, options: &PipelineOptions) -> Result<()> {
    if dataset.n_rows() == 0 || dataset.n_columns() == 0 {
        return Err(CriticalityError::EmptyDataset);
    }
    let columns = dataset.column_names();
    let derived: Vec<&str> = options
        .combined_impact
        .as_ref()
        .map(|c| vec![c.output.as_str()])
        .unwrap_or_default();
    validate_schema(&columns, &derived, weights)?;
    if let Some(ref combined) = options.combined_impact {
        check_combined_inputs(&columns, combined)?;
    }
    Ok(())
}

/// Run the full scoring pipeline over `dataset`.
#[instrument(skip_all, fields(n_rows = dataset.n_rows(), n_weights = weights.len()))]
pub fn run_criticality(
    dataset: &Dataset,
    weights: &WeightTable,
    options: &PipelineOptions,
) -> Result<CriticalityRun> {
    preflight(dataset, weights, options)?;

    let base = match &options.combined_impact {
        Some(combined) => derive_combined_impact(dataset, combined)?,
        None => dataset.clone(),
    };

    let normalized = normalise_dataset(&base, weights, &options.norm_suffix)?;
    let scored = compute_index(&normalized.dataset, weights, &options.norm_suffix, &options.index_column)?;
    let ranked = rank_by_index(&scored, &options.index_column)?;

    let reference = match &options.reference_column {
        Some(col) => compare_with_reference(&ranked.dataset, &options.index_column, col)?,
        None => None,
    };

    let run = CriticalityRun {
        run_id: Uuid::new_v4(),
        computed_at: Utc::now(),
        ranked,
        degenerate: normalized.degenerate,
        reference,
    };

    info!(
        run_id = %run.run_id,
        n_ranked = run.ranked.len(),
        n_degenerate = run.degenerate.len(),
        "Criticality run complete"
    );
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcrit_common::Column;
    use pretty_assertions::assert_eq;

    fn three_records() -> Dataset {
        Dataset::new(vec![
            Column::text("Trecho", vec!["Trecho 1".into(), "Trecho 2".into(), "Trecho 3".into()]),
            Column::numeric("Freq_Falhas", vec![2.0, 8.0, 2.0]),
            Column::numeric("Tempo_Operacao", vec![1.0, 1.0, 5.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_three_record_scenario() {
        let w = WeightTable::from_pairs([("Freq_Falhas", 0.5), ("Tempo_Operacao", 0.5)]).unwrap();
        let run = run_criticality(&three_records(), &w, &PipelineOptions::scoring_only()).unwrap();
        let ds = &run.ranked.dataset;

        let ids: Vec<String> = ds.records().map(|r| r.text("Trecho")).collect();
        assert_eq!(ids, vec!["Trecho 2", "Trecho 3", "Trecho 1"]);
        assert_eq!(run.ranked.scores().unwrap(), &[0.5, 0.5, 0.0]);
        assert_eq!(ds.numeric("Freq_Falhas_Norm").unwrap(), &[1.0, 0.0, 0.0]);
        assert_eq!(ds.numeric("Tempo_Operacao_Norm").unwrap(), &[0.0, 1.0, 0.0]);
        assert_eq!(run.ranked.original_rows, vec![1, 2, 0]);
        assert!(run.degenerate.is_empty());
    }

    #[test]
    fn test_schema_failure_is_terminal() {
        let w = WeightTable::from_pairs([("Freq_Falhas", 0.5), ("Impacto_DEC", 0.5)]).unwrap();
        let err = run_criticality(&three_records(), &w, &PipelineOptions::scoring_only()).unwrap_err();
        assert!(matches!(err, CriticalityError::SchemaMismatch { ref missing } if missing == &["Impacto_DEC"]));
    }

    #[test]
    fn test_combined_impact_missing_input_is_terminal() {
        let w = WeightTable::from_pairs([("Freq_Falhas", 1.0)]).unwrap();
        let opts = PipelineOptions { reference_column: None, ..PipelineOptions::default() };
        let err = run_criticality(&three_records(), &w, &opts).unwrap_err();
        assert!(matches!(err, CriticalityError::MissingDerivedInput { .. }));
    }

    #[test]
    fn test_combined_impact_can_be_weighted() {
        let ds = Dataset::new(vec![
            Column::text("Trecho", vec!["a".into(), "b".into()]),
            Column::numeric("Impacto_DEC", vec![1.0, 2.0]),
            Column::numeric("Impacto_FEC", vec![0.5, 0.5]),
        ])
        .unwrap();
        let w = WeightTable::from_pairs([("Impacto_DEC_FEC", 2.0)]).unwrap();
        let run = run_criticality(&ds, &w, &PipelineOptions::default()).unwrap();
        let out = &run.ranked.dataset;
        assert_eq!(out.numeric("Impacto_DEC_FEC").unwrap(), &[2.5, 1.5]);
        assert_eq!(out.numeric("Impacto_DEC_FEC_Norm").unwrap(), &[1.0, 0.0]);
        assert_eq!(run.ranked.scores().unwrap(), &[2.0, 0.0]);
        assert!(run.reference.is_none());
    }

    #[test]
    fn test_degenerate_variable_reported() {
        let ds = Dataset::new(vec![
            Column::numeric("a", vec![5.0, 5.0, 5.0]),
            Column::numeric("b", vec![1.0, 2.0, 3.0]),
        ])
        .unwrap();
        let w = WeightTable::from_pairs([("a", 1.0), ("b", 1.0)]).unwrap();
        let run = run_criticality(&ds, &w, &PipelineOptions::scoring_only()).unwrap();
        assert_eq!(run.degenerate, vec!["a".to_string()]);
        assert!(run.ranked.scores().unwrap().iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_preflight_agrees_with_run() {
        let w = WeightTable::from_pairs([("Freq_Falhas", 0.5), ("Tempo_Operacao", 0.5)]).unwrap();
        let ds = three_records();

        let opts = PipelineOptions::default();
        let checked = preflight(&ds, &w, &opts).unwrap_err();
        let scored = run_criticality(&ds, &w, &opts).unwrap_err();
        assert!(matches!(checked, CriticalityError::MissingDerivedInput { .. }));
        assert_eq!(checked.to_string(), scored.to_string());

        let opts = PipelineOptions::scoring_only();
        assert!(preflight(&ds, &w, &opts).is_ok());
        assert!(run_criticality(&ds, &w, &opts).is_ok());
    }

    #[test]
    fn test_rescoring_an_export_is_explained() {
        let ds = Dataset::new(vec![
            Column::numeric("Impacto_DEC", vec![1.0, 2.0]),
            Column::numeric("Impacto_FEC", vec![0.5, 0.5]),
        ])
        .unwrap();
        let w = WeightTable::from_pairs([("Impacto_DEC_FEC", 1.0)]).unwrap();
        let first = run_criticality(&ds, &w, &PipelineOptions::default()).unwrap();
        let err = run_criticality(&first.ranked.dataset, &w, &PipelineOptions::default()).unwrap_err();
        assert!(matches!(err, CriticalityError::DerivedColumnExists(_)));
    }

    #[test]
    fn test_text_reference_column_does_not_abort() {
        let ds = Dataset::new(vec![
            Column::numeric("Freq_Falhas", vec![2.0, 8.0, 2.0]),
            Column::numeric("Tempo_Operacao", vec![1.0, 1.0, 5.0]),
            Column::text("Criticidade_REAL", vec!["0.3".into(), "".into(), "0.9".into()]),
        ])
        .unwrap();
        let w = WeightTable::from_pairs([("Freq_Falhas", 0.5), ("Tempo_Operacao", 0.5)]).unwrap();
        let opts = PipelineOptions { combined_impact: None, ..PipelineOptions::default() };
        let run = run_criticality(&ds, &w, &opts).unwrap();
        assert!(run.reference.is_none());
        assert_eq!(run.ranked.len(), 3);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::new(vec![Column::numeric("a", vec![])]).unwrap();
        let w = WeightTable::from_pairs([("a", 1.0)]).unwrap();
        assert!(matches!(
            run_criticality(&ds, &w, &PipelineOptions::scoring_only()),
            Err(CriticalityError::EmptyDataset)
        ));
    }

    #[test]
    fn test_options_follow_scoring_config() {
        let cfg = ScoringConfig { combined_impact: false, index_column: "score".into(), ..Default::default() };
        let opts = PipelineOptions::from(&cfg);
        assert!(opts.combined_impact.is_none());
        assert_eq!(opts.index_column, "score");
        assert_eq!(PipelineOptions::default().combined_impact, Some(CombinedImpact::default()));
    }
}
