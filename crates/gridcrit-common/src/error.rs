use thiserror::Error;

#[derive(Debug, Error)]
pub enum CriticalityError {
    #[error("Variables missing from the dataset: {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    #[error("Cannot derive '{derived}': missing input column(s) {}", .missing.join(", "))]
    MissingDerivedInput { derived: String, missing: Vec<String> },

    #[error(
        "Column '{0}' is derived during scoring but already exists in the input \
         (a previously exported result?); remove it or disable the combined impact"
    )]
    DerivedColumnExists(String),

    #[error("Column '{column}' is not numeric")]
    NonNumericColumn { column: String },

    #[error("Column '{column}' has a non-finite value at row {row}")]
    NonFiniteValue { column: String, row: usize },

    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("Column '{0}' not found")]
    UnknownColumn(String),

    #[error("Column '{column}' has {found} values, expected {expected}")]
    LengthMismatch { column: String, expected: usize, found: usize },

    #[error("Dataset is empty: nothing to score")]
    EmptyDataset,

    #[error("Weight table is empty: nothing to score")]
    EmptyWeightTable,

    #[error("Negative weight {weight} for variable '{variable}'")]
    NegativeWeight { variable: String, weight: f64 },

    #[error("Non-finite weight for variable '{0}'")]
    NonFiniteWeight(String),

    #[error("Variable '{0}' appears more than once in the weight table")]
    DuplicateWeight(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CriticalityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_lists_every_variable() {
        let err = CriticalityError::SchemaMismatch {
            missing: vec!["Impacto_FEC".to_string(), "Clientes_Afetados".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Variables missing from the dataset: Impacto_FEC, Clientes_Afetados"
        );
    }

    #[test]
    fn test_missing_derived_input_names_constituent() {
        let err = CriticalityError::MissingDerivedInput {
            derived: "Impacto_DEC_FEC".to_string(),
            missing: vec!["Impacto_FEC".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Impacto_DEC_FEC"));
        assert!(msg.contains("Impacto_FEC"));
    }
}
