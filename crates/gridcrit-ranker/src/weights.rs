//! Weight table for criticality scoring.
//! One non-negative coefficient per dataset variable; weights need not sum to 1.

use std::collections::HashSet;

use gridcrit_common::{CriticalityError, Result};
use serde::{Deserialize, Serialize};

/// A (variable, weight) pair. Serialised with the column names of the weight file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    #[serde(rename = "Variavel", alias = "variable")]
    pub variable: String,
    #[serde(rename = "Peso", alias = "weight")]
    pub weight: f64,
}

impl WeightEntry {
    pub fn new(variable: impl Into<String>, weight: f64) -> Self {
        Self { variable: variable.into(), weight }
    }
}

/// Ordered, immutable set of weights with unique variable names.
///
/// Construction rejects an empty table, duplicate names, and negative or
/// non-finite weights. A zero weight is kept: the variable must still exist
/// in the dataset but contributes nothing to the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTable {
    entries: Vec<WeightEntry>,
}

impl WeightTable {
    pub fn new(entries: Vec<WeightEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(CriticalityError::EmptyWeightTable);
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.variable.as_str()) {
                return Err(CriticalityError::DuplicateWeight(entry.variable.clone()));
            }
            if !entry.weight.is_finite() {
                return Err(CriticalityError::NonFiniteWeight(entry.variable.clone()));
            }
            if entry.weight < 0.0 {
                return Err(CriticalityError::NegativeWeight {
                    variable: entry.variable.clone(),
                    weight: entry.weight,
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Result<Self> {
        Self::new(pairs.into_iter().map(|(v, w)| WeightEntry::new(v, w)).collect())
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.variable.as_str())
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.variable == variable).map(|e| e.weight)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }
}

impl Default for WeightTable {
    /// Initial weights used when no weight file exists yet.
    fn default() -> Self {
        Self {
            entries: vec![
                WeightEntry::new("Freq_Falhas",       0.00),
                WeightEntry::new("Tempo_Operacao",    0.08),
                WeightEntry::new("Impacto_DEC",      32.43),
                WeightEntry::new("Impacto_FEC",      20.15),
                WeightEntry::new("Clientes_Afetados", 0.04),
            ],
        }
    }
}
