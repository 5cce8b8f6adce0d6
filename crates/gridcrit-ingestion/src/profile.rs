//! Exploratory profile of an interruption dataset: per-column descriptive
//! statistics, category frequencies, monthly counts and pairwise correlation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use gridcrit_common::{numeric, ColumnData, Dataset};
use serde::Serialize;
use tracing::warn;

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summaries for every numeric column, in column order. Empty columns are skipped.
pub fn describe(dataset: &Dataset) -> Vec<ColumnSummary> {
    dataset
        .columns()
        .iter()
        .filter_map(|c| match &c.data {
            ColumnData::Numeric(values) => summarise(&c.name, values),
            ColumnData::Text(_) => None,
        })
        .collect()
}

fn summarise(name: &str, values: &[f64]) -> Option<ColumnSummary> {
    let (min, max) = numeric::min_max(values)?;
    Some(ColumnSummary {
        name: name.to_string(),
        count: values.len(),
        mean: numeric::mean(values)?,
        std: numeric::sample_std(values),
        min,
        q25: numeric::quantile(values, 0.25)?,
        median: numeric::quantile(values, 0.5)?,
        q75: numeric::quantile(values, 0.75)?,
        max,
    })
}

/// Occurrences of each value of a column, most frequent first; ties keep
/// first-appearance order. `None` when the column does not exist.
pub fn category_counts(dataset: &Dataset, column: &str) -> Option<Vec<(String, usize)>> {
    dataset.column(column)?;
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in dataset.records() {
        let value = record.text(column);
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Some(counts)
}

/// Interruptions per calendar month (`YYYY-MM`), chronological.
/// Cells that are not dates are skipped with a warning.
pub fn monthly_counts(dataset: &Dataset, date_column: &str) -> Option<BTreeMap<String, usize>> {
    dataset.column(date_column)?;
    let mut months = BTreeMap::new();
    let mut skipped = 0usize;
    for record in dataset.records() {
        match parse_date(&record.text(date_column)) {
            Some(date) => *months.entry(date.format("%Y-%m").to_string()).or_insert(0) += 1,
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(column = date_column, skipped, "Unparseable dates ignored");
    }
    Some(months)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let date_part = s.split(|c| c == ' ' || c == 'T').next().unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Pearson correlation between every pair of numeric columns.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major; `None` where a column is constant
    pub values: Vec<Vec<Option<f64>>>,
}

pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let numeric_cols: Vec<(&str, &[f64])> = dataset
        .columns()
        .iter()
        .filter_map(|c| c.as_numeric().map(|v| (c.name.as_str(), v)))
        .collect();
    let values = numeric_cols
        .iter()
        .map(|(_, a)| numeric_cols.iter().map(|(_, b)| numeric::pearson(a, b)).collect())
        .collect();
    CorrelationMatrix {
        columns: numeric_cols.iter().map(|(n, _)| n.to_string()).collect(),
        values,
    }
}

/// Complete profile as rendered by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetProfile {
    pub n_rows: usize,
    pub n_columns: usize,
    pub summaries: Vec<ColumnSummary>,
    pub categories: Vec<(String, Vec<(String, usize)>)>,
    pub monthly: Option<BTreeMap<String, usize>>,
    pub correlation: CorrelationMatrix,
}

pub fn profile_dataset(dataset: &Dataset, category_columns: &[&str], date_column: &str) -> DatasetProfile {
    let categories = category_columns
        .iter()
        .filter_map(|c| category_counts(dataset, c).map(|counts| (c.to_string(), counts)))
        .collect();
    DatasetProfile {
        n_rows: dataset.n_rows(),
        n_columns: dataset.n_columns(),
        summaries: describe(dataset),
        categories,
        monthly: monthly_counts(dataset, date_column),
        correlation: correlation_matrix(dataset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcrit_common::Column;
    use pretty_assertions::assert_eq;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::text("Ativo", ["Chave", "Religador", "Chave", "Regulador"].map(String::from).to_vec()),
            Column::text(
                "Data_Interrupcao",
                ["2023-01-05", "2023-01-20", "2023-03-02 10:00:00", "n/d"].map(String::from).to_vec(),
            ),
            Column::numeric("Freq_Falhas", vec![1.0, 2.0, 3.0, 4.0]),
            Column::numeric("Clientes_Afetados", vec![10.0, 20.0, 30.0, 40.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_describe_numeric_only() {
        let summaries = describe(&sample());
        assert_eq!(summaries.len(), 2);
        let f = &summaries[0];
        assert_eq!(f.name, "Freq_Falhas");
        assert_eq!(f.count, 4);
        assert_eq!(f.min, 1.0);
        assert_eq!(f.max, 4.0);
        assert!((f.mean - 2.5).abs() < 1e-12);
        assert!((f.median - 2.5).abs() < 1e-12);
        assert!((f.q25 - 1.75).abs() < 1e-12);
        assert!((f.q75 - 3.25).abs() < 1e-12);
    }

    #[test]
    fn test_category_counts() {
        let counts = category_counts(&sample(), "Ativo").unwrap();
        assert_eq!(
            counts,
            vec![("Chave".to_string(), 2), ("Religador".to_string(), 1), ("Regulador".to_string(), 1)]
        );
        assert!(category_counts(&sample(), "Causa").is_none());
    }

    #[test]
    fn test_monthly_counts() {
        let months = monthly_counts(&sample(), "Data_Interrupcao").unwrap();
        assert_eq!(months.get("2023-01"), Some(&2));
        assert_eq!(months.get("2023-03"), Some(&1));
        assert_eq!(months.len(), 2);
    }

    #[test]
    fn test_correlation_matrix() {
        let m = correlation_matrix(&sample());
        assert_eq!(m.columns, vec!["Freq_Falhas".to_string(), "Clientes_Afetados".to_string()]);
        assert!((m.values[0][1].unwrap() - 1.0).abs() < 1e-12);
        assert!((m.values[1][1].unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_profile() {
        let p = profile_dataset(&sample(), &["Ativo", "Causa"], "Data_Interrupcao");
        assert_eq!(p.n_rows, 4);
        assert_eq!(p.categories.len(), 1);
        assert!(p.monthly.is_some());
    }
}
