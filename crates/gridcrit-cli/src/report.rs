//! Terminal tables for the CLI.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use gridcrit_common::{Dataset, ScoringConfig};
use gridcrit_ingestion::profile::DatasetProfile;
use gridcrit_ranker::reference::ReferenceComparison;
use gridcrit_ranker::{CriticalityRun, WeightTable};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table
}

fn number(value: f64, precision: usize) -> Cell {
    Cell::new(format!("{value:.precision$}")).set_alignment(CellAlignment::Right)
}

fn optional(value: Option<f64>, precision: usize) -> Cell {
    match value {
        Some(v) => number(v, precision),
        None => Cell::new("-").set_alignment(CellAlignment::Right),
    }
}

/// Weight table with each variable's share of the total.
pub fn weights_table(weights: &WeightTable) -> Table {
    let total = weights.total();
    let mut table = new_table();
    table.set_header(vec!["Variable", "Weight", "Share"]);
    for entry in weights.entries() {
        let share = if total > 0.0 { entry.weight / total * 100.0 } else { 0.0 };
        table.add_row(vec![
            Cell::new(&entry.variable),
            number(entry.weight, 2),
            Cell::new(format!("{share:.1}%")).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// First `top_n` ranked records: identifier, asset, raw weighted variables and index.
pub fn ranking_table(
    ranked: &Dataset,
    weights: &WeightTable,
    scoring: &ScoringConfig,
    top_n: usize,
    precision: usize,
) -> Table {
    let mut header = vec!["#".to_string()];
    let labels: Vec<&str> = [scoring.identifier_column.as_str(), scoring.asset_column.as_str()]
        .into_iter()
        .filter(|c| ranked.has_column(c))
        .collect();
    header.extend(labels.iter().map(|c| c.to_string()));
    header.extend(weights.variables().map(String::from));
    header.push(scoring.index_column.clone());

    let mut table = new_table();
    table.set_header(header);
    for record in ranked.records().take(top_n) {
        let mut row = vec![Cell::new(record.row() + 1).set_alignment(CellAlignment::Right)];
        row.extend(labels.iter().map(|c| Cell::new(record.text(c))));
        row.extend(weights.variables().map(|v| optional(record.number(v), 2)));
        row.push(optional(record.number(&scoring.index_column), precision));
        table.add_row(row);
    }
    table
}

pub fn reference_table(cmp: &ReferenceComparison) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Reference", "Records", "Pearson r", "Mean |diff|"]);
    table.add_row(vec![
        Cell::new(&cmp.reference_column),
        Cell::new(cmp.n_records).set_alignment(CellAlignment::Right),
        optional(cmp.pearson, 3),
        number(cmp.mean_abs_diff, 3),
    ]);
    table
}

/// One-line run summary printed under the ranking.
pub fn run_summary(run: &CriticalityRun) -> String {
    let mut summary = format!(
        "run {} at {}: {} records ranked",
        run.run_id,
        run.computed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        run.ranked.len()
    );
    if !run.degenerate.is_empty() {
        summary.push_str(&format!("; constant columns scored as 0: {}", run.degenerate.join(", ")));
    }
    summary
}

/// Descriptive statistics, category frequencies, monthly counts and correlation.
pub fn profile_tables(profile: &DatasetProfile) -> Vec<(String, Table)> {
    let mut tables = Vec::new();

    let mut stats = new_table();
    stats.set_header(vec!["Column", "Count", "Mean", "Std", "Min", "25%", "50%", "75%", "Max"]);
    for s in &profile.summaries {
        stats.add_row(vec![
            Cell::new(&s.name),
            Cell::new(s.count).set_alignment(CellAlignment::Right),
            number(s.mean, 2),
            optional(s.std, 2),
            number(s.min, 2),
            number(s.q25, 2),
            number(s.median, 2),
            number(s.q75, 2),
            number(s.max, 2),
        ]);
    }
    tables.push((format!("{} records, {} columns", profile.n_rows, profile.n_columns), stats));

    for (column, counts) in &profile.categories {
        let mut table = new_table();
        table.set_header(vec![column.as_str(), "Count"]);
        for (value, n) in counts {
            table.add_row(vec![Cell::new(value), Cell::new(n).set_alignment(CellAlignment::Right)]);
        }
        tables.push((format!("Frequency of {column}"), table));
    }

    if let Some(ref monthly) = profile.monthly {
        let mut table = new_table();
        table.set_header(vec!["Month", "Interruptions"]);
        for (month, n) in monthly {
            table.add_row(vec![Cell::new(month), Cell::new(n).set_alignment(CellAlignment::Right)]);
        }
        tables.push(("Interruptions per month".to_string(), table));
    }

    let corr = &profile.correlation;
    if !corr.columns.is_empty() {
        let mut table = new_table();
        let mut header = vec![String::new()];
        header.extend(corr.columns.iter().cloned());
        table.set_header(header);
        for (name, row) in corr.columns.iter().zip(&corr.values) {
            let mut cells = vec![Cell::new(name)];
            cells.extend(row.iter().map(|v| optional(*v, 2)));
            table.add_row(cells);
        }
        tables.push(("Correlation".to_string(), table));
    }

    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcrit_common::Column;
    use gridcrit_ranker::{run_criticality, PipelineOptions};

    fn ranked() -> (CriticalityRun, WeightTable) {
        let dataset = Dataset::new(vec![
            Column::text("Trecho", vec!["Trecho 1".into(), "Trecho 2".into(), "Trecho 3".into()]),
            Column::text("Ativo", vec!["Chave".into(), "Religador".into(), "Regulador".into()]),
            Column::numeric("Freq_Falhas", vec![1.0, 9.0, 4.0]),
            Column::numeric("Tempo_Operacao", vec![3.0, 3.0, 3.0]),
        ])
        .unwrap();
        let weights = WeightTable::from_pairs([("Freq_Falhas", 2.0), ("Tempo_Operacao", 1.0)]).unwrap();
        let run = run_criticality(&dataset, &weights, &PipelineOptions::scoring_only()).unwrap();
        (run, weights)
    }

    #[test]
    fn test_ranking_table_lists_top_records_first() {
        let (run, weights) = ranked();
        let rendered = ranking_table(&run.ranked.dataset, &weights, &ScoringConfig::default(), 2, 2).to_string();
        assert!(rendered.contains("Indice_Criticidade"));
        assert!(rendered.contains("2.00"));
        assert!(!rendered.contains("Trecho 1"));
        let first = rendered.find("Trecho 2").unwrap();
        let second = rendered.find("Trecho 3").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_run_summary_names_constant_columns() {
        let (run, _) = ranked();
        let summary = run_summary(&run);
        assert!(summary.contains("3 records ranked"));
        assert!(summary.contains("Tempo_Operacao"));
    }

    #[test]
    fn test_weights_table_shares() {
        let weights = WeightTable::from_pairs([("A", 3.0), ("B", 1.0)]).unwrap();
        let rendered = weights_table(&weights).to_string();
        assert!(rendered.contains("75.0%"));
        assert!(rendered.contains("25.0%"));
    }
}
