//! Synthetic interruption records for trying the pipeline without field data.
//!
//! Operating time and affected customers follow log-normal distributions with
//! a share of inflated outliers; DEC/FEC impacts are derived from them so the
//! columns stay loosely coherent.

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, NaiveDate};
use gridcrit_common::{Column, Dataset, GeneratorConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::LogNormal;
use tracing::info;

pub const ASSET_TYPES: [&str; 5] = ["Transformador", "Religador", "Seccionalizador", "Chave", "Regulador"];
pub const CAUSES: [&str; 5] = ["Falha Técnica", "Clima", "Falha Humana", "Animal", "Desgaste Natural"];
pub const STATUSES: [&str; 3] = ["Operacional", "Em Manutenção", "Substituído"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Generate a dataset according to `cfg`.
pub fn generate_dataset(cfg: &GeneratorConfig) -> Result<Dataset> {
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate_with_rng(cfg, &mut rng)
}

pub fn generate_with_rng<R: Rng>(cfg: &GeneratorConfig, rng: &mut R) -> Result<Dataset> {
    let start = NaiveDate::parse_from_str(&cfg.start_date, DATE_FORMAT)
        .with_context(|| format!("Invalid start_date '{}'", cfg.start_date))?;
    let end = NaiveDate::parse_from_str(&cfg.end_date, DATE_FORMAT)
        .with_context(|| format!("Invalid end_date '{}'", cfg.end_date))?;
    if end < start {
        anyhow::bail!("end_date {} is before start_date {}", end, start);
    }
    if !(0.0..=1.0).contains(&cfg.outlier_ratio) {
        anyhow::bail!("outlier_ratio must be within [0, 1], got {}", cfg.outlier_ratio);
    }

    let n = cfg.records;
    let span_days = (end - start).num_days();

    let operating_time = lognormal_with_outliers(rng, n, 3.0, 0.7, cfg.outlier_ratio)?;
    let customers = lognormal_with_outliers(rng, n, 7.0, 1.0, cfg.outlier_ratio)?;
    let failures: Vec<f64> = (0..n).map(|_| rng.gen_range(1..10) as f64).collect();

    let dec: Vec<f64> = operating_time
        .iter()
        .zip(&customers)
        .map(|(t, c)| round_to(t / 600.0 * (c / 2000.0) * rng.gen_range(0.5..2.5), 2))
        .collect();
    let fec: Vec<f64> = failures
        .iter()
        .zip(&customers)
        .map(|(f, c)| round_to(f / 10.0 * (c / 1500.0) * rng.gen_range(0.5..2.0), 2))
        .collect();

    let dates: Vec<String> = (0..n)
        .map(|_| {
            let offset = rng.gen_range(0..=span_days);
            (start + Duration::days(offset)).format(DATE_FORMAT).to_string()
        })
        .collect();

    let dataset = Dataset::new(vec![
        Column::text("Trecho", (1..=n).map(|i| format!("Trecho {i}")).collect()),
        Column::text("Ativo", pick(rng, &ASSET_TYPES, n)),
        Column::text("Data_Interrupcao", dates),
        Column::numeric("Tempo_Operacao", operating_time.iter().map(|t| t.round()).collect()),
        Column::numeric("Freq_Falhas", failures),
        Column::numeric("Clientes_Afetados", customers.iter().map(|c| c.round()).collect()),
        Column::numeric("Impacto_DEC", dec),
        Column::numeric("Impacto_FEC", fec),
        Column::text("Causa", pick(rng, &CAUSES, n)),
        Column::text("Status_Ativo", pick(rng, &STATUSES, n)),
    ])?;

    info!(n_records = n, seed = ?cfg.seed, "Synthetic dataset generated");
    Ok(dataset)
}

fn pick<R: Rng>(rng: &mut R, choices: &[&str], n: usize) -> Vec<String> {
    (0..n)
        .map(|_| choices.choose(rng).copied().unwrap_or_default().to_string())
        .collect()
}

/// `n` log-normal samples; `outlier_ratio * n` random positions are then
/// multiplied by a factor in [2, 4).
fn lognormal_with_outliers<R: Rng>(
    rng: &mut R,
    n: usize,
    mu: f64,
    sigma: f64,
    outlier_ratio: f64,
) -> Result<Vec<f64>> {
    let lognormal = LogNormal::new(mu, sigma).map_err(|e| anyhow!("{e}"))?;
    let mut values: Vec<f64> = (0..n).map(|_| rng.sample(lognormal)).collect();
    if n == 0 {
        return Ok(values);
    }
    let n_outliers = (outlier_ratio * n as f64) as usize;
    for _ in 0..n_outliers {
        let i = rng.gen_range(0..n);
        values[i] *= rng.gen_range(2.0..4.0);
    }
    Ok(values)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
