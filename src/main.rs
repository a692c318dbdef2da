use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use mrscraper::{
    clean::{CleanConfig, ResolvePolicy},
    fetch,
    pipeline::{budget, football, index_report},
    store,
    table::Summary,
};

const DEFAULT_BUDGET_URL: &str = "https://services.tresor.mr/budget";
const DEFAULT_INPC_PDF_URL: &str =
    "https://ansade.mr/wp-content/uploads/2026/01/Note-INPC-decembre-2025_FR_VF.pdf";

#[derive(Serialize)]
struct KpiEntry {
    status: String,
    rows: usize,
    missing_values: usize,
}

impl KpiEntry {
    fn fail() -> Self {
        Self {
            status: "FAIL".into(),
            rows: 0,
            missing_values: 0,
        }
    }

    fn ok(summary: Summary) -> Self {
        Self {
            status: "OK".into(),
            rows: summary.row_count,
            missing_values: summary.missing_value_count,
        }
    }
}

#[derive(Serialize)]
struct KpiReport {
    scraped_at: String,
    budget: KpiEntry,
    football: KpiEntry,
    inpc: KpiEntry,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!("startup");

    let out_dir = PathBuf::from(env::var("OUTPUT_DIR").unwrap_or_else(|_| "out".into()));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let scraped_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false);
    let cfg = CleanConfig::default();
    let client = fetch::build_client()?;

    let mut kpi = KpiReport {
        scraped_at: scraped_at.clone(),
        budget: KpiEntry::fail(),
        football: KpiEntry::fail(),
        inpc: KpiEntry::fail(),
    };
    let mut report = vec![
        "# mrscraper — Run report".to_string(),
        format!("- scraped_at: {}", scraped_at),
    ];

    // Each source runs once and in isolation: a failure becomes a FAIL line
    // and the run carries on with the next source.
    match run_football(&client, &out_dir, &scraped_at).await {
        Ok(summary) => {
            info!(rows = summary.row_count, "football done");
            kpi.football = KpiEntry::ok(summary);
            report.push(format!("- Football: OK ({} rows)", summary.row_count));
        }
        Err(e) => {
            error!("football failed: {:#}", e);
            report.push(format!("- Football: FAIL ({:#})", e));
        }
    }

    match run_budget(&client, &out_dir, &scraped_at, &cfg).await {
        Ok(summary) => {
            info!(rows = summary.row_count, "budget done");
            kpi.budget = KpiEntry::ok(summary);
            report.push(format!("- Budget: OK ({} rows)", summary.row_count));
        }
        Err(e) => {
            error!("budget failed: {:#}", e);
            report.push(format!("- Budget: FAIL ({:#})", e));
        }
    }

    match run_inpc(&client, &out_dir, &scraped_at, &cfg).await {
        Ok(summary) => {
            info!(rows = summary.row_count, "inpc done");
            kpi.inpc = KpiEntry::ok(summary);
            report.push(format!("- INPC: OK ({} rows)", summary.row_count));
        }
        Err(e) => {
            error!("inpc failed: {:#}", e);
            report.push(format!("- INPC: FAIL ({:#})", e));
        }
    }

    store::write_kpi(&out_dir.join("kpi.json"), &kpi)?;
    store::write_run_report(&out_dir.join("run_report.md"), &report)?;
    info!("pipeline finished");
    Ok(())
}

async fn run_football(client: &Client, out_dir: &Path, scraped_at: &str) -> Result<Summary> {
    let url = env::var("FOOTBALL_URL").context("FOOTBALL_URL not set")?;
    let html = fetch::fetch_html(client, &url).await?;
    let (table, summary) = football::extract_football_results(&html, &url, scraped_at)?;
    store::write_table_csv(&table, &out_dir.join("football_results.csv"))?;
    Ok(summary)
}

async fn run_budget(
    client: &Client,
    out_dir: &Path,
    scraped_at: &str,
    cfg: &CleanConfig,
) -> Result<Summary> {
    let url = env::var("BUDGET_URL").unwrap_or_else(|_| DEFAULT_BUDGET_URL.to_string());
    let html = fetch::fetch_html(client, &url).await?;
    let (table, summary) = budget::extract_budget_table(&html, &url, scraped_at, cfg)?;
    store::write_table_csv(&table, &out_dir.join("budget_execution.csv"))?;
    Ok(summary)
}

async fn run_inpc(
    client: &Client,
    out_dir: &Path,
    scraped_at: &str,
    cfg: &CleanConfig,
) -> Result<Summary> {
    let pdf_url = env::var("INPC_PDF_URL").unwrap_or_else(|_| DEFAULT_INPC_PDF_URL.to_string());
    let tables_path = env::var("INPC_TABLES_JSON")
        .map(PathBuf::from)
        .unwrap_or_else(|_| out_dir.join("inpc_tables.json"));

    // Table extraction from the PDF is external; this run only consumes its
    // candidate tables. Fetch the PDF once so the extractor has it.
    if !tables_path.exists() {
        let pdf_path = fetch::download_document(client, &pdf_url, out_dir).await?;
        bail!(
            "candidate tables not found at {}; run the external PDF extractor over {}",
            tables_path.display(),
            pdf_path.display()
        );
    }

    let tables = store::read_candidate_tables(&tables_path)?;
    let (table, summary) = index_report::extract_index_table(&tables, &pdf_url, scraped_at, cfg)?;
    let raw_csv = out_dir.join("inpc_table2.csv");
    store::write_table_csv(&table, &raw_csv)?;

    // Second pass runs on the serialized first-pass output.
    let serialized = store::read_table_csv(&raw_csv)?;
    let cleaned = index_report::clean_index_table(&serialized, ResolvePolicy::Last)?;
    store::write_table_csv(&cleaned, &out_dir.join("inpc_table2_clean.csv"))?;

    Ok(summary)
}
