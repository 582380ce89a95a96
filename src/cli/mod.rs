//! CKD prediction CLI module
//!
//! Command-line interface for serving the API, running the training pipeline
//! offline, and inspecting datasets.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::preprocessing::{ColumnType, Ingestor};
use crate::training::{ModelMetrics, PipelineConfig, TrainEngine};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "ckd-predict")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chronic kidney disease prediction service")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Server port
        #[arg(short, long, env = "API_PORT", default_value = "5000")]
        port: u16,

        /// Server host
        #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Report distinct HTTP status codes for errors instead of 200
        #[arg(long)]
        strict_status: bool,
    },

    /// Run the training pipeline on a CSV and print the report
    Train {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Number of selected features
        #[arg(short, long, default_value = "10")]
        k: usize,
    },

    /// Show column summary after ingestion
    Info {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

fn metrics_row(name: &str, metrics: &ModelMetrics) {
    println!(
        "  {:<16} {:>9} {:>9} {:>9} {:>9}",
        name.white(),
        format!("{:.4}", metrics.accuracy).white().bold(),
        format!("{:.4}", metrics.precision),
        format!("{:.4}", metrics.recall),
        format!("{:.4}", metrics.f1_score),
    );
}

pub fn cmd_train(data_path: &Path, k: usize) -> anyhow::Result<()> {
    section("Train");

    step_run("Loading data");
    let start = Instant::now();
    let bytes = std::fs::read(data_path)?;
    step_done(&format!("{} bytes in {:?}", bytes.len(), start.elapsed()));

    step_run("Fitting Random Forest and XGBoost");
    let engine = TrainEngine::new(PipelineConfig::default().with_k_features(k));
    let trained = engine.fit_csv(&bytes)?;
    let report = &trained.report;
    step_done(&format!("{:.3}s", report.training_time_secs));

    println!();
    println!("  {:<16} {}", muted("Rows"), report.n_rows);
    println!("  {:<16} {} / {}", muted("Train / test"), report.n_train, report.n_test);
    println!("  {:<16} {}", muted("Imputed cells"), report.cleaning.imputed_cells);
    println!("  {:<16} {}", muted("Selected"), report.selected_features.join(", "));

    section("Held-out metrics");
    println!(
        "  {:<16} {:>9} {:>9} {:>9} {:>9}",
        muted("Model"),
        muted("Accuracy"),
        muted("Precision"),
        muted("Recall"),
        muted("F1")
    );
    metrics_row("Random Forest", &report.forest);
    metrics_row("XGBoost", &report.booster);

    if let Some(last) = report.booster_eval_history.last() {
        println!();
        println!("  {:<16} {:.5}", muted("Final logloss"), last);
    }
    println!();

    Ok(())
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    section("Data Info");

    let bytes = std::fs::read(data_path)?;
    let table = Ingestor::new().read_csv(&bytes)?;

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), table.n_rows());
    println!("  {:<12} {}", muted("Columns"), table.n_columns());
    println!();

    println!("  {:<20} {:<12} {:>6} {:>8}", muted("Column"), muted("Type"), muted("Nulls"), muted("Unique"));
    println!("  {}", dim(&"─".repeat(50)));

    for col in table.summary() {
        let dtype = match col.dtype {
            ColumnType::Numeric => "numeric",
            ColumnType::Categorical => "text",
        };
        println!(
            "  {:<20} {:<12} {:>6} {:>8}",
            col.name,
            dtype.truecolor(140, 140, 140),
            col.null_count,
            col.unique_count
        );
    }

    println!();
    Ok(())
}

// ─── Serve ─────────────────────────────────────────────────────────────────────

pub async fn cmd_serve(host: &str, port: u16, strict_status: bool) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    let base = format!("http://{}:{}", host, port);

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "CKD Prediction API".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Train  ", &format!("POST {}/train", base)));
    line_box(&kv("Predict", &format!("POST {}/predict", base)));
    line_box(&kv("Health ", &format!("GET  {}/health", base)));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    let defaults = ServerConfig::default();
    let config = ServerConfig {
        host: host.to_string(),
        port,
        strict_status: strict_status || defaults.strict_status,
        ..defaults
    };

    run_server(config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::parse_from(["ckd-predict", "serve", "--port", "8000", "--strict-status"]);
        match cli.command {
            Some(Commands::Serve { port, strict_status, .. }) => {
                assert_eq!(port, 8000);
                assert!(strict_status);
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_strip_ansi() {
        let colored = format!("{}", "hi".red());
        assert_eq!(strip_ansi(&colored), "hi");
    }
}
