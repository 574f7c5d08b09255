//! Output formats and the console reporter.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::{self, Stdout, Write};
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use tracing::warn;
use vitals::{Reporter, SamplerKind, TickReport, Utilization, VitalsError};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One colored line per tick
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
    /// CSV rows under a single header
    Csv,
    /// YAML documents
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" | "jsonl" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: pretty, json, csv, yaml",
                s
            ),
        }
    }
}

impl OutputFormat {
    /// Name accepted on the command line and in the config file
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Yaml => "yaml",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat CSV record for any tick
#[derive(Debug, Serialize)]
struct CsvRow {
    timestamp: String,
    kind: SamplerKind,
    utilization_percent: Option<f64>,
    used_bytes: Option<u64>,
    committed_bytes: Option<u64>,
    max_bytes: Option<u64>,
}

impl From<&TickReport> for CsvRow {
    fn from(report: &TickReport) -> Self {
        let memory = match report {
            TickReport::Memory(m) => Some(m),
            _ => None,
        };
        Self {
            timestamp: report.timestamp().to_rfc3339(),
            kind: report.kind(),
            utilization_percent: report.utilization().map(Utilization::percent),
            used_bytes: memory.map(|m| m.used_bytes),
            committed_bytes: memory.map(|m| m.committed_bytes),
            max_bytes: memory.map(|m| m.max_bytes),
        }
    }
}

enum Sink<W: Write> {
    Text(W),
    Csv(csv::Writer<W>),
}

/// Reporter that prints every tick in the chosen format
pub struct ConsoleReporter<W: Write = Stdout> {
    format: OutputFormat,
    sink: Mutex<Sink<W>>,
}

impl ConsoleReporter<Stdout> {
    /// Print to standard output
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Print to `out`
    pub fn new(format: OutputFormat, out: W) -> Self {
        let sink = match format {
            OutputFormat::Csv => Sink::Csv(csv::Writer::from_writer(out)),
            _ => Sink::Text(out),
        };
        Self {
            format,
            sink: Mutex::new(sink),
        }
    }

    /// Give back the writer, flushing buffered CSV rows
    pub fn into_inner(self) -> io::Result<W> {
        match self.sink.into_inner().unwrap_or_else(PoisonError::into_inner) {
            Sink::Text(out) => Ok(out),
            Sink::Csv(writer) => writer.into_inner().map_err(|e| e.into_error()),
        }
    }

    fn write(&self, report: &TickReport) -> anyhow::Result<()> {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        match &mut *sink {
            Sink::Csv(writer) => {
                writer.serialize(CsvRow::from(report))?;
                writer.flush()?;
            }
            Sink::Text(out) => {
                match self.format {
                    OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(report)?)?,
                    OutputFormat::Yaml => write!(out, "---\n{}", serde_yaml::to_string(report)?)?,
                    OutputFormat::Pretty | OutputFormat::Csv => writeln!(out, "{}", pretty_line(report))?,
                }
                out.flush()?;
            }
        }
        Ok(())
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn report(&self, report: &TickReport) {
        if let Err(e) = self.write(report) {
            warn!(kind = %report.kind(), error = %e, "failed to write report");
        }
    }

    fn report_error(&self, kind: SamplerKind, error: &VitalsError) {
        eprintln!("{} {} tick skipped: {}", "warning:".yellow().bold(), kind, error);
    }
}

/// Console line for a report, colored by load
pub fn pretty_line(report: &TickReport) -> String {
    let time = report.timestamp().format("%H:%M:%S").to_string();
    let line = report.to_string();
    let line = match report.utilization() {
        Some(u) if u.percent() >= 80.0 => line.red().bold().to_string(),
        Some(u) if u.percent() >= 50.0 => line.yellow().to_string(),
        Some(_) => line.green().to_string(),
        None => line.cyan().to_string(),
    };
    format!("{} {}", time.dimmed(), line)
}
