//! `vitals counters` - One-shot dump of every raw counter.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use vitals::format::format_bytes;
use vitals::RawCounterSample;

use super::Context;
use crate::cli::args::CountersArgs;
use crate::output::OutputFormat;

#[derive(Serialize)]
struct CounterRow {
    cpu_time_nanos: u64,
    gc_time_millis: u64,
    uptime_millis: u64,
    processor_count: u32,
    processing_capacity: Option<u64>,
    collectors: usize,
    heap_used_bytes: u64,
    heap_committed_bytes: u64,
    heap_max_bytes: u64,
}

impl From<&RawCounterSample> for CounterRow {
    fn from(s: &RawCounterSample) -> Self {
        Self {
            cpu_time_nanos: s.cpu_time_nanos,
            gc_time_millis: s.gc_time_millis,
            uptime_millis: s.uptime_millis,
            processor_count: s.processor_count,
            processing_capacity: s.processing_capacity,
            collectors: s.collectors.len(),
            heap_used_bytes: s.heap.used_bytes,
            heap_committed_bytes: s.heap.committed_bytes,
            heap_max_bytes: s.heap.max_bytes,
        }
    }
}

pub async fn execute(ctx: Context, args: CountersArgs) -> Result<()> {
    let source = ctx.source(&args.source)?;
    let sample = RawCounterSample::collect(source.as_ref()).await?;

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&sample)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&sample)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.serialize(CounterRow::from(&sample))?;
            writer.flush()?;
        }
        OutputFormat::Pretty => print_pretty(&sample),
    }

    Ok(())
}

fn print_pretty(sample: &RawCounterSample) {
    println!("{}", "Raw counters:".bold());
    println!();
    println!("  {} {} ns", "cpu time:".bold(), sample.cpu_time_nanos.to_string().cyan());
    println!("  {} {} ms", "gc time:".bold(), sample.gc_time_millis.to_string().cyan());
    println!("  {} {} ms", "uptime:".bold(), sample.uptime_millis.to_string().cyan());
    println!("  {} {}", "processors:".bold(), sample.processor_count);
    println!(
        "  {} {}",
        "processing capacity:".bold(),
        sample
            .processing_capacity
            .map_or_else(|| "(not reported)".dimmed().to_string(), |c| c.to_string())
    );
    println!(
        "  {} used={} B, committed={} B, max={} B",
        "heap:".bold(),
        format_bytes(sample.heap.used_bytes),
        format_bytes(sample.heap.committed_bytes),
        format_bytes(sample.heap.max_bytes)
    );

    if sample.collectors.is_empty() {
        println!("  {} {}", "collectors:".bold(), "(none)".dimmed());
    } else {
        println!("  {}", "collectors:".bold());
        for collector in &sample.collectors {
            println!("    - {}", collector.display_name().yellow());
        }
    }
}
