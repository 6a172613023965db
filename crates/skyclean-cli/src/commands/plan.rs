//! Plan command - show how the two datasets would be joined.

use colored::Colorize;
use skyclean::{Cleaner, JoinReport, JoinStrategy, SourceMetadata};

use crate::cli::SourceArgs;

pub fn run(sources: SourceArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    for path in [&sources.flights, &sources.loyalty] {
        if !path.exists() {
            return Err(format!("File not found: {}", path.display()).into());
        }
    }

    let cleaner = Cleaner::new();
    let (_, report) = cleaner.join_files(&sources.flights, &sources.loyalty)?;
    print_join_report(&report, verbose);

    Ok(())
}

/// Render the load-and-join summary.
pub(crate) fn print_join_report(report: &JoinReport, verbose: bool) {
    println!("{}", "Loading datasets".cyan().bold());
    print_source("Flights", report.left_shape, report.left_source.as_ref(), verbose);
    print_source("Loyalty", report.right_shape, report.right_source.as_ref(), verbose);

    let plan = &report.plan;
    println!();
    println!("{}", "Common columns:".yellow().bold());
    for column in &plan.common_columns {
        println!("  - {}", column);
    }
    println!("Selected key: {}", plan.key.white().bold());

    println!();
    println!("{}", "Key correspondence:".yellow().bold());
    println!(
        "  flights keys present in loyalty: {}",
        format!("{:.2}%", plan.correspondence.match_left).white()
    );
    println!(
        "  loyalty keys present in flights: {}",
        format!("{:.2}%", plan.correspondence.match_right).white()
    );

    let strategy = format!("{} JOIN", plan.strategy.to_string().to_uppercase());
    let strategy = match plan.strategy {
        JoinStrategy::Inner => strategy.green().bold(),
        _ => strategy.yellow().bold(),
    };
    println!("  {} → {}", plan.strategy.rationale(), strategy);

    println!(
        "Merged: {} rows × {} columns",
        report.result_shape.0.to_string().white().bold(),
        report.result_shape.1.to_string().white().bold()
    );
}

fn print_source(
    label: &str,
    shape: (usize, usize),
    source: Option<&SourceMetadata>,
    verbose: bool,
) {
    let name = source.map(|s| s.file.as_str()).unwrap_or("<memory>");
    println!(
        "  {:8} {} rows × {} columns ({})",
        label,
        shape.0.to_string().white().bold(),
        shape.1,
        name
    );
    if verbose {
        if let Some(source) = source {
            println!(
                "           {} {} bytes, {}",
                source.format,
                source.size_bytes,
                source.hash.dimmed()
            );
        }
    }
}
