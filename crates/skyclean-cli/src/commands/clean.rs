//! Clean command - run the full pipeline and export the cleaned table.

use colored::Colorize;
use skyclean::{CleanReport, Cleaner};

use super::plan::print_join_report;
use crate::cli::CleanArgs;

pub fn run(args: CleanArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    for path in [&args.sources.flights, &args.sources.loyalty] {
        if !path.exists() {
            return Err(format!("File not found: {}", path.display()).into());
        }
    }

    let cleaner = Cleaner::new();
    let (merged, join) = cleaner.join_files(&args.sources.flights, &args.sources.loyalty)?;
    print_join_report(&join, verbose);

    let mut outcome = cleaner.clean_joined(merged, join)?;
    cleaner.export(&mut outcome, &args.output, args.report.as_deref())?;
    print_steps(&outcome.report, verbose);

    if let Some(ref report_path) = args.report {
        println!(
            "{} {}",
            "Report saved to".green().bold(),
            report_path.display().to_string().white()
        );
    }

    println!();
    println!(
        "{} {}",
        "Cleaned dataset exported to".green().bold(),
        args.output.display().to_string().white()
    );

    Ok(())
}

fn print_steps(report: &CleanReport, verbose: bool) {
    section("Column names");
    println!(
        "  {} columns processed, {} renamed",
        report.column_normalization.columns_processed,
        report.column_normalization.renames.len()
    );
    if verbose {
        for rename in &report.column_normalization.renames {
            println!("    '{}' → '{}'", rename.from, rename.to);
        }
    }
    for rename in &report.semantic_renames.renames {
        println!("  '{}' → '{}'", rename.from, rename.to.white().bold());
    }
    for skipped in &report.semantic_renames.skipped {
        println!(
            "  {} '{}' → '{}' (target exists)",
            "Skipped".yellow(),
            skipped.from,
            skipped.to
        );
    }

    section("Duplicate rows");
    let dedup = &report.deduplication;
    println!("  Initial rows: {}", dedup.rows_before);
    println!("  Removed rows: {}", dedup.rows_removed.to_string().white().bold());
    println!("  Final rows:   {}", dedup.rows_after);
    if dedup.rows_removed == 0 {
        println!("  {}", "No exact duplicates found.".green());
    }

    section("Type correction");
    for change in &report.type_correction.conversions {
        println!("  {}: {} → {}", change.column, change.from, change.to);
    }

    section("Invalid values");
    for sanitized in &report.sanitization {
        println!(
            "  {}: {} negative values converted to missing",
            sanitized.column,
            sanitized.values_changed.to_string().white().bold()
        );
    }

    section("Imputation");
    let imputation = &report.imputation;
    println!("  Column: {}", imputation.column);
    println!("  Missing before: {}", imputation.missing_before);
    println!("  Imputed: {}", imputation.imputed().to_string().white().bold());
    if verbose {
        for tier in &imputation.tiers {
            println!("    {:28} {}", tier.tier, tier.filled);
        }
    }
    if imputation.remaining > 0 {
        println!(
            "  {} {} values could not be imputed",
            "Warning:".yellow().bold(),
            imputation.remaining
        );
    } else {
        println!("  Missing remaining: 0");
    }

    section("Categorical columns");
    println!(
        "  {} columns, {} values normalized",
        report.categoricals.columns.len(),
        report.categoricals.values_changed
    );

    section("Logical inconsistencies");
    for (name, check) in &report.consistency.checks {
        let count = if check.violations == 0 {
            check.violations.to_string().green()
        } else {
            check.violations.to_string().red()
        };
        println!("  {}: {}", name, count);
        if verbose && !check.sample_rows.is_empty() {
            println!("    {:.2}% of rows, e.g. rows {:?}", check.percentage, check.sample_rows);
        }
    }
    for name in &report.consistency.skipped {
        println!("  {}: {}", name, "skipped (column missing)".dimmed());
    }

    println!();
    println!(
        "Final shape: {} rows × {} columns",
        report.final_shape.0.to_string().white().bold(),
        report.final_shape.1.to_string().white().bold()
    );
}

fn section(title: &str) {
    println!();
    println!("{}", title.yellow().bold());
}
