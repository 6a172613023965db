//! Example: inspect how two datasets would be joined.
//!
//! Usage:
//!   cargo run --example join_plan -- <flights_file> <loyalty_file>

use std::env;

use skyclean::Cleaner;

fn main() -> skyclean::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: cargo run --example join_plan -- <flights_file> <loyalty_file>");
        std::process::exit(1);
    }

    let (merged, report) = Cleaner::new().join_files(&args[1], &args[2])?;

    for (label, source) in [("Flights", &report.left_source), ("Loyalty", &report.right_source)] {
        if let Some(source) = source {
            println!(
                "{}: {} ({} rows × {} columns, {})",
                label, source.file, source.row_count, source.column_count, source.format
            );
        }
    }

    let plan = &report.plan;
    println!();
    println!("Common columns: {}", plan.common_columns.join(", "));
    println!("Key:            {}", plan.key);
    println!("Match (left):   {:.2}%", plan.correspondence.match_left);
    println!("Match (right):  {:.2}%", plan.correspondence.match_right);
    println!("Strategy:       {} ({})", plan.strategy, plan.strategy.rationale());
    println!("Merged shape:   {} × {}", merged.row_count(), merged.column_count());

    Ok(())
}
