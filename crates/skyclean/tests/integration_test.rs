//! Integration tests for the cleaning pipeline.

use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

use skyclean::{CleanError, Cleaner, ColumnType, JoinStrategy, Value};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

const FLIGHTS: &str = "Loyalty Number,Year,Month,Flights Booked,Flights with Companions,Total Flights,Distance,Points Accumulated,Points Redeemed,Dollar Cost Points Redeemed\n\
                       100018,2017,1,3,0,3,1521,152,0,0\n\
                       100018,2017,1,3,0,3,1521,152,0,0\n\
                       100018,2017,2,5,1,3,2030,203,0,0\n\
                       100102,2017,1,10,4,14,2030,203,0,0\n\
                       100140,2017,1,0,0,0,640,64,0,0\n\
                       100141,2018,3,2,0,2,800,80,0,0\n";

const LOYALTY: &str = "Loyalty Number,Country,Province,City,Gender,Education,Salary,Marital Status,Loyalty Card,CLV,Enrollment Type,Enrollment Year,Cancellation Year,Cancellation Month\n\
                       100018,Canada,Alberta,Edmonton,Female,Bachelor,92552,Married,Aurora,7919.2,Standard,2016,,\n\
                       100102,Canada,Ontario,Toronto,Male,college,,Single,Nova,2887.74,Standard,2013,,\n\
                       100140,Canada,British Columbia,Dawson Creek,Female,College,-49830,Divorced,Nova,2838.07,Standard,2016,2018,3\n\
                       100141,Canada,Quebec,Quebec City, male ,College,63000,Married,nova,3000.5,2018 Promotion,2018,,\n";

// =============================================================================
// End-to-end
// =============================================================================

#[test]
fn test_full_run_exports_clean_table() {
    let flights = create_test_file(FLIGHTS);
    let loyalty = create_test_file(LOYALTY);
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("processed").join("customer_loyalty_clean.csv");

    let outcome = Cleaner::new()
        .run(flights.path(), loyalty.path(), &output)
        .expect("Pipeline failed");
    let report = &outcome.report;
    let table = &outcome.table;

    assert_eq!(report.join.plan.key, "Loyalty Number");
    assert_eq!(report.join.plan.correspondence.match_left, 100.0);
    assert_eq!(report.join.plan.correspondence.match_right, 100.0);
    assert_eq!(report.join.plan.strategy, JoinStrategy::Inner);
    assert_eq!(report.join.result_shape, (6, 23));

    assert_eq!(report.deduplication.rows_removed, 1);
    assert_eq!(report.sanitization[0].values_changed, 1);
    assert_eq!(report.imputation.missing_before, 2);
    assert_eq!(report.imputation.remaining, 0);
    assert_eq!(report.consistency.counts()["booked > total"], 1);
    assert_eq!(report.consistency.counts()["distance > 0 but total_flights = 0"], 1);
    assert_eq!(
        report.consistency.counts()["points_accumulated > 0 but total_flights = 0"],
        1
    );
    assert_eq!(report.output.as_deref(), Some(output.as_path()));

    let headers = &table.headers;
    assert_eq!(headers[0], "loyalty_number");
    assert!(headers.contains(&"flight_year".to_string()));
    assert!(headers.contains(&"flight_month".to_string()));
    assert!(headers.contains(&"customer_lifetime_value".to_string()));
    assert_eq!(headers.last().unwrap(), "customer_status");

    let salary = table.column_index("salary").unwrap();
    assert_eq!(table.null_count(salary), 0);
    assert!(table.column_values(salary).all(|v| v.as_f64().unwrap() >= 0.0));

    let cancel = table.column_index("cancellation_year").unwrap();
    assert_eq!(table.dtypes[cancel], ColumnType::NullableInteger);

    let written = fs::read_to_string(&output).unwrap();
    let mut lines = written.lines();
    assert!(lines.next().unwrap().starts_with("loyalty_number,flight_year,flight_month"));
    assert_eq!(lines.count(), 5);
}

#[test]
fn test_categoricals_and_status() {
    let outcome = Cleaner::new()
        .run(
            create_test_file(FLIGHTS).path(),
            create_test_file(LOYALTY).path(),
            tempfile::tempdir().unwrap().path().join("out.csv"),
        )
        .unwrap();
    let table = &outcome.table;

    let number = table.column_index("loyalty_number").unwrap();
    let row_for = |id: i64| {
        table
            .rows
            .iter()
            .find(|r| r[number] == Value::Int(id))
            .expect("row present")
    };

    let gender = table.column_index("gender").unwrap();
    let education = table.column_index("education").unwrap();
    let status = table.column_index("customer_status").unwrap();
    let enrollment = table.column_index("enrollment_type").unwrap();

    assert_eq!(row_for(100141)[gender], Value::text("Male"));
    assert_eq!(row_for(100102)[education], Value::text("College"));
    assert_eq!(row_for(100141)[enrollment], Value::text("2018 Promotion"));
    assert_eq!(row_for(100140)[status], Value::text("Cancelled"));
    assert_eq!(row_for(100018)[status], Value::text("Active"));
}

#[test]
fn test_imputation_uses_group_medians() {
    let outcome = Cleaner::new()
        .clean_tables(&load(FLIGHTS), &load(LOYALTY))
        .unwrap();
    let table = &outcome.table;
    let number = table.column_index("loyalty_number").unwrap();
    let salary = table.column_index("salary").unwrap();

    // 100102 (lowercase "college", Nova) shares no group before categorical
    // cleanup, so it falls through to the global median
    let imputed: Vec<&Value> = table
        .rows
        .iter()
        .filter(|r| r[number] == Value::Int(100102))
        .map(|r| &r[salary])
        .collect();
    assert_eq!(imputed, vec![&Value::Float(77776.0)]);

    // 100140 had a negative salary; its only College peer is 100141 (card "nova")
    let refilled = table
        .rows
        .iter()
        .find(|r| r[number] == Value::Int(100140))
        .map(|r| r[salary].clone())
        .unwrap();
    assert_eq!(refilled, Value::Float(63000.0));
}

fn load(content: &str) -> skyclean::Table {
    let file = create_test_file(content);
    let (raw, _) = skyclean::Parser::new().parse_file(file.path()).unwrap();
    skyclean::Table::from_raw(&raw)
}

// =============================================================================
// Failure handling
// =============================================================================

#[test]
fn test_no_common_key_writes_nothing() {
    let flights = create_test_file("a,b\n1,2\n");
    let loyalty = create_test_file("c,d\n3,4\n");
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");

    let err = Cleaner::new()
        .run(flights.path(), loyalty.path(), &output)
        .unwrap_err();

    assert!(matches!(err, CleanError::NoCommonKey { .. }));
    assert!(!output.exists());
}

#[test]
fn test_missing_salary_column_aborts() {
    let flights = create_test_file("Loyalty Number,Total Flights\n1,2\n");
    let loyalty = create_test_file("Loyalty Number,Education,Loyalty Card\n1,Bachelor,Star\n");
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");

    let err = Cleaner::new()
        .run(flights.path(), loyalty.path(), &output)
        .unwrap_err();

    match err {
        CleanError::MissingColumn { column, .. } => assert_eq!(column, "salary"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
}

#[test]
fn test_loyalty_only_customer_breaks_integer_points() {
    // 100141 has no flights, so the right join leaves its points missing
    let flights: String = FLIGHTS.lines().take(6).map(|l| format!("{l}\n")).collect();
    let loyalty = create_test_file(LOYALTY);
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");

    let err = Cleaner::new()
        .run(create_test_file(&flights).path(), loyalty.path(), &output)
        .unwrap_err();

    match err {
        CleanError::TypeCoercion { column, target, .. } => {
            assert_eq!(column, "points_accumulated");
            assert_eq!(target, ColumnType::Integer);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
}

#[test]
fn test_unparseable_points_abort() {
    let flights = create_test_file("Loyalty Number,Points Accumulated\n1,12\n2,lots\n");
    let loyalty = create_test_file(
        "Loyalty Number,Education,Loyalty Card,Salary,Cancellation Year\n1,Bachelor,Star,100,\n2,Bachelor,Star,200,\n",
    );
    let err = Cleaner::new()
        .run(
            flights.path(),
            loyalty.path(),
            tempfile::tempdir().unwrap().path().join("out.csv"),
        )
        .unwrap_err();
    assert!(matches!(err, CleanError::TypeCoercion { .. }));
}

#[test]
fn test_missing_input_file() {
    let loyalty = create_test_file(LOYALTY);
    let err = Cleaner::new()
        .join_files("/nonexistent/flights.csv", loyalty.path())
        .unwrap_err();
    assert!(matches!(err, CleanError::Io { .. }));
}

// =============================================================================
// Export
// =============================================================================

fn dir_entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_export_writes_table_and_report() {
    let cleaner = Cleaner::new();
    let mut outcome = cleaner.clean_tables(&load(FLIGHTS), &load(LOYALTY)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("clean.csv");
    let report = dir.path().join("run.json");

    cleaner.export(&mut outcome, &output, Some(&report)).unwrap();

    assert_eq!(dir_entries(dir.path()), vec!["clean.csv", "run.json"]);
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["join"]["plan"]["strategy"], "inner");
    assert_eq!(json["output"], output.to_str().unwrap());
    assert_eq!(outcome.report.output.as_deref(), Some(output.as_path()));
}

#[test]
fn test_unwritable_report_leaves_no_output() {
    let cleaner = Cleaner::new();
    let mut outcome = cleaner.clean_tables(&load(FLIGHTS), &load(LOYALTY)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("clean.csv");
    // The report target is a directory, so publishing it fails
    let report = dir.path().join("run.json");
    fs::create_dir(&report).unwrap();

    let err = cleaner.export(&mut outcome, &output, Some(&report)).unwrap_err();

    assert!(matches!(err, CleanError::Io { .. }));
    assert!(!output.exists());
    assert_eq!(dir_entries(dir.path()), vec!["run.json"]);
    assert!(outcome.report.output.is_none());
}

#[test]
fn test_report_under_a_file_fails_before_any_write() {
    let cleaner = Cleaner::new();
    let mut outcome = cleaner.clean_tables(&load(FLIGHTS), &load(LOYALTY)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("reports");
    fs::write(&blocker, "not a directory").unwrap();
    let output = dir.path().join("clean.csv");

    let err = cleaner
        .export(&mut outcome, &output, Some(&blocker.join("run.json")))
        .unwrap_err();

    assert!(matches!(err, CleanError::Io { .. }));
    assert_eq!(dir_entries(dir.path()), vec!["reports"]);
}

#[test]
fn test_unwritable_table_discards_staged_report() {
    let cleaner = Cleaner::new();
    let mut outcome = cleaner.clean_tables(&load(FLIGHTS), &load(LOYALTY)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("clean.csv");
    fs::create_dir(&output).unwrap();
    let report = dir.path().join("run.json");

    let err = cleaner.export(&mut outcome, &output, Some(&report)).unwrap_err();

    assert!(matches!(err, CleanError::Io { .. }));
    assert!(!report.exists());
    assert_eq!(dir_entries(dir.path()), vec!["clean.csv"]);
}

#[test]
fn test_join_plan_is_known_before_cleaning_fails() {
    let flights: String = FLIGHTS.lines().take(6).map(|l| format!("{l}\n")).collect();
    let flights = create_test_file(&flights);
    let loyalty = create_test_file(LOYALTY);
    let cleaner = Cleaner::new();

    let (merged, join) = cleaner.join_files(flights.path(), loyalty.path()).unwrap();
    assert_eq!(join.plan.strategy, JoinStrategy::Right);
    assert_eq!(join.plan.correspondence.match_right, 75.0);
    assert_eq!(join.result_shape, (6, 23));

    let err = cleaner.clean_joined(merged, join).unwrap_err();
    assert!(matches!(err, CleanError::TypeCoercion { .. }));
}

// =============================================================================
// Join planning
// =============================================================================

#[test]
fn test_join_files_outer_example() {
    let left = create_test_file("id,x\n1,a\n2,b\n3,c\n");
    let right = create_test_file("id,y\n2,p\n3,q\n4,r\n");

    let (merged, report) = Cleaner::new().join_files(left.path(), right.path()).unwrap();

    assert_eq!(report.plan.strategy, JoinStrategy::Outer);
    assert!((report.plan.correspondence.match_left - 66.67).abs() < 0.01);
    assert_eq!(merged.row_count(), 4);
    assert_eq!(merged.rows[0][2], Value::Null);
    assert_eq!(merged.rows[3][1], Value::Null);

    let left_source = report.left_source.unwrap();
    assert_eq!(left_source.row_count, 3);
    assert_eq!(left_source.format, "csv");
    assert!(left_source.hash.starts_with("sha256:"));
}

#[test]
fn test_join_files_tsv_auto_detect() {
    let left = create_test_file("id\tx\n1\ta\n2\tb\n");
    let right = create_test_file("id,y\n1,p\n2,q\n");

    let (merged, report) = Cleaner::new().join_files(left.path(), right.path()).unwrap();

    assert_eq!(report.left_source.unwrap().format, "tsv");
    assert_eq!(report.plan.strategy, JoinStrategy::Inner);
    assert_eq!(merged.shape(), (2, 3));
}
