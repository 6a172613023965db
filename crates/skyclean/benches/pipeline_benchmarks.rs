//! Pipeline performance benchmarks.
//!
//! Measures parsing, joining and the full cleaning sequence across
//! different dataset sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use skyclean::join::merge;
use skyclean::transform::{ImputationConfig, impute_grouped_median};
use skyclean::{Cleaner, JoinStrategy, Parser, Table};
use std::io::Write;
use tempfile::NamedTempFile;

const EDUCATION: [&str; 4] = ["Bachelor", "College", "Master", "High School or Below"];
const CARDS: [&str; 3] = ["Star", "Nova", "Aurora"];

/// Generate synthetic flight activity: `months` rows per customer.
fn generate_flights(customers: usize, months: usize) -> String {
    let mut data = String::from(
        "Loyalty Number,Year,Month,Flights Booked,Flights with Companions,Total Flights,Distance,Points Accumulated,Points Redeemed,Dollar Cost Points Redeemed\n",
    );
    for customer in 0..customers {
        for month in 0..months {
            let booked = (customer + month) % 8;
            data.push_str(&format!(
                "{},{},{},{},{},{},{},{},0,0\n",
                100_000 + customer,
                2017 + month / 12,
                month % 12 + 1,
                booked,
                booked / 3,
                booked,
                booked * 410,
                booked * 41,
            ));
        }
    }
    data
}

/// Generate synthetic loyalty history with some missing and negative salaries.
fn generate_loyalty(customers: usize) -> String {
    let mut data = String::from(
        "Loyalty Number,Country,Province,City,Gender,Education,Salary,Marital Status,Loyalty Card,CLV,Enrollment Type,Enrollment Year,Cancellation Year,Cancellation Month\n",
    );
    for customer in 0..customers {
        let salary = match customer % 10 {
            0 => String::new(),
            1 => format!("-{}", 40_000 + customer),
            _ => (50_000 + customer * 7).to_string(),
        };
        let cancelled = if customer % 9 == 0 { "2018,4" } else { "," };
        data.push_str(&format!(
            "{},Canada,ontario,Toronto,{},{},{},Married,{},{:.2},Standard,2016,{}\n",
            100_000 + customer,
            if customer % 2 == 0 { "female" } else { "Male" },
            EDUCATION[customer % EDUCATION.len()],
            salary,
            CARDS[customer % CARDS.len()],
            2_500.0 + customer as f64 * 1.37,
            cancelled,
        ));
    }
    data
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn load(content: &str) -> Table {
    let raw = Parser::new().parse_bytes(content.as_bytes(), b',').unwrap();
    Table::from_raw(&raw)
}

/// Benchmark parsing and type inference of the flight activity file.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_flights");

    for customers in [100, 1_000, 5_000].iter() {
        let data = generate_flights(*customers, 12);
        let file = write_temp(&data);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("customers", customers), &file, |b, file| {
            let parser = Parser::new();
            b.iter(|| {
                let (raw, _) = parser.parse_file(black_box(file.path())).unwrap();
                black_box(Table::from_raw(&raw))
            });
        });
    }

    group.finish();
}

/// Benchmark the hash join under each strategy.
fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    let flights = load(&generate_flights(2_000, 12));
    let loyalty = load(&generate_loyalty(2_500));

    for strategy in [JoinStrategy::Inner, JoinStrategy::Right, JoinStrategy::Outer] {
        group.bench_with_input(
            BenchmarkId::new("strategy", strategy),
            &strategy,
            |b, strategy| {
                b.iter(|| {
                    merge(
                        black_box(&flights),
                        black_box(&loyalty),
                        "Loyalty Number",
                        *strategy,
                        ("_x", "_y"),
                    )
                    .unwrap()
                });
            },
        );
    }

    group.finish();
}

/// Benchmark grouped median imputation.
fn bench_impute(c: &mut Criterion) {
    let mut group = c.benchmark_group("impute");

    for customers in [1_000, 10_000].iter() {
        let mut table = load(&generate_loyalty(*customers));
        table.headers = skyclean::transform::normalize_column_names(&table.headers);

        group.throughput(Throughput::Elements(*customers as u64));
        group.bench_with_input(BenchmarkId::new("rows", customers), &table, |b, table| {
            let config = ImputationConfig::default();
            b.iter(|| impute_grouped_median(black_box(table), &config).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the full cleaning sequence on in-memory tables.
fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean_tables");
    group.sample_size(20);

    for customers in [200, 2_000].iter() {
        let flights = load(&generate_flights(*customers, 12));
        let loyalty = load(&generate_loyalty(*customers));

        group.throughput(Throughput::Elements((customers * 12) as u64));
        group.bench_with_input(
            BenchmarkId::new("customers", customers),
            &(flights, loyalty),
            |b, (flights, loyalty)| {
                let cleaner = Cleaner::new();
                b.iter(|| cleaner.clean_tables(black_box(flights), black_box(loyalty)).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_merge, bench_impute, bench_clean);
criterion_main!(benches);
