//! Fuzz target for the delimited-text parser and type inference.
//!
//! Any byte input must either parse into a rectangular table or return an
//! error; it must never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use skyclean::{Parser, Table};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();
    for delimiter in [b',', b'\t', b';'] {
        if let Ok(raw) = parser.parse_bytes(data, delimiter) {
            let table = Table::from_raw(&raw);
            assert!(table.rows.iter().all(|r| r.len() == table.column_count()));
        }
    }
});
