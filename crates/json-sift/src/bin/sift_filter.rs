//! `sift-filter` — filter a JSON document by property paths.
//!
//! Usage:
//!   sift-filter '<filter-spec>'
//!
//! The document is read from stdin. The filter spec is the first argument,
//! e.g. `name,!name.middle`.

use std::io::{self, Read, Write};

use json_sift::cli::filter_document;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let filter = match args.get(1) {
        Some(filter) => filter.clone(),
        None => {
            eprintln!("First argument must be a filter spec.");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match filter_document(buf.trim(), &filter) {
        Ok(output) => {
            io::stdout().write_all(output.as_bytes()).unwrap();
            io::stdout().write_all(b"\n").unwrap();
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
