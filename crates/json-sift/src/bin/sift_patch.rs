//! `sift-patch` — apply or create JSON patches.
//!
//! Usage:
//!   sift-patch apply '<patch-array-json>'
//!   sift-patch create '<after-json>'
//!
//! The document (the "before" document for `create`) is read from stdin.

use std::io::{self, Read, Write};

use json_sift::cli::{apply_patch, create_patch};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (command, argument) = match (args.get(1), args.get(2)) {
        (Some(command), Some(argument)) => (command.clone(), argument.clone()),
        _ => {
            eprintln!("Usage: sift-patch apply '<patch-json>' | sift-patch create '<after-json>'");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let result = match command.as_str() {
        "apply" => apply_patch(buf.trim(), &argument),
        "create" => create_patch(buf.trim(), &argument),
        other => {
            eprintln!("Unknown command: {other}");
            std::process::exit(1);
        }
    };

    match result {
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
