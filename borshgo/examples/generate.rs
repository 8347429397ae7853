//! Generates Go sources from a schema document.
//!
//! Run with: `cargo run --example generate -- <schema.json> <output-dir> [options.json]`
//!
//! Set `RUST_LOG=debug` to trace every rendered entity.

use borshgo::prelude::*;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(schema), Some(output)) = (args.next(), args.next()) else {
        eprintln!("usage: generate <schema.json> <output-dir> [options.json]");
        std::process::exit(2);
    };

    let options = match args.next() {
        Some(path) => RenderOptions::from_json(&std::fs::read_to_string(path)?)?,
        None => RenderOptions::default(),
    };

    let root = parse_root_file(&PathBuf::from(schema))?;
    let summary = render_to_directory(&root, &PathBuf::from(&output), &options)?;

    println!(
        "Wrote {} files to {} ({} kept, formatted: {})",
        summary.written, output, summary.skipped, summary.formatted
    );
    Ok(())
}
