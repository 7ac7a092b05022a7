//! # chatdoc CLI
//!
//! Command-line interface for the chatdoc library.

use std::fs;
use std::io::{self, Read};
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use chatdoc::ChatdocError;
use chatdoc::cli::Args;
use chatdoc::format::{DocumentFormat, export_to_dir};

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(args.log_level());

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

/// Installs a stderr fmt layer; `RUST_LOG` overrides the verbosity flags.
fn init_logging(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second subscriber can only exist in tests; ignore that case.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn run(args: &Args) -> Result<(), ChatdocError> {
    let total_start = Instant::now();
    let format: DocumentFormat = args.format.into();
    let input_kind = args.input_kind.resolve(&args.input);
    let config = args.render_config()?;

    // Print header
    println!("📦 chatdoc v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", if args.reads_stdin() { "<stdin>" } else { &args.input });
    println!("📖 Reading: {}", input_kind);
    println!("📄 Format:  {}", format);
    println!("💾 Output:  {}", args.output_dir.display());
    if config.is_styled() {
        println!("🎨 Style:   Styled");
    }
    println!();

    let text = if args.reads_stdin() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(&args.input)?
    };

    let records = input_kind.read(&text)?;
    println!("   Found {} records", records.len());

    fs::create_dir_all(&args.output_dir)?;

    println!("💾 Writing {}...", format);
    let write_start = Instant::now();
    let exported = export_to_dir(&records, format, &args.output_dir, &config)?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    println!();
    println!("✅ Done! Output saved to {}", exported.path.display());
    println!("   MIME type: {}", exported.mime_type);
    println!("   Total time: {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}
