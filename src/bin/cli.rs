// src/bin/cli.rs
use mph_sync::cli;

fn main() {
    let _ = color_eyre::install();
    let args = cli::parse();
    if let Err(e) = cli::run(args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
