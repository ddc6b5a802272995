//! Dead-link checker for the newspaper/magazine catalog.
//!
//! Probes every record's website with a bounded-timeout HEAD request,
//! sequentially with a courtesy delay, then writes a dead-links
//! report for human review. Decoupled from the migration engine; the
//! only shared discipline is the atomic report write.

mod catalog;
mod checker;
mod logging;
mod probe;
mod report;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use crate::checker::check_all;
use crate::probe::HttpProbe;
use crate::report::{build_report, print_summary, write_report};

#[derive(Parser)]
#[command(name = "linkcheck", version, about = "Catalog dead-link checker")]
struct Cli {
    /// Catalog JSON with `newspapers` and `magazines` arrays.
    #[arg(long, default_value = "assets/data.json")]
    catalog: PathBuf,
    /// Where to write the dead-links report.
    #[arg(long, default_value = "dead_links_report.json")]
    out: PathBuf,
    /// Per-request timeout.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
    /// Courtesy delay between probes.
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let records = catalog::load_records(&cli.catalog).context("load catalog")?;
    let probe = HttpProbe::new(Duration::from_secs(cli.timeout_secs)).context("build probe")?;
    let delay = Duration::from_millis(cli.delay_ms);

    let check = check_all(&records, &probe, delay, std::thread::sleep);
    print_summary(&check);

    let dead_links = build_report(&check);
    write_report(&cli.out, &dead_links).context("write report")?;
    println!("report: saved to {}", cli.out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let cli = Cli::parse_from(["linkcheck"]);
        assert_eq!(cli.catalog, PathBuf::from("assets/data.json"));
        assert_eq!(cli.out, PathBuf::from("dead_links_report.json"));
        assert_eq!(cli.timeout_secs, 10);
        assert_eq!(cli.delay_ms, 500);
    }

    #[test]
    fn parse_overrides() {
        let cli = Cli::parse_from([
            "linkcheck",
            "--catalog",
            "data.json",
            "--out",
            "dead.json",
            "--timeout-secs",
            "5",
            "--delay-ms",
            "0",
        ]);
        assert_eq!(cli.catalog, PathBuf::from("data.json"));
        assert_eq!(cli.timeout_secs, 5);
        assert_eq!(cli.delay_ms, 0);
    }
}
