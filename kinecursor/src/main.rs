//! kinecursor: interactive entry point.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use kinecursor::app::{run, AppConfig};

struct Args {
    config:      Option<PathBuf>,
    quick:       bool,
    dump_config: bool,
    dry_run:     bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { config: None, quick: false, dump_config: false, dry_run: false };
    let mut it = std::env::args().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--config"      => args.config = Some(it.next().context("--config needs a path")?.into()),
            "--quick"       => args.quick = true,
            "--dump-config" => args.dump_config = true,
            "--dry-run"     => args.dry_run = true,
            other           => bail!("unknown argument `{}` (try --quick, --config <path>, --dump-config, --dry-run)", other),
        }
    }
    Ok(args)
}

/// Log filter used when `RUST_LOG` is unset. When output is log-only, the
/// cursor moves `LogSink` reports at debug level are shown too.
fn default_log_filter(log_only: bool) -> &'static str {
    if log_only { "info,kinecursor=debug" } else { "info" }
}

fn main() {
    let args = parse_args();
    let log_only = !cfg!(feature = "os-input") || args.as_ref().map_or(false, |a| a.dry_run);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_log_filter(log_only)))
        .init();

    if let Err(e) = args.and_then(try_main) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn try_main(args: Args) -> Result<()> {

    if args.dump_config {
        println!("{}", AppConfig::default().to_ron()?);
        return Ok(());
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Kinecursor: depth-sensor pointer and fist click     ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut cfg = match (&args.config, args.quick) {
        (Some(path), false) => {
            println!("  Config: {}", path.display());
            AppConfig::load(path)?
        }
        _ => {
            println!("  Quick-start: default tracker, simulated sensor");
            AppConfig::default()
        }
    };
    cfg.dry_run |= args.dry_run;

    #[cfg(feature = "os-input")]
    println!("  Output: {}", if cfg.dry_run { "log only (dry run)" } else { "system pointer" });
    #[cfg(not(feature = "os-input"))]
    println!("  Output: log only  (build with --features os-input to move the pointer)");
    println!();
    println!("  Opening depth view…  hold R or L to reach, Space to make a fist");
    println!();

    run(cfg)
}
