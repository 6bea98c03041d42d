use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::EnvFilter;

use fotofile_core::{CollisionPolicy, Error, Event, ProcessOptions, SkipReason};

#[derive(Parser)]
#[command(name = "fotofile", version, about = "Sort photos and other files into YYYY/MM folders by capture date")]
struct Cli {
    /// Directory to scan
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Archive root that receives the YYYY/MM folders
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// JSON file with source_root, destination_root, on_collision and dry_run
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// What to do when the destination file already exists
    #[arg(long, value_enum)]
    on_collision: Option<Collision>,

    /// Report where files would go without moving anything
    #[arg(long)]
    dry_run: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Collision {
    Rename,
    Fail,
    Overwrite,
}

impl From<Collision> for CollisionPolicy {
    fn from(c: Collision) -> Self {
        match c {
            Collision::Rename => CollisionPolicy::Rename,
            Collision::Fail => CollisionPolicy::Fail,
            Collision::Overwrite => CollisionPolicy::Overwrite,
        }
    }
}

impl Cli {
    /// Config file first, command line on top.
    fn options(&self) -> anyhow::Result<ProcessOptions> {
        let mut options = match &self.config {
            Some(path) => ProcessOptions::load(path)?,
            None => {
                let source = self.source.clone().context("--source is required without --config")?;
                let destination = self
                    .destination
                    .clone()
                    .context("--destination is required without --config")?;
                ProcessOptions::new(source, destination)
            }
        };

        if let Some(source) = &self.source {
            options.source_root = source.clone();
        }
        if let Some(destination) = &self.destination {
            options.destination_root = destination.clone();
        }
        if let Some(policy) = self.on_collision {
            options.on_collision = policy.into();
        }
        options.dry_run |= self.dry_run;
        Ok(options)
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// A date tag that exists but cannot be read deserves attention; files
/// without EXIF or without a date in their name are routine.
fn worth_warning(error: &Error) -> bool {
    matches!(error, Error::MalformedDate(_))
}

fn log_event(event: &Event<'_>, dry_run: bool) {
    match event {
        Event::Relocated {
            path,
            destination,
            label,
            source,
        } => {
            let verb = if dry_run { "would move" } else { "moved" };
            info!(%label, %source, "{} {} -> {}", verb, path.display(), destination.display());
        }
        Event::Skipped {
            path,
            reason: SkipReason::Directory,
        } => trace!("entering {}", path.display()),
        Event::Skipped { path, reason } => debug!(?reason, "skip {}", path.display()),
        Event::FallThrough { path, tier, error } if worth_warning(error) => {
            warn!(%tier, "{}: {}", path.display(), error)
        }
        Event::FallThrough { path, tier, error } => debug!(%tier, "{}: {}", path.display(), error),
        Event::Failed { path, error } => error!("{}: {}", path.display(), error),
        Event::Unreadable { path, error } => match path {
            Some(path) => error!("cannot read {}: {}", path.display(), error),
            None => error!("{}", error),
        },
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    let t_total = std::time::Instant::now();

    let options = cli.options()?;
    info!(
        "sorting {} into {}{}",
        options.source_root.display(),
        options.destination_root.display(),
        if options.dry_run { " (dry run)" } else { "" }
    );

    let dry_run = options.dry_run;
    let result = fotofile_core::process(&options, &move |event| log_event(event, dry_run))
        .with_context(|| format!("cannot sort {}", options.source_root.display()))?;

    info!(
        "Done! {} files scanned, {} moved, {} skipped, {} failed ({:.2}s)",
        result.scanned,
        result.relocated,
        result.skipped,
        result.failed,
        t_total.elapsed().as_secs_f64()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_flags() {
        let cli = Cli::parse_from(["fotofile", "-s", "/in", "-d", "/out", "--on-collision", "fail"]);
        let options = cli.options().unwrap();
        assert_eq!(options.source_root, PathBuf::from("/in"));
        assert_eq!(options.destination_root, PathBuf::from("/out"));
        assert_eq!(options.on_collision, CollisionPolicy::Fail);
        assert!(!options.dry_run);
    }

    #[test]
    fn test_options_need_roots() {
        let cli = Cli::parse_from(["fotofile", "-s", "/in"]);
        assert!(cli.options().is_err());
    }

    #[test]
    fn test_only_malformed_dates_warn() {
        assert!(worth_warning(&Error::MalformedDate("2021".into())));
        assert!(!worth_warning(&Error::TagMissing));
        assert!(!worth_warning(&Error::NotFound));
        assert!(!worth_warning(&Error::DecodeFailed {
            path: PathBuf::from("a.png"),
            source: exif::Error::NotFound("PNG"),
        }));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["fotofile", "-v", "-q"]).is_err());
    }
}
