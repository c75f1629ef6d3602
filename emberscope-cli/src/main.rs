use clap::Parser;

use emberscope_core::error::{ConfigError, ExplorerError};
use emberscope_syntax::SyntaxError;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "emberscope",
    version,
    about = "Explore the public surface of Ember components"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Exit code when a batch finished but some files failed.
const EXIT_PARTIAL: i32 = 10;

/// Classify an error into an exit code.
///
///   0: success
///   1: general/unknown error
///   2: configuration error
///   3: path not found
///   4: parse failure
///   10: partial success (some files failed in a batch)
fn classify_exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.downcast_ref::<ConfigError>().is_some() {
            return 2;
        }
        if cause.downcast_ref::<SyntaxError>().is_some() {
            return 4;
        }
        match cause.downcast_ref::<ExplorerError>() {
            Some(ExplorerError::Config(_)) => return 2,
            Some(ExplorerError::Syntax(_) | ExplorerError::Json(_)) => return 4,
            Some(ExplorerError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                return 3;
            }
            _ => {}
        }
    }

    let lower = format!("{err:#}").to_lowercase();
    if lower.contains("cannot resolve path") || lower.contains("no component named") {
        3
    } else {
        1
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to create runtime: {e}");
            std::process::exit(1);
        }
    };

    match runtime.block_on(commands::run(cli.command, cli.quiet)) {
        Ok(commands::Outcome::Complete) => std::process::exit(0),
        Ok(commands::Outcome::Partial) => std::process::exit(EXIT_PARTIAL),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(classify_exit_code(&e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn exit_code_cannot_resolve() {
        let err = anyhow::anyhow!("Cannot resolve path: /nonexistent");
        assert_eq!(classify_exit_code(&err), 3);
    }

    #[test]
    fn exit_code_missing_file() {
        let err = ExplorerError::Read {
            path: "x.js".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let err = anyhow::Error::from(err).context("Failed to analyze x.js");
        assert_eq!(classify_exit_code(&err), 3);
    }

    #[test]
    fn exit_code_config() {
        let err: anyhow::Result<()> =
            Err(ConfigError::Parse("bad toml".into())).context("Cannot load config");
        assert_eq!(classify_exit_code(&err.unwrap_err()), 2);
    }

    #[test]
    fn exit_code_parse() {
        let err = ExplorerError::Syntax(SyntaxError::Template {
            line: 1,
            column: 1,
            message: "unclosed block".into(),
        });
        assert_eq!(classify_exit_code(&anyhow::Error::from(err)), 4);
    }

    #[test]
    fn exit_code_malformed_meta_json() {
        let err = emberscope_core::aggregate::MergedMeta::from_json("{")
            .map_err(anyhow::Error::from)
            .context("Invalid merged fact sheet")
            .unwrap_err();
        assert_eq!(classify_exit_code(&err), 4);
    }

    #[test]
    fn exit_code_general() {
        let err = anyhow::anyhow!("Something unexpected happened");
        assert_eq!(classify_exit_code(&err), 1);
    }
}
