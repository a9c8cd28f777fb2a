//! treefs shell binary.
//!
//! Drives an in-memory namespace one command per line, from a script file or
//! stdin. Useful for poking at the namespace semantics without mounting it.
//!
//! Usage:
//!   # Interactive / piped
//!   cargo run -p treefs-shell
//!
//!   # Script with a config, continuing past failures
//!   cargo run -p treefs-shell -- --script demo.tfs --config treefs.toml --keep-going
//!
//!   # Override the config's policies
//!   cargo run -p treefs-shell -- --depth-policy uniform --rmdir-policy cascade
//!
//! Commands: mkdir, touch, write, post, cat, ls [-a], stat, rm, rmdir, tree, clear.

mod command;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use treefs_core::{DepthPolicy, Namespace, NamespaceConfig, RmdirPolicy};

/// Run namespace commands against an in-memory tree.
#[derive(Parser, Debug)]
#[command(name = "treefs-shell")]
#[command(about = "Scripted shell for the treefs in-memory namespace")]
struct Args {
    /// TOML namespace configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Report failing commands and continue
    #[arg(short, long)]
    keep_going: bool,

    /// Depth rules for creation: reference or uniform
    #[arg(long, value_parser = parse_depth_policy)]
    depth_policy: Option<DepthPolicy>,

    /// Removing a non-empty directory: require-empty or cascade
    #[arg(long, value_parser = parse_rmdir_policy)]
    rmdir_policy: Option<RmdirPolicy>,
}

fn parse_depth_policy(s: &str) -> Result<DepthPolicy, String> {
    DepthPolicy::from_str(s)
        .ok_or_else(|| format!("unknown depth policy '{s}' (reference, uniform)"))
}

fn parse_rmdir_policy(s: &str) -> Result<RmdirPolicy, String> {
    RmdirPolicy::from_str(s)
        .ok_or_else(|| format!("unknown rmdir policy '{s}' (require-empty, cascade)"))
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            tracing::warn!(failures, "finished with failing commands");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Config file (or defaults) with command-line policy overrides applied.
fn load_config(args: &Args) -> Result<NamespaceConfig> {
    let mut config = match &args.config {
        Some(path) => NamespaceConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => NamespaceConfig::default(),
    };
    if let Some(policy) = args.depth_policy {
        config.depth_policy = policy;
    }
    if let Some(policy) = args.rmdir_policy {
        config.rmdir_policy = policy;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<usize> {
    let config = load_config(args)?;
    tracing::info!(
        depth_policy = ?config.depth_policy,
        rmdir_policy = ?config.rmdir_policy,
        "starting namespace"
    );
    let mut ns = Namespace::with_config(config);

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening script {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let failures = run_script(&mut ns, input, &mut out, args.keep_going)?;

    tracing::info!(nodes = ns.node_count(), failures, "done");
    Ok(failures)
}

/// Execute every line of `input`. Returns the number of failed commands.
///
/// Each failure is reported on `out`. Unless `keep_going`, the first one
/// stops the script with an error naming its line.
fn run_script(
    ns: &mut Namespace,
    input: impl BufRead,
    out: &mut impl Write,
    keep_going: bool,
) -> Result<usize> {
    let mut failures = 0;

    for (number, line) in input.lines().enumerate() {
        let line = line.context("reading input")?;
        let outcome = match command::parse(&line) {
            Ok(Some(cmd)) => command::execute(ns, &cmd, out),
            Ok(None) => Ok(()),
            Err(e) => Err(e.into()),
        };

        if let Err(e) = outcome {
            failures += 1;
            writeln!(out, "error: {e}")?;
            if !keep_going {
                out.flush()?;
                anyhow::bail!("line {}: {}", number + 1, e);
            }
        }
    }

    out.flush()?;
    Ok(failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "mkdir /a\nmkdir /a/b\nwrite /a/f done\n";

    #[test]
    fn test_stops_at_first_failure() {
        let mut ns = Namespace::new();
        let mut out = Vec::new();

        let err = run_script(&mut ns, SCRIPT.as_bytes(), &mut out, false).unwrap_err();
        assert_eq!(err.to_string(), "line 2: permission denied: /a/b");
        assert_eq!(String::from_utf8(out).unwrap(), "error: permission denied: /a/b\n");
        assert!(ns.exists("/a"));
        assert!(!ns.exists("/a/f"));
    }

    #[test]
    fn test_keep_going_counts_failures() {
        let mut ns = Namespace::new();
        let mut out = Vec::new();

        let failures = run_script(&mut ns, SCRIPT.as_bytes(), &mut out, true).unwrap();
        assert_eq!(failures, 1);
        assert_eq!(ns.read_all("/a/f").unwrap(), b"done");
    }

    #[test]
    fn test_clean_script() {
        let mut ns = Namespace::new();
        let mut out = Vec::new();
        let script = "# setup\n\nmkdir /d\nwrite /d/f hi\ncat /d/f\n";

        assert_eq!(run_script(&mut ns, script.as_bytes(), &mut out, false).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "hi\n");
    }

    #[test]
    fn test_parse_errors_count_as_failures() {
        let mut ns = Namespace::new();
        let mut out = Vec::new();

        let failures = run_script(&mut ns, "bogus\nmkdir /d\n".as_bytes(), &mut out, true).unwrap();
        assert_eq!(failures, 1);
        assert!(ns.exists("/d"));
    }

    #[test]
    fn test_policy_flags_override_config() {
        let args = Args::try_parse_from([
            "treefs-shell",
            "--depth-policy",
            "Uniform",
            "--rmdir-policy",
            "cascade",
        ])
        .unwrap();
        let config = load_config(&args).unwrap();
        assert_eq!(config.depth_policy, DepthPolicy::Uniform);
        assert_eq!(config.rmdir_policy, RmdirPolicy::Cascade);

        let args = Args::try_parse_from(["treefs-shell"]).unwrap();
        assert_eq!(load_config(&args).unwrap(), NamespaceConfig::default());
    }

    #[test]
    fn test_unknown_policy_flag_rejected() {
        assert!(Args::try_parse_from(["treefs-shell", "--depth-policy", "sideways"]).is_err());
        assert!(Args::try_parse_from(["treefs-shell", "--rmdir-policy", "recursive"]).is_err());
    }
}
