// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::io::Write;
use std::path::PathBuf;

use crate::helpers::telemetry::setup_simple_tracing;
use crate::input::{parse_point_set, read_document};
use crate::output::render;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rootfit_config::validation::ValidTolerance;
use rootfit_config::{load_config, CliOverrides, OutputFormat, RootfitConfig};
use rootfit_solver::utils::format_matrix;
use rootfit_solver::{build_vandermonde, encode, reconstruct, OverflowPolicy, Reconstruction};
use tracing::{debug, info, instrument, trace, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "rootfit", version)]
#[command(about = "Recover polynomial coefficients from roots written in bases 2 to 36", long_about = None)]
pub struct Cli {
    /// JSON point set; reads stdin when omitted or `-`
    input: Option<PathBuf>,

    /// Number of coefficients to recover, overriding `keys.k` in the input
    #[arg(short = 'k', long = "coefficients")]
    coefficients: Option<usize>,

    /// Decimal places printed for each coefficient
    #[arg(long)]
    precision: Option<usize>,

    /// Absolute pivot tolerance below which the system is treated as singular
    #[arg(long)]
    tolerance: Option<ValidTolerance>,

    /// Let oversized non-decimal values wrap around instead of failing
    #[arg(long, action = ArgAction::SetTrue)]
    wrapping: bool,

    /// Print the full result as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `rootfit -vvv` will give you
    /// trace level output
    #[arg(
        short,
        long,
        action = ArgAction::Count,
    )]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        conflicts_with = "verbose",
    )]
    quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,  //
                1 => Level::INFO,  // -v
                2 => Level::DEBUG, // -vv
                _ => Level::TRACE, // -vvv
            }
        }
    }

    pub fn execute(self) -> Result<()> {
        setup_simple_tracing(self.log_level());
        let stdout = std::io::stdout();
        self.run(&mut stdout.lock())
    }

    #[instrument(skip_all)]
    pub fn run<W: Write>(self, out: &mut W) -> Result<()> {
        let config = self.load_config()?;
        info!("Config loaded from: {:?}", config.config_file());

        let document = read_document(self.input.as_deref())?;
        let point_set = parse_point_set(&document)?;

        let k = self
            .coefficients
            .or(point_set.k)
            .context("Missing coefficient count: set \"keys.k\" in the input or pass -k")?;

        if let Some(n) = point_set.declared_n {
            if n != point_set.samples.len() {
                warn!(
                    declared = n,
                    usable = point_set.samples.len(),
                    "Declared point count does not match the usable entries"
                );
            }
        }

        let result = reconstruct(&point_set.samples, k, config.reconstruct_options())?;
        self.log_details(&result, k);

        let rendered = render(&result, config.output(), config.precision())?;
        out.write_all(rendered.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn log_details(&self, result: &Reconstruction, k: usize) {
        for root in &result.roots {
            if let Ok(hex) = encode(*root, 16) {
                debug!(root, hex = %hex, "decoded root");
            }
        }

        if tracing::enabled!(Level::TRACE) {
            if let Ok(matrix) = build_vandermonde(&result.roots, k) {
                trace!("\n{}", format_matrix("Vandermonde system", &matrix, 2));
            }
        }

        debug!(residual = result.residual, "max |V · a| over all points");
        if result.unverified_rows > 0 {
            warn!(
                unverified_rows = result.unverified_rows,
                "More points than coefficients; surplus points were not checked against the result"
            );
        }
    }

    pub fn load_config(&self) -> Result<RootfitConfig> {
        load_config(self.config.clone(), self.overrides())
    }

    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            precision: self.precision,
            tolerance: self.tolerance.map(Into::into),
            overflow: self.wrapping.then_some(OverflowPolicy::Wrapping),
            output: self.json.then_some(OutputFormat::Json),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rootfit_config::DEFAULT_CONFIG_NAME;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn input_file(document: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(document.as_bytes()).unwrap();
        file
    }

    /// Keep the host's config files and `ROOTFIT_*` variables out of the run.
    fn isolate(jail: &mut Jail) {
        jail.clear_env();
        let home = format!("{}", jail.directory().to_string_lossy());
        jail.set_env("HOME", &home);
        jail.set_env("XDG_CONFIG_HOME", format!("{}/.config", home));
    }

    fn run_cli(args: &[&str]) -> Result<String> {
        let mut out = Vec::new();
        Cli::try_parse_from(std::iter::once("rootfit").chain(args.iter().copied()))?
            .run(&mut out)?;
        Ok(String::from_utf8(out)?)
    }

    /// Run inside a jail; `host` shapes the surroundings before isolation applies.
    fn run_jailed<F>(args: &[&str], host: F) -> Result<String>
    where
        F: FnOnce(&mut Jail) -> figment::error::Result<()>,
    {
        let mut outcome = None;
        Jail::expect_with(|jail| {
            host(jail)?;
            isolate(jail);
            outcome = Some(run_cli(args));
            Ok(())
        });
        outcome.context("jail closure did not run")?
    }

    fn run(args: &[&str]) -> Result<String> {
        run_jailed(args, |_| Ok(()))
    }

    #[test]
    fn test_log_level() {
        let cli = Cli::parse_from(["rootfit"]);
        assert_eq!(cli.log_level(), Level::WARN);
        let cli = Cli::parse_from(["rootfit", "-vv"]);
        assert_eq!(cli.log_level(), Level::DEBUG);
        let cli = Cli::parse_from(["rootfit", "-vvvv"]);
        assert_eq!(cli.log_level(), Level::TRACE);
        let cli = Cli::parse_from(["rootfit", "-q"]);
        assert_eq!(cli.log_level(), Level::ERROR);
        assert!(Cli::try_parse_from(["rootfit", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_rejects_bad_tolerance() {
        assert!(Cli::try_parse_from(["rootfit", "--tolerance", "0"]).is_err());
        assert!(Cli::try_parse_from(["rootfit", "--tolerance", "1e-9"]).is_ok());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from(["rootfit", "--wrapping", "--json", "--precision", "5"]);
        let overrides = cli.overrides();
        assert_eq!(overrides.overflow, Some(OverflowPolicy::Wrapping));
        assert_eq!(overrides.output, Some(OutputFormat::Json));
        assert_eq!(overrides.precision, Some(5));
        assert_eq!(overrides.tolerance, None);

        let cli = Cli::parse_from(["rootfit"]);
        let overrides = cli.overrides();
        assert_eq!(overrides.overflow, None);
        assert_eq!(overrides.output, None);
    }

    #[test]
    fn test_run_text_output() -> Result<()> {
        let file = input_file(
            r#"{
                "keys": { "n": 3, "k": 3 },
                "1": { "base": "10", "value": "1" },
                "2": { "base": "2", "value": "10" },
                "3": { "base": "10", "value": "3" }
            }"#,
        );
        let out = run(&[file.path().to_str().unwrap(), "--precision", "2"])?;
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Polynomial Coefficients:");
        assert_eq!(lines.len(), 4);
        for (i, line) in lines[1..].iter().enumerate() {
            assert!(line.starts_with(&format!("a{} = ", i)), "{}", line);
            let value: f64 = line.split(" = ").nth(1).unwrap().parse()?;
            assert_eq!(value.abs(), 0.0);
        }
        Ok(())
    }

    #[test]
    fn test_run_ignores_host_environment() -> Result<()> {
        let file = input_file(r#"{ "keys": { "k": 1 }, "1": { "base": "10", "value": "4" } }"#);
        let out = run_jailed(&[file.path().to_str().unwrap()], |jail| {
            jail.set_env("ROOTFIT_OUTPUT", "json");
            jail.set_env("ROOTFIT_PRECISION", "9");
            Ok(())
        })?;
        assert_eq!(out, "Polynomial Coefficients:\na0 = 0.00\n");
        Ok(())
    }

    #[test]
    fn test_run_reads_config_from_cwd() -> Result<()> {
        let file = input_file(r#"{ "keys": { "k": 1 }, "1": { "base": "10", "value": "4" } }"#);
        let out = run_jailed(&[file.path().to_str().unwrap()], |jail| {
            jail.create_file(DEFAULT_CONFIG_NAME, "output: json")?;
            Ok(())
        })?;
        let value: serde_json::Value = serde_json::from_str(&out)?;
        assert_eq!(value["roots"], serde_json::json!([4]));
        Ok(())
    }

    #[test]
    fn test_run_json_with_k_override() -> Result<()> {
        let file = input_file(
            r#"{
                "keys": { "n": 4, "k": 3 },
                "1": { "base": "10", "value": "4" },
                "2": { "base": "2", "value": "111" },
                "3": { "base": "10", "value": "12" },
                "6": { "base": "4", "value": "213" }
            }"#,
        );
        let out = run(&[file.path().to_str().unwrap(), "-k", "2", "--json"])?;
        let value: serde_json::Value = serde_json::from_str(&out)?;
        assert_eq!(value["coefficients"].as_array().unwrap().len(), 2);
        assert_eq!(value["roots"], serde_json::json!([4, 7, 12, 39]));
        assert_eq!(value["unverified_rows"], 2);
        Ok(())
    }

    #[test]
    fn test_run_missing_k() {
        let file = input_file(r#"{ "1": { "base": "10", "value": "4" } }"#);
        let err = run(&[file.path().to_str().unwrap()]).unwrap_err();
        assert!(err.to_string().contains("Missing coefficient count"));
    }

    #[test]
    fn test_run_propagates_solver_errors() {
        let file = input_file(
            r#"{
                "keys": { "k": 2 },
                "1": { "base": "10", "value": "5" },
                "2": { "base": "8", "value": "5" }
            }"#,
        );
        let err = run(&[file.path().to_str().unwrap()]).unwrap_err();
        let root = err
            .downcast_ref::<rootfit_solver::RootfitError>()
            .expect("solver error");
        assert!(matches!(
            root.as_solve(),
            Some(rootfit_solver::SolveError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_run_invalid_digit() {
        let file = input_file(r#"{ "keys": { "k": 1 }, "1": { "base": "2", "value": "102" } }"#);
        let err = run(&[file.path().to_str().unwrap()]).unwrap_err();
        assert_eq!(err.to_string(), "Sample '1': Invalid digit '2' for base 2");
    }
}
