//! One-shot pre-test probability report.
//!
//! Runs a single calculation without the interactive wizard and prints the
//! recommendation, calculation details and interpretation.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin pretest -- --age 72 --probability 20 --test "Amyloid PET Scan"
//! cargo run --bin pretest -- --age 72 --probability 20 --test "Amyloid PET Scan" \
//!     --lr-positive 12 --json
//! cargo run --bin pretest -- --list
//! ```
//!
//! Exit status is 2 for usage errors and 1 when the assessment is rejected.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use neuroprob::adapters::TomlCatalogFile;
use neuroprob::application::{render_catalog, render_text_report, RiskEngine};
use neuroprob::config::AppConfig;
use neuroprob::domain::{AssessmentInput, LikelihoodOverride};

const USAGE: &str = "Usage: pretest --age <years> --probability <percent> --test <name> \
[--lr-positive <x>] [--lr-negative <y>] [--catalog <path>] [--json]\n       pretest --list [--catalog <path>]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    age: Option<String>,
    probability: Option<String>,
    test: Option<String>,
    lr_positive: Option<f64>,
    lr_negative: Option<f64>,
    catalog: Option<PathBuf>,
    json: bool,
    list: bool,
    help: bool,
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    match args.next() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("Missing value for {flag}")),
    }
}

fn ratio(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<f64, String> {
    let raw = value(args, flag)?;
    raw.trim()
        .parse()
        .map_err(|_| format!("{flag} expects a number, got '{raw}'"))
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut args = args.into_iter();
    let mut parsed = Args::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--age" => parsed.age = Some(value(&mut args, "--age")?),
            "--probability" => parsed.probability = Some(value(&mut args, "--probability")?),
            "--test" => parsed.test = Some(value(&mut args, "--test")?),
            "--lr-positive" => parsed.lr_positive = Some(ratio(&mut args, "--lr-positive")?),
            "--lr-negative" => parsed.lr_negative = Some(ratio(&mut args, "--lr-negative")?),
            "--catalog" => parsed.catalog = Some(PathBuf::from(value(&mut args, "--catalog")?)),
            "--json" => parsed.json = true,
            "--list" => parsed.list = true,
            "-h" | "--help" => parsed.help = true,
            _ => return Err(format!("Unknown arg: {arg}")),
        }
    }

    if !parsed.list && !parsed.help {
        for (flag, present) in [
            ("--age", parsed.age.is_some()),
            ("--probability", parsed.probability.is_some()),
            ("--test", parsed.test.is_some()),
        ] {
            if !present {
                return Err(format!("Missing required {flag}"));
            }
        }
    }

    Ok(parsed)
}

impl Args {
    fn assessment(&self) -> Result<AssessmentInput, neuroprob::domain::AssessmentError> {
        let input = AssessmentInput::parse(
            self.age.as_deref().unwrap_or_default(),
            self.probability.as_deref().unwrap_or_default(),
            self.test.as_deref().unwrap_or_default(),
        )?;
        Ok(input.with_override(LikelihoodOverride {
            positive: self.lr_positive,
            negative: self.lr_negative,
            source: None,
        }))
    }
}

fn build_engine(catalog: Option<&PathBuf>) -> neuroprob::Result<RiskEngine> {
    match catalog {
        Some(path) => RiskEngine::from_source(&TomlCatalogFile::new(path)),
        None => AppConfig::from_env().build_engine(),
    }
}

fn main() {
    // Reports go to stdout; diagnostics stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            std::process::exit(2);
        }
    };

    if args.help {
        println!("{USAGE}");
        return;
    }

    let engine = match build_engine(args.catalog.as_ref()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Cannot load test catalog: {e}");
            std::process::exit(1);
        }
    };

    if args.list {
        let mut listing = String::new();
        if let Err(e) = render_catalog(&mut listing, engine.catalog()) {
            eprintln!("Cannot render catalog: {e}");
            std::process::exit(1);
        }
        print!("{listing}");
        return;
    }

    let result = args
        .assessment()
        .and_then(|input| engine.compute(&input));
    let result = match result {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Cannot serialize result: {e}");
                std::process::exit(1);
            }
        }
    } else {
        let mut report = String::new();
        if let Err(e) = render_text_report(&mut report, &result) {
            eprintln!("Cannot render report: {e}");
            std::process::exit(1);
        }
        print!("{report}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_parses_full_invocation() {
        let parsed = parse_args(args(&[
            "--age",
            "72",
            "--probability",
            "20",
            "--test",
            "Amyloid PET Scan",
            "--lr-positive",
            "12",
            "--json",
        ]))
        .expect("Valid args");

        assert_eq!(parsed.age.as_deref(), Some("72"));
        assert_eq!(parsed.test.as_deref(), Some("Amyloid PET Scan"));
        assert_eq!(parsed.lr_positive, Some(12.0));
        assert_eq!(parsed.lr_negative, None);
        assert!(parsed.json);

        let input = parsed.assessment().expect("Valid assessment");
        assert_eq!(input.patient_age, 72);
        assert_eq!(
            input.likelihood_override.and_then(|o| o.positive),
            Some(12.0)
        );
    }

    #[test]
    fn test_list_needs_no_assessment() {
        let parsed = parse_args(args(&["--list"])).expect("Valid args");
        assert!(parsed.list);
    }

    #[test]
    fn test_usage_errors() {
        assert!(parse_args(args(&["--age", "72"])).is_err());
        assert!(parse_args(args(&["--age"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
        assert!(parse_args(args(&[
            "--age", "72", "--probability", "20", "--test", "x", "--lr-negative", "low"
        ]))
        .is_err());
    }

    #[test]
    fn test_non_numeric_age_is_a_validation_error() {
        let parsed = parse_args(args(&["--age", "old", "--probability", "20", "--test", "x"]))
            .expect("Parses as strings");
        assert!(parsed.assessment().is_err());
    }
}
