use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing::Level;

use msgspec_codegen::{compose, Config, Error, Mode, Outcome, Stage, DEFAULT_OUTPUT};

/// Generate the TBI message spec header from a JSON message spec
#[derive(Parser, Debug)]
#[command(name = "msgspec-gen")]
struct Cli {
    /// Path to the JSON message spec
    path_to_file: PathBuf,

    /// Where to write the generated header
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Enable verbose mode (repeat for more detail)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only check that the header on disk is up to date
    #[arg(long)]
    check: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let mode = match self.check {
            true => Mode::Check,
            false => Mode::Write,
        };
        Config::new(&self.path_to_file).with_output(&self.output).with_mode(mode)
    }

    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let code = match run(&cli) {
        Ok(Outcome::Written { .. }) => {
            println!("Message spec composition done!");
            0
        }
        Ok(Outcome::UpToDate) => {
            println!("{} is up to date", cli.output.display());
            0
        }
        Ok(Outcome::Stale) => {
            eprintln!("{} is out of date, regenerate it", cli.output.display());
            1
        }
        Err(e) => {
            if cli.verbose > 0 {
                tracing::error!("{:#}", e);
            }

            let (stage, code) = match e.downcast_ref::<Error>() {
                Some(err) => (err.stage(), err.exit_code()),
                None => (Stage::Finalize, 1),
            };
            eprintln!("ERROR! Composition failed during {}, run with -v to debug", stage);
            code
        }
    };

    std::process::exit(code);
}

fn run(cli: &Cli) -> anyhow::Result<Outcome> {
    let config = cli.config();
    compose(&config).with_context(|| format!("composing {}", config.input.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(&["msgspec-gen", "spec.json"]).unwrap();
        let config = cli.config();

        assert_eq!(config.input, PathBuf::from("spec.json"));
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.mode, Mode::Write);
        assert_eq!(cli.log_level(), Level::WARN);
    }

    #[test]
    fn flags() {
        let cli =
            Cli::try_parse_from(&["msgspec-gen", "-vv", "--check", "-o", "out/spec.h", "spec.json"])
                .unwrap();
        let config = cli.config();

        assert_eq!(config.output, PathBuf::from("out/spec.h"));
        assert_eq!(config.mode, Mode::Check);
        assert_eq!(cli.log_level(), Level::TRACE);
    }

    #[test]
    fn bundled_spec_is_valid() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("specs/messagespec.json");
        let spec = msgspec_codegen::load_spec(&path).unwrap();

        assert_eq!(spec.len(), 4);
        assert_eq!(spec.bundles().count(), 2);
        assert!(msgspec_codegen::render(&spec).contains("int tbi_send_temp_and_hum("));
    }

    #[test]
    fn path_is_required() {
        assert!(Cli::try_parse_from(&["msgspec-gen"]).is_err());
    }
}
