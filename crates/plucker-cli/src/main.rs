//! Plucker CLI - Command-line interface for Karplus-Strong string synthesis
//!
//! This binary resolves note names, plucks single notes and renders chords.

mod cli_args;

use clap::Parser;
use std::process::ExitCode;

use cli_args::{Cli, Commands};
use plucker_cli::commands;
use plucker_cli::commands::pluck::PluckArgs;
use plucker_cli::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Freq {
            notes,
            sample_rate,
            a4,
            json,
        } => commands::freq::run(&notes, sample_rate, a4, json),
        Commands::Pluck {
            note,
            duration,
            alpha,
            reference_length,
            distribution,
            seed,
            sample_rate,
            a4,
            samples_out,
            normalize,
            json,
        } => {
            let args = PluckArgs {
                note,
                duration,
                alpha,
                reference_length,
                distribution,
                seed,
                sample_rate,
                a4,
            };
            commands::pluck::run(&args, samples_out.as_deref(), normalize, json)
        }
        Commands::Chord {
            spec,
            samples_out,
            normalize,
            json,
        } => commands::chord::run(&spec, samples_out.as_deref(), normalize, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_freq() {
        let cli = Cli::try_parse_from(["plucker", "freq", "A4", "C#5", "--json"]).unwrap();
        match cli.command {
            Commands::Freq {
                notes,
                sample_rate,
                a4,
                json,
            } => {
                assert_eq!(notes, vec!["A4".to_string(), "C#5".to_string()]);
                assert_eq!(sample_rate, 16000);
                assert_eq!(a4, 440.0);
                assert!(json);
            }
            _ => panic!("expected freq command"),
        }
    }

    #[test]
    fn test_cli_freq_requires_notes() {
        assert!(Cli::try_parse_from(["plucker", "freq"]).is_err());
    }

    #[test]
    fn test_cli_parses_pluck_defaults() {
        let cli = Cli::try_parse_from(["plucker", "pluck", "-n", "E2"]).unwrap();
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Commands::Pluck {
                note,
                duration,
                alpha,
                reference_length,
                distribution,
                seed,
                samples_out,
                normalize,
                json,
                ..
            } => {
                assert_eq!(note, "E2");
                assert_eq!(duration, 1.0);
                assert_eq!(alpha, 0.99);
                assert_eq!(reference_length, 50);
                assert_eq!(distribution, "uniform");
                assert_eq!(seed, None);
                assert_eq!(samples_out, None);
                assert_eq!(normalize, None);
                assert!(!json);
            }
            _ => panic!("expected pluck command"),
        }
    }

    #[test]
    fn test_cli_parses_pluck_options() {
        let cli = Cli::try_parse_from([
            "plucker",
            "-vv",
            "pluck",
            "--note",
            "Bb3",
            "--distribution",
            "gaussian",
            "--seed",
            "9",
            "-o",
            "out.json",
            "--normalize",
            "0.8",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Pluck {
                note,
                distribution,
                seed,
                samples_out,
                normalize,
                ..
            } => {
                assert_eq!(note, "Bb3");
                assert_eq!(distribution, "gaussian");
                assert_eq!(seed, Some(9));
                assert_eq!(samples_out.as_deref(), Some("out.json"));
                assert_eq!(normalize, Some(0.8));
            }
            _ => panic!("expected pluck command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_distribution() {
        assert!(Cli::try_parse_from([
            "plucker",
            "pluck",
            "-n",
            "A4",
            "--distribution",
            "pink"
        ])
        .is_err());
    }

    #[test]
    fn test_cli_parses_chord() {
        let cli = Cli::try_parse_from(["plucker", "chord", "-s", "triad.json", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Chord {
                spec,
                samples_out,
                json,
                ..
            } => {
                assert_eq!(spec, "triad.json");
                assert_eq!(samples_out, None);
                assert!(!json);
            }
            _ => panic!("expected chord command"),
        }
    }
}
