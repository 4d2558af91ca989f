//! CLI argument definitions for the plucker command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{ArgAction, Parser, Subcommand};

/// Plucker - Karplus-Strong string synthesis
#[derive(Parser)]
#[command(name = "plucker")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Resolve note names to frequencies and delay-line lengths
    Freq {
        /// Note names (e.g. A4, C#5, Bb3)
        #[arg(required = true)]
        notes: Vec<String>,

        /// Sample rate in Hz
        #[arg(long, default_value_t = 16000)]
        sample_rate: u32,

        /// Frequency of A4 in Hz
        #[arg(long, default_value_t = 440.0)]
        a4: f64,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Synthesize a single plucked note
    Pluck {
        /// Note name (e.g. A4, C#5, Bb3)
        #[arg(short, long)]
        note: String,

        /// Duration in seconds
        #[arg(short, long, default_value_t = 1.0)]
        duration: f64,

        /// Per-loop decay at the reference length, in (0, 1]
        #[arg(short, long, default_value_t = 0.99)]
        alpha: f64,

        /// Delay-line length at which alpha applies unmodified
        #[arg(long, default_value_t = 50)]
        reference_length: usize,

        /// Excitation noise distribution
        #[arg(long, default_value = "uniform", value_parser = ["uniform", "bipolar", "gaussian"])]
        distribution: String,

        /// Seed for the excitation noise (default: system entropy)
        #[arg(long)]
        seed: Option<u32>,

        /// Sample rate in Hz
        #[arg(long, default_value_t = 16000)]
        sample_rate: u32,

        /// Frequency of A4 in Hz
        #[arg(long, default_value_t = 440.0)]
        a4: f64,

        /// Write the samples as a JSON array to this file
        #[arg(short = 'o', long)]
        samples_out: Option<String>,

        /// Scale written samples to this peak level
        #[arg(long)]
        normalize: Option<f64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Synthesize a chord described by a JSON chord file
    Chord {
        /// Path to the chord file
        #[arg(short, long)]
        spec: String,

        /// Write the samples as a JSON array to this file
        #[arg(short = 'o', long)]
        samples_out: Option<String>,

        /// Scale written samples to this peak level
        #[arg(long)]
        normalize: Option<f64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}
