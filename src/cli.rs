//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;

/// Usage line the simulator prints (to stdout, exit code 1) when the
/// arguments don't parse, matching the original command-line contract
/// rather than clap's default stderr/exit-2 behavior.
pub const USAGE: &str = "Usage: sim <program.bin>";

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Path to the raw program binary to load.
    pub program: PathBuf,

    /// Print per-cycle pipeline state while running.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses `argv`, printing the mandated usage line to stdout and
    /// exiting with status 1 on any parse failure, instead of clap's
    /// default (stderr, status 2). This is the one place this crate
    /// deliberately steps around a library default to hold an external
    /// contract exactly.
    pub fn parse_or_exit() -> Self {
        match Cli::try_parse() {
            Ok(cli) => cli,
            Err(_) => {
                println!("{USAGE}");
                std::process::exit(1);
            }
        }
    }
}
