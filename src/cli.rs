//! Command-line interface implementation for yang.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Settings;
use crate::constants::DEFAULT_MAX_PASSES;

/// Command-line arguments structure for yang.
#[derive(Parser, Debug)]
#[command(author, version, about = "yang: declarative build pipeline interpreter", long_about = None)]
pub struct Args {
    /// Path to the build manifest
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Variables seeded before the manifest runs, as `key:value` or a bare `key`
    #[arg(value_name = "VARS")]
    pub vars: Vec<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Maximum expansion passes before a variable is reported as cyclic
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_PASSES)]
    pub max_passes: usize,

    /// Kill any command or download running longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Shell used to run commands (defaults to /bin/sh, or cmd.exe on Windows)
    #[arg(long, value_name = "SHELL")]
    pub shell: Option<String>,
}

impl Args {
    pub fn settings(&self) -> Settings {
        Settings {
            max_passes: self.max_passes,
            timeout: self.timeout.map(Duration::from_secs),
            shell: self.shell.clone(),
        }
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if the manifest argument is missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
