//! Command-line parsing.

use crate::error::CliError;
use std::path::PathBuf;

pub fn print_usage() {
    eprintln!("Usage: tabula [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Spreadsheet file to open (.xml)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <EXPR>      Evaluate an expression against the sheet and exit");
    eprintln!("  -s, --set <NAME=CONTENT>  Set a cell before anything else (can be repeated)");
    eprintln!("  -o, --output <FILE>       Save the resulting sheet");
    eprintln!("  --config <FILE>           Read settings from FILE");
    eprintln!("  --no-config               Ignore the user config file");
    eprintln!("  -v, --verbose             Log more to stderr (-vv for trace)");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default, PartialEq)]
pub struct Options {
    pub file: Option<PathBuf>,
    pub command: Option<String>,
    /// Cell edits in the order given.
    pub sets: Vec<(String, String)>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_config: bool,
    pub verbosity: u8,
    pub help: bool,
}

/// Parse arguments, not including the program name.
pub fn parse_args<I>(args: I) -> Result<Options, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => options.help = true,
            "-v" | "--verbose" => options.verbosity = options.verbosity.saturating_add(1),
            "-vv" => options.verbosity = options.verbosity.saturating_add(2),
            "--no-config" => options.no_config = true,
            "-c" | "--command" => {
                options.command = Some(value(&mut args, &arg, "an expression")?);
            }
            "-s" | "--set" => {
                let assignment = value(&mut args, &arg, "NAME=CONTENT")?;
                options.sets.push(split_assignment(&assignment)?);
            }
            "-o" | "--output" => {
                options.output = Some(PathBuf::from(value(&mut args, &arg, "a file path")?));
            }
            "--config" => {
                options.config = Some(PathBuf::from(value(&mut args, &arg, "a file path")?));
            }
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(CliError::UnknownOption(other.to_string()));
            }
            _ => {
                if options.file.is_some() {
                    return Err(CliError::UnexpectedArgument(arg));
                }
                options.file = Some(PathBuf::from(arg));
            }
        }
    }

    Ok(options)
}

fn value<I>(args: &mut I, flag: &str, what: &'static str) -> Result<String, CliError>
where
    I: Iterator<Item = String>,
{
    args.next().ok_or_else(|| CliError::MissingValue {
        flag: flag.to_string(),
        what,
    })
}

/// Split at the first '=' so that formulas like `A1==B1+1` keep theirs.
fn split_assignment(assignment: &str) -> Result<(String, String), CliError> {
    match assignment.split_once('=') {
        Some((name, content)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), content.to_string()))
        }
        _ => Err(CliError::InvalidAssignment(assignment.to_string())),
    }
}
