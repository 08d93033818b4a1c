//! Tabula - spreadsheet formula engine on the command line

mod cli;
mod config;
mod error;
mod logger;

use anyhow::{Context, Result};
use std::env;
use std::process;
use tabula_core::{CellValue, Spreadsheet};
use tabula_engine::engine::cell_order_key;

fn main() {
    let options = match cli::parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            cli::print_usage();
            process::exit(1);
        }
    };

    if options.help {
        cli::print_usage();
        return;
    }

    logger::init(options.verbosity);

    match run(&options) {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns the process exit code.
fn run(options: &cli::Options) -> Result<i32> {
    let config = config::load_config(options.config.as_deref(), options.no_config)?;

    let mut sheet = match &options.file {
        Some(path) => config
            .open_sheet(path)
            .with_context(|| format!("Failed to open {}", path.display()))?,
        None => config.new_sheet(),
    };

    for (name, content) in &options.sets {
        sheet
            .set_contents_of_cell(name, content)
            .with_context(|| format!("Failed to set {}", name))?;
    }

    if let Some(output) = &options.output {
        sheet
            .save(output)
            .with_context(|| format!("Failed to save {}", output.display()))?;
        eprintln!("Saved to {}", output.display());
    }

    if let Some(expression) = &options.command {
        return Ok(run_command(&sheet, expression));
    }

    print_cells(&sheet)?;
    Ok(0)
}

/// Print the value of `expression`, or `#ERR: ...` with exit code 1.
fn run_command(sheet: &Spreadsheet, expression: &str) -> i32 {
    match sheet.evaluate_expression(expression) {
        Ok(CellValue::Error(e)) => {
            println!("{}", e);
            1
        }
        Ok(value) => {
            println!("{}", value);
            0
        }
        Err(e) => {
            println!("#ERR: {}", e);
            1
        }
    }
}

fn print_cells(sheet: &Spreadsheet) -> Result<()> {
    let mut names: Vec<String> = sheet.get_names_of_all_nonempty_cells().into_iter().collect();
    names.sort_by_cached_key(|name| cell_order_key(name));

    for name in names {
        let contents = sheet.get_cell_contents(&name)?;
        let value = sheet.get_cell_value(&name)?;
        println!("{}: {} => {}", name, contents, value);
    }
    Ok(())
}
