#![warn(missing_docs)]

//! The command line driver of the C-Mamuth compiler front end.
use std::fs;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cmamuth::cli::{CmamuthArgs, Stage};
use cmamuth::errors::CompileError;


fn main() -> ExitCode {
    let args = CmamuthArgs::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(e) => {
            tracing::debug!("could not read {}: {}", args.file.display(), e);
            eprintln!("invalid file '{}'", args.file.display());
            return ExitCode::FAILURE;
        }
    };

    match run(&source, args.stage()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}


/// Runs the front end up to the requested stage and prints that stage's output.
fn run(source: &str, stage: Stage) -> Result<(), CompileError> {
    tracing::info!("scanning {} bytes of source", source.len());
    let tokens = cmamuth::scan(source)?;
    if stage == Stage::Explore {
        tokens.iter().for_each(|token| println!("{}", token));
        return Ok(());
    }

    let mut program = cmamuth::parse(tokens)?;
    if stage == Stage::Analyze {
        print!("{}", program);
        return Ok(());
    }

    let symbols = cmamuth::verify(&mut program)?;
    if stage == Stage::Verify {
        println!("{}", symbols);
        print!("{}", program);
    }

    tracing::info!("compilation finished without errors");
    Ok(())
}
