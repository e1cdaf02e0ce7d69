//! Command line arguments of the `cmamuth` driver.
use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{ArgGroup, Parser};


/// Compiler front end for the C-Mamuth programming language
#[derive(Debug, Parser)]
#[command(name = "cmamuth", author, styles = styles())]
#[command(group(ArgGroup::new("stage").multiple(false)))]
pub struct CmamuthArgs {
    /// C-Mamuth source file (.cm)
    pub file: PathBuf,

    /// Stop after the scanner and print the tokens
    #[arg(short = 'e', long, group = "stage")]
    pub explore: bool,

    /// Stop after the parser and print the syntax tree
    #[arg(short = 'a', long, group = "stage")]
    pub analyze: bool,

    /// Stop after the verifier and print the symbol table and decorated syntax tree
    #[arg(short = 'v', long, group = "stage")]
    pub verify: bool,

    /// Enable verbose logging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}


/// The last stage the driver runs before printing its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Explore,
    Analyze,
    Verify,
    /// Run every stage and print nothing on success.
    Check,
}


impl CmamuthArgs {
    pub fn stage(&self) -> Stage {
        if self.explore {
            Stage::Explore
        } else if self.analyze {
            Stage::Analyze
        } else if self.verify {
            Stage::Verify
        } else {
            Stage::Check
        }
    }
}


/// Returns a `Styles` object with the default styles for the CLI.
pub fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}
