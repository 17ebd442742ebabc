// nbscrub/src/main.rs
//! nbscrub entry point.
//!
//! Parses arguments, initialises logging and runs the scrub command. Any
//! error ends the process with a non-zero status.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use nbscrub::cli::Cli;
use nbscrub::commands::scrub::{error_msg, run_scrub, ScrubOptions};
use nbscrub::logger;

fn main() {
    let args = Cli::parse();

    if args.quiet {
        logger::init_logger(Some(LevelFilter::Off));
    } else if args.debug {
        logger::init_logger(Some(LevelFilter::Debug));
    } else {
        logger::init_logger(None);
    }

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error_msg(format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

fn run(args: Cli) -> Result<i32> {
    let opts = ScrubOptions {
        output: args.output_path(),
        input: args.input,
        config: args.config,
        check: args.check,
        json: args.json,
        quiet: args.quiet,
    };

    let outcome = run_scrub(&opts)?;

    // --check signals "needs repair" through the exit status
    if opts.check && outcome.report.has_changes() {
        return Ok(1);
    }
    Ok(0)
}
