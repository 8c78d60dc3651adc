use anyhow::Result;
use clap::Parser;
use console::style;
use log::debug;
use screenshot_sorter::cli::Cli;
use screenshot_sorter::component::ScreenshotSorter;
use screenshot_sorter::config::{Config, default_screenshot_dir};
use screenshot_sorter::init;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Program error: {e:#}");
            eprintln!("{} {:#}", style("錯誤:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    init::init_logger(init::parse_log_level(&cli.log_level)?);

    let directory = match &cli.dir {
        Some(dir) => dir.clone(),
        None => default_screenshot_dir()?,
    };

    let config = Config::new()?.with_options(cli.sort_options());
    ScreenshotSorter::new(config).run(&directory, cli.depth)?;

    Ok(())
}
