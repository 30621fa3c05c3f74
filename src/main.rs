mod core;
mod decoder;
mod renderer;
mod shared;
mod ui;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::core::cache;
use crate::core::config::{AppConfig, ConfigArgs};
use crate::core::session;
use crate::ui::viewer::TerminalViewer;
use crate::utils::{file_utils, logger};

#[derive(Parser)]
#[command(author, version, about = "Step through video frames and save the ones worth annotating", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse every video of the input directory
    Run {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print the effective configuration as JSON
    Config {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// List the videos that a run would visit, in order
    List {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Delete a cache directory left behind by an interrupted run
    ClearCache {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn main() -> Result<()> {
    logger::init(&std::env::current_dir()?);

    // A previous crash may have left the terminal in raw mode
    let _ = crossterm::terminal::disable_raw_mode();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { config } => {
            let config = AppConfig::load(config)?;
            run(&config)?;
        }
        Commands::Config { config } => {
            let config = AppConfig::load(config)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::List { config } => {
            let config = AppConfig::load(config)?;
            let videos = file_utils::list_videos(&config.input_video_directory)?;
            for (i, video) in videos.iter().enumerate() {
                println!("{:>4}  {}", i + 1, video.display());
            }
            if videos.is_empty() {
                eprintln!("No videos found in {}", config.input_video_directory.display());
            }
        }
        Commands::ClearCache { config } => {
            let config = AppConfig::load(config)?;
            cache::clear_cache(&config.cache_directory)?;
            println!("Cache folder deleted: {}", config.cache_directory.display());
        }
    }

    Ok(())
}

fn run(config: &AppConfig) -> Result<()> {
    logger::info(&format!("starting run with {:?}", config));

    let videos = file_utils::list_videos(&config.input_video_directory)?;
    if videos.is_empty() {
        println!("No videos found in {}", config.input_video_directory.display());
        return Ok(());
    }
    println!(
        "Browsing {} videos from {} ({:?} frames)",
        videos.len(),
        config.input_video_directory.display(),
        config.strategy
    );

    let summary = {
        // Dropping the viewer gives the terminal back before we print
        let mut viewer = TerminalViewer::new(config.display_mode)?;
        session::run(config, &mut viewer)
    };

    let summary = match summary {
        Ok(summary) => summary,
        Err(err) => {
            logger::error(&format!("run failed: {:#}", err));
            return Err(err);
        }
    };

    logger::info(&format!("run finished: {:?}", summary));
    println!(
        "Done: {}/{} videos browsed, {} failed to open, {} frames saved to {}{}",
        summary.videos_browsed,
        summary.videos_found,
        summary.videos_failed,
        summary.frames_saved,
        config.output_image_directory.display(),
        if summary.aborted { " (stopped early)" } else { "" }
    );
    Ok(())
}
