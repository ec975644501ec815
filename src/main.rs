use std::process::exit;

use clap::Parser;

use mkvbatch::config::{ConfigManager, Settings};
use mkvbatch::extract::ExtractJob;
use mkvbatch::io::{CommandRunner, Toolset};
use mkvbatch::jobs;
use mkvbatch::logging::init_tracing;
use mkvbatch::models::MkvResult;
use mkvbatch::mux::{format_tokens_pretty, shell_join, MergeJob, RunOptions};
use mkvbatch::probe;

mod cli;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let mut manager = ConfigManager::new(&cli.settings);
    if let Err(err) = manager.load_or_create() {
        eprintln!("mkvbatch: {err}");
        exit(100);
    }
    let settings = manager.settings().clone();

    init_tracing(&settings.logging.level);

    match run(cli, &settings) {
        Ok(code) => exit(code),
        Err(err) => {
            tracing::error!("{err}");
            exit(err.exit_code());
        }
    }
}

fn run(cli: Cli, settings: &Settings) -> MkvResult<i32> {
    let tools = Toolset::from_settings(&settings.tools)?;

    match cli.command {
        Commands::Merge {
            config,
            options_file,
            delete_options_file,
            dry_run,
        } => {
            let merge_config = jobs::load_merge_config(&config)?;
            let job = MergeJob::from_config(tools, &merge_config)?;

            if settings.logging.show_command_pretty {
                eprintln!("{}", format_tokens_pretty(&job.generate_command()?));
            }
            if dry_run {
                println!("{}", job.generate_command_line()?);
                return Ok(0);
            }

            let run_options = RunOptions {
                options_file,
                options_dir: non_empty_path(&settings.paths.options_file_dir),
                delete_options_file: delete_options_file
                    || settings.paths.delete_options_file,
                quiet: !cli.verbose,
            };
            job.run(&run_options)
        }

        Commands::Extract { config, dry_run } => {
            let extract_config = jobs::load_extract_config(&config)?;
            let job = ExtractJob::from_config(tools, extract_config)?;

            if dry_run {
                println!("{}", shell_join(&job.generate_command()?));
                return Ok(0);
            }

            job.run(!cli.verbose)
        }

        Commands::Identify { file } => {
            let runner = CommandRunner::new();
            let tracks = probe::identify(&runner, &tools.mkvmerge, &file)?;
            for track in &tracks {
                println!("{}", track.display_compact());
            }
            Ok(0)
        }
    }
}

fn non_empty_path(s: &str) -> Option<std::path::PathBuf> {
    if s.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(s))
    }
}
