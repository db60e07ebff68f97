use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::error;
use nsf_cli::{log_level, run_chunks, run_copy, run_info, CliConfig, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "nsf",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspect, list and re-save legacy EEG recordings (CNT/AVG)",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Тихий режим (только ошибки)
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Подробный лог (debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Сводка по файлу
    Info {
        file: PathBuf,
        /// Формат вывода: text, json
        #[arg(long, default_value = "text")]
        format: OutputFormat,
        /// Сколько первых событий вывести
        #[arg(long, default_value = "0")]
        events: usize,
        /// Выводить блоки настроек
        #[arg(long)]
        setup: bool,
    },
    /// Список подчанков области настроек
    Chunks {
        file: PathBuf,
        /// Формат вывода: text, json
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Загрузить и сохранить под новым именем
    Copy { input: PathBuf, output: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(log_level(cli.quiet, cli.verbose))
        .format_target(false)
        .format_timestamp_secs()
        .init();

    let result = match &cli.command {
        Command::Info {
            file,
            format,
            events,
            setup,
        } => {
            let config = CliConfig {
                format: *format,
                events: *events,
                show_setup: *setup,
            };
            run_info(file, &config).map(|out| print!("{out}"))
        }
        Command::Chunks { file, format } => run_chunks(file, *format).map(|out| print!("{out}")),
        Command::Copy { input, output } => run_copy(input, output),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}
