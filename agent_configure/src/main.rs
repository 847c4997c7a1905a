//! Board selection and header generation for the MQTT agent.
//!
//! Usage:
//!   agent-configure --root ../freertos select --vendor nuvoton --board numaker_iot_m487_wifi
//!   agent-configure --root ../freertos --set THING_NAME=m487 show --json
//!   agent-configure --root ../freertos --defaults mqtt_agent_defaults.config generate

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config_loader::{
    FileLogConfig, KconfigFile, LoggingConfig, Map, Value, load_symbol_map, symbol_environment,
};
use mqtt_agent_config::{
    AgentConfig, AgentSymbols, BoardSelection, board,
    constants::{BOARD_CHOICE_FILE, KCONFIG_HEADER_PATH},
    render_header, render_kconfig_header,
};
use tracing::{info, warn};

/// Configure the MQTT agent for a FreeRTOS board.
#[derive(Parser, Debug)]
#[command(name = "agent-configure")]
#[command(about = "Select a board and generate the MQTT agent configuration header")]
struct Args {
    /// FreeRTOS source tree holding `vendors/`
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Default symbols, read before the board fragments
    #[arg(long)]
    defaults: Option<PathBuf>,

    /// Placeholder value, e.g. `--set THING_NAME=m487`
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    substitutions: Vec<(String, String)>,

    /// Log filter directive
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also write a daily rolling log file into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remember the board to configure
    Select {
        #[arg(long)]
        vendor: String,
        #[arg(long)]
        board: String,
    },
    /// Print the resolved configuration of the selected board
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Write the agent header and the merged `kconfig.h`
    Generate {
        /// Agent header; defaults to the board's `aws_demos/config_files` directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Merged symbol header; defaults to `<root>/build/kconfig/kconfig.h`
        #[arg(long)]
        kconfig_out: Option<PathBuf>,
    },
    /// List supported vendors and boards
    Boards,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, found '{raw}'")),
    }
}

fn logging_config(args: &Args) -> LoggingConfig {
    let config = LoggingConfig::default().with_level(&args.log_level);
    match &args.log_dir {
        Some(dir) => config.with_file(FileLogConfig::new(dir, "agent-configure")),
        None => config,
    }
}

fn selected_board(root: &Path) -> Result<BoardSelection> {
    let record = root.join(BOARD_CHOICE_FILE);
    BoardSelection::load(&record)
        .with_context(|| format!("reading {}", record.display()))?
        .with_context(|| format!("no board selected in {}, run `select` first", root.display()))
}

/// Fragments in override order, skipping board fragments that do not exist.
fn fragments(defaults: Option<&Path>, selection: &BoardSelection, root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = defaults.map(Path::to_path_buf).into_iter().collect();
    for path in selection.fragments(root) {
        if path.is_file() {
            paths.push(path);
        } else {
            warn!(path = %path.display(), "board fragment not found, skipping");
        }
    }
    paths
}

/// The chosen board with its fragments and placeholder values.
struct Sources {
    selection: BoardSelection,
    paths: Vec<PathBuf>,
    format: KconfigFile,
}

impl Sources {
    fn gather(args: &Args) -> Result<Self> {
        let selection = selected_board(&args.root)?;
        let paths = fragments(args.defaults.as_deref(), &selection, &args.root);
        let format = KconfigFile::new().with_substitutions(args.substitutions.iter().cloned());
        Ok(Self {
            selection,
            paths,
            format,
        })
    }

    fn resolve(&self) -> Result<AgentConfig> {
        let selection = &self.selection;
        let symbols = AgentSymbols::load(&self.paths, &self.format, true)
            .with_context(|| format!("loading configuration for {selection}"))?;
        symbols
            .resolve()
            .with_context(|| format!("resolving configuration for {selection}"))
    }

    fn symbol_map(&self) -> Result<Map<String, Value>> {
        load_symbol_map(&self.paths, &self.format, Some(symbol_environment()))
            .with_context(|| format!("merging symbols for {}", self.selection))
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

fn print_summary(selection: &BoardSelection, config: &AgentConfig) {
    println!("board                       {selection}");
    println!("keep-alive interval         {} s", config.keep_alive_interval_secs());
    println!("keep-alive actual interval  {}", config.keep_alive_actual_interval());
    println!("keep-alive timeout          {}", config.keep_alive_timeout());
    println!("task max block              {}", config.task_max_block());
    println!("task stack depth            {} words", config.task_stack_depth());
    println!("task priority               {}", config.task_priority());
    println!("max brokers                 {}", config.max_brokers());
    println!("max parallel ops            {}", config.max_parallel_ops());
    println!(
        "tcp send timeout            {} ms",
        config.tcp_send_timeout().as_millis()
    );
    println!("rx buffer size              {} bytes", config.rx_buffer_size());
    println!(
        "metrics                     {}",
        config.metrics_payload().as_deref().unwrap_or("disabled")
    );
}

fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::Select { vendor, board } => {
            let selection = BoardSelection::new(vendor, board)?;
            fs::create_dir_all(&args.root)
                .with_context(|| format!("creating {}", args.root.display()))?;
            selection.save(&args.root.join(BOARD_CHOICE_FILE))?;
            info!(board = %selection, "board selected");
        }
        Command::Show { json } => {
            let sources = Sources::gather(args)?;
            let config = sources.resolve()?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print_summary(&sources.selection, &config);
            }
        }
        Command::Generate { out, kconfig_out } => {
            let sources = Sources::gather(args)?;
            let config = sources.resolve()?;
            let selection = &sources.selection;

            let header = out
                .clone()
                .unwrap_or_else(|| selection.header_path(&args.root));
            write_file(&header, &render_header(&config))?;

            let kconfig = kconfig_out
                .clone()
                .unwrap_or_else(|| args.root.join(KCONFIG_HEADER_PATH));
            write_file(&kconfig, &render_kconfig_header(&sources.symbol_map()?))?;

            info!(
                board = %selection,
                header = %header.display(),
                kconfig = %kconfig.display(),
                "headers generated"
            );
        }
        Command::Boards => {
            for vendor in board::vendors() {
                let boards = board::boards(vendor).unwrap_or_default();
                println!("{vendor}: {}", boards.join(", "));
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _guard = logger::init(&logging_config(&args)).context("initializing logging")?;

    if let Err(error) = run(&args) {
        tracing::error!("{error:#}");
        return Err(error);
    }
    Ok(())
}
