// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config (layered) --> Logging --> Command Dispatch
//!   Version | Options | Configs | Search | Clone | Status | Files
//!   Check | Pull | Diff | Push | Shell
//!
//! Ctrl-C --> CancellationToken --> running git/gh children are killed
//! ```

use std::process::ExitCode;

use tokio_util::sync::CancellationToken;

use ghdesk::cli::{self, Command};
use ghdesk::cmd::config::{run_configs_command, run_options_command};
use ghdesk::cmd::repo::{
    run_check_command, run_clone_command, run_diff_command, run_files_command, run_pull_command,
    run_push_command, run_search_command, run_status_command,
};
use ghdesk::cmd::shell::run_shell_command;
use ghdesk::config::Config;
use ghdesk::config::types::GlobalConfig;
use ghdesk::logging::{LogConfig, LogGuard, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    match &cli.command {
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            return ExitCode::FAILURE;
        }
        Some(Command::Version) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Some(Command::Configs) => {
            run_configs_command(&cli.global.config_loader().format_loaded_files());
            return ExitCode::SUCCESS;
        }
        Some(_) => {}
    }

    let config = match cli.global.config_loader().build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match start_logging(&config.global) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted");
            on_interrupt.cancel();
        }
    });

    match dispatch_command(&cli, &config, cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn start_logging(global: &GlobalConfig) -> ghdesk::error::Result<LogGuard> {
    let log_config = LogConfig::builder()
        .with_console_level(global.output_log_level)
        .with_file_level(global.file_log_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build();
    init_logging(&log_config)
}

async fn dispatch_command(
    cli: &cli::Cli,
    config: &Config,
    cancel: CancellationToken,
) -> ghdesk::error::Result<()> {
    match &cli.command {
        Some(Command::Options) => {
            run_options_command(config);
            Ok(())
        }
        Some(Command::Search(args)) => run_search_command(args, config, cancel).await,
        Some(Command::Clone(args)) => run_clone_command(args, config, cancel).await,
        Some(Command::Status(args)) => run_status_command(args, config, cancel).await,
        Some(Command::Files(args)) => run_files_command(args, config, cancel).await,
        Some(Command::Check(args)) => run_check_command(args, config, cancel).await,
        Some(Command::Pull(args)) => run_pull_command(args, config, cancel).await,
        Some(Command::Diff(args)) => run_diff_command(args, config, cancel).await,
        Some(Command::Push(args)) => run_push_command(args, config, cancel).await,
        Some(Command::Shell(args)) => run_shell_command(args, config, cancel).await,
        Some(Command::Version | Command::Configs) | None => Ok(()),
    }
}
