// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mindweave CLI entrypoint.
//!
//! Reads editor commands from stdin, one per line, against the maps stored in a directory.
//! Pending edits are autosaved after a quiet period and flushed on exit.

use std::error::Error;

use mindweave::config::{
    parse_options, CliOptions, EditorConfig, DEFAULT_LOG_FILTER, DEFAULT_STORE_DIR, LOG_ENV,
};
use mindweave::editor::Editor;
use mindweave::model::OwnerId;
use mindweave::shell::{execute, parse_command, Outcome};
use mindweave::store::{DirStorage, WriteDurability};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<store-dir>] [--owner <id>] [--autosave-ms <ms>] [--history <n>] [--durable-writes]\n  {program} [--store <dir>] [--owner <id>] [--autosave-ms <ms>] [--history <n>] [--durable-writes]\n\nCommands are read from stdin; type `help` for the list.\n\nIf store-dir/--store is omitted, `{DEFAULT_STORE_DIR}` is used.\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n\nLogging goes to stderr; set {LOG_ENV} to change the filter (default `{DEFAULT_LOG_FILTER}`)."
    );
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn autosave_due(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}

async fn run(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let storage = DirStorage::new(options.store_dir()).with_durability(if options.durable_writes {
        WriteDurability::Durable
    } else {
        WriteDurability::BestEffort
    });
    let owner = OwnerId::new(options.owner())?;
    let config = EditorConfig::from_options(&options);
    let mut editor = Editor::open(storage, owner, config)?;
    tracing::info!(map_id = %editor.current_map_id(), "editor ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let outcome = parse_command(&line).and_then(|command| match command {
                    Some(command) => execute(&mut editor, command),
                    None => Ok(Outcome::Continue(String::new())),
                });
                match outcome {
                    Ok(Outcome::Continue(message)) if message.is_empty() => {}
                    Ok(Outcome::Continue(message)) => println!("{}", message.trim_end()),
                    Ok(Outcome::Quit) => return Ok(()),
                    Err(err) => eprintln!("error: {err}"),
                }
            }
            _ = autosave_due(editor.autosave_deadline()) => {
                if let Err(err) = editor.tick(std::time::Instant::now()) {
                    eprintln!("error: {err}");
                }
            }
        }
    }

    editor.flush()?;
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "mindweave".to_owned());

        let options = match parse_options(args) {
            Ok(options) if !options.help => options,
            Ok(_) => {
                print_usage(&program);
                return Ok(());
            }
            Err(err) => {
                eprintln!("{program}: {err}");
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging();

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(run(options))
    })();

    if let Err(err) = result {
        eprintln!("mindweave: {err}");
        std::process::exit(1);
    }
}
