// UI layer: interactive menu built with `dialoguer`, progress rendered with
// `indicatif`. All state changes go through the `Controller`; this module
// only decides which actions to offer and how to print the outcome.

use std::path::PathBuf;

use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;

use crate::api::FileBlob;
use crate::config::Config;
use crate::controller::Controller;
use crate::session::{Session, StatusKind};

/// Menu entries. Which ones are shown depends on the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectFile,
    SwitchMode,
    Start,
    SaveResult,
    Reset,
    Exit,
}

impl Action {
    fn label(self, session: &Session) -> String {
        match self {
            Action::SelectFile => "Select file".into(),
            Action::SwitchMode => format!("Switch to {}", session.mode().toggled()),
            Action::Start => format!("Start ({})", session.mode()),
            Action::SaveResult => "Save result".into(),
            Action::Reset => match session.status().kind() {
                StatusKind::Completed => "New file".into(),
                _ => "Clear file".into(),
            },
            Action::Exit => "Exit".into(),
        }
    }
}

/// Actions that make sense for `session`, in menu order.
pub fn available_actions(session: &Session) -> Vec<Action> {
    let mut actions = Vec::new();
    if session.can_start() {
        actions.push(Action::Start);
    }
    if session.result().is_some() {
        actions.push(Action::SaveResult);
    }
    actions.push(Action::SelectFile);
    if session.file().is_some() {
        actions.push(Action::Reset);
    }
    actions.push(Action::SwitchMode);
    actions.push(Action::Exit);
    actions
}

/// Human-readable size, e.g. `1.5 KB`.
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".into();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// Main interactive menu. Runs until the user chooses "Exit".
pub async fn main_menu(mut controller: Controller, config: &Config) -> Result<()> {
    println!("{}", "Huffman transform client".bold());
    println!("Service: {}", config.base_url);
    loop {
        print_session(controller.session());

        let actions = available_actions(controller.session());
        let labels: Vec<String> = actions
            .iter()
            .map(|a| a.label(controller.session()))
            .collect();
        let selection = Select::new().items(&labels).default(0).interact()?;

        match actions[selection] {
            Action::SelectFile => handle_select(&mut controller).await?,
            Action::SwitchMode => {
                let mode = controller.session().mode().toggled();
                controller.set_mode(mode);
            }
            Action::Start => handle_process(&mut controller).await?,
            Action::SaveResult => handle_save(&controller, config).await?,
            Action::Reset => controller.reset(),
            Action::Exit => break,
        }
    }
    Ok(())
}

fn print_session(session: &Session) {
    println!();
    println!("Mode: {}", session.mode().to_string().cyan());
    match session.file() {
        Some(file) => println!("File: {} ({})", file.name(), format_bytes(file.size())),
        None => println!("File: {}", "none selected".dim()),
    }
}

/// Ask for a path, read it and hand it to the session.
async fn handle_select(controller: &mut Controller) -> Result<()> {
    let raw: String = Input::new().with_prompt("File path").interact_text()?;
    let path = PathBuf::from(raw.trim().trim_matches(|c| c == '"' || c == '\''));

    match FileBlob::read(&path).await {
        Ok(blob) => controller.select_file(blob),
        Err(e) => println!("{} {:#}", "Could not open file:".red(), e),
    }
    Ok(())
}

/// Run one episode with a live progress bar. Ctrl+C abandons the request.
async fn handle_process(controller: &mut Controller) -> Result<()> {
    let cancel = CancellationToken::new();
    let _ctrl_c = {
        let token = cancel.clone();
        AbortOnDropHandle::new(tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        }))
    };

    let bar = ProgressBar::new(100);
    bar.set_style(ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")?);
    bar.set_message("Processing file... (Ctrl+C to cancel)");

    let mut updates = controller.subscribe();
    let render = {
        let bar = bar.clone();
        AbortOnDropHandle::new(tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let snapshot = *updates.borrow_and_update();
                bar.set_position(u64::from(snapshot.progress));
            }
        }))
    };

    let outcome = controller.process(&cancel).await;
    drop(render);
    bar.finish_and_clear();

    let session = controller.session();
    match outcome {
        StatusKind::Completed => {
            let size = session.result().map(|r| r.len()).unwrap_or_default();
            println!("{} {} bytes ready", "Success!".green().bold(), size);
        }
        StatusKind::Error => {
            let message = session.error_message().unwrap_or_default();
            println!("{} {}", "Processing failed:".red().bold(), message);
        }
        StatusKind::Idle => println!("{}", "Cancelled".yellow()),
        StatusKind::Processing => {}
    }
    Ok(())
}

/// Write the result next to the configured output directory.
async fn handle_save(controller: &Controller, config: &Config) -> Result<()> {
    let session = controller.session();
    let (Some(result), Some(name)) = (session.result(), session.artifact_name()) else {
        return Ok(());
    };

    let default_path = config.output_dir.join(name);
    let raw: String = Input::new()
        .with_prompt("Save as")
        .default(default_path.display().to_string())
        .interact_text()?;
    let path = PathBuf::from(raw.trim());

    match result.save_to(&path).await {
        Ok(()) => println!("{} {}", "Saved".green(), path.display()),
        Err(e) => println!("{} {:#}", "Could not save:".red(), e),
    }
    Ok(())
}
