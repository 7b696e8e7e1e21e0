//! Line-oriented session over one detection workflow.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use deepscan_engine::{Classifier, DetectionConfig, DetectionWorkflow, ImageCandidate, Phase};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::console::{self, ConsoleSink};
use crate::media;

const HELP: &str = "commands: select PATH | drop PATH | submit | clear | status | help | quit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Select(PathBuf),
    Drop(PathBuf),
    Submit,
    Clear,
    Status,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let path = || {
        if rest.is_empty() {
            Err(format!("'{verb}' needs a path"))
        } else {
            Ok(PathBuf::from(rest))
        }
    };
    match verb.to_ascii_lowercase().as_str() {
        "select" | "open" => path().map(Command::Select),
        "drop" => path().map(Command::Drop),
        "submit" | "detect" => Ok(Command::Submit),
        "clear" => Ok(Command::Clear),
        "status" => Ok(Command::Status),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{other}'")),
    }
}

fn print_status<C: Classifier>(workflow: &DetectionWorkflow<C>) {
    println!("phase: {}", workflow.phase());
    if let Some(submission) = workflow.submission() {
        println!(
            "file: {} ({}, {} bytes)",
            submission.file_name(),
            submission.media_type(),
            submission.data().len()
        );
        println!("preview: {}", submission.preview().location().display());
    }
    if let Some(verdict) = workflow.verdict() {
        console::print_verdict(verdict);
    }
    if let Some(message) = workflow.last_error() {
        println!("last error: {message}");
    }
}

/// Loads `path`, reporting a read failure instead of ending the session.
async fn load_or_report(path: &Path) -> Option<ImageCandidate> {
    match media::load_candidate(path).await {
        Ok(candidate) => Some(candidate),
        Err(e) => {
            eprintln!("{e:#}");
            None
        }
    }
}

pub async fn run(config: DetectionConfig) -> Result<ExitCode> {
    println!("deepscan session against {}", config.endpoint());
    println!("{HELP}");

    let sink = Arc::new(ConsoleSink::default());
    let mut workflow = deepscan_engine::http_workflow(config, sink)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        match command {
            Command::Select(path) | Command::Drop(path) if !path.exists() => {
                eprintln!("no such file: {}", path.display());
            }
            Command::Select(path) => {
                let Some(candidate) = load_or_report(&path).await else {
                    continue;
                };
                if workflow.select_file(candidate).is_err() {
                    continue;
                }
            }
            Command::Drop(path) => {
                let Some(candidate) = load_or_report(&path).await else {
                    continue;
                };
                if !workflow.select_dropped(candidate) {
                    println!("(ignored: not an image)");
                }
            }
            Command::Submit => {
                if !workflow.phase().can_submit() {
                    println!("nothing to submit ({})", workflow.phase());
                    continue;
                }
                println!("Analyzing...");
                if workflow.submit().await == Phase::Completed {
                    if let Some(verdict) = workflow.verdict() {
                        console::print_verdict(verdict);
                    }
                }
            }
            Command::Clear => workflow.clear(),
            Command::Status => print_status(&workflow),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    Ok(ExitCode::SUCCESS)
}
