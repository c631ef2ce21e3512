//! Line-based stdin console: runs command ids and answers job picks.

use std::sync::Arc;

use anyhow::Context;
use jenkins_core::IndicatorView;
use jenkins_engine::{CommandHost, CommandTable, JobPicker, StatusController};
use jenkins_logging::{jenkins_debug, jenkins_info};
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Stdin shared between the console loop and the job picker.
pub type SharedLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

pub fn stdin_lines() -> SharedLines {
    Arc::new(Mutex::new(BufReader::new(stdin()).lines()))
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleInput {
    Help,
    List,
    Quit,
    Command(String),
    Empty,
}

pub fn parse_input(line: &str) -> ConsoleInput {
    match line.trim() {
        "" => ConsoleInput::Empty,
        "help" | "?" => ConsoleInput::Help,
        "list" => ConsoleInput::List,
        "quit" | "exit" => ConsoleInput::Quit,
        id => ConsoleInput::Command(id.to_string()),
    }
}

/// Resolves a picker answer: a 1-based index into `names` or an exact name.
pub fn choose(names: &[String], answer: &str) -> Option<String> {
    let answer = answer.trim();
    if answer.is_empty() {
        return None;
    }
    if let Ok(index) = answer.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| names.get(i))
            .cloned();
    }
    names.iter().find(|name| name.as_str() == answer).cloned()
}

/// Every tracked indicator with its tooltip indented below it.
pub fn render_views(views: &[(String, Option<IndicatorView>)]) -> String {
    let mut out = String::new();
    for (name, view) in views {
        match view {
            Some(view) => {
                out.push_str(&view.text);
                out.push('\n');
                for line in view.tooltip.lines() {
                    out.push_str("    ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
            None => {
                out.push_str(name);
                out.push_str(": not polled yet\n");
            }
        }
    }
    out
}

pub struct StdinPicker {
    lines: SharedLines,
}

impl StdinPicker {
    pub fn new(lines: SharedLines) -> Self {
        Self { lines }
    }
}

#[async_trait::async_trait]
impl JobPicker for StdinPicker {
    async fn pick(&self, job_names: &[String]) -> Option<String> {
        for (i, name) in job_names.iter().enumerate() {
            println!("  {}) {}", i + 1, name);
        }
        println!("Select a job (number or name, empty line cancels):");
        let answer = match self.lines.lock().await.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return None,
            Err(err) => {
                jenkins_debug!("Picker could not read stdin: {}", err);
                return None;
            }
        };
        let picked = choose(job_names, &answer);
        if picked.is_none() && !answer.trim().is_empty() {
            println!("No job matches {:?}", answer.trim());
        }
        picked
    }
}

fn print_help(commands: &CommandTable) {
    println!("Commands:");
    for id in commands.ids() {
        println!("  {id}");
    }
    println!("  list    show every job with its details");
    println!("  help    show this list");
    println!("  quit    exit");
}

/// Reads stdin until `quit` or end of input.
pub async fn run_console(
    controller: &StatusController,
    commands: &CommandTable,
    lines: SharedLines,
) -> anyhow::Result<()> {
    loop {
        // The lock is released before a command runs so the picker can read.
        let line = lines
            .lock()
            .await
            .next_line()
            .await
            .context("reading stdin")?;
        let Some(line) = line else {
            jenkins_info!("End of input; leaving console");
            return Ok(());
        };
        match parse_input(&line) {
            ConsoleInput::Empty => {}
            ConsoleInput::Help => print_help(commands),
            ConsoleInput::List => print!("{}", render_views(&controller.reconciler().views())),
            ConsoleInput::Quit => return Ok(()),
            ConsoleInput::Command(id) => {
                if let Err(err) = commands.execute(&id).await {
                    println!("{err}; type `help` for the list");
                }
            }
        }
    }
}
