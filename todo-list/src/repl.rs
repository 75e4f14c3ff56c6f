//! Interactive text mode.
//!
//! Reads one command per line and runs it against a [`TaskRepository`].
//! Invalid input and task errors are reported on the output and the loop
//! keeps going; only I/O failures end it early.

use crate::task::TaskRepository;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tokio::sync::mpsc;

pub const INSTRUCTIONS: &str = "\
Commands:
  add <text>         add a new task
  show <id>          show a single task
  list               show all tasks
  edit <id> <text>   replace the text of a task
  done <id>          mark a task as done
  delete <id>        delete a task
  help               show this message
  quit               leave the todo list";

const PROMPT: &str = "> ";

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    Add(String),
    Show(i32),
    List,
    Edit(i32, String),
    Done(i32),
    Delete(i32),
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    UnknownCommand(String),
    #[error("'{0}' needs a task ID")]
    MissingId(&'static str),
    #[error("'{0}' is not a valid task ID")]
    InvalidId(String),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = split_word(line);

        match name.to_lowercase().as_str() {
            "add" => Ok(Command::Add(rest.to_string())),
            "show" => Ok(Command::Show(parse_id("show", rest)?)),
            "list" | "ls" => Ok(Command::List),
            "edit" => {
                let (id, text) = split_word(rest);
                Ok(Command::Edit(parse_id("edit", id)?, text.to_string()))
            }
            "done" => Ok(Command::Done(parse_id("done", rest)?)),
            "delete" | "rm" => Ok(Command::Delete(parse_id("delete", rest)?)),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(ParseCommandError::UnknownCommand(name.to_string())),
        }
    }
}

fn split_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn parse_id(command: &'static str, input: &str) -> Result<i32, ParseCommandError> {
    if input.is_empty() {
        return Err(ParseCommandError::MissingId(command));
    }
    input
        .parse()
        .map_err(|_| ParseCommandError::InvalidId(input.to_string()))
}

/// Reads `input` line by line on a dedicated thread so blocking reads never
/// occupy a runtime worker.
///
/// The thread is detached rather than run with `spawn_blocking`: a read still
/// pending after `quit` must not hold up runtime shutdown.
fn spawn_line_reader<I>(input: I) -> mpsc::Receiver<std::io::Result<String>>
where
    I: BufRead + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(1);
    std::thread::spawn(move || {
        for line in input.lines() {
            if sender.blocking_send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Runs the loop until `quit` or end of input.
#[tracing::instrument(skip_all)]
pub async fn run<R, I, O>(repository: &R, input: I, output: &mut O) -> std::io::Result<()>
where
    R: TaskRepository + Sync,
    I: BufRead + Send + 'static,
    O: Write,
{
    writeln!(output, "{}", INSTRUCTIONS)?;
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    let mut lines = spawn_line_reader(input);
    while let Some(line) = lines.recv().await {
        let line = line?;
        if line.trim().is_empty() {
            write!(output, "{}", PROMPT)?;
            output.flush()?;
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => execute(repository, command, output).await?,
            Err(err) => writeln!(output, "{}", err)?,
        }
        write!(output, "{}", PROMPT)?;
        output.flush()?;
    }

    writeln!(output, "Bye!")?;
    Ok(())
}

async fn execute<R, O>(repository: &R, command: Command, output: &mut O) -> std::io::Result<()>
where
    R: TaskRepository + Sync,
    O: Write,
{
    let result = match command {
        Command::Add(text) => repository
            .create(&text)
            .await
            .map(|id| format!("Task added with ID {}", id)),
        Command::Show(id) => repository.read(id).await.map(|task| task.to_string()),
        Command::List => repository.show_all().await.map(|tasks| {
            if tasks.is_empty() {
                "No tasks yet".to_string()
            } else {
                tasks
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }),
        Command::Edit(id, text) => repository
            .update(id, &text)
            .await
            .map(|_| format!("Task {} updated", id)),
        Command::Done(id) => repository
            .mark_done(id)
            .await
            .map(|_| format!("Task {} marked as done", id)),
        Command::Delete(id) => repository
            .delete(id)
            .await
            .map(|_| format!("Task {} deleted", id)),
        Command::Help => Ok(INSTRUCTIONS.to_string()),
        Command::Quit => Ok(String::new()),
    };

    match result {
        Ok(message) => writeln!(output, "{}", message),
        Err(err) => {
            tracing::debug!("Command failed: {}", err);
            writeln!(output, "Error: {}", err)
        }
    }
}
