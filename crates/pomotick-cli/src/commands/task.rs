//! Task list commands.

use clap::Subcommand;
use pomotick_core::{Config, Task};

use super::CmdResult;
use crate::common::open_controller;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task text
        text: String,
    },
    /// Remove a task
    Remove {
        /// Task ID
        id: u64,
    },
    /// List tasks
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Make a task the active one; selecting the active task deselects it
    Select {
        /// Task ID
        #[arg(required_unless_present = "clear")]
        id: Option<u64>,
        /// Clear the active task
        #[arg(long, conflicts_with = "id")]
        clear: bool,
    },
    /// Mark a task done, or not done again
    Toggle {
        /// Task ID
        id: u64,
    },
}

pub fn run(action: TaskAction, config: &Config) -> CmdResult {
    let mut controller = open_controller(config)?;

    match action {
        TaskAction::Add { text } => match controller.add_task(&text) {
            Some(task) => println!("Task added: #{} {}", task.id, task.text),
            None if text.trim().is_empty() => return Err("task text must not be empty".into()),
            None => return Err("no task ids left".into()),
        },
        TaskAction::Remove { id } => {
            let task = controller.remove_task(id)?;
            println!("Task removed: #{} {}", task.id, task.text);
        }
        TaskAction::List { json } => {
            let tasks = controller.state().tasks.tasks();
            if json {
                println!("{}", serde_json::to_string_pretty(tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks");
            } else {
                let active = controller.state().tasks.active_task_id();
                for task in tasks {
                    println!("{}", format_task(task, active == Some(task.id)));
                }
            }
        }
        TaskAction::Select { id, clear } => {
            let target = if clear { None } else { id };
            match controller.set_active_task(target)? {
                Some(id) => println!("Active task: #{id}"),
                None => println!("No active task"),
            }
        }
        TaskAction::Toggle { id } => {
            let completed = controller.toggle_task_completed(id)?;
            println!(
                "Task #{id} marked {}",
                if completed { "done" } else { "not done" }
            );
        }
    }
    Ok(())
}

fn format_task(task: &Task, active: bool) -> String {
    format!(
        "{} [{}] #{:<3} {} ({} pomodoros)",
        if active { ">" } else { " " },
        if task.completed { "x" } else { " " },
        task.id,
        task.text,
        task.pomodoros
    )
}
