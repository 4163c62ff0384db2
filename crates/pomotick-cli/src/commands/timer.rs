use std::io::Write;

use clap::Subcommand;
use pomotick_core::runner::{self, Command};
use pomotick_core::{AppState, Config, Event, PeriodKind};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::CmdResult;
use crate::common::{open_controller, status_line};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print the current timer state
    Status {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run the timer in the foreground, reading shortcuts from stdin
    Run {
        /// Start counting down immediately
        #[arg(long)]
        start: bool,
    },
    /// End the current period without crediting it
    Skip,
    /// Restart the current period from its full duration
    Reset,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusView<'a> {
    period: PeriodKind,
    label: &'static str,
    time_left: u32,
    display: String,
    is_running: bool,
    progress: f64,
    session_count: u32,
    focus_sessions_today: u32,
    daily_goal: u32,
    goal_reached: bool,
    active_task: Option<&'a pomotick_core::Task>,
}

impl<'a> From<&'a AppState> for StatusView<'a> {
    fn from(state: &'a AppState) -> Self {
        let period = state.current_period();
        Self {
            period,
            label: period.label(),
            time_left: state.clock.time_left_secs(),
            display: state.clock.display(),
            is_running: state.is_running(),
            progress: state.progress(),
            session_count: state.scheduler.session_count(),
            focus_sessions_today: state.focus_sessions_today,
            daily_goal: state.daily_goal,
            goal_reached: state.goal_reached(),
            active_task: state.tasks.active_task(),
        }
    }
}

const HELP: &str = "enter/p: start-pause  s: skip  r: reset  a: ambient  q: quit";

pub fn run(action: TimerAction, config: &Config) -> CmdResult {
    match action {
        TimerAction::Status { json } => {
            let controller = open_controller(config)?;
            let state = controller.state();
            if json {
                println!("{}", serde_json::to_string_pretty(&StatusView::from(state))?);
            } else {
                print_status(state);
            }
        }
        TimerAction::Run { start } => run_foreground(config, start)?,
        TimerAction::Skip => {
            let mut controller = open_controller(config)?;
            controller.skip();
            println!("{}", status_line(controller.state()));
        }
        TimerAction::Reset => {
            let mut controller = open_controller(config)?;
            controller.reset_timer();
            println!("{}", status_line(controller.state()));
        }
    }
    Ok(())
}

fn print_status(state: &AppState) {
    println!("{}", status_line(state));
    println!(
        "Session {}  Today {}/{}{}",
        state.scheduler.session_count(),
        state.focus_sessions_today,
        state.daily_goal,
        if state.goal_reached() { "  goal reached" } else { "" }
    );
    match state.tasks.active_task() {
        Some(task) => println!("Task #{}: {} ({} pomodoros)", task.id, task.text, task.pomodoros),
        None => println!("No active task"),
    }
}

fn run_foreground(config: &Config, start: bool) -> CmdResult {
    let controller = open_controller(config)?;
    let interval = config.tick_interval();
    let rt = tokio::runtime::Runtime::new()?;

    let controller = rt.block_on(async move {
        let (tx, rx) = mpsc::channel(16);
        if start {
            let _ = tx.send(Command::Start).await;
        }
        let input = tokio::spawn(forward_input(tx));

        println!("{HELP}");
        render(controller.state(), &[]);
        let controller = runner::run(controller, interval, rx, render).await;
        input.abort();
        controller
    });
    // Blocking stdin reads cannot be interrupted; don't wait for them.
    rt.shutdown_background();

    println!();
    print_status(controller.state());
    Ok(())
}

/// Feed stdin lines and Ctrl-C into the session loop. End of input quits.
async fn forward_input(tx: mpsc::Sender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let command = tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => match Command::parse(&line) {
                    Some(command) => command,
                    None => {
                        eprintln!("\runknown command '{}'. {HELP}", line.trim());
                        continue;
                    }
                },
                Ok(None) => Command::Quit,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin closed");
                    Command::Quit
                }
            },
            _ = tokio::signal::ctrl_c() => Command::Quit,
        };
        let quit = command == Command::Quit;
        if tx.send(command).await.is_err() || quit {
            break;
        }
    }
}

fn render(state: &AppState, events: &[Event]) {
    for event in events {
        if let Some(message) = describe(event, state) {
            println!("\r{message}\x1b[K");
        }
    }
    let mut out = std::io::stdout();
    let _ = write!(out, "\r{}\x1b[K", status_line(state));
    let _ = out.flush();
}

fn describe(event: &Event, state: &AppState) -> Option<String> {
    match event {
        Event::PeriodExpired { finished, next, .. } => Some(format!(
            "{} finished. Next: {}",
            finished.label(),
            next.label()
        )),
        Event::PeriodSkipped { from, to, .. } => {
            Some(format!("Skipped {}. Next: {}", from.label(), to.label()))
        }
        Event::PomodoroCredited { task_id, pomodoros } => {
            Some(format!("Task #{task_id} now has {pomodoros} pomodoros"))
        }
        Event::SessionLogged {
            focus_sessions_today,
            ..
        } => Some(format!(
            "Today: {focus_sessions_today}/{}{}",
            state.daily_goal,
            if state.goal_reached() { " goal reached!" } else { "" }
        )),
        Event::AmbientChanged { id, is_playing } => Some(format!(
            "Ambient {id} {}",
            if *is_playing { "playing" } else { "paused" }
        )),
        _ => None,
    }
}
