//! The settings form: durations, interval, goal, theme and sounds.

use clap::Subcommand;
use pomotick_core::state::parse_positive;
use pomotick_core::{AppState, Config, Settings};

use super::CmdResult;
use crate::common::open_controller;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show the current settings
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Change durations (minutes), the long break interval or the daily goal
    Set {
        /// Focus duration in minutes
        #[arg(long)]
        focus: Option<String>,
        /// Short break duration in minutes
        #[arg(long = "break")]
        short_break: Option<String>,
        /// Long break duration in minutes
        #[arg(long)]
        long_break: Option<String>,
        /// Focus periods before a long break
        #[arg(long)]
        interval: Option<String>,
        /// Focus periods per day
        #[arg(long)]
        goal: Option<String>,
    },
    /// Set the color theme
    Theme { name: String },
    /// Set the sound played when a period ends ("none" for silence)
    Sound { id: String },
    /// Choose the ambient sound ("none" to stop it)
    Ambient { id: String },
}

pub fn run(action: SettingsAction, config: &Config) -> CmdResult {
    let mut controller = open_controller(config)?;

    match action {
        SettingsAction::Show { json } => show(controller.state(), json)?,
        SettingsAction::Set {
            focus,
            short_break,
            long_break,
            interval,
            goal,
        } => {
            let parse = |field: &str, raw: Option<String>| {
                raw.map(|raw| parse_positive(field, &raw)).transpose()
            };
            let settings = Settings {
                focus: parse("focus", focus)?,
                short_break: parse("break", short_break)?,
                long_break: parse("longBreak", long_break)?,
                long_break_interval: parse("longBreakInterval", interval)?,
                daily_goal: parse("dailyGoal", goal)?,
            };
            if settings.is_empty() {
                return Err("nothing to change; pass at least one option".into());
            }
            controller.apply_settings(&settings)?;
            show(controller.state(), false)?;
        }
        SettingsAction::Theme { name } => {
            controller.set_theme(&name)?;
            println!("theme: {}", controller.state().theme);
        }
        SettingsAction::Sound { id } => {
            controller.set_notification_sound(&id)?;
            println!("notification sound: {}", controller.state().notification_sound);
        }
        SettingsAction::Ambient { id } => {
            let id = id.trim();
            if id.is_empty() {
                return Err("ambient sound id must not be empty".into());
            }
            controller.select_ambient(id);
            println!("ambient sound: {}", controller.state().ambient.id);
        }
    }
    Ok(())
}

fn show(state: &AppState, json: bool) -> CmdResult {
    let config = state.scheduler.config();
    if json {
        let view = serde_json::json!({
            "timers": config.timers,
            "longBreakInterval": config.long_break_interval,
            "dailyGoal": state.daily_goal,
            "theme": state.theme,
            "notificationSound": state.notification_sound,
            "ambientSound": state.ambient.id,
        });
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("focus:              {} min", config.timers.focus);
        println!("break:              {} min", config.timers.short_break);
        println!("long break:         {} min", config.timers.long_break);
        println!("long break every:   {} sessions", config.long_break_interval);
        println!("daily goal:         {}", state.daily_goal);
        println!("theme:              {}", state.theme);
        println!("notification sound: {}", state.notification_sound);
        println!("ambient sound:      {}", state.ambient.id);
    }
    Ok(())
}
