use clap::Subcommand;
use pomotick_core::stats::bar_height_pct;
use pomotick_core::{Config, DayCount};

use super::CmdResult;
use crate::common::{bar, open_controller};

const CHART_WIDTH: usize = 30;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's focus sessions against the daily goal
    Today {
        #[arg(long)]
        json: bool,
    },
    /// Focus sessions over the last 7 days
    Week {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction, config: &Config) -> CmdResult {
    let controller = open_controller(config)?;
    let state = controller.state();

    match action {
        StatsAction::Today { json } => {
            if json {
                let today = serde_json::json!({
                    "focusSessionsToday": state.focus_sessions_today,
                    "dailyGoal": state.daily_goal,
                    "goalReached": state.goal_reached(),
                });
                println!("{}", serde_json::to_string_pretty(&today)?);
            } else {
                println!(
                    "{}/{} focus sessions today{}",
                    state.focus_sessions_today,
                    state.daily_goal,
                    if state.goal_reached() { ", goal reached" } else { "" }
                );
            }
        }
        StatsAction::Week { json } => {
            let days = controller.last_7_days();
            let max = state.stats.max_to_date();
            if json {
                let week = serde_json::json!({
                    "days": days,
                    "maxToDate": max,
                    "total": state.stats.total(),
                });
                println!("{}", serde_json::to_string_pretty(&week)?);
            } else {
                for day in &days {
                    println!("{}", chart_row(day, max));
                }
            }
        }
    }
    Ok(())
}

fn chart_row(day: &DayCount, max: u32) -> String {
    let height = bar_height_pct(day.count, max) / 100.0;
    format!(
        "{} {} {:>3}",
        day.label,
        bar(height, CHART_WIDTH).trim_end_matches('-'),
        day.count
    )
}
