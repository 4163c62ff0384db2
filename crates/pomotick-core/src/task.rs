//! Task ledger.
//!
//! Tasks are kept in creation order. At most one task is active; the active
//! task is credited with every focus period that completes while it is
//! selected.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub pomodoros: u32,
    /// Set by the user only; the timer never completes a task.
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskLedger {
    tasks: Vec<Task>,
    active_task_id: Option<u64>,
    /// Largest id ever handed out or loaded, including removed tasks.
    last_id: u64,
}

impl TaskLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from stored parts. An active id that does not resolve
    /// to a task is dropped. `last_id` is raised to the largest stored id.
    pub fn restore(tasks: Vec<Task>, active_task_id: Option<u64>, last_id: u64) -> Self {
        let active_task_id = active_task_id.filter(|id| tasks.iter().any(|t| t.id == *id));
        let last_id = tasks.iter().map(|t| t.id).fold(last_id, u64::max);
        Self {
            tasks,
            active_task_id,
            last_id,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn active_task_id(&self) -> Option<u64> {
        self.active_task_id
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.active_task_id.and_then(|id| self.get(id))
    }

    /// Largest id ever used. Ids are never handed out twice.
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Add a task. Blank text is ignored and yields `None`, as does an
    /// exhausted id space.
    pub fn add_task(&mut self, text: &str) -> Option<&Task> {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring blank task");
            return None;
        }
        let Some(id) = self.last_id.checked_add(1) else {
            warn!(last_id = self.last_id, "no task ids left");
            return None;
        };
        self.last_id = id;
        let task = Task {
            id,
            text: text.to_string(),
            pomodoros: 0,
            completed: false,
        };
        info!(task_id = task.id, "task added");
        self.tasks.push(task);
        self.tasks.last()
    }

    /// Remove a task, clearing the selection if it was active.
    pub fn remove_task(&mut self, id: u64) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        if self.active_task_id == Some(id) {
            self.active_task_id = None;
        }
        info!(task_id = id, "task removed");
        Some(self.tasks.remove(index))
    }

    /// Select a task, or clear the selection with `None`. Selecting the
    /// already-active task clears it. Unknown ids leave the selection alone
    /// and return `false`.
    pub fn set_active(&mut self, id: Option<u64>) -> bool {
        match id {
            None => {
                self.active_task_id = None;
                true
            }
            Some(id) if self.get(id).is_none() => false,
            Some(id) => {
                self.active_task_id = if self.active_task_id == Some(id) {
                    None
                } else {
                    Some(id)
                };
                true
            }
        }
    }

    /// Flip a task's completed flag. Returns the new value.
    pub fn toggle_completed(&mut self, id: u64) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Credit the active task with one pomodoro. Returns the credited task,
    /// or `None` when nothing is selected.
    pub fn on_focus_completed(&mut self) -> Option<&Task> {
        let id = self.active_task_id?;
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.pomodoros = task.pomodoros.saturating_add(1);
        Some(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_ignored() {
        let mut ledger = TaskLedger::new();
        assert!(ledger.add_task("").is_none());
        assert!(ledger.add_task("   \t").is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn add_trims_and_starts_at_zero() {
        let mut ledger = TaskLedger::new();
        let task = ledger.add_task("  Write spec ").cloned().unwrap();
        assert_eq!(task.text, "Write spec");
        assert_eq!(task.pomodoros, 0);
        assert!(!task.completed);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn ids_stay_unique_after_removal() {
        let mut ledger = TaskLedger::new();
        let a = ledger.add_task("a").unwrap().id;
        let b = ledger.add_task("b").unwrap().id;
        ledger.remove_task(b);
        let c = ledger.add_task("c").unwrap().id;
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert!(c > b);
    }

    #[test]
    fn restored_ledger_continues_after_removed_ids() {
        let tasks = vec![Task {
            id: 3,
            text: "a".into(),
            pomodoros: 0,
            completed: false,
        }];
        let mut ledger = TaskLedger::restore(tasks.clone(), None, 9);
        assert_eq!(ledger.add_task("b").unwrap().id, 10);

        let mut ledger = TaskLedger::restore(tasks, None, 0);
        assert_eq!(ledger.last_id(), 3);
        assert_eq!(ledger.add_task("b").unwrap().id, 4);
    }

    #[test]
    fn exhausted_id_space_refuses_new_tasks() {
        let tasks = vec![Task {
            id: u64::MAX,
            text: "a".into(),
            pomodoros: 0,
            completed: false,
        }];
        let mut ledger = TaskLedger::restore(tasks, None, 0);
        assert!(ledger.add_task("next").is_none());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn selecting_active_task_again_clears_it() {
        let mut ledger = TaskLedger::new();
        let id = ledger.add_task("a").unwrap().id;
        assert!(ledger.set_active(Some(id)));
        assert_eq!(ledger.active_task_id(), Some(id));
        assert!(ledger.set_active(Some(id)));
        assert_eq!(ledger.active_task_id(), None);
    }

    #[test]
    fn unknown_id_cannot_be_selected() {
        let mut ledger = TaskLedger::new();
        assert!(!ledger.set_active(Some(42)));
        assert_eq!(ledger.active_task_id(), None);
    }

    #[test]
    fn removing_active_task_clears_selection() {
        let mut ledger = TaskLedger::new();
        let id = ledger.add_task("a").unwrap().id;
        ledger.set_active(Some(id));
        ledger.remove_task(id);
        assert_eq!(ledger.active_task_id(), None);
        assert!(ledger.on_focus_completed().is_none());
    }

    #[test]
    fn focus_completion_credits_only_the_active_task() {
        let mut ledger = TaskLedger::new();
        let a = ledger.add_task("a").unwrap().id;
        let b = ledger.add_task("b").unwrap().id;
        ledger.set_active(Some(b));
        ledger.on_focus_completed();
        ledger.on_focus_completed();
        assert_eq!(ledger.get(a).unwrap().pomodoros, 0);
        assert_eq!(ledger.get(b).unwrap().pomodoros, 2);
        assert!(!ledger.get(b).unwrap().completed);
    }

    #[test]
    fn toggle_completed_flips() {
        let mut ledger = TaskLedger::new();
        let id = ledger.add_task("a").unwrap().id;
        assert_eq!(ledger.toggle_completed(id), Some(true));
        assert_eq!(ledger.toggle_completed(id), Some(false));
        assert_eq!(ledger.toggle_completed(99), None);
    }

    #[test]
    fn restore_drops_dangling_active_id() {
        let tasks = vec![Task {
            id: 7,
            text: "a".into(),
            pomodoros: 1,
            completed: false,
        }];
        assert_eq!(TaskLedger::restore(tasks.clone(), Some(8), 0).active_task_id(), None);
        assert_eq!(TaskLedger::restore(tasks, Some(7), 0).active_task_id(), Some(7));
    }
}
