//! Cancellable tasks keyed by purpose, driven by an external clock.
//!
//! The scheduler never runs anything itself: `take_due` hands back the tasks
//! whose time has come, and the caller reports completion with `complete`,
//! which re-arms periodic tasks relative to the completion time. A task is
//! therefore never due twice while it is being worked on, and a process that
//! wakes up late gets one run per task, not a backlog.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskKind {
    Idle,
    Windup,
    Evaluate,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Idle => "idle",
            TaskKind::Windup => "windup",
            TaskKind::Evaluate => "evaluate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Runs every `period_ms`, first run one period after arming.
    Every { period_ms: i64 },
    /// Runs once; the owner re-arms it if needed.
    Once,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub due_at: i64,
    pub trigger: Trigger,
    running: bool,
}

#[derive(Debug, Default)]
pub struct TaskScheduler {
    tasks: BTreeMap<TaskKind, Task>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) a periodic task. Replaces any task of the same kind.
    pub fn arm_every(&mut self, kind: TaskKind, period_ms: i64, now: i64) {
        let period_ms = period_ms.max(1);
        self.tasks.insert(
            kind,
            Task {
                due_at: now + period_ms,
                trigger: Trigger::Every { period_ms },
                running: false,
            },
        );
    }

    /// Arm (or re-arm) a one-shot task at an absolute time.
    pub fn arm_at(&mut self, kind: TaskKind, due_at: i64) {
        self.tasks.insert(
            kind,
            Task {
                due_at,
                trigger: Trigger::Once,
                running: false,
            },
        );
    }

    pub fn cancel(&mut self, kind: TaskKind) -> bool {
        self.tasks.remove(&kind).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_armed(&self, kind: TaskKind) -> bool {
        self.tasks.contains_key(&kind)
    }

    pub fn get(&self, kind: TaskKind) -> Option<&Task> {
        self.tasks.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Earliest due time among tasks that are not currently running.
    pub fn next_due(&self) -> Option<i64> {
        self.tasks
            .values()
            .filter(|t| !t.running)
            .map(|t| t.due_at)
            .min()
    }

    /// Mark every task due at `now` as running and return them, earliest first.
    pub fn take_due(&mut self, now: i64) -> Vec<TaskKind> {
        let mut due: Vec<(i64, TaskKind)> = self
            .tasks
            .iter_mut()
            .filter(|(_, t)| !t.running && t.due_at <= now)
            .map(|(k, t)| {
                t.running = true;
                (t.due_at, *k)
            })
            .collect();

        due.sort();
        due.into_iter().map(|(_, k)| k).collect()
    }

    /// Finish a task taken with `take_due`.
    /// Periodic tasks are re-armed one period after `now`; one-shot tasks are dropped
    /// unless the owner already re-armed them.
    pub fn complete(&mut self, kind: TaskKind, now: i64) {
        let Some(task) = self.tasks.get_mut(&kind) else {
            return;
        };

        if !task.running {
            // re-armed while running
            return;
        }

        match task.trigger {
            Trigger::Every { period_ms } => {
                task.due_at = now + period_ms;
                task.running = false;
            }
            Trigger::Once => {
                self.tasks.remove(&kind);
            }
        }
    }
}
