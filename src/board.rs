//! Board Utilities
//!
//! Status columns of the sprint page and task placement into them.

use crate::models::{Id, Task, TaskStatus};

/// A status column of the sprint board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Backlog,
    Todo,
    Active,
    Testing,
    Done,
}

impl Column {
    /// Display order on the board
    pub const ALL: [Column; 5] = [Column::Backlog, Column::Todo, Column::Active, Column::Testing, Column::Done];

    pub fn title(self) -> &'static str {
        match self {
            Column::Backlog => "Backlog",
            Column::Todo => "Not Started",
            Column::Active => "In Development",
            Column::Testing => "In Testing",
            Column::Done => "Completed",
        }
    }

    /// Same labels as [`Task::status_class`]
    pub fn class(self) -> &'static str {
        match self {
            Column::Backlog => "unassigned",
            Column::Todo => "todo",
            Column::Active => "active",
            Column::Testing => "testing",
            Column::Done => "done",
        }
    }

    /// Status a task gets when it lands in this column
    pub fn status(self) -> TaskStatus {
        match self {
            Column::Backlog | Column::Todo => TaskStatus::Todo,
            Column::Active => TaskStatus::Active,
            Column::Testing => TaskStatus::Testing,
            Column::Done => TaskStatus::Done,
        }
    }

    /// `(sprint, status)` pair this column stands for; the backlog has no sprint
    pub fn assignment(self, sprint_id: &Id) -> (Option<Id>, TaskStatus) {
        match self {
            Column::Backlog => (None, self.status()),
            _ => (Some(sprint_id.clone()), self.status()),
        }
    }

    fn from_status(status: TaskStatus) -> Column {
        match status {
            TaskStatus::Todo => Column::Todo,
            TaskStatus::Active => Column::Active,
            TaskStatus::Testing => Column::Testing,
            TaskStatus::Done => Column::Done,
        }
    }

    /// Column showing `task` on the board of `sprint_id`.
    ///
    /// Backlog tasks always land in the backlog whatever their status;
    /// tasks of other sprints, or with an unknown status, are not shown.
    pub fn for_task(task: &Task, sprint_id: &Id) -> Option<Column> {
        match &task.sprint {
            None => Some(Column::Backlog),
            Some(sprint) if sprint == sprint_id => TaskStatus::from_code(task.status).map(Column::from_status),
            Some(_) => None,
        }
    }
}

/// Tasks of one column in display order (manual `order`, then id)
pub fn tasks_in_column<'a>(tasks: impl Iterator<Item = &'a Task>, sprint_id: &Id, column: Column) -> Vec<Task> {
    let mut matching: Vec<Task> = tasks
        .filter(|task| Column::for_task(task, sprint_id) == Some(column))
        .cloned()
        .collect();
    matching.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    matching
}

/// Copy of `task` moved into `column`, or `None` when it is already there
pub fn moved_task(task: &Task, sprint_id: &Id, column: Column) -> Option<Task> {
    if Column::for_task(task, sprint_id) == Some(column) {
        return None;
    }
    let (sprint, status) = column.assignment(sprint_id);
    Some(Task { sprint, status: status.code(), ..task.clone() })
}
