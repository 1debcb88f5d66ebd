use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use taskmate_core::time::{format_date, format_date_time};
use taskmate_core::{Task, TaskKind, TaskList};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    number: usize,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Tag")]
    tag: String,
}

impl TaskRow {
    fn new(number: usize, task: &Task) -> Self {
        Self {
            number,
            kind: kind_label(task.kind()),
            done: if task.is_done() { "yes" } else { "" },
            description: task.description().to_string(),
            when: when(task.kind()),
            tag: task.tag().unwrap_or_default().to_string(),
        }
    }
}

fn kind_label(kind: &TaskKind) -> &'static str {
    match kind {
        TaskKind::Todo => "todo",
        TaskKind::Deadline { .. } => "deadline",
        TaskKind::Event { .. } => "event",
    }
}

fn when(kind: &TaskKind) -> String {
    match kind {
        TaskKind::Todo => String::new(),
        TaskKind::Deadline { due, has_time: true } => format!("by {}", format_date_time(due)),
        TaskKind::Deadline { due, has_time: false } => format!("by {}", format_date(&due.date())),
        TaskKind::Event { start, end } => {
            format!("{} - {}", format_date_time(start), format_date_time(end))
        }
    }
}

/// Read-only snapshot of the list, numbered the same way `list` numbers it.
pub fn render(tasks: &TaskList) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }
    let rows: Vec<TaskRow> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| TaskRow::new(i + 1, task))
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}
