use std::collections::BTreeMap;

use crate::input::GroupBy;
use crate::model::task::{Task, TaskKind};
use crate::model::task_list::TaskList;

/// A titled slice of the list. Each entry keeps its 1-based list number so
/// the user can still `mark`/`delete` by it.
#[derive(Debug, PartialEq)]
pub struct TaskGroup<'a> {
    pub title: String,
    pub entries: Vec<(usize, &'a Task)>,
}

pub struct OrganiseUseCase<'a> {
    tasks: &'a TaskList,
}

impl<'a> OrganiseUseCase<'a> {
    pub fn new(tasks: &'a TaskList) -> Self {
        Self { tasks }
    }

    pub fn group(&self, by: GroupBy) -> Vec<TaskGroup<'a>> {
        match by {
            GroupBy::Tag => self.by_tag(),
            GroupBy::Deadline => self.by_deadline(),
        }
    }

    /// Alphabetical tag groups, untagged tasks last.
    pub fn by_tag(&self) -> Vec<TaskGroup<'a>> {
        let mut tagged: BTreeMap<(String, String), Vec<(usize, &'a Task)>> = BTreeMap::new();
        let mut untagged = Vec::new();

        for (i, task) in self.numbered() {
            match task.tag() {
                Some(tag) => tagged
                    .entry((tag.to_lowercase(), tag.to_string()))
                    .or_default()
                    .push((i, task)),
                None => untagged.push((i, task)),
            }
        }

        let mut groups: Vec<TaskGroup<'a>> = tagged
            .into_iter()
            .map(|((_, tag), entries)| TaskGroup {
                title: format!("#{}", tag),
                entries,
            })
            .collect();
        if !untagged.is_empty() {
            groups.push(TaskGroup {
                title: "untagged".to_string(),
                entries: untagged,
            });
        }
        groups
    }

    /// Deadlines by due date, then events by start, then todos in list order.
    pub fn by_deadline(&self) -> Vec<TaskGroup<'a>> {
        let mut deadlines = Vec::new();
        let mut events = Vec::new();
        let mut todos = Vec::new();

        for (i, task) in self.numbered() {
            match task.kind() {
                TaskKind::Deadline { .. } => deadlines.push((i, task)),
                TaskKind::Event { .. } => events.push((i, task)),
                TaskKind::Todo => todos.push((i, task)),
            }
        }
        deadlines.sort_by_key(|(_, t)| t.relevant_instant());
        events.sort_by_key(|(_, t)| t.relevant_instant());

        [("deadlines", deadlines), ("events", events), ("todos", todos)]
            .into_iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(title, entries)| TaskGroup {
                title: title.to_string(),
                entries,
            })
            .collect()
    }

    fn numbered(&self) -> impl Iterator<Item = (usize, &'a Task)> {
        self.tasks.iter().enumerate().map(|(i, t)| (i + 1, t))
    }
}
