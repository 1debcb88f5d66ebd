use chrono::NaiveDate;

use crate::error::{TaskError, TaskResult};
use crate::model::task::Task;

/// Ordered, in-memory list of tasks. Insertion order is display order.
///
/// `add` never rejects anything: duplicate checks are the caller's job.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TaskList {
    items: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(items: Vec<Task>) -> Self {
        Self { items }
    }

    pub fn add(&mut self, task: Task) {
        self.items.push(task);
    }

    pub fn get(&self, index: usize) -> TaskResult<&Task> {
        self.items.get(index).ok_or_else(out_of_range)
    }

    pub fn get_mut(&mut self, index: usize) -> TaskResult<&mut Task> {
        self.items.get_mut(index).ok_or_else(out_of_range)
    }

    /// Removes the task at `index`, shifting later tasks down by one.
    pub fn delete(&mut self, index: usize) -> TaskResult<Task> {
        if index >= self.items.len() {
            return Err(out_of_range());
        }
        Ok(self.items.remove(index))
    }

    /// Puts a task back at `index` (clamped to the end of the list).
    pub fn insert(&mut self, index: usize, task: Task) {
        let index = index.min(self.items.len());
        self.items.insert(index, task);
    }

    /// Empties the list and hands back everything that was in it.
    pub fn clear(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.items)
    }

    /// Restores a previously cleared list, ahead of anything added since.
    pub fn restore(&mut self, mut tasks: Vec<Task>) {
        tasks.append(&mut self.items);
        self.items = tasks;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.items
    }

    pub fn contains_duplicate_of(&self, task: &Task) -> bool {
        self.items.iter().any(|t| t.same_details_as(task))
    }

    /// Deadlines due on `date` and events spanning it, earliest first.
    pub fn tasks_on_date(&self, date: NaiveDate) -> Vec<&Task> {
        let mut on_date: Vec<&Task> = self.items.iter().filter(|t| t.occurs_on(date)).collect();
        // stable, so equal instants keep list order
        on_date.sort_by_key(|t| t.relevant_instant());
        on_date
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn out_of_range() -> TaskError {
    TaskError::validation("task does not exist. use 'list' to see task numbers.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 2, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn add_get_and_delete() {
        let mut list = TaskList::new();
        list.add(Task::todo("a"));
        list.add(Task::todo("b"));
        list.add(Task::todo("c"));
        assert_eq!(list.len(), 3);

        let removed = list.delete(1).unwrap();
        assert_eq!(removed.description(), "b");
        assert_eq!(list.get(1).unwrap().description(), "c");
        assert!(list.get(2).is_err());
        assert!(list.delete(5).is_err());
    }

    #[test]
    fn insert_puts_task_back_in_place() {
        let mut list = TaskList::from_tasks(vec![Task::todo("a"), Task::todo("b")]);
        let removed = list.delete(0).unwrap();
        list.insert(0, removed);
        assert_eq!(list.get(0).unwrap().description(), "a");
        list.insert(99, Task::todo("z"));
        assert_eq!(list.get(2).unwrap().description(), "z");
    }

    #[test]
    fn clear_and_restore() {
        let mut list = TaskList::from_tasks(vec![Task::todo("a"), Task::todo("b")]);
        let removed = list.clear();
        assert!(list.is_empty());
        list.restore(removed);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).unwrap().description(), "a");
    }

    #[test]
    fn duplicate_detection() {
        let mut list = TaskList::new();
        list.add(Task::todo("read book"));
        assert!(list.contains_duplicate_of(&Task::todo("read book")));
        assert!(!list.contains_duplicate_of(&Task::todo("read books")));
        assert!(!list.contains_duplicate_of(&Task::deadline("read book", at(22, 12), true)));
    }

    #[test]
    fn tasks_on_date_filters_and_sorts() {
        let mut list = TaskList::new();
        list.add(Task::todo("todo on no date"));
        list.add(Task::deadline("late deadline", at(22, 18), true));
        list.add(Task::event("long trip", at(20, 9), at(23, 9)));
        list.add(Task::deadline("other day", at(21, 10), true));
        list.add(Task::event("lunch", at(22, 12), at(22, 13)));

        let day = NaiveDate::from_ymd_opt(2022, 2, 22).unwrap();
        let found: Vec<&str> = list.tasks_on_date(day).iter().map(|t| t.description()).collect();
        assert_eq!(found, vec!["long trip", "lunch", "late deadline"]);
    }
}
