use chrono::{Local, NaiveDate};
use log::{debug, error, info};

use crate::error::{TaskError, TaskResult};
use crate::input::{parse_command, Command, GroupBy};
use crate::model::task::Task;
use crate::model::task_list::TaskList;
use crate::output::OutputSink;
use crate::repository::TaskRepository;
use crate::time::{format_date, resolve_schedule_date};
use crate::usecase::organise::OrganiseUseCase;

pub const FAREWELL: &str = "Bye. Hope to see you again!";

const EMPTY_LIST: &str = "your list is empty, nothing here!";
const HELP_LINES: &[&str] = &[
    "here are the commands available:",
    "todo <description> - add a todo task",
    "deadline <description> /by d/M/yyyy [HHmm] - add a deadline task",
    "event <description> /from d/M/yyyy HHmm /to d/M/yyyy HHmm - add an event task",
    "list - show every task",
    "mark <number> - mark a task as done",
    "unmark <number> - mark a task as not done",
    "delete <number> - delete a task",
    "tag <number> <tag> - tag a task",
    "untag <number> - remove a task's tag",
    "find <keyword> - find tasks by keyword",
    "schedule <d | d/M | d/M/yyyy> - view deadlines and events on a date",
    "organise <tag | deadline> - view tasks grouped by tag or by date",
    "clear - delete every task",
    "help - display this list of commands",
    "bye - say goodbye",
];

/// Runs user commands against a [`TaskList`], persisting every change
/// through the repository.
///
/// If a save fails after the list was changed, the change is undone before
/// the error is returned, so memory never drifts from the last good file.
pub struct TaskService<R: TaskRepository> {
    repo: R,
    today: fn() -> NaiveDate,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, local_today)
    }

    /// Same as [`TaskService::new`] with a custom notion of "today", used to
    /// resolve partial `schedule` dates.
    pub fn with_clock(repo: R, today: fn() -> NaiveDate) -> Self {
        Self { repo, today }
    }

    /// Parses and executes one line. Returns `Ok(true)` when the session
    /// should end.
    pub fn execute(
        &self,
        input: &str,
        tasks: &mut TaskList,
        out: &mut dyn OutputSink,
    ) -> TaskResult<bool> {
        let command = parse_command(input)?;
        debug!("dispatching {:?}", command);
        self.run(command, tasks, out)
    }

    pub fn run(
        &self,
        command: Command,
        tasks: &mut TaskList,
        out: &mut dyn OutputSink,
    ) -> TaskResult<bool> {
        match command {
            Command::Bye => {
                out.print_line(FAREWELL);
                return Ok(true);
            }
            Command::List => print_list(tasks, out),
            Command::Help => HELP_LINES.iter().for_each(|line| out.print_line(line)),
            Command::Clear => self.clear(tasks, out)?,
            Command::Todo { description } => self.add(Task::todo(description), tasks, out)?,
            Command::Deadline {
                description,
                due,
                has_time,
            } => self.add(Task::deadline(description, due, has_time), tasks, out)?,
            Command::Event {
                description,
                start,
                end,
            } => self.add(Task::event(description, start, end), tasks, out)?,
            Command::Mark { index } => self.set_done(index, true, tasks, out)?,
            Command::Unmark { index } => self.set_done(index, false, tasks, out)?,
            Command::Delete { index } => self.delete(index, tasks, out)?,
            Command::Tag { index, tag } => self.set_tag(index, Some(tag), tasks, out)?,
            Command::Untag { index } => self.set_tag(index, None, tasks, out)?,
            Command::Find { keyword } => match keyword {
                Some(keyword) => print_matches(tasks, &keyword, out),
                None => print_list(tasks, out),
            },
            Command::Schedule { date } => self.schedule(&date, tasks, out)?,
            Command::Organise(by) => print_organised(tasks, by, out),
        }
        Ok(false)
    }

    fn persist(&self, tasks: &TaskList) -> TaskResult<()> {
        self.repo.save(tasks.as_slice()).map_err(|e| {
            error!("save failed, rolling back: {}", e);
            e
        })
    }

    fn add(&self, task: Task, tasks: &mut TaskList, out: &mut dyn OutputSink) -> TaskResult<()> {
        if tasks.contains_duplicate_of(&task) {
            return Err(TaskError::DuplicateTask);
        }
        let line = format!("  {}", task);
        tasks.add(task);
        if let Err(e) = self.persist(tasks) {
            let last = tasks.len() - 1;
            tasks.delete(last).ok();
            return Err(e);
        }
        info!("added task, list size now {}", tasks.len());
        out.print_line("got it. task added:");
        out.print_line(&line);
        print_count(tasks, out);
        Ok(())
    }

    fn set_done(
        &self,
        index: usize,
        done: bool,
        tasks: &mut TaskList,
        out: &mut dyn OutputSink,
    ) -> TaskResult<()> {
        let task = tasks.get_mut(index)?;
        if task.is_done() == done {
            out.print_line(if done {
                "this task is already marked as done:"
            } else {
                "this task is already not done:"
            });
            out.print_line(&format!("  {}", task));
            return Ok(());
        }
        apply_done(task, done);

        if let Err(e) = self.persist(tasks) {
            if let Ok(task) = tasks.get_mut(index) {
                apply_done(task, !done);
            }
            return Err(e);
        }
        info!("task {} marked done={}", index + 1, done);
        out.print_line(if done {
            "nice! task marked as done:"
        } else {
            "ok, task marked as not done:"
        });
        out.print_line(&format!("  {}", tasks.get(index)?));
        Ok(())
    }

    fn delete(&self, index: usize, tasks: &mut TaskList, out: &mut dyn OutputSink) -> TaskResult<()> {
        let removed = tasks.delete(index)?;
        if let Err(e) = self.persist(tasks) {
            tasks.insert(index, removed);
            return Err(e);
        }
        info!("deleted task {}, list size now {}", index + 1, tasks.len());
        out.print_line("task removed:");
        out.print_line(&format!("  {}", removed));
        print_count(tasks, out);
        Ok(())
    }

    fn set_tag(
        &self,
        index: usize,
        tag: Option<String>,
        tasks: &mut TaskList,
        out: &mut dyn OutputSink,
    ) -> TaskResult<()> {
        let task = tasks.get_mut(index)?;
        if tag.is_none() && task.tag().is_none() {
            out.print_line("this task has no tag:");
            out.print_line(&format!("  {}", task));
            return Ok(());
        }
        let previous = task.tag().map(str::to_string);
        task.set_tag(tag);

        if let Err(e) = self.persist(tasks) {
            if let Ok(task) = tasks.get_mut(index) {
                task.set_tag(previous);
            }
            return Err(e);
        }
        let task = tasks.get(index)?;
        info!("task {} tag set to {:?}", index + 1, task.tag());
        out.print_line(if task.tag().is_some() {
            "task tagged:"
        } else {
            "tag removed:"
        });
        out.print_line(&format!("  {}", task));
        Ok(())
    }

    fn clear(&self, tasks: &mut TaskList, out: &mut dyn OutputSink) -> TaskResult<()> {
        let removed = tasks.clear();
        let count = removed.len();
        if let Err(e) = self.persist(tasks) {
            tasks.restore(removed);
            return Err(e);
        }
        info!("cleared {} task(s)", count);
        out.print_line(&format!("cleared {} task(s). your list is now empty.", count));
        Ok(())
    }

    fn schedule(&self, date: &str, tasks: &TaskList, out: &mut dyn OutputSink) -> TaskResult<()> {
        let date = resolve_schedule_date(date, (self.today)())?;
        let on_date = tasks.tasks_on_date(date);
        out.print_line(&format!("schedule for {}:", format_date(&date)));
        if on_date.is_empty() {
            out.print_line("  (no tasks on this date)");
        }
        for (i, task) in on_date.iter().enumerate() {
            out.print_line(&format!("{}. {}", i + 1, task));
        }
        Ok(())
    }
}

/// Single-call form of the interpreter for callers that do not keep a
/// [`TaskService`] around.
pub fn execute_command<R: TaskRepository>(
    input: &str,
    tasks: &mut TaskList,
    out: &mut dyn OutputSink,
    repo: &R,
) -> TaskResult<bool> {
    TaskService::new(repo).execute(input, tasks, out)
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn apply_done(task: &mut Task, done: bool) {
    if done {
        task.mark_done();
    } else {
        task.mark_not_done();
    }
}

fn print_count(tasks: &TaskList, out: &mut dyn OutputSink) {
    out.print_line(&format!("now you have {} task(s) in the list.", tasks.len()));
}

fn print_list(tasks: &TaskList, out: &mut dyn OutputSink) {
    if tasks.is_empty() {
        out.print_line(EMPTY_LIST);
        return;
    }
    out.print_line("here is your to-do list!");
    for (i, task) in tasks.iter().enumerate() {
        out.print_line(&format!("{}. {}", i + 1, task));
    }
}

fn print_matches(tasks: &TaskList, keyword: &str, out: &mut dyn OutputSink) {
    let keyword = keyword.to_lowercase();
    let matches: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.description().to_lowercase().contains(&keyword))
        .collect();
    if matches.is_empty() {
        out.print_line("no matching tasks found.");
        return;
    }
    out.print_line("here are the matching tasks in your list:");
    for (i, task) in matches.iter().enumerate() {
        out.print_line(&format!("{}. {}", i + 1, task));
    }
}

fn print_organised(tasks: &TaskList, by: GroupBy, out: &mut dyn OutputSink) {
    if tasks.is_empty() {
        out.print_line(EMPTY_LIST);
        return;
    }
    let heading = match by {
        GroupBy::Tag => "here is your list, organised by tag:",
        GroupBy::Deadline => "here is your list, organised by date:",
    };
    out.print_line(heading);
    for group in OrganiseUseCase::new(tasks).group(by) {
        out.print_line(&format!("{}:", group.title));
        for (number, task) in group.entries {
            out.print_line(&format!("  {}. {}", number, task));
        }
    }
}
