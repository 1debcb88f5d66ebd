use std::path::PathBuf;

use log::{info, warn};
use taskmate_core::{BufferSink, FileTaskRepository, TaskList, TaskService};

pub const LOAD_FAILED: &str = "oop. error loading,,, starting afresh!";

/// One reply from the interpreter, already joined into a single string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub is_error: bool,
    pub exit: bool,
}

/// The task list loaded at startup plus the interpreter that edits it.
pub struct Session {
    service: TaskService<FileTaskRepository>,
    tasks: TaskList,
    notices: Vec<String>,
}

impl Session {
    /// Loads `data_file`. A missing file starts an empty list; an unreadable
    /// one starts an empty list and leaves a notice for the user.
    pub fn open(data_file: PathBuf) -> Self {
        let repo = FileTaskRepository::new(data_file);
        let mut notices = Vec::new();

        let tasks = match repo.load_with_report() {
            Ok(report) => {
                for line in &report.skipped_lines {
                    notices.push(format!(
                        "warning: skipped invalid line {} in {}",
                        line,
                        repo.path().display()
                    ));
                }
                info!(
                    "loaded {} task(s) from {}",
                    report.tasks.len(),
                    repo.path().display()
                );
                TaskList::from_tasks(report.tasks)
            }
            Err(e) => {
                warn!("load failed for {}: {}", repo.path().display(), e);
                notices.push(LOAD_FAILED.to_string());
                TaskList::new()
            }
        };

        Self {
            service: TaskService::new(repo),
            tasks,
            notices,
        }
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// Splits the borrow so front ends can hand their own sink to the
    /// interpreter.
    pub fn parts_mut(&mut self) -> (&TaskService<FileTaskRepository>, &mut TaskList) {
        (&self.service, &mut self.tasks)
    }

    /// Runs one line and captures everything it printed.
    pub fn respond(&mut self, input: &str) -> Reply {
        let mut sink = BufferSink::new();
        match self.service.execute(input, &mut self.tasks, &mut sink) {
            Ok(exit) => Reply {
                text: sink.take_response(),
                is_error: false,
                exit,
            },
            Err(e) => Reply {
                text: format!("oop. {}", e),
                is_error: true,
                exit: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use taskmate_core::FAREWELL;

    #[test]
    fn test_missing_file_starts_empty_without_notice() {
        let dir = tempdir().unwrap();
        let session = Session::open(dir.path().join("tasks.txt"));
        assert!(session.tasks().is_empty());
        assert!(session.notices().is_empty());
    }

    #[test]
    fn test_bad_file_starts_afresh_with_notice() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        fs::write(&path, "D | 0 | essay | not-a-date\n").unwrap();

        let session = Session::open(path);
        assert!(session.tasks().is_empty());
        assert_eq!(session.notices(), &[LOAD_FAILED.to_string()]);
    }

    #[test]
    fn test_skipped_lines_are_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        fs::write(&path, "T | 0 | read book\ngarbage\n").unwrap();

        let session = Session::open(path);
        assert_eq!(session.tasks().len(), 1);
        assert_eq!(session.notices().len(), 1);
        assert!(session.notices()[0].contains("line 2"));
    }

    #[test]
    fn test_respond_captures_output_and_errors() {
        let dir = tempdir().unwrap();
        let mut session = Session::open(dir.path().join("tasks.txt"));

        let reply = session.respond("todo read book");
        assert!(!reply.is_error);
        assert!(reply.text.starts_with("got it. task added:\n  [T][ ] read book"));

        let reply = session.respond("blah");
        assert!(reply.is_error);
        assert!(reply.text.starts_with("oop. unknown command"));

        let reply = session.respond("bye");
        assert!(reply.exit);
        assert_eq!(reply.text, FAREWELL);
    }
}
