use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use log::{debug, warn};

use crate::error::{TaskError, TaskResult};
use crate::model::task::Task;
use crate::repository::codec::{self, Decoded};
use crate::repository::traits::TaskRepository;

const DEFAULT_DIR_NAME: &str = ".taskmate";
const DEFAULT_FILE_NAME: &str = "tasks.txt";

/// What a load produced, including the line numbers that were skipped.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub tasks: Vec<Task>,
    pub skipped_lines: Vec<usize>,
}

/// Flat text file store, one task per line.
///
/// Load policy: blank lines are ignored, lines with a broken structure are
/// skipped (and logged), while an unreadable timestamp aborts the whole load
/// because it points at real corruption.
#[derive(Clone, Debug)]
pub struct FileTaskRepository {
    file_path: PathBuf,
}

impl FileTaskRepository {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// `~/.taskmate/tasks.txt`
    pub fn default_path() -> Result<PathBuf> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Ok(home_dir.join(DEFAULT_DIR_NAME).join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn load_with_report(&self) -> TaskResult<LoadReport> {
        let path = &self.file_path;
        if !path.exists() {
            debug!("no save file at {}, starting empty", path.display());
            return Ok(LoadReport::default());
        }
        if path.is_dir() {
            return Err(TaskError::io(format!(
                "save file path points to a directory, not a file: {}. please specify a valid file path.",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| self.read_error(&e))?;

        let mut report = LoadReport::default();
        for (i, line) in content.lines().enumerate() {
            let line_number = i + 1;
            if line.trim().is_empty() {
                continue;
            }
            match codec::decode(line) {
                Decoded::Task(task) => report.tasks.push(task),
                Decoded::Skipped => {
                    warn!("skipped invalid line {} in {}", line_number, path.display());
                    report.skipped_lines.push(line_number);
                }
                Decoded::BadDate(field) => {
                    return Err(TaskError::io(format!(
                        "save file contains an invalid date '{}' on line {}. fix or remove the file: {}",
                        field,
                        line_number,
                        path.display()
                    )));
                }
            }
        }
        debug!("loaded {} task(s) from {}", report.tasks.len(), path.display());
        Ok(report)
    }

    fn write_tasks(&self, tasks: &[Task]) -> io::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.file_path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(fs::File::create(&tmp)?);
            for task in tasks {
                writeln!(writer, "{}", codec::encode(task))?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &self.file_path)
    }

    fn read_error(&self, e: &io::Error) -> TaskError {
        if e.kind() == io::ErrorKind::PermissionDenied {
            TaskError::io(format!(
                "cannot read save file: access denied. check file permissions for {}",
                self.file_path.display()
            ))
        } else {
            TaskError::io(format!("cannot read save file: {}", e))
        }
    }

    fn write_error(&self, e: &io::Error) -> TaskError {
        if e.kind() == io::ErrorKind::PermissionDenied {
            TaskError::io(format!(
                "could not save tasks: access denied. check file permissions for {}",
                self.file_path.display()
            ))
        } else {
            TaskError::io(format!("could not save tasks to file: {}", e))
        }
    }
}

impl TaskRepository for FileTaskRepository {
    fn load(&self) -> TaskResult<Vec<Task>> {
        self.load_with_report().map(|report| report.tasks)
    }

    fn save(&self, tasks: &[Task]) -> TaskResult<()> {
        if self.file_path.is_dir() {
            return Err(TaskError::io(format!(
                "cannot save: file path points to a directory: {}. please specify a valid file path.",
                self.file_path.display()
            )));
        }
        self.write_tasks(tasks).map_err(|e| self.write_error(&e))?;
        debug!("saved {} task(s) to {}", tasks.len(), self.file_path.display());
        Ok(())
    }
}
