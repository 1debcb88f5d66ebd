use thiserror::Error;

/// Coarse classification of a [`TaskError`], handy for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyInput,
    UnknownCommand,
    Validation,
    DuplicateTask,
    Io,
}

/// Every failure the engine can report. None of them are fatal: front ends
/// print the message and keep accepting input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("say something! enter 'help' for a list of commands.")]
    EmptyInput,

    #[error("unknown command. enter 'help' for a list of commands.")]
    UnknownCommand,

    #[error("{0}")]
    Validation(String),

    #[error("this task is already in your list!")]
    DuplicateTask,

    #[error("{0}")]
    Io(String),
}

impl TaskError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TaskError::Validation(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        TaskError::Io(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TaskError::EmptyInput => ErrorKind::EmptyInput,
            TaskError::UnknownCommand => ErrorKind::UnknownCommand,
            TaskError::Validation(_) => ErrorKind::Validation,
            TaskError::DuplicateTask => ErrorKind::DuplicateTask,
            TaskError::Io(_) => ErrorKind::Io,
        }
    }
}

pub type TaskResult<T> = Result<T, TaskError>;
