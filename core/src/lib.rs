pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod output;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::Config;
pub use error::{ErrorKind, TaskError, TaskResult};
pub use input::{parse_command, normalize, Command, GroupBy};
pub use model::task::{Task, TaskKind};
pub use model::task_list::TaskList;
pub use output::{BufferSink, ConsoleSink, OutputSink};
pub use repository::{FileTaskRepository, LoadReport, TaskRepository};
pub use service::task_service::{execute_command, TaskService, FAREWELL};

pub fn greet() -> Vec<&'static str> {
    vec!["Hello, I'm taskmate!", "What can I do for you?"]
}
