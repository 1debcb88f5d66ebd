pub mod codec;
pub mod file;
pub mod traits;

// Re-export
pub use file::{FileTaskRepository, LoadReport};
pub use traits::TaskRepository;
