use crate::error::TaskResult;
use crate::model::task::Task;

/// Persistence seam for the interpreter. Every successful mutation ends in a
/// `save` of the whole list.
pub trait TaskRepository {
    fn load(&self) -> TaskResult<Vec<Task>>;
    fn save(&self, tasks: &[Task]) -> TaskResult<()>;
}

impl<R: TaskRepository + ?Sized> TaskRepository for &R {
    fn load(&self) -> TaskResult<Vec<Task>> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> TaskResult<()> {
        (**self).save(tasks)
    }
}
