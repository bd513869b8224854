/// Board state and the drag gesture machine
///
/// The board holds the full task list in one flat `Vec`; the four
/// columns are pure filters over `status`, never separate collections,
/// so a task can only ever be in exactly one column.
///
/// # Drag model
///
/// ```text
/// idle --drag_start--> dragging --drag_over*--> dragging --drag_end--> idle
///                          \---------------cancel_drag-------------> idle
/// ```
///
/// Moves across a column boundary happen optimistically during
/// `drag_over`: the dragged task's status is reassigned locally with
/// no network involved, so the card renders in its new column while
/// the pointer is still down. `drag_end` finalizes the gesture and
/// hands back the task's full field set for persistence.
///
/// Intra-column order is a purely local affordance: `drag_end` over a
/// sibling reorders the list in place, but the server has no position
/// field, so the order resets on reload. Known limitation, not a bug.

use taskflow_shared::models::task::{Task, TaskStatus, COLUMNS};

/// What the pointer is currently over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// An empty region of a column
    Column(TaskStatus),

    /// Another task card
    Task(i64),
}

/// Drag gesture state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No gesture in progress
    #[default]
    Idle,

    /// A card is being dragged
    Dragging {
        /// Id of the dragged task
        task_id: i64,
    },
}

/// The board: task list plus gesture state
#[derive(Debug, Default)]
pub struct BoardState {
    tasks: Vec<Task>,
    drag: DragState,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole task list (after a fetch)
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks in one column, in list order
    pub fn column(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    /// All four columns in display order
    pub fn columns(&self) -> [(TaskStatus, Vec<&Task>); 4] {
        COLUMNS.map(|status| (status, self.column(status)))
    }

    /// Inserts or replaces a task by id
    pub fn upsert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task,
            None => self.tasks.push(task),
        }
    }

    pub fn remove(&mut self, id: i64) {
        self.tasks.retain(|t| t.id != id);
    }

    /// Begins a drag gesture; no-op if the id is unknown
    pub fn drag_start(&mut self, task_id: i64) {
        if self.task(task_id).is_some() {
            self.drag = DragState::Dragging { task_id };
        }
    }

    /// Pointer moved over a new target mid-drag
    ///
    /// Crossing a column boundary reassigns the dragged task's status
    /// immediately. Returns `true` when the move changed something.
    pub fn drag_over(&mut self, target: DropTarget) -> bool {
        let DragState::Dragging { task_id } = self.drag else {
            return false;
        };

        let Some(column) = self.target_column(task_id, target) else {
            return false;
        };

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return false;
        };

        if task.status == column {
            return false;
        }
        task.status = column;
        true
    }

    /// Drops the dragged card
    ///
    /// A drop over a sibling in the same column reorders the list
    /// locally. Either way the gesture ends and the dropped task's
    /// full field set comes back so the caller can persist it.
    pub fn drag_end(&mut self, target: DropTarget) -> Option<Task> {
        let DragState::Dragging { task_id } = self.drag else {
            return None;
        };
        self.drag = DragState::Idle;

        // Late column crossings (fast drops) land here too
        if let Some(column) = self.target_column(task_id, target) {
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
                task.status = column;
            }
        }

        if let DropTarget::Task(over_id) = target {
            self.reorder(task_id, over_id);
        }

        self.task(task_id).cloned()
    }

    /// Abandons the gesture without a drop
    pub fn cancel_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Column a target resolves to; `None` for a drop on itself
    fn target_column(&self, task_id: i64, target: DropTarget) -> Option<TaskStatus> {
        match target {
            DropTarget::Column(status) => Some(status),
            DropTarget::Task(over_id) if over_id != task_id => {
                self.task(over_id).map(|t| t.status)
            }
            DropTarget::Task(_) => None,
        }
    }

    /// Moves `task_id` to `over_id`'s position in the flat list
    fn reorder(&mut self, task_id: i64, over_id: i64) {
        if task_id == over_id {
            return;
        }
        let Some(from) = self.tasks.iter().position(|t| t.id == task_id) else {
            return;
        };
        let Some(to) = self.tasks.iter().position(|t| t.id == over_id) else {
            return;
        };

        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
    }
}
