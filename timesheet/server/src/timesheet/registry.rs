//! Tasks that belong to no project and are always offered for booking.

/// Project label shown for tasks without an owning project.
pub const NON_PROJECT: &str = "Non-Project";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonProjectTask {
    pub name: &'static str,
    pub task_id: i32,
}

pub const NON_PROJECT_TASKS: [NonProjectTask; 2] = [
    NonProjectTask {
        name: "Training",
        task_id: 9999,
    },
    NonProjectTask {
        name: "Meeting",
        task_id: 9998,
    },
];

/// Names handed to the client for its task selection controls.
pub fn non_project_task_names() -> Vec<String> {
    NON_PROJECT_TASKS
        .iter()
        .map(|task| task.name.to_string())
        .collect()
}

pub fn is_non_project_task(task_id: i32) -> bool {
    NON_PROJECT_TASKS.iter().any(|task| task.task_id == task_id)
}
