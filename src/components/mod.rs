//! UI Components
//!
//! Leptos components of the board: header, login, homepage and the
//! sprint page with its columns.

mod add_task_form;
mod header;
mod homepage;
mod login_form;
mod new_sprint_form;
mod sprint_view;
mod status_column;
mod task_item;

pub use add_task_form::AddTaskForm;
pub use header::Header;
pub use homepage::Homepage;
pub use login_form::LoginForm;
pub use new_sprint_form::NewSprintForm;
pub use sprint_view::SprintView;
pub use status_column::StatusColumn;
pub use task_item::TaskItem;
