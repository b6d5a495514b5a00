pub mod response;
pub mod task;
pub mod user;

pub use response::ApiResponse;
pub use task::{NewTask, Task, TaskStatus, TaskUpdate};
pub use user::User;
