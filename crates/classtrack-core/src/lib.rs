// ABOUTME: Core library for classtrack, containing the in-memory domain model.
// ABOUTME: Defines users, courses, course content, and the pure validation helpers.

pub mod content;
pub mod course;
pub mod user;
pub mod validate;

pub use content::{Assignment, Grade, Material, Submission};
pub use course::Course;
pub use user::{PrivateMessage, Role, RoleData, User, send_message};
