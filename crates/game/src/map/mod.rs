mod course;
mod objects;

pub use course::JumpCourse;
pub use objects::{MapObject, MapObjectKind};
