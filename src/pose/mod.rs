pub mod geometry;
pub mod keypoint;
pub mod skeleton;

pub use geometry::{angle_degrees, distance, GEOMETRY_CONFIDENCE_FLOOR};
pub use keypoint::{BodyPart, Keypoint, Pose};
pub use skeleton::{is_arm_edge, SKELETON_EDGES};
