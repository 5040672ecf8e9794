pub mod action;
pub mod baseline;
pub mod detector;
pub mod reference;
pub mod score;

pub use action::{Action, ActionResult};
pub use baseline::{Baseline, BaselineCalibrator, Reference};
pub use detector::ActionDetector;
pub use reference::reference_pose;
pub use score::{score_over_head, score_range};
