pub mod announce;
pub mod counter;
pub mod smooth;
pub mod stabilize;

pub use announce::Announcer;
pub use counter::{RepCounter, RepCounts};
pub use smooth::PoseSmoother;
pub use stabilize::ActionStabilizer;
