//! Domain value types for release-candidate management

pub mod candidate;
pub mod commit;
pub mod tag;

pub use candidate::ReleaseCandidate;
pub use commit::{CommitRange, CommitRecord};
pub use tag::ReleaseTag;
