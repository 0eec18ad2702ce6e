pub mod change;
pub mod job;
pub mod resume;

pub use change::{change_stats, Change, ChangeStats, ChangeStatus, ChangeType};
pub use job::{Requirement, StructuredJob};
pub use resume::{Education, Experience, StructuredResume};
