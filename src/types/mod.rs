pub mod job;
pub mod response;
pub mod resume;

pub use job::{Industry, JobAnalysis, JobPosting};
pub use resume::{EducationEntry, ExperienceEntry, ResumeRecord};
