pub mod candidate;
pub mod interview;
pub mod resume_version;
pub mod status_log;
