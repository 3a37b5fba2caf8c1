pub mod applicant;
pub mod application;
pub mod job;
pub mod page;
pub mod resume;
