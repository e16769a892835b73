pub mod applicant;
pub mod application;
pub mod company;
pub mod posting;
