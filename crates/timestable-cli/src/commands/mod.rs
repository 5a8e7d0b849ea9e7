pub mod achievements;
pub mod init;
pub mod learn;
pub mod locale;
pub mod quiz;
pub mod report;
pub mod reset;
pub mod resume;
pub mod review;
pub mod session;
pub mod stats;
