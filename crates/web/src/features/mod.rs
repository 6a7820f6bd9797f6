pub mod attendance;
pub mod prizes;
pub mod registrations;
pub mod reports;
