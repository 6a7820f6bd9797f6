pub mod attendance;
pub mod event;
pub mod prize;
pub mod registration;
pub mod user;

pub use attendance::{Attendance, AttendanceStatus};
pub use event::Event;
pub use prize::{Prize, PrizePosition, PrizeWinner, WinnerType};
pub use registration::{
    PaymentInfo, PaymentStatus, Registration, RegistrationDetails, RegistrationStatus,
    RegistrationType, TeamMember, generate_registration_number,
};
pub use user::{User, UserRole};
