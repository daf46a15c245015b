pub mod admin;
pub mod approvals;
pub mod attendance_corrections;
pub mod holidays;
pub mod leave_requests;
pub mod notifications;
pub mod offboarding;
pub mod overtime;
pub mod timesheets;

pub use approvals::*;
pub use attendance_corrections::*;
pub use holidays::*;
pub use leave_requests::*;
pub use notifications::*;
pub use offboarding::*;
pub use overtime::*;
pub use timesheets::*;
