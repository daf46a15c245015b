pub mod approval_request;
pub mod attendance;
pub mod attendance_correction;
pub mod common;
pub mod employee;
pub mod holiday;
pub mod leave_request;
pub mod notification;
pub mod offboarding;
pub mod overtime_request;
pub mod timesheet;
pub mod transaction;

pub use approval_request::{ApprovalListFilters, ApprovalRequestRepository};
pub use employee::EmployeeRepository;
