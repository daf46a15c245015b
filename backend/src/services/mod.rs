pub mod approval_effects;
pub mod approval_workflow;
pub mod employee_directory;
pub mod holiday;
pub mod notification;
pub mod overtime;

pub use approval_workflow::ApprovalWorkflow;
pub use holiday::HolidayService;
pub use overtime::OvertimeService;
