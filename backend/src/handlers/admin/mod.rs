pub mod approvals;
pub mod common;
pub mod employees;
pub mod export;
pub mod holidays;
pub mod leave_balances;

pub use approvals::*;
pub use employees::*;
pub use export::*;
pub use holidays::*;
pub use leave_balances::*;
