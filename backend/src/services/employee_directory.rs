use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::employee::Role;
use crate::repositories::employee::EmployeeRepository;

/// Read-only view of the employee hierarchy. Implementations must read the
/// current value on every call; the workflow relies on it to catch
/// reassigned managers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn reporting_manager_of(&self, emp_code: &str) -> Result<Option<String>, AppError>;

    async fn role_of(&self, emp_code: &str) -> Result<Role, AppError>;
}

#[derive(Debug, Clone)]
pub struct PgEmployeeDirectory {
    pool: PgPool,
    repo: EmployeeRepository,
}

impl PgEmployeeDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            repo: EmployeeRepository::new(),
        }
    }
}

#[async_trait]
impl EmployeeDirectory for PgEmployeeDirectory {
    async fn reporting_manager_of(&self, emp_code: &str) -> Result<Option<String>, AppError> {
        self.repo.reporting_manager_of(&self.pool, emp_code).await
    }

    async fn role_of(&self, emp_code: &str) -> Result<Role, AppError> {
        self.repo
            .find_by_code(&self.pool, emp_code)
            .await?
            .map(|employee| employee.role)
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", emp_code)))
    }
}
