use std::sync::Arc;

use crate::{
    config::Config,
    db::connection::DbPool,
    services::{
        employee_directory::{EmployeeDirectory, PgEmployeeDirectory},
        notification::{NotificationSink, PgNotificationSink},
        ApprovalWorkflow, HolidayService, OvertimeService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Config,
    pub workflow: ApprovalWorkflow,
    pub overtime: OvertimeService,
    pub holidays: HolidayService,
}

impl AppState {
    /// Wires the Postgres-backed collaborators around a single pool.
    pub fn new(pool: DbPool, config: Config) -> Self {
        let directory: Arc<dyn EmployeeDirectory> = Arc::new(PgEmployeeDirectory::new(pool.clone()));
        let notifier: Arc<dyn NotificationSink> = Arc::new(PgNotificationSink::new(pool.clone()));
        Self::with_collaborators(pool, config, directory, notifier)
    }

    pub fn with_collaborators(
        pool: DbPool,
        config: Config,
        directory: Arc<dyn EmployeeDirectory>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let holidays = HolidayService::new(pool.clone());
        let workflow = ApprovalWorkflow::new(
            pool.clone(),
            Arc::clone(&directory),
            Arc::clone(&notifier),
            holidays.clone(),
        );
        let overtime = OvertimeService::new(pool.clone(), directory, notifier);
        Self {
            pool,
            config,
            workflow,
            overtime,
            holidays,
        }
    }
}
