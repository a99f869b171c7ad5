use async_trait::async_trait;

use crate::error::BackendError;
use crate::models::{ApplicationRecord, JobPosting, WithdrawRequest};

/// Calls the tracker makes against the career portal.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Every posting of every company, in listing order.
    async fn fetch_postings(&self) -> Result<Vec<JobPosting>, BackendError>;

    /// Authoritative application records of a student.
    async fn fetch_applications(&self, username: &str)
        -> Result<Vec<ApplicationRecord>, BackendError>;

    async fn withdraw_application(&self, request: &WithdrawRequest) -> Result<(), BackendError>;
}
