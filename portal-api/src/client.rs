use async_trait::async_trait;
use job_tracking::{ApplicationRecord, Backend, BackendError, JobPosting, WithdrawRequest};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde_json::Value;

use crate::types::{parse_applications, ListingResponse};
use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// HTTP client for the career portal backend.
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl PortalClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if Url::parse(base_url).is_err() {
            return Err(Error::InvalidBaseUrl(base_url.to_owned()));
        }
        Ok(Self {
            client,
            base_url: base_url.to_owned(),
            token: None,
        })
    }

    /// Bearer token sent with authenticated requests.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn all_company_jobs(&self) -> Result<Vec<JobPosting>> {
        let url = self.url("/all_company_jobs");
        log::debug!("requesting job listing from {}", url);
        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;
        let resp = ensure_success(resp, &url).await?;
        let listing: ListingResponse = resp.json().await?;
        let postings = listing.into_postings();
        log::debug!("retrieved {} postings", postings.len());
        Ok(postings)
    }

    pub async fn applications(&self, username: &str) -> Result<Vec<ApplicationRecord>> {
        let url = self.url(&format!("/applications/{}", urlencoding::encode(username)));
        log::debug!("requesting applications of {}", username);
        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;
        let resp = ensure_success(resp, &url).await?;
        let body: Value = resp.json().await?;
        Ok(parse_applications(body)?)
    }

    pub async fn withdraw(&self, request: &WithdrawRequest) -> Result<()> {
        let url = self.url("/withdraw_application");
        log::debug!(
            "withdrawing application of {} for {}",
            request.username,
            request.job_name
        );
        let resp = self
            .authorized(self.client.post(&url))
            .form(request)
            .send()
            .await?;
        ensure_success(resp, &url).await?;
        Ok(())
    }
}

async fn ensure_success(resp: Response, url: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let error_body = resp.text().await;
    log::error!(
        "request to {} failed with {}, error resp body: {:?}",
        url,
        status,
        error_body
    );
    Err(Error::RequestNotOk(url.to_owned(), status))
}

#[async_trait]
impl Backend for PortalClient {
    async fn fetch_postings(&self) -> std::result::Result<Vec<JobPosting>, BackendError> {
        self.all_company_jobs()
            .await
            .map_err(|e| BackendError::new("fetching job listing", e))
    }

    async fn fetch_applications(
        &self,
        username: &str,
    ) -> std::result::Result<Vec<ApplicationRecord>, BackendError> {
        self.applications(username)
            .await
            .map_err(|e| BackendError::new("fetching application statuses", e))
    }

    async fn withdraw_application(
        &self,
        request: &WithdrawRequest,
    ) -> std::result::Result<(), BackendError> {
        self.withdraw(request)
            .await
            .map_err(|e| BackendError::new("withdrawing application", e))
    }
}
