use job_tracking::{ApplicationRecord, JobPosting};
use serde::Deserialize;
use serde_json::Value;

/// A posting as returned by `/all_company_jobs`.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct CompanyJob {
    company_name: Option<String>,
    title: Option<String>,
    description: Option<String>,
    pay: Option<String>,
    location: Option<String>,
    faculty: Option<String>,
    logo: Option<String>,
    job_id: Option<i64>,
    company_username: Option<String>,
    posted_at: Option<String>,
    industry: Option<String>,
    category: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct ListingResponse {
    #[serde(default)]
    pub(crate) jobs: Option<Vec<CompanyJob>>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<CompanyJob> for JobPosting {
    fn from(job: CompanyJob) -> Self {
        let category = present(job.industry)
            .or_else(|| present(job.category))
            .unwrap_or_default();
        JobPosting {
            company_name: job.company_name.unwrap_or_default(),
            role: job.title.unwrap_or_default(),
            details: job.description.unwrap_or_default(),
            pay: present(job.pay).unwrap_or_else(|| "-".to_owned()),
            location: job.location.unwrap_or_default(),
            faculty_hint: job.faculty.unwrap_or_default(),
            logo_ref: present(job.logo),
            job_id: job.job_id,
            company_username: present(job.company_username),
            posted_at: present(job.posted_at),
            category,
        }
    }
}

impl ListingResponse {
    pub(crate) fn into_postings(self) -> Vec<JobPosting> {
        self.jobs
            .unwrap_or_default()
            .into_iter()
            .map(JobPosting::from)
            .collect()
    }
}

/// `/applications/{username}` answers `{ applications: [...] }`; anything
/// else in that field counts as no applications.
pub(crate) fn parse_applications(body: Value) -> serde_json::Result<Vec<ApplicationRecord>> {
    match body {
        Value::Object(mut fields) => match fields.remove("applications") {
            Some(items @ Value::Array(_)) => serde_json::from_value(items),
            _ => Ok(Vec::new()),
        },
        _ => Ok(Vec::new()),
    }
}
