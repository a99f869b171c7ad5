use job_tracking::{JobTracker, SavedJob, Store};
use portal_api::PortalClient;

use crate::deck::{describe, parse_identity};
use crate::error::Result;

pub fn status_line(job: &SavedJob) -> String {
    format!(
        "{} [{}]",
        describe(&job.posting),
        job.status.as_deref().unwrap_or("not applied")
    )
}

pub async fn saved<S: Store>(tracker: &JobTracker<S, PortalClient>, json: bool) -> Result<()> {
    let jobs = tracker.saved_jobs().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }
    if jobs.is_empty() {
        println!("No saved jobs");
    }
    for job in &jobs {
        println!("{}", status_line(job));
    }
    Ok(())
}

pub async fn remove<S: Store>(tracker: &JobTracker<S, PortalClient>, raw_identity: &str) -> Result<()> {
    let identity = parse_identity(raw_identity);
    if tracker.remove(&identity).await? {
        println!("Removed {}", identity);
    } else {
        println!("{} is not saved", identity);
    }
    Ok(())
}

pub async fn withdraw<S: Store>(tracker: &JobTracker<S, PortalClient>, raw_identity: &str) -> Result<()> {
    let identity = parse_identity(raw_identity);
    if tracker.withdraw(&identity).await? {
        println!("Withdrew from {}, it will show up in the deck again", identity);
    } else {
        println!("{} is not saved", identity);
    }
    Ok(())
}

pub async fn unhide<S: Store>(tracker: &JobTracker<S, PortalClient>, raw_identity: &str) -> Result<()> {
    let identity = parse_identity(raw_identity);
    if tracker.unhide(&identity).await? {
        println!("{} is back in the deck", identity);
    } else {
        println!("{} is not hidden or still saved", identity);
    }
    Ok(())
}

pub async fn submitted<S: Store>(tracker: &JobTracker<S, PortalClient>, raw_identity: &str) -> Result<()> {
    let identity = parse_identity(raw_identity);
    if tracker.mark_submitted(&identity).await? {
        println!("Marked {} as submitted", identity);
    } else {
        println!("{} is not saved or already submitted", identity);
    }
    Ok(())
}

pub async fn sync<S: Store>(tracker: &JobTracker<S, PortalClient>) -> Result<()> {
    if tracker.sync_statuses().await? {
        println!("Application statuses updated");
    } else {
        println!("Application statuses already up to date");
    }
    Ok(())
}
