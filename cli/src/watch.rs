use job_tracking::{JobTracker, Store};
use portal_api::PortalClient;
use std::time::Duration;

use crate::error::Result;
use crate::jobs::status_line;

/// Print the saved jobs whenever they change. In-process writes arrive
/// through the subscription; writes by other processes are picked up by
/// re-reading the store every `interval`.
pub async fn watch<S: Store>(tracker: &JobTracker<S, PortalClient>, interval: Duration) -> Result<()> {
    let mut subscription = tracker.subscribe()?;
    let mut last = tracker.state().await?;
    let mut ticker = tokio::time::interval(interval);
    println!("Watching saved jobs of {}", subscription.username());
    loop {
        tokio::select! {
            alive = subscription.changed() => {
                if !alive {
                    return Ok(());
                }
            }
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
        let state = tracker.state().await?;
        if state == last {
            continue;
        }
        println!("-- {} saved, {} hidden", state.saved.len(), state.hidden.len());
        for job in &state.saved {
            println!("{}", status_line(job));
        }
        last = state;
    }
}
