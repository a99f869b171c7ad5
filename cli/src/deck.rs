use job_tracking::{DeckFilter, JobIdentity, JobPosting, JobTracker, Store, TrackingError};
use portal_api::PortalClient;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::{Error, Result};

/// Accepts `id:12`, `demo:Company|Role` or a bare backend id.
pub fn parse_identity(raw: &str) -> JobIdentity {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(job_id) => JobIdentity::from(format!("id:{}", job_id)),
        Err(_) => JobIdentity::from(raw),
    }
}

pub fn describe(posting: &JobPosting) -> String {
    let mut line = format!(
        "{:<16} {} @ {}",
        posting.identity(),
        posting.role,
        posting.company_name
    );
    for field in [&posting.location, &posting.pay, &posting.category] {
        if !field.is_empty() {
            line.push_str(" | ");
            line.push_str(field);
        }
    }
    line
}

pub async fn list<S: Store>(tracker: &JobTracker<S, PortalClient>, filter: DeckFilter) -> Result<()> {
    let (deck, synced) = tracker.refresh(&filter).await?;
    match synced {
        Ok(true) => println!("Application statuses updated"),
        Ok(false) => {}
        Err(e) => println!("Application statuses not updated: {}", e),
    }
    if deck.is_empty() {
        println!("No new postings");
        return Ok(());
    }
    for posting in deck.cards() {
        println!("{}", describe(posting));
    }
    Ok(())
}

pub async fn decide<S: Store>(
    tracker: &JobTracker<S, PortalClient>,
    raw_identity: &str,
    keep: bool,
) -> Result<()> {
    if tracker.username().is_none() {
        return Err(TrackingError::AuthRequired.into());
    }
    let identity = parse_identity(raw_identity);
    let posting = tracker
        .lookup(&identity)
        .await?
        .ok_or_else(|| Error::UnknownPosting(identity.to_string()))?;
    let changed = if keep {
        tracker.save(posting.clone()).await?
    } else {
        tracker.dismiss(&posting).await?
    };
    match (keep, changed) {
        (true, true) => println!("Saved {}", describe(&posting)),
        (false, true) => println!("Hidden {}", describe(&posting)),
        (_, false) => println!("{} was already tracked", posting.identity()),
    }
    Ok(())
}

/// Walk through the deck card by card, like swiping.
pub async fn swipe<S: Store>(tracker: &JobTracker<S, PortalClient>, filter: DeckFilter) -> Result<()> {
    let mut deck = tracker.discover(&filter).await?;
    println!("{} postings in the deck", deck.len());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(posting) = deck.current() {
        println!("{}", describe(posting));
        if !posting.details.is_empty() {
            println!("    {}", posting.details);
        }
        println!("[s]ave, [d]ismiss, [n]ext, [q]uit:");
        let Some(choice) = lines.next_line().await? else {
            break;
        };
        match choice.trim() {
            "s" | "d" if tracker.username().is_none() => {
                println!("Log in to save or dismiss postings");
            }
            "s" => {
                if let Some(posting) = deck.take_current() {
                    tracker.save(posting).await?;
                    println!("Saved");
                }
            }
            "d" => {
                if let Some(posting) = deck.take_current() {
                    tracker.dismiss(&posting).await?;
                }
            }
            "n" | "" => deck.skip(),
            "q" => break,
            other => println!("Unknown choice '{}'", other),
        }
    }
    if deck.is_exhausted() {
        println!("No more postings");
    }
    Ok(())
}
