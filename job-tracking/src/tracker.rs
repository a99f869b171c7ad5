use crate::backend::Backend;
use crate::deck::{DeckFilter, DiscoveryDeck};
use crate::error::{Result, TrackingError};
use crate::models::{JobIdentity, JobPosting, SavedJob, WithdrawRequest};
use crate::state::JobTrackingState;
use crate::store::{Store, Subscription};

/// Saved/hidden job tracking for the logged-in student, backed by a `Store`
/// for local state and a `Backend` for the portal.
///
/// Local operations persist only when they changed something. `withdraw`
/// touches local state only after the portal acknowledged it.
pub struct JobTracker<S: Store, B: Backend> {
    store: S,
    backend: B,
    username: Option<String>,
}

impl<S: Store, B: Backend> JobTracker<S, B> {
    pub fn new(store: S, backend: B, username: Option<String>) -> Self {
        let username = username.filter(|u| !u.trim().is_empty());
        Self {
            store,
            backend,
            username,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn require_user(&self) -> Result<&str> {
        self.username.as_deref().ok_or(TrackingError::AuthRequired)
    }

    /// Guests get an empty state.
    pub async fn state(&self) -> Result<JobTrackingState> {
        match self.username.as_deref() {
            Some(username) => Ok(self.store.load(username).await?),
            None => Ok(JobTrackingState::default()),
        }
    }

    pub async fn saved_jobs(&self) -> Result<Vec<SavedJob>> {
        Ok(self.state().await?.saved)
    }

    /// Fetch the listing and build the deck of postings not yet seen.
    pub async fn discover(&self, filter: &DeckFilter) -> Result<DiscoveryDeck> {
        let postings = self.backend.fetch_postings().await?;
        let state = self.state().await?;
        let deck = DiscoveryDeck::build(postings, &state.hidden, filter);
        log::debug!("deck has {} postings", deck.len());
        Ok(deck)
    }

    /// Find a posting of the current listing, hidden or not.
    pub async fn lookup(&self, identity: &JobIdentity) -> Result<Option<JobPosting>> {
        let postings = self.backend.fetch_postings().await?;
        Ok(postings.into_iter().find(|posting| identity.matches(posting)))
    }

    /// Build the deck and pull application statuses in one go. A failed
    /// status sync still yields the deck, with the sync outcome beside it.
    pub async fn refresh(&self, filter: &DeckFilter) -> Result<(DiscoveryDeck, Result<bool>)> {
        if self.username.is_none() {
            return Ok((self.discover(filter).await?, Ok(false)));
        }
        let (deck, synced) = futures::join!(self.discover(filter), self.sync_statuses());
        Ok((deck?, synced))
    }

    pub async fn save(&self, posting: JobPosting) -> Result<bool> {
        let username = self.require_user()?;
        let identity = posting.identity();
        let changed = self.update(username, |state| state.save(posting)).await?;
        if changed {
            log::info!("saved {} for {}", identity, username);
        }
        Ok(changed)
    }

    pub async fn dismiss(&self, posting: &JobPosting) -> Result<bool> {
        let username = self.require_user()?;
        let changed = self.update(username, |state| state.dismiss(posting)).await?;
        if changed {
            log::info!("dismissed {} for {}", posting.identity(), username);
        }
        Ok(changed)
    }

    pub async fn remove(&self, identity: &JobIdentity) -> Result<bool> {
        let username = self.require_user()?;
        let changed = self.update(username, |state| state.remove(identity)).await?;
        if !changed {
            log::debug!("{} is not saved for {}, nothing to remove", identity, username);
        }
        Ok(changed)
    }

    pub async fn unhide(&self, identity: &JobIdentity) -> Result<bool> {
        let username = self.require_user()?;
        self.update(username, |state| state.unhide(identity)).await
    }

    pub async fn mark_submitted(&self, identity: &JobIdentity) -> Result<bool> {
        let username = self.require_user()?;
        self.update(username, |state| state.mark_submitted(identity))
            .await
    }

    /// Retract interest at the portal, then forget the job locally and let
    /// it back into the deck. A job that is not saved is a no-op.
    pub async fn withdraw(&self, identity: &JobIdentity) -> Result<bool> {
        let username = self.require_user()?;
        let state = self.store.load(username).await?;
        let request = match state.find(identity) {
            Some(job) => WithdrawRequest::new(username, &job.posting),
            None => {
                log::debug!("{} is not saved for {}, nothing to withdraw", identity, username);
                return Ok(false);
            }
        };
        if let Err(e) = self.backend.withdraw_application(&request).await {
            log::error!("failed to withdraw {} for {}: {}", identity, username, e);
            return Err(e.into());
        }
        log::info!("withdrew {} for {}", identity, username);
        // the entry may have been removed locally while the request was in flight
        self.update(username, |state| state.withdraw(identity) || state.unhide(identity))
            .await?;
        Ok(true)
    }

    /// Merge the portal's application statuses into saved jobs.
    pub async fn sync_statuses(&self) -> Result<bool> {
        let username = self.require_user()?;
        let applications = match self.backend.fetch_applications(username).await {
            Ok(applications) => applications,
            Err(e) => {
                log::error!("failed to pull application statuses for {}: {}", username, e);
                return Err(e.into());
            }
        };
        if applications.is_empty() {
            return Ok(false);
        }
        self.update(username, |state| state.reconcile_statuses(&applications))
            .await
    }

    pub fn subscribe(&self) -> Result<Subscription> {
        let username = self.require_user()?;
        Ok(self.store.subscribe(username))
    }

    async fn update<F>(&self, username: &str, apply: F) -> Result<bool>
    where
        F: FnOnce(&mut JobTrackingState) -> bool + Send,
    {
        let mut state = self.store.load(username).await?;
        if !apply(&mut state) {
            return Ok(false);
        }
        debug_assert!(state.is_consistent());
        self.store.persist(username, &state).await?;
        Ok(true)
    }
}
