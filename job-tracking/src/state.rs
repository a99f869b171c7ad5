use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{ApplicationRecord, JobIdentity, JobPosting, SavedJob, SUBMITTED_STATUS};

/// Saved and hidden postings of a single user.
///
/// Every saved identity is also hidden, so a tracked posting never comes
/// back in the discovery deck. A dismissed posting is hidden without being
/// saved. Mutations return `true` when they changed anything.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct JobTrackingState {
    pub saved: Vec<SavedJob>,
    pub hidden: BTreeSet<JobIdentity>,
}

impl JobTrackingState {
    pub fn new(saved: Vec<SavedJob>, hidden: BTreeSet<JobIdentity>) -> Self {
        Self { saved, hidden }
    }

    /// Track a posting and hide it from the deck. Saving an identity that is
    /// already tracked keeps the existing entry and its status.
    pub fn save(&mut self, posting: JobPosting) -> bool {
        let identity = posting.identity();
        let newly_hidden = self.hidden.insert(identity.clone());
        if self.contains(&identity) {
            return newly_hidden;
        }
        self.saved.push(SavedJob::new(posting));
        true
    }

    pub fn dismiss(&mut self, posting: &JobPosting) -> bool {
        self.hidden.insert(posting.identity())
    }

    /// Stop tracking locally. The posting stays hidden.
    pub fn remove(&mut self, identity: &JobIdentity) -> bool {
        self.take_saved(identity).is_some()
    }

    /// Local half of a withdrawal: drop the entry and make the posting
    /// discoverable again.
    pub fn withdraw(&mut self, identity: &JobIdentity) -> bool {
        match self.take_saved(identity) {
            Some(removed) => {
                self.hidden.remove(identity);
                for job in &removed {
                    self.hidden.remove(&job.identity());
                }
                true
            }
            None => false,
        }
    }

    /// Refuses to unhide an identity that is still saved.
    pub fn unhide(&mut self, identity: &JobIdentity) -> bool {
        if self.contains(identity) {
            log::warn!("not unhiding {}, it is still saved", identity);
            return false;
        }
        self.hidden.remove(identity)
    }

    pub fn mark_submitted(&mut self, identity: &JobIdentity) -> bool {
        let mut changed = false;
        for job in self.saved.iter_mut().filter(|job| identity.matches(&job.posting)) {
            if job.status.as_deref() != Some(SUBMITTED_STATUS) {
                job.status = Some(SUBMITTED_STATUS.to_owned());
                changed = true;
            }
        }
        changed
    }

    /// Overwrite statuses from authoritative records. The first record that
    /// describes a saved entry wins; unmatched entries keep their status and
    /// no entry is ever removed.
    pub fn reconcile_statuses(&mut self, applications: &[ApplicationRecord]) -> bool {
        let mut changed = false;
        for job in self.saved.iter_mut() {
            let hit = applications
                .iter()
                .find(|application| application.describes(&job.posting));
            if let Some(application) = hit {
                if job.status != application.status {
                    log::debug!(
                        "status of {} @ {}: {:?} -> {:?}",
                        job.posting.role,
                        job.posting.company_name,
                        job.status,
                        application.status
                    );
                    job.status = application.status.clone();
                    changed = true;
                }
            }
        }
        changed
    }

    pub fn contains(&self, identity: &JobIdentity) -> bool {
        self.saved.iter().any(|job| identity.matches(&job.posting))
    }

    pub fn find(&self, identity: &JobIdentity) -> Option<&SavedJob> {
        self.saved.iter().find(|job| identity.matches(&job.posting))
    }

    pub fn is_hidden(&self, posting: &JobPosting) -> bool {
        self.hidden.contains(&posting.identity())
    }

    pub fn is_consistent(&self) -> bool {
        self.saved
            .iter()
            .all(|job| self.hidden.contains(&job.identity()))
    }

    /// Hide every saved identity again, for states edited outside this crate.
    pub fn repair(&mut self) -> bool {
        let mut changed = false;
        for job in &self.saved {
            changed |= self.hidden.insert(job.identity());
        }
        changed
    }

    fn take_saved(&mut self, identity: &JobIdentity) -> Option<Vec<SavedJob>> {
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .saved
            .drain(..)
            .partition(|job| identity.matches(&job.posting));
        self.saved = kept;
        if removed.is_empty() {
            None
        } else {
            Some(removed)
        }
    }
}

/// Postings whose identity is not hidden, in listing order.
pub fn filter_discoverable(
    postings: impl IntoIterator<Item = JobPosting>,
    hidden: &BTreeSet<JobIdentity>,
) -> Vec<JobPosting> {
    postings
        .into_iter()
        .filter(|posting| !hidden.contains(&posting.identity()))
        .collect()
}
