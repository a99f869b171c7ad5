pub mod backend;
pub mod deck;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
pub mod tracker;

pub use backend::Backend;
pub use deck::{DeckFilter, DiscoveryDeck};
pub use error::{BackendError, Result, StoreError, TrackingError};
pub use models::{ApplicationRecord, JobIdentity, JobPosting, SavedJob, WithdrawRequest};
pub use state::{filter_discoverable, JobTrackingState};
pub use store::{KeyValue, KeyedStore, MemoryKeyValue, Store, Subscription};
pub use tracker::JobTracker;
