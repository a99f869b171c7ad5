use async_trait::async_trait;
use job_tracking::KeyValue;
use mongodb::bson::doc;
use mongodb::options::ReplaceOptions;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const TRACKING_COLLECTION: &str = "job-tracking";

#[derive(Serialize, Deserialize, Debug)]
struct Entry {
    #[serde(rename = "_id")]
    key: String,
    value: String,
}

/// Key/value pairs stored as `{ _id: key, value }` documents.
#[derive(Debug)]
pub struct MongoKeyValue {
    collection: Collection<Entry>,
}

impl MongoKeyValue {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Entry>(collection_name),
        }
    }
}

pub async fn connect(mongodb_connection_url: &str, database_name: &str) -> Result<Database> {
    let client = mongodb::Client::with_uri_str(mongodb_connection_url).await?;
    log::info!("Connected to database {}", database_name);
    Ok(client.database(database_name))
}

#[async_trait]
impl KeyValue for MongoKeyValue {
    type E = Error;

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = self.collection.find_one(doc! { "_id": key }, None).await?;
        Ok(entry.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let entry = Entry {
            key: key.to_owned(),
            value: value.to_owned(),
        };
        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection
            .replace_one(doc! { "_id": key }, &entry, options)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let result = self.collection.delete_one(doc! { "_id": key }, None).await?;
        log::debug!("deleted {} document(s) for {}", result.deleted_count, key);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use job_tracking::{JobPosting, JobTrackingState, KeyedStore, Store};

    #[tokio::test]
    #[ignore = "needs MONGODB_CONNECTION_URL pointing at a running server"]
    async fn test_tracking_state_round_trip_through_mongo() {
        let url = std::env::var("MONGODB_CONNECTION_URL").expect("MONGODB_CONNECTION_URL not set");
        let db = connect(&url, "job-tracking-test").await.expect("Failed to connect");
        let store = KeyedStore::new(MongoKeyValue::new(&db, TRACKING_COLLECTION));
        let mut state = JobTrackingState::default();
        state.save(JobPosting::new("Acme", "Intern").with_job_id(1));
        store.persist("ana", &state).await.expect("Persist failed");
        assert_eq!(store.load("ana").await.expect("Load failed"), state);
        store.key_value().remove("savedJobs_ana").await.unwrap();
        store.key_value().remove("hiddenJobs_ana").await.unwrap();
    }
}
