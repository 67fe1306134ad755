//! MongoDB-backed tour store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, DateTime as BsonDateTime};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::StoreError;

use super::store::{StoreResult, TourStore};
use super::types::{DurationUnit, RecordId, Tour};

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Name of the unique index on `tour_id`.
const TOUR_ID_INDEX: &str = "tour_id_unique";

/// Stored document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TourDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    tour_id: i64,
    title: String,
    description: String,
    pick_up: String,
    meeting_point: String,
    drop_off: String,
    duration: i64,
    duration_unit: DurationUnit,
    #[serde(rename = "createdAt")]
    created_at: BsonDateTime,
    #[serde(rename = "updatedAt")]
    updated_at: BsonDateTime,
}

impl From<&Tour> for TourDocument {
    fn from(tour: &Tour) -> Self {
        Self {
            id: tour.id.object_id(),
            tour_id: tour.tour_id,
            title: tour.title.clone(),
            description: tour.description.clone(),
            pick_up: tour.pick_up.clone(),
            meeting_point: tour.meeting_point.clone(),
            drop_off: tour.drop_off.clone(),
            duration: tour.duration,
            duration_unit: tour.duration_unit,
            created_at: to_bson_datetime(tour.created_at),
            updated_at: to_bson_datetime(tour.updated_at),
        }
    }
}

impl From<TourDocument> for Tour {
    fn from(doc: TourDocument) -> Self {
        Self {
            id: RecordId::from(doc.id),
            tour_id: doc.tour_id,
            title: doc.title,
            description: doc.description,
            pick_up: doc.pick_up,
            meeting_point: doc.meeting_point,
            drop_off: doc.drop_off,
            duration: doc.duration,
            duration_unit: doc.duration_unit,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

/// BSON datetimes carry millisecond precision.
fn to_bson_datetime(at: OffsetDateTime) -> BsonDateTime {
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    BsonDateTime::from_millis(millis as i64)
}

fn from_bson_datetime(at: BsonDateTime) -> OffsetDateTime {
    let nanos = i128::from(at.timestamp_millis()) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

/// Tour store over a single MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoTourStore {
    client: Client,
    database: String,
    collection: Collection<TourDocument>,
}

impl MongoTourStore {
    /// Connect, verify the server answers, and ensure indexes exist.
    #[instrument(skip(uri))]
    pub async fn connect(uri: &str, database: &str, collection: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let store = Self {
            collection: client.database(database).collection(collection),
            database: database.to_string(),
            client,
        };

        store.ping().await?;
        store.ensure_indexes().await?;
        info!(database, collection, "Connected to MongoDB");

        Ok(store)
    }

    /// Connect using the values from [`Config`].
    pub async fn from_config(config: &Config) -> StoreResult<Self> {
        let uri = config
            .mongo_uri
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("MONGO_URI is not set".to_string()))?;
        Self::connect(uri, &config.mongo_database, &config.mongo_collection).await
    }

    /// Create the unique `tour_id` index if missing.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "tour_id": 1 })
            .options(
                IndexOptions::builder()
                    .name(TOUR_ID_INDEX.to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.collection.create_index(index).await?;
        debug!(index = TOUR_ID_INDEX, "Index ensured");
        Ok(())
    }

    /// Remove every tour. Intended for test setup.
    pub async fn clear(&self) -> StoreResult<()> {
        self.collection.delete_many(doc! {}).await?;
        Ok(())
    }
}

#[async_trait]
impl TourStore for MongoTourStore {
    #[instrument(skip(self))]
    async fn list(&self) -> StoreResult<Vec<Tour>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": 1, "_id": 1 })
            .await?;
        let docs: Vec<TourDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Tour::from).collect())
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn find(&self, id: &RecordId) -> StoreResult<Option<Tour>> {
        let found = self
            .collection
            .find_one(doc! { "_id": id.object_id() })
            .await?;
        Ok(found.map(Tour::from))
    }

    #[instrument(skip_all, fields(tour_id = tour.tour_id))]
    async fn insert(&self, tour: &Tour) -> StoreResult<()> {
        match self.collection.insert_one(TourDocument::from(tour)).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::DuplicateTourId(tour.tour_id)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip_all, fields(id = %tour.id))]
    async fn replace(&self, tour: &Tour) -> StoreResult<bool> {
        let result = self
            .collection
            .replace_one(doc! { "_id": tour.id.object_id() }, TourDocument::from(tour))
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn delete(&self, id: &RecordId) -> StoreResult<Option<Tour>> {
        let removed = self
            .collection
            .find_one_and_delete(doc! { "_id": id.object_id() })
            .await?;
        Ok(removed.map(Tour::from))
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "mongo"
    }
}
