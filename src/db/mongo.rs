//! MongoDB client and collection wrapper
//!
//! [`LazyCollection`] owns the connection: the first caller connects and
//! applies indexes, concurrent callers wait for that attempt and reuse it.
//! An established connection is never replaced.

use bson::{doc, oid::ObjectId, Document};
use futures_util::TryStreamExt;
use mongodb::{options::IndexOptions, Client, Collection, IndexModel};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::types::PledgeError;

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Create a new MongoDB client and verify it with a ping
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, PledgeError> {
        info!("Connecting to MongoDB database '{}'", db_name);

        // Use serverSelectionTimeoutMS to avoid hanging on unreachable MongoDB
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri).await.map_err(|e| {
            PledgeError::StoreUnavailable(format!("Failed to connect to MongoDB: {}", e))
        })?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| PledgeError::StoreUnavailable(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Get a typed collection with its schema indexes applied
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>, PledgeError>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }
}

/// Typed MongoDB collection with automatic indexing
#[derive(Debug)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

// Collection is a cheap handle; no `T: Clone` needed
impl<T> Clone for MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
{
    /// Create a new collection and apply indexes
    pub async fn new(
        client: &Client,
        db_name: &str,
        collection_name: &str,
    ) -> Result<Self, PledgeError> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    /// Apply schema-defined indexes
    async fn apply_indexes(&self) -> Result<(), PledgeError> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner.create_indexes(indices).await.map_err(|e| {
            PledgeError::StoreUnavailable(format!("Failed to create indexes: {}", e))
        })?;

        Ok(())
    }

    /// Insert a document, returning its id
    pub async fn insert_one(&self, item: T) -> Result<ObjectId, PledgeError> {
        let result = self
            .inner
            .insert_one(item)
            .await
            .map_err(|e| PledgeError::StoreUnavailable(format!("Insert failed: {}", e)))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| PledgeError::Internal("Failed to get inserted ID".into()))
    }

    /// Find documents as a projected shape `P`, sorted and limited
    pub async fn find_projected<P>(
        &self,
        filter: Document,
        projection: Document,
        sort: Document,
        limit: i64,
    ) -> Result<Vec<P>, PledgeError>
    where
        P: DeserializeOwned + Unpin + Send + Sync,
    {
        let cursor = self
            .inner
            .clone_with_type::<P>()
            .find(filter)
            .projection(projection)
            .sort(sort)
            .limit(limit)
            .await
            .map_err(|e| PledgeError::StoreUnavailable(format!("Find failed: {}", e)))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| PledgeError::StoreUnavailable(format!("Cursor read failed: {}", e)))
    }

    /// Count documents matching a filter
    pub async fn count(&self, filter: Document) -> Result<u64, PledgeError> {
        self.inner
            .count_documents(filter)
            .await
            .map_err(|e| PledgeError::StoreUnavailable(format!("Count failed: {}", e)))
    }
}

/// Lazily connected typed collection.
///
/// Holds only connection parameters until first use. A failed attempt
/// leaves the handle empty so the next caller tries again.
pub struct LazyCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    uri: String,
    db_name: String,
    collection_name: String,
    /// The collection once connected
    collection: RwLock<Option<MongoCollection<T>>>,
    /// Lock to prevent concurrent connection attempts
    connecting: Mutex<()>,
}

impl<T> LazyCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
{
    pub fn new(uri: &str, db_name: &str, collection_name: &str) -> Self {
        Self {
            uri: uri.to_string(),
            db_name: db_name.to_string(),
            collection_name: collection_name.to_string(),
            collection: RwLock::new(None),
            connecting: Mutex::new(()),
        }
    }

    /// Get the collection, connecting on first use
    pub async fn get(&self) -> Result<MongoCollection<T>, PledgeError> {
        // Fast path: already connected
        if let Some(ref c) = *self.collection.read().await {
            return Ok(c.clone());
        }

        // Slow path: only one caller connects
        let _lock = self.connecting.lock().await;

        // Double-check after acquiring lock
        if let Some(ref c) = *self.collection.read().await {
            return Ok(c.clone());
        }

        debug!(
            db = %self.db_name,
            collection = %self.collection_name,
            "Establishing MongoDB collection handle"
        );
        let client = MongoClient::new(&self.uri, &self.db_name).await?;
        let collection = client.collection::<T>(&self.collection_name).await?;

        *self.collection.write().await = Some(collection.clone());
        Ok(collection)
    }

    pub async fn is_connected(&self) -> bool {
        self.collection.read().await.is_some()
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }
}
