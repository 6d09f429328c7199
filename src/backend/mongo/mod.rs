use std::sync::Arc;

use failure::ResultExt;
use mongodb::sync::Client;
use opentracingrust::Tracer;
use slog::info;
use slog::Logger;

use super::BatchImpl;
use super::CollectionImpl;
use super::CollectionInterface;
use super::DocumentImpl;
use super::StoreInterface;
use crate::config::MongoDBConfig;
use crate::store::collection::CollectionAttributes;
use crate::ErrorKind;
use crate::Result;

mod batch;
mod constants;
mod document;
mod encode;
mod metrics;
mod operations;

pub use self::metrics::register_metrics;

/// Document store implementation using MongoDB.
///
/// # Layout
///
///   * Each store collection is a MongoDB collection named after the full collection path.
///   * Each store document is a MongoDB document with the document ID as `_id`
///     and the document value as `data`.
///
/// # Requirements
///
///   * Batches are committed in multi-document transactions so MongoDB must run
///     as a replica set (or sharded cluster).
pub struct Store {
    client: Client,
    db: String,
    logger: Logger,
    tracer: Option<Arc<Tracer>>,
}

impl Store {
    /// Create a mongodb-backed document store interface.
    pub fn make<T>(config: MongoDBConfig, logger: Logger, tracer: T) -> Result<Store>
    where
        T: Into<Option<Arc<Tracer>>>,
    {
        info!(logger, "Initialising document store backed by MongoDB"; "db" => &config.db);
        let db = config.db.clone();
        let client = Client::with_uri_str(&config.uri)
            .with_context(|_| ErrorKind::MongoDBConnect(config.uri.clone()))?;
        let tracer = tracer.into();
        Ok(Store {
            client,
            db,
            logger,
            tracer,
        })
    }
}

impl StoreInterface for Store {
    fn batch(&self) -> BatchImpl {
        let document = self::document::Document::new(
            self.client.clone(),
            self.db.clone(),
            self.tracer.clone(),
        );
        let batch = self::batch::Batch::new(self.client.clone(), document, self.logger.clone());
        BatchImpl::new(batch)
    }

    fn collection(&self) -> CollectionImpl {
        CollectionImpl::new(Collection {})
    }

    fn document(&self) -> DocumentImpl {
        let document = self::document::Document::new(
            self.client.clone(),
            self.db.clone(),
            self.tracer.clone(),
        );
        DocumentImpl::new(document)
    }
}

/// MongoDB creates collections on first write so there is nothing to prepare.
struct Collection {}

impl CollectionInterface for Collection {
    fn open(&self, _: &CollectionAttributes) {}
}
