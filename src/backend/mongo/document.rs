use std::sync::Arc;

use bson::Document as BsonDocument;
use mongodb::sync::Client;
use mongodb::sync::ClientSession;
use mongodb::sync::Collection;
use opentracingrust::SpanContext;
use opentracingrust::Tracer;
use serde_json::Value;

use super::super::DocumentInterface;
use super::encode;
use super::operations;
use crate::field_path::Patch;
use crate::path::Path;
use crate::store::batch::Write;
use crate::store::document::DocumentAttributes;
use crate::ErrorKind;
use crate::Result;

/// Document operations implementation using MongoDB.
pub struct Document {
    client: Client,
    db: String,
    tracer: Option<Arc<Tracer>>,
}

impl Document {
    pub fn new<T>(client: Client, db: String, tracer: T) -> Document
    where
        T: Into<Option<Arc<Tracer>>>,
    {
        let tracer = tracer.into();
        Document { client, db, tracer }
    }

    /// Apply a write, optionally as part of the transaction open on `session`.
    pub fn write(
        &self,
        write: Write,
        session: Option<&mut ClientSession>,
        span: Option<SpanContext>,
    ) -> Result<()> {
        match write {
            Write::Merge { path, value } => self.merge_value(&path, &value, session, span),
            Write::Set { path, value } => self.set_value(&path, &value, session, span),
            Write::Update { path, patches } => self.apply_patches(&path, patches, session, span),
        }
    }

    fn apply_patches(
        &self,
        path: &Path,
        patches: Vec<Patch>,
        session: Option<&mut ClientSession>,
        span: Option<SpanContext>,
    ) -> Result<()> {
        let filter = encode::id_filter(path);
        let update = match encode::patches_update(path, patches)? {
            Some(update) => update,
            None => {
                // Nothing to change but updates still require the document to exist.
                let collection = self.collection(path);
                let document =
                    operations::find_one(collection, filter, session, span, self.tracer())?;
                if document.is_none() {
                    return Err(ErrorKind::DocumentNotFound(path.to_string()).into());
                }
                return Ok(());
            }
        };
        let collection = self.collection(path);
        let result = operations::update_one(
            collection,
            filter,
            update,
            false,
            session,
            span,
            self.tracer(),
        )?;
        if result.matched_count == 0 {
            return Err(ErrorKind::DocumentNotFound(path.to_string()).into());
        }
        Ok(())
    }

    fn collection(&self, path: &Path) -> Collection<BsonDocument> {
        let name = encode::collection_name(path);
        self.client.database(&self.db).collection(&name)
    }

    fn merge_value(
        &self,
        path: &Path,
        value: &Value,
        session: Option<&mut ClientSession>,
        span: Option<SpanContext>,
    ) -> Result<()> {
        let filter = encode::id_filter(path);
        let update = encode::merge_update(path, value)?;
        let collection = self.collection(path);
        operations::update_one(
            collection,
            filter,
            update,
            true,
            session,
            span,
            self.tracer(),
        )?;
        Ok(())
    }

    fn set_value(
        &self,
        path: &Path,
        value: &Value,
        session: Option<&mut ClientSession>,
        span: Option<SpanContext>,
    ) -> Result<()> {
        let filter = encode::id_filter(path);
        let document = encode::replacement(path, value)?;
        let collection = self.collection(path);
        operations::replace_one(collection, filter, document, session, span, self.tracer())
    }

    fn tracer(&self) -> Option<&Tracer> {
        self.tracer.as_deref()
    }
}

impl DocumentInterface for Document {
    fn delete(&self, attrs: &DocumentAttributes, span: Option<SpanContext>) -> Result<()> {
        let filter = encode::id_filter(&attrs.path);
        let collection = self.collection(&attrs.path);
        operations::delete_one(collection, filter, None, span, self.tracer())
    }

    fn get(&self, attrs: &DocumentAttributes, span: Option<SpanContext>) -> Result<Option<Value>> {
        let filter = encode::id_filter(&attrs.path);
        let collection = self.collection(&attrs.path);
        let document = operations::find_one(collection, filter, None, span, self.tracer())?;
        match document {
            None => Ok(None),
            Some(document) => encode::decode_document(&attrs.path, document),
        }
    }

    fn merge(
        &self,
        attrs: &DocumentAttributes,
        value: Value,
        span: Option<SpanContext>,
    ) -> Result<()> {
        self.merge_value(&attrs.path, &value, None, span)
    }

    fn open(&self, _: &DocumentAttributes) {}

    fn set(&self, attrs: &DocumentAttributes, value: Value, span: Option<SpanContext>) -> Result<()> {
        self.set_value(&attrs.path, &value, None, span)
    }

    fn update(
        &self,
        attrs: &DocumentAttributes,
        patches: Vec<Patch>,
        span: Option<SpanContext>,
    ) -> Result<()> {
        self.apply_patches(&attrs.path, patches, None, span)
    }
}
