use std::fmt::Display;

use bson::Document as BsonDocument;
use failure::ResultExt;
use mongodb::options::ReplaceOptions;
use mongodb::options::UpdateOptions;
use mongodb::results::UpdateResult;
use mongodb::sync::ClientSession;
use mongodb::sync::Collection;
use opentracingrust::AutoFinishingSpan;
use opentracingrust::Span;
use opentracingrust::SpanContext;
use opentracingrust::StartOptions;
use opentracingrust::Tracer;

use super::metrics::MONGODB_OPS_COUNT;
use super::metrics::MONGODB_OPS_DURATION;
use super::metrics::MONGODB_OP_ERRORS_COUNT;
use crate::ErrorKind;
use crate::Result;

/// Perform a [`deleteOne`] operation.
///
/// [`deleteOne`]: https://docs.mongodb.com/manual/reference/method/db.collection.deleteOne/
pub fn delete_one(
    collection: Collection<BsonDocument>,
    filter: BsonDocument,
    session: Option<&mut ClientSession>,
    span: Option<SpanContext>,
    tracer: Option<&Tracer>,
) -> Result<()> {
    let mut span = start_span("deleteOne", &collection, &filter, span, tracer);
    MONGODB_OPS_COUNT.with_label_values(&["deleteOne"]).inc();
    let _timer = MONGODB_OPS_DURATION
        .with_label_values(&["deleteOne"])
        .start_timer();
    let result = match session {
        Some(session) => collection.delete_one_with_session(filter, None, session),
        None => collection.delete_one(filter, None),
    };
    result
        .map_err(|error| {
            MONGODB_OP_ERRORS_COUNT
                .with_label_values(&["deleteOne"])
                .inc();
            error
        })
        .with_context(|_| ErrorKind::MongoDBDeleteOne)
        .map_err(|error| fail_span(error, span.as_deref_mut()))?;
    Ok(())
}

/// Perform a [`findOne`] operation.
///
/// # Return
///
///  * `Err(error)` if the operation failed.
///  * `Ok(None)` if the operation suceeded but no document is returned.
///  * `Ok(Some(document))` if the operation succeeded and `document` was found.
///
/// [`findOne`]: https://docs.mongodb.com/manual/reference/method/db.collection.findOne/
pub fn find_one(
    collection: Collection<BsonDocument>,
    filter: BsonDocument,
    session: Option<&mut ClientSession>,
    span: Option<SpanContext>,
    tracer: Option<&Tracer>,
) -> Result<Option<BsonDocument>> {
    let mut span = start_span("findOne", &collection, &filter, span, tracer);
    MONGODB_OPS_COUNT.with_label_values(&["findOne"]).inc();
    let timer = MONGODB_OPS_DURATION
        .with_label_values(&["findOne"])
        .start_timer();
    let result = match session {
        Some(session) => collection.find_one_with_session(filter, None, session),
        None => collection.find_one(filter, None),
    };
    let document = result
        .map_err(|error| {
            MONGODB_OP_ERRORS_COUNT
                .with_label_values(&["findOne"])
                .inc();
            error
        })
        .with_context(|_| ErrorKind::MongoDBFindOne)
        .map_err(|error| fail_span(error, span.as_deref_mut()))?;
    timer.observe_duration();
    Ok(document)
}

/// Perform an upserted [`replaceOne`] operation.
///
/// [`replaceOne`]: https://docs.mongodb.com/manual/reference/method/db.collection.replaceOne/
pub fn replace_one(
    collection: Collection<BsonDocument>,
    filter: BsonDocument,
    document: BsonDocument,
    session: Option<&mut ClientSession>,
    span: Option<SpanContext>,
    tracer: Option<&Tracer>,
) -> Result<()> {
    let mut options = ReplaceOptions::default();
    options.upsert = Some(true);
    let mut span = start_span("replaceOne", &collection, &filter, span, tracer);
    if let Some(span) = span.as_deref_mut() {
        span.tag("update", encode_for_tag(&document));
    }
    MONGODB_OPS_COUNT.with_label_values(&["replaceOne"]).inc();
    let _timer = MONGODB_OPS_DURATION
        .with_label_values(&["replaceOne"])
        .start_timer();
    let result = match session {
        Some(session) => {
            collection.replace_one_with_session(filter, document, Some(options), session)
        }
        None => collection.replace_one(filter, document, Some(options)),
    };
    result
        .map_err(|error| {
            MONGODB_OP_ERRORS_COUNT
                .with_label_values(&["replaceOne"])
                .inc();
            error
        })
        .with_context(|_| ErrorKind::MongoDBReplaceOne)
        .map_err(|error| fail_span(error, span.as_deref_mut()))?;
    Ok(())
}

/// Perform an [`updateOne`] operation.
///
/// When `upsert` is false the update does not create missing documents:
/// callers can inspect the returned `UpdateResult` to detect them.
///
/// [`updateOne`]: https://docs.mongodb.com/manual/reference/method/db.collection.updateOne/
pub fn update_one(
    collection: Collection<BsonDocument>,
    filter: BsonDocument,
    update: BsonDocument,
    upsert: bool,
    session: Option<&mut ClientSession>,
    span: Option<SpanContext>,
    tracer: Option<&Tracer>,
) -> Result<UpdateResult> {
    let mut options = UpdateOptions::default();
    options.upsert = Some(upsert);
    let mut span = start_span("updateOne", &collection, &filter, span, tracer);
    if let Some(span) = span.as_deref_mut() {
        span.tag("update", encode_for_tag(&update));
    }
    MONGODB_OPS_COUNT.with_label_values(&["updateOne"]).inc();
    let timer = MONGODB_OPS_DURATION
        .with_label_values(&["updateOne"])
        .start_timer();
    let result = match session {
        Some(session) => collection.update_one_with_session(filter, update, Some(options), session),
        None => collection.update_one(filter, update, Some(options)),
    };
    let result = result
        .map_err(|error| {
            MONGODB_OP_ERRORS_COUNT
                .with_label_values(&["updateOne"])
                .inc();
            error
        })
        .with_context(|_| ErrorKind::MongoDBUpdateOne)
        .map_err(|error| fail_span(error, span.as_deref_mut()))?;
    timer.observe_duration();
    Ok(result)
}

fn encode_for_tag(document: &BsonDocument) -> String {
    serde_json::to_string(document).unwrap_or_else(|_| "<unable to encode document>".into())
}

/// Mark a span as failed with the given error, if a span is active.
fn fail_span<E: Display>(error: E, span: Option<&mut Span>) -> E {
    if let Some(span) = span {
        span.tag("error", true);
        span.tag("error.message", error.to_string());
    }
    error
}

/// Start a child span for a MongoDB operation if a tracer and a parent context are available.
fn start_span(
    operation: &str,
    collection: &Collection<BsonDocument>,
    filter: &BsonDocument,
    span: Option<SpanContext>,
    tracer: Option<&Tracer>,
) -> Option<AutoFinishingSpan> {
    match (tracer, span) {
        (Some(tracer), Some(context)) => {
            let options = StartOptions::default().child_of(context);
            let name = format!("store.mongodb.{}", operation);
            let mut span = tracer.span_with_options(&name, options);
            let namespace = collection.namespace();
            let namespace = format!("{}.{}", namespace.db, namespace.coll);
            span.tag("namespace", namespace);
            span.tag("filter", encode_for_tag(filter));
            Some(span.auto_finish())
        }
        _ => None,
    }
}
