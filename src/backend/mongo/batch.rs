use failure::ResultExt;
use mongodb::sync::Client;
use opentracingrust::SpanContext;
use slog::debug;
use slog::warn;
use slog::Logger;

use super::super::BatchInterface;
use super::document::Document;
use crate::store::batch::Write;
use crate::ErrorKind;
use crate::Result;

/// Batch commits implementation using MongoDB multi-document transactions.
pub struct Batch {
    client: Client,
    document: Document,
    logger: Logger,
}

impl Batch {
    pub fn new(client: Client, document: Document, logger: Logger) -> Batch {
        Batch {
            client,
            document,
            logger,
        }
    }
}

impl BatchInterface for Batch {
    fn commit(&mut self, writes: Vec<Write>, span: Option<SpanContext>) -> Result<()> {
        if writes.is_empty() {
            return Ok(());
        }
        let mut session = self
            .client
            .start_session(None)
            .with_context(|_| ErrorKind::MongoDBSession)?;
        session
            .start_transaction(None)
            .with_context(|_| ErrorKind::MongoDBTransaction("start"))?;

        let count = writes.len();
        for write in writes {
            let path = write.path().to_string();
            if let Err(error) = self.document.write(write, Some(&mut session), span.clone()) {
                if let Err(abort) = session.abort_transaction() {
                    warn!(
                        self.logger, "Failed to abort batch transaction";
                        "document" => &path, "error" => %abort
                    );
                }
                debug!(
                    self.logger, "Batch aborted because a write failed";
                    "document" => path, "error" => %error
                );
                return Err(error);
            }
        }

        session
            .commit_transaction()
            .with_context(|_| ErrorKind::MongoDBTransaction("commit"))?;
        debug!(self.logger, "Batch committed"; "writes" => count);
        Ok(())
    }
}
