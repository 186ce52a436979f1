use crate::domain::transfer::TransferRequest;
use crate::error::{LedgerError, Result};
use std::io::Read;

/// Reads transfer requests (`from, to, amount`) from a CSV source.
///
/// Whitespace around fields is trimmed. Each row deserializes independently, so
/// one malformed row does not stop the rest of the stream.
pub struct TransferReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> TransferReader<R> {
    /// Creates a new `TransferReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes requests.
    pub fn requests(self) -> impl Iterator<Item = Result<TransferRequest>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
