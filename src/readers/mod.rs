//! Export-file readers
//!
//! A reader knows one bank export format: it can sniff a file header to
//! claim the file, and parse the content into transactions with stable,
//! content-derived ids. The registry probes readers in registration order,
//! so detection is deterministic; the first match wins.

pub mod generic_csv;

pub use generic_csv::CsvExportReader;

use crate::error::MoneyManagerResult;
use crate::models::Transaction;

/// Contract implemented by every export-file reader
pub trait Reader {
    /// Short name for reporting
    fn name(&self) -> &str;

    /// Whether this reader recognizes the file, judged from its header
    /// line. Operates on a byte slice, so probing cannot disturb the file.
    fn sniff(&self, header: &[u8]) -> bool;

    /// Parse the full file content into transactions
    fn read(&self, content: &[u8]) -> MoneyManagerResult<Vec<Transaction>>;
}

/// Ordered collection of registered readers
#[derive(Default)]
pub struct ReaderRegistry {
    readers: Vec<Box<dyn Reader>>,
}

impl ReaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in generic CSV readers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CsvExportReader::generic_semicolon()));
        registry.register(Box::new(CsvExportReader::generic()));
        registry
    }

    pub fn register(&mut self, reader: Box<dyn Reader>) {
        self.readers.push(reader);
    }

    /// First registered reader whose sniff accepts the file's header line
    pub fn detect(&self, content: &[u8]) -> Option<&dyn Reader> {
        let header = header_line(content);
        self.readers
            .iter()
            .find(|r| r.sniff(header))
            .map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }
}

/// First line of the file, capped so a binary blob cannot blow up sniffing
fn header_line(content: &[u8]) -> &[u8] {
    let end = content
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(content.len());
    &content[..end.min(512)]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedReader {
        name: &'static str,
        magic: &'static [u8],
    }

    impl Reader for FixedReader {
        fn name(&self) -> &str {
            self.name
        }
        fn sniff(&self, header: &[u8]) -> bool {
            header.starts_with(self.magic)
        }
        fn read(&self, _content: &[u8]) -> MoneyManagerResult<Vec<Transaction>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_first_registered_match_wins() {
        let mut registry = ReaderRegistry::new();
        registry.register(Box::new(FixedReader {
            name: "first",
            magic: b"AB",
        }));
        registry.register(Box::new(FixedReader {
            name: "second",
            magic: b"A",
        }));

        // both sniffs accept; registration order decides
        assert_eq!(registry.detect(b"ABC\nrest").unwrap().name(), "first");
        assert_eq!(registry.detect(b"AX\nrest").unwrap().name(), "second");
        assert!(registry.detect(b"ZZ").is_none());
    }

    #[test]
    fn test_sniff_sees_only_the_first_line() {
        let mut registry = ReaderRegistry::new();
        registry.register(Box::new(FixedReader {
            name: "r",
            magic: b"MAGIC",
        }));
        assert!(registry.detect(b"junk\nMAGIC").is_none());
    }

    #[test]
    fn test_default_registry_is_populated() {
        let registry = ReaderRegistry::with_defaults();
        assert_eq!(registry.len(), 2);
    }
}
