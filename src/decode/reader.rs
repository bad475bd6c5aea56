//! Reading a stream of records.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::io;
use super::error::DecodeError;
use super::source::{Pos, Source};
use super::value::Value;


//------------ RecordReader --------------------------------------------------

/// An iterator over the top-level values of a stream.
///
/// Each top-level value is a record. Records are produced strictly in
/// order. After the first error the iterator is fused since there is no
/// way to find the start of the next record in a broken stream.
pub struct RecordReader<R> {
    source: Source<R>,
    count: usize,
    failed: bool,
}

impl<R: io::Read> RecordReader<R> {
    /// Creates a record reader atop a reader.
    pub fn new(reader: R) -> Self {
        RecordReader {
            source: Source::new(reader),
            count: 0,
            failed: false,
        }
    }

    /// Returns the number of records read so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the position of the next record in the stream.
    pub fn pos(&self) -> Pos {
        self.source.pos()
    }
}

impl<R: io::Read> Iterator for RecordReader<R> {
    type Item = Result<Value, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None
        }
        match Value::take_opt_from(&mut self.source) {
            Ok(Some(value)) => {
                self.count += 1;
                Some(Ok(value))
            }
            Ok(None) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn several_records() {
        let data = b"\x30\x03\x80\x01\x01\x30\x80\x80\x01\x02\x00\x00";
        let mut reader = RecordReader::new(data.as_ref());
        assert!(reader.next().unwrap().is_ok());
        assert_eq!(reader.pos(), Pos::from(5));
        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().is_none());
        assert_eq!(reader.count(), 2);
    }

    #[test]
    fn broken_record() {
        let data = b"\x05\x00\x30\x05\x80\x01";
        let mut reader = RecordReader::new(data.as_ref());
        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
        assert_eq!(reader.count(), 1);
    }
}
