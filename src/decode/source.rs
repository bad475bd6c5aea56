//! The source for decoding data.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{fmt, io};
use std::io::Read;
use bytes::Bytes;
use super::error::{ContentError, DecodeError};


//------------ Source --------------------------------------------------------

/// A forward-only source of encoded octets.
///
/// The source wraps a reader and keeps track of the number of octets
/// consumed so far so that errors can point to where things went wrong. It
/// can look ahead a single octet which is all that is necessary to find
/// the end of a stream of values.
pub struct Source<R> {
    /// The underlying reader.
    reader: R,

    /// The position of the next octet.
    pos: Pos,

    /// An octet that has been read but not consumed.
    peeked: Option<u8>,
}

impl<R: io::Read> Source<R> {
    /// Creates a new source atop a reader.
    pub fn new(reader: R) -> Self {
        Source { reader, pos: Pos(0), peeked: None }
    }

    /// Returns the position of the next octet.
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Returns a content error at the current position of the source.
    pub fn content_err(
        &self, err: impl Into<ContentError>
    ) -> DecodeError {
        DecodeError::content(err.into(), self.pos)
    }

    /// Returns the next octet without consuming it.
    ///
    /// Returns `Ok(None)` if the reader is at its end.
    pub fn peek_opt_u8(&mut self) -> Result<Option<u8>, DecodeError> {
        if self.peeked.is_none() {
            self.peeked = self.read_u8()?;
        }
        Ok(self.peeked)
    }

    /// Returns whether there are no more octets available.
    pub fn is_exhausted(&mut self) -> Result<bool, DecodeError> {
        self.peek_opt_u8().map(|octet| octet.is_none())
    }

    /// Takes an optional octet from the source.
    ///
    /// If there aren’t any more octets available from the source, returns
    /// `Ok(None)`.
    pub fn take_opt_u8(&mut self) -> Result<Option<u8>, DecodeError> {
        let res = match self.peeked.take() {
            Some(octet) => Some(octet),
            None => self.read_u8()?,
        };
        if res.is_some() {
            self.pos.advance(1);
        }
        Ok(res)
    }

    /// Takes a single octet from the source.
    ///
    /// If there aren’t any more octets available from the source, returns
    /// a content error.
    pub fn take_u8(&mut self) -> Result<u8, DecodeError> {
        match self.take_opt_u8()? {
            Some(octet) => Ok(octet),
            None => Err(self.content_err("unexpected end of data"))
        }
    }

    /// Takes exactly `len` octets from the source.
    ///
    /// The octets are read incrementally so that a bogus length does not
    /// cause a huge allocation up front. If the source ends early, returns
    /// a content error.
    pub fn take_bytes(&mut self, len: usize) -> Result<Bytes, DecodeError> {
        let start = self.pos;
        let mut res = Vec::new();
        let mut remaining = len;
        if remaining > 0 {
            if let Some(octet) = self.peeked.take() {
                res.push(octet);
                remaining -= 1;
            }
        }
        let limit = u64::try_from(remaining).unwrap_or(u64::MAX);
        (&mut self.reader).take(limit).read_to_end(&mut res)?;
        self.pos.advance(res.len());
        if res.len() < len {
            return Err(DecodeError::content(
                ContentError::from_static("unexpected end of data"), start
            ))
        }
        Ok(res.into())
    }

    /// Reads a single octet from the reader, retrying if interrupted.
    fn read_u8(&mut self) -> Result<Option<u8>, io::Error> {
        let mut buf = [0u8];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => { }
                Err(err) => return Err(err)
            }
        }
    }
}


//------------ Pos -----------------------------------------------------------

/// The logical position within a source.
///
/// Values of this type are the number of octets consumed before a given
/// point. They are only used for diagnostics.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl Pos {
    fn advance(&mut self, len: usize) {
        self.0 = self.0.saturating_add(len)
    }

    /// Returns the position as the number of preceding octets.
    pub fn offset(self) -> usize {
        self.0
    }
}

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn take_and_peek() {
        let mut source = Source::new(b"\x01\x02\x03\x04".as_ref());
        assert_eq!(source.peek_opt_u8().unwrap(), Some(1));
        assert_eq!(source.pos(), Pos(0));
        assert_eq!(source.take_u8().unwrap(), 1);
        assert_eq!(source.pos(), Pos(1));
        assert_eq!(source.peek_opt_u8().unwrap(), Some(2));
        assert_eq!(source.take_bytes(2).unwrap().as_ref(), b"\x02\x03");
        assert_eq!(source.pos(), Pos(3));
        assert!(!source.is_exhausted().unwrap());
        assert_eq!(source.take_opt_u8().unwrap(), Some(4));
        assert!(source.is_exhausted().unwrap());
        assert_eq!(source.take_opt_u8().unwrap(), None);
        assert!(source.take_u8().is_err());
    }

    #[test]
    fn short_bytes() {
        let mut source = Source::new(b"\x01\x02".as_ref());
        let err = source.take_bytes(3).unwrap_err();
        assert_eq!(err.pos(), Some(Pos(0)));
        assert!(source.take_bytes(0).unwrap().is_empty());
    }
}
