//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt, io};
use std::borrow::Cow;
use super::source::Pos;


//------------ ContentError --------------------------------------------------

/// An error happened while interpreting encoded data.
///
/// This is the error produced when the octets of a stream do not form
/// valid BER. It only carries a message; the position is added when the
/// error is turned into a [`DecodeError`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContentError {
    message: Cow<'static, str>,
}

impl ContentError {
    /// Creates a content error from a static str.
    pub const fn from_static(msg: &'static str) -> Self {
        ContentError { message: Cow::Borrowed(msg) }
    }

    /// Creates a content error from an owned string.
    pub fn from_string(msg: String) -> Self {
        ContentError { message: Cow::Owned(msg) }
    }
}

impl From<&'static str> for ContentError {
    fn from(msg: &'static str) -> Self {
        Self::from_static(msg)
    }
}

impl From<String> for ContentError {
    fn from(msg: String) -> Self {
        Self::from_string(msg)
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl error::Error for ContentError { }


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding a stream of values.
///
/// Either the underlying reader failed or the data it produced was not
/// correctly encoded. In the latter case, the error knows the position in
/// the stream where the problem was detected.
#[derive(Debug)]
pub struct DecodeError {
    inner: DecodeErrorKind,
}

#[derive(Debug)]
enum DecodeErrorKind {
    Source(io::Error),
    Content {
        error: ContentError,
        pos: Pos,
    }
}

impl DecodeError {
    /// Creates a decode error from a content error and a position.
    pub fn content(error: impl Into<ContentError>, pos: Pos) -> Self {
        DecodeError {
            inner: DecodeErrorKind::Content { error: error.into(), pos }
        }
    }

    /// Returns whether the error was caused by malformed data.
    pub fn is_content(&self) -> bool {
        matches!(self.inner, DecodeErrorKind::Content { .. })
    }

    /// Returns the position of a content error.
    pub fn pos(&self) -> Option<Pos> {
        match self.inner {
            DecodeErrorKind::Content { pos, .. } => Some(pos),
            DecodeErrorKind::Source(_) => None,
        }
    }
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        DecodeError { inner: DecodeErrorKind::Source(err) }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.inner {
            DecodeErrorKind::Source(ref err) => fmt::Display::fmt(err, f),
            DecodeErrorKind::Content { ref error, pos } => {
                write!(f, "{} (at position {})", error, pos)
            }
        }
    }
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.inner {
            DecodeErrorKind::Source(ref err) => Some(err),
            DecodeErrorKind::Content { ref error, .. } => Some(error),
        }
    }
}
