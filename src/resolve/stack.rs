//! The tag stack.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use smallvec::SmallVec;
use super::error::{ErrorKind, ResolveError};


/// The depth limit, see [`TagStack::LIMIT`].
const DEPTH_LIMIT: usize = 32;


//------------ TagStack ------------------------------------------------------

/// The tags of all wrappers between the root and the current value.
///
/// The stack is bounded. Trying to go deeper than [`TagStack::LIMIT`] or
/// popping from an empty stack results in a
/// [`DecodeBounds`](ErrorKind::DecodeBounds) error.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TagStack {
    tags: SmallVec<[u32; DEPTH_LIMIT]>,
}

impl TagStack {
    /// The maximum number of tags on the stack.
    pub const LIMIT: usize = DEPTH_LIMIT;

    /// Creates a new, empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a tag onto the stack.
    pub fn push(&mut self, tag: u32) -> Result<(), ResolveError> {
        if self.tags.len() >= Self::LIMIT {
            return Err(ResolveError::new(
                ErrorKind::DecodeBounds, self,
                format!(
                    "tag [{}] exceeds the maximum depth of {}", tag, Self::LIMIT
                )
            ))
        }
        self.tags.push(tag);
        Ok(())
    }

    /// Pops the topmost tag off the stack.
    pub fn pop(&mut self) -> Result<u32, ResolveError> {
        self.tags.pop().ok_or_else(|| {
            ResolveError::new(
                ErrorKind::DecodeBounds, self, "pop from empty tag stack"
            )
        })
    }

    /// Returns the topmost tag.
    pub fn peek(&self) -> Option<u32> {
        self.tags.last().copied()
    }

    /// Returns the number of tags on the stack.
    pub fn depth(&self) -> usize {
        self.tags.len()
    }

    /// Returns whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Returns the tags from the bottom of the stack.
    pub fn as_slice(&self) -> &[u32] {
        self.tags.as_slice()
    }
}

impl fmt::Display for TagStack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.tags.is_empty() {
            return f.write_str("/")
        }
        for tag in &self.tags {
            write!(f, "/{}", tag)?;
        }
        Ok(())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn push_pop_peek() {
        let mut stack = TagStack::new();
        assert_eq!(stack.peek(), None);
        assert_eq!(stack.to_string(), "/");
        stack.push(110).unwrap();
        stack.push(0).unwrap();
        stack.push(3).unwrap();
        assert_eq!(stack.to_string(), "/110/0/3");
        assert_eq!(stack.peek(), Some(3));
        assert_eq!(stack.depth(), 3);
        assert_eq!(stack.pop().unwrap(), 3);
        assert_eq!(stack.as_slice(), &[110, 0]);
    }

    #[test]
    fn bounds() {
        let mut stack = TagStack::new();
        for i in 0..TagStack::LIMIT {
            stack.push(i as u32).unwrap();
        }
        let err = stack.push(99).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeBounds);
        assert_eq!(stack.depth(), TagStack::LIMIT);

        let mut stack = TagStack::new();
        let err = stack.pop().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeBounds);
        assert_eq!(err.path(), "/");
    }
}
