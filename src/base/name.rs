//! Host names.
//!
//! On the wire a host name is a sequence of labels, each prefixed by its
//! length in a single octet and the whole sequence terminated by a label
//! of length zero. In text it is the familiar dotted form. The resolver
//! keeps names in their dotted form in a fixed-size buffer; [`HostName`]
//! is that buffer plus the conversions to and from the wire encoding.

use super::wire::{ParseError, Parser, ShortBuf};
use core::fmt;
use core::str;

/// The capacity of a host name buffer in octets.
///
/// The longest acceptable dotted name is one octet shorter so that the
/// name and its terminating zero label always fit a buffer of this size
/// on the wire.
pub const MAX_NAME_LEN: usize = 32;

//------------ HostName ------------------------------------------------------

/// A bounded host name in its dotted text form.
///
/// A value of this type holds a validated host name of at most
/// [`MAX_NAME_LEN`]` - 1` octets: nonempty, no empty labels. It knows how
/// to append itself to an outgoing message in wire encoding and how to
/// read a name in wire encoding back into its dotted form.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HostName {
    /// The name in dotted form.
    inner: heapless::String<MAX_NAME_LEN>,
}

impl HostName {
    /// Creates a host name from its dotted text form.
    pub fn from_str(s: &str) -> Result<Self, NameError> {
        if s.is_empty() {
            return Err(NameError::Empty);
        }
        if s.len() >= MAX_NAME_LEN {
            return Err(NameError::TooLong);
        }
        if s.split('.').any(|label| label.is_empty()) {
            return Err(NameError::EmptyLabel);
        }
        let mut inner = heapless::String::new();
        inner.push_str(s).map_err(|_| NameError::TooLong)?;
        Ok(HostName { inner })
    }

    /// Returns a reference to the dotted text form.
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Returns the length of the dotted text form in octets.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns whether the name is empty.
    ///
    /// Since construction rejects empty names, this is only true for a
    /// defaulted value sitting in an unused table slot.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator over the labels of the name.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.inner.split('.')
    }

    /// Appends the name in its wire encoding to `target`.
    ///
    /// Each label becomes a length octet followed by the label's octets;
    /// a zero length octet terminates the name.
    pub fn compose<const N: usize>(
        &self,
        target: &mut heapless::Vec<u8, N>,
    ) -> Result<(), ShortBuf> {
        for label in self.labels() {
            target.push(label.len() as u8).map_err(|_| ShortBuf)?;
            target
                .extend_from_slice(label.as_bytes())
                .map_err(|_| ShortBuf)?;
        }
        target.push(0).map_err(|_| ShortBuf)?;
        Ok(())
    }

    /// Takes a name in wire encoding from the beginning of `parser`.
    ///
    /// The name must be an actual label sequence; a compression pointer
    /// is rejected as a form error since its target cannot be
    /// reconstructed from the label sequence alone. Names that do not
    /// fit the buffer or contain non-ASCII labels are rejected as well.
    pub fn parse(parser: &mut Parser) -> Result<Self, ParseError> {
        let mut inner = heapless::String::new();
        loop {
            let len = usize::from(parser.parse_u8()?);
            if len == 0 {
                break;
            }
            if len & 0xC0 == 0xC0 {
                return Err(ParseError::form_error("compressed name"));
            }
            let label = str::from_utf8(parser.parse_slice(len)?)
                .map_err(|_| ParseError::form_error("invalid label"))?;
            if !inner.is_empty() {
                inner
                    .push('.')
                    .map_err(|_| ParseError::form_error("name too long"))?;
            }
            inner
                .push_str(label)
                .map_err(|_| ParseError::form_error("name too long"))?;
        }
        if inner.is_empty() {
            return Err(ParseError::form_error("empty name"));
        }
        Ok(HostName { inner })
    }
}

//--- Display

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.inner.as_str())
    }
}

//--- PartialEq with strings

impl PartialEq<str> for HostName {
    fn eq(&self, other: &str) -> bool {
        self.inner.as_str() == other
    }
}

impl PartialEq<&str> for HostName {
    fn eq(&self, other: &&str) -> bool {
        self.inner.as_str() == *other
    }
}

//------------ NameError -----------------------------------------------------

/// A host name was rejected during construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NameError {
    /// The name was empty.
    Empty,

    /// The name contained an empty label.
    EmptyLabel,

    /// The name does not fit the name buffer.
    TooLong,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            NameError::Empty => f.write_str("empty host name"),
            NameError::EmptyLabel => f.write_str("empty label in host name"),
            NameError::TooLong => f.write_str("host name too long"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NameError {}

//============ Testing =======================================================
