//! Building an outgoing DNS query.
//!
//! [`QueryBuilder`] assembles a query message into a fixed-size buffer:
//! the twelve octet header first, then a single question. The buffer is
//! sized so that any valid [`HostName`] fits; composing still checks
//! every append and reports [`ShortBuf`] rather than truncating.

use super::header::HeaderSection;
use super::iana::{Class, Rtype};
use super::name::{HostName, MAX_NAME_LEN};
use super::wire::ShortBuf;

/// The size of the buffer for an outgoing query.
///
/// A query is the header, the encoded name including its terminating
/// zero label, and the four octets of QTYPE and QCLASS.
pub const QUERY_BUF_LEN: usize = 12 + MAX_NAME_LEN + 1 + 4;

//------------ QueryBuilder --------------------------------------------------

/// A builder for a DNS query message.
///
/// The builder starts out with the complete header: the given
/// transaction ID, the recursion desired flag if requested, and a
/// question count of one. [`push_question`][Self::push_question] appends
/// the question; the finished message is read through
/// [`as_slice`][Self::as_slice] or taken out with
/// [`finish`][Self::finish].
#[derive(Clone, Debug)]
pub struct QueryBuilder {
    /// The message being built.
    target: heapless::Vec<u8, QUERY_BUF_LEN>,
}

impl QueryBuilder {
    /// Creates a builder holding the header of a new query.
    pub fn new(id: u16, recurse: bool) -> Result<Self, ShortBuf> {
        let mut section = HeaderSection::new();
        section.header_mut().set_id(id);
        section.header_mut().set_rd(recurse);
        section.counts_mut().set_qdcount(1);
        let mut target = heapless::Vec::new();
        target
            .extend_from_slice(section.as_slice())
            .map_err(|_| ShortBuf)?;
        Ok(QueryBuilder { target })
    }

    /// Appends the question for an Internet class A record of `name`.
    pub fn push_question(&mut self, name: &HostName) -> Result<(), ShortBuf> {
        name.compose(&mut self.target)?;
        self.target
            .extend_from_slice(&Rtype::A.to_int().to_be_bytes())
            .map_err(|_| ShortBuf)?;
        self.target
            .extend_from_slice(&Class::In.to_int().to_be_bytes())
            .map_err(|_| ShortBuf)?;
        Ok(())
    }

    /// Returns the octets of the message built so far.
    pub fn as_slice(&self) -> &[u8] {
        self.target.as_slice()
    }

    /// Takes the finished message out of the builder.
    pub fn finish(self) -> heapless::Vec<u8, QUERY_BUF_LEN> {
        self.target
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn example_com_query() {
        let name = HostName::from_str("example.com").unwrap();
        let mut builder = QueryBuilder::new(7, true).unwrap();
        builder.push_question(&name).unwrap();
        assert_eq!(
            builder.as_slice(),
            b"\x00\x07\x01\x00\x00\x01\x00\x00\x00\x00\x00\x00\
              \x07example\x03com\x00\
              \x00\x01\x00\x01"
        );
    }

    #[test]
    fn without_recursion() {
        let name = HostName::from_str("localhost").unwrap();
        let mut builder = QueryBuilder::new(0, false).unwrap();
        builder.push_question(&name).unwrap();
        assert_eq!(
            builder.as_slice(),
            b"\x00\x00\x00\x00\x00\x01\x00\x00\x00\x00\x00\x00\
              \x09localhost\x00\
              \x00\x01\x00\x01"
        );
    }

    #[test]
    fn longest_name_fits() {
        // 31 octets of dotted name, the longest a HostName accepts.
        let name = HostName::from_str("aaaaaaaaaaaaaa.bbbbbbbbbbbb.ccc").unwrap();
        let mut builder = QueryBuilder::new(3, true).unwrap();
        builder.push_question(&name).unwrap();
        assert_eq!(builder.as_slice().len(), 12 + 33 + 4);
        assert_eq!(builder.as_slice().len(), QUERY_BUF_LEN);
    }
}
