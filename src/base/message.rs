//! Reading a received DNS message.
//!
//! [`Message`] wraps the raw octets of a received datagram and provides
//! access to its content: the header, the question name, and an iterator
//! over the answer records. Parsing happens lazily while iterating; any
//! structural problem surfaces as a [`ParseError`] instead of a panic.

use super::header::{Header, HeaderCounts, HeaderSection};
use super::iana::{Class, Rtype};
use super::name::HostName;
use super::wire::{ParseError, Parser};
use core::mem;
use core::net::Ipv4Addr;

/// The maximum length of a name in wire encoding.
///
/// [RFC 1035] limits encoded names to 255 octets. A label walk that has
/// not terminated within this bound is treated as malformed.
///
/// [RFC 1035]: https://tools.ietf.org/html/rfc1035
pub const MAX_PARSED_NAME: usize = 255;

//------------ Message -------------------------------------------------------

/// A read-only view of a received DNS message.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    /// The underlying message octets.
    octets: &'a [u8],
}

/// # Creation
///
impl<'a> Message<'a> {
    /// Creates a message from a byte slice.
    ///
    /// This fails if the slice is too short to even contain a complete
    /// header section. No further checks are done, though, so if this
    /// function returns `Ok`, the message may still be broken with
    /// other methods returning errors later.
    pub fn from_slice(octets: &'a [u8]) -> Result<Self, ParseError> {
        if octets.len() < mem::size_of::<HeaderSection>() {
            return Err(ParseError::ShortInput);
        }
        Ok(Message { octets })
    }

    /// Returns a reference to the underlying byte slice.
    pub fn as_slice(&self) -> &[u8] {
        self.octets
    }
}

/// # Header Section
///
impl<'a> Message<'a> {
    /// Returns the message header.
    pub fn header(&self) -> Header {
        *Header::for_message_slice(self.octets)
    }

    /// Returns the header counts of the message.
    pub fn header_counts(&self) -> HeaderCounts {
        *HeaderCounts::for_message_slice(self.octets)
    }
}

/// # Access to the Question and Answer Sections
///
impl<'a> Message<'a> {
    /// Returns the name from the first question for diagnostics.
    ///
    /// The name is only reconstructed from an actual label sequence.
    /// Should the server have compressed the question name, this fails
    /// with a form error: compression pointers are never followed, so
    /// the requested name cannot be recovered from such a message.
    pub fn question_name(&self) -> Result<HostName, ParseError> {
        let mut parser = self.parser_at_question()?;
        HostName::parse(&mut parser)
    }

    /// Returns an iterator over the records of the answer section.
    ///
    /// The iterator is positioned past the question section; reaching
    /// that point can already fail on a malformed question.
    pub fn answers(&self) -> Result<AnswerIter<'a>, ParseError> {
        let mut parser = self.parser_at_question()?;
        for _ in 0..self.header_counts().qdcount() {
            skip_name(&mut parser)?;
            // QTYPE and QCLASS.
            parser.advance(4)?;
        }
        Ok(AnswerIter {
            parser,
            remaining: self.header_counts().ancount(),
        })
    }

    /// Returns the address of the first A record in the answer section.
    ///
    /// Answer records that are not an Internet class A record with a
    /// four octet address are skipped. Returns `Ok(None)` if the answer
    /// section contains no qualifying record at all.
    pub fn first_a(&self) -> Result<Option<Ipv4Addr>, ParseError> {
        for answer in self.answers()? {
            if let Some(addr) = answer?.a_address() {
                return Ok(Some(addr));
            }
        }
        Ok(None)
    }

    /// Returns a parser positioned at the start of the question section.
    fn parser_at_question(&self) -> Result<Parser<'a>, ParseError> {
        let mut parser = Parser::from_ref(self.octets);
        parser.advance(mem::size_of::<HeaderSection>())?;
        Ok(parser)
    }
}

//------------ AnswerIter ----------------------------------------------------

/// An iterator over the records of a message's answer section.
///
/// Yields one [`ParsedAnswer`] per record. A parse error fuses the
/// iterator: the error is yielded once and iteration ends, since the
/// position of any further record is unknowable in a broken section.
pub struct AnswerIter<'a> {
    /// A parser positioned at the next record.
    parser: Parser<'a>,

    /// The number of records not yet parsed.
    remaining: u16,
}

impl<'a> AnswerIter<'a> {
    /// Parses the record the parser is currently positioned at.
    fn parse_answer(&mut self) -> Result<ParsedAnswer, ParseError> {
        let compressed = skip_name(&mut self.parser)?;
        let rtype = Rtype::from_int(self.parser.parse_u16()?);
        let class = Class::from_int(self.parser.parse_u16()?);
        let ttl = self.parser.parse_u32()?;
        let rdlen = self.parser.parse_u16()?;
        let addr = if rtype == Rtype::A && class == Class::In && rdlen == 4 {
            let mut buf = [0u8; 4];
            self.parser.parse_buf(&mut buf)?;
            Some(Ipv4Addr::from(buf))
        } else {
            self.parser.advance(usize::from(rdlen))?;
            None
        };
        Ok(ParsedAnswer {
            rtype,
            class,
            ttl,
            rdlen,
            addr,
            compressed,
        })
    }
}

impl<'a> Iterator for AnswerIter<'a> {
    type Item = Result<ParsedAnswer, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match self.parse_answer() {
            Ok(answer) => {
                self.remaining -= 1;
                Some(Ok(answer))
            }
            Err(err) => {
                self.remaining = 0;
                Some(Err(err))
            }
        }
    }
}

//------------ ParsedAnswer --------------------------------------------------

/// The parsed fields of one answer record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParsedAnswer {
    /// The record type.
    rtype: Rtype,

    /// The record class.
    class: Class,

    /// The number of seconds the record may be cached.
    ttl: u32,

    /// The length of the record data in octets.
    rdlen: u16,

    /// The address carried in the record data.
    ///
    /// Only present for an Internet class A record with four octets of
    /// data.
    addr: Option<Ipv4Addr>,

    /// Whether the record's name field was a compression pointer.
    compressed: bool,
}

impl ParsedAnswer {
    /// Returns the record type.
    pub fn rtype(&self) -> Rtype {
        self.rtype
    }

    /// Returns the record class.
    pub fn class(&self) -> Class {
        self.class
    }

    /// Returns the record's time-to-live in seconds.
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Returns the length of the record data in octets.
    pub fn rdlen(&self) -> u16 {
        self.rdlen
    }

    /// Returns the address for an Internet class A record.
    ///
    /// Returns `None` for any other kind of record.
    pub fn a_address(&self) -> Option<Ipv4Addr> {
        self.addr
    }

    /// Returns whether the record's name field was a compression
    /// pointer rather than a label sequence.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }
}

//------------ Helper Functions ----------------------------------------------

/// Skips over a name field, returning whether it was a pointer.
///
/// A name field whose first octet has both upper bits set is a two octet
/// compression pointer and is consumed as exactly that; the pointer
/// target is not needed for anything the resolver extracts, so it is
/// never followed. Anything else is walked as a label sequence up to and
/// including the terminating zero label. A walk that exceeds
/// [`MAX_PARSED_NAME`] octets fails as malformed.
fn skip_name(parser: &mut Parser) -> Result<bool, ParseError> {
    let first = parser.peek(1)?[0];
    if first & 0xC0 == 0xC0 {
        parser.advance(2)?;
        return Ok(true);
    }
    let mut walked = 0;
    loop {
        let len = usize::from(parser.parse_u8()?);
        if len == 0 {
            break;
        }
        walked += len + 1;
        if walked > MAX_PARSED_NAME {
            return Err(ParseError::form_error("unterminated name"));
        }
        parser.advance(len)?;
    }
    Ok(false)
}

//============ Testing =======================================================

#[cfg(all(test, feature = "std"))]
mod test {
    use super::*;

    /// A response for "example.com" A/IN with the given answer section.
    fn response(id: u16, rcode: u8, ancount: u16, answers: &[u8]) -> std::vec::Vec<u8> {
        let mut msg = std::vec::Vec::new();
        msg.extend_from_slice(&id.to_be_bytes());
        msg.extend_from_slice(&[0x81, 0x80 | rcode]);
        msg.extend_from_slice(&1u16.to_be_bytes());
        msg.extend_from_slice(&ancount.to_be_bytes());
        msg.extend_from_slice(&0u16.to_be_bytes());
        msg.extend_from_slice(&0u16.to_be_bytes());
        msg.extend_from_slice(b"\x07example\x03com\x00");
        msg.extend_from_slice(b"\x00\x01\x00\x01");
        msg.extend_from_slice(answers);
        msg
    }

    /// One answer record with a pointer name field.
    fn a_record(rtype: u16, class: u16, rdata: &[u8]) -> std::vec::Vec<u8> {
        let mut rec = std::vec::Vec::new();
        rec.extend_from_slice(b"\xC0\x0C");
        rec.extend_from_slice(&rtype.to_be_bytes());
        rec.extend_from_slice(&class.to_be_bytes());
        rec.extend_from_slice(&300u32.to_be_bytes());
        rec.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        rec.extend_from_slice(rdata);
        rec
    }

    #[test]
    fn short_message() {
        assert_eq!(
            Message::from_slice(b"\x00\x01\x81\x80").err(),
            Some(ParseError::ShortInput)
        );
    }

    #[test]
    fn header_access() {
        let msg = response(7, 0, 0, b"");
        let msg = Message::from_slice(&msg).unwrap();
        assert_eq!(msg.header().id(), 7);
        assert!(msg.header().qr());
        assert!(msg.header().rd());
        assert!(msg.header().ra());
        assert_eq!(msg.header_counts().qdcount(), 1);
        assert_eq!(msg.header_counts().ancount(), 0);
    }

    #[test]
    fn question_name() {
        let msg = response(7, 0, 0, b"");
        let msg = Message::from_slice(&msg).unwrap();
        assert_eq!(msg.question_name().unwrap(), "example.com");
    }

    #[test]
    fn first_a() {
        let msg = response(3, 0, 1, &a_record(1, 1, &[93, 184, 216, 34]));
        let msg = Message::from_slice(&msg).unwrap();
        assert_eq!(
            msg.first_a().unwrap(),
            Some(Ipv4Addr::new(93, 184, 216, 34))
        );
    }

    #[test]
    fn answer_fields() {
        let msg = response(3, 0, 1, &a_record(1, 1, &[93, 184, 216, 34]));
        let msg = Message::from_slice(&msg).unwrap();
        let answer = msg.answers().unwrap().next().unwrap().unwrap();
        assert_eq!(answer.rtype(), Rtype::A);
        assert_eq!(answer.class(), Class::In);
        assert_eq!(answer.ttl(), 300);
        assert_eq!(answer.rdlen(), 4);
        assert!(answer.is_compressed());
    }

    #[test]
    fn skips_non_matching_records() {
        // A CNAME record first, then the address.
        let mut answers = a_record(5, 1, b"\x03www\x07example\x03com\x00");
        answers.extend_from_slice(&a_record(1, 1, &[93, 184, 216, 34]));
        let msg = response(0, 0, 2, &answers);
        let msg = Message::from_slice(&msg).unwrap();
        assert_eq!(
            msg.first_a().unwrap(),
            Some(Ipv4Addr::new(93, 184, 216, 34))
        );
    }

    #[test]
    fn no_qualifying_answer() {
        // Wrong type, wrong class, wrong data length.
        let mut answers = a_record(28, 1, &[0; 16]);
        answers.extend_from_slice(&a_record(1, 255, &[1, 2, 3, 4]));
        answers.extend_from_slice(&a_record(1, 1, &[1, 2, 3, 4, 5]));
        let msg = response(0, 0, 3, &answers);
        let msg = Message::from_slice(&msg).unwrap();
        assert_eq!(msg.first_a().unwrap(), None);
    }

    #[test]
    fn uncompressed_answer_name() {
        let mut answers = std::vec::Vec::new();
        answers.extend_from_slice(b"\x07example\x03com\x00");
        answers.extend_from_slice(b"\x00\x01\x00\x01");
        answers.extend_from_slice(&300u32.to_be_bytes());
        answers.extend_from_slice(b"\x00\x04");
        answers.extend_from_slice(&[93, 184, 216, 34]);
        let msg = response(0, 0, 1, &answers);
        let msg = Message::from_slice(&msg).unwrap();
        let answer = msg.answers().unwrap().next().unwrap().unwrap();
        assert!(!answer.is_compressed());
        assert_eq!(answer.a_address(), Some(Ipv4Addr::new(93, 184, 216, 34)));
    }

    #[test]
    fn truncated_answer() {
        let record = a_record(1, 1, &[93, 184, 216, 34]);
        let msg = response(0, 0, 1, &record[..record.len() - 2]);
        let msg = Message::from_slice(&msg).unwrap();
        assert_eq!(msg.first_a(), Err(ParseError::ShortInput));
    }

    #[test]
    fn answer_count_beyond_data() {
        let msg = response(0, 0, 4, &a_record(1, 255, &[1, 2, 3, 4]));
        let msg = Message::from_slice(&msg).unwrap();
        assert_eq!(msg.first_a(), Err(ParseError::ShortInput));
    }

    #[test]
    fn error_fuses_iterator() {
        let msg = response(0, 0, 4, b"");
        let msg = Message::from_slice(&msg).unwrap();
        let mut answers = msg.answers().unwrap();
        assert!(matches!(answers.next(), Some(Err(_))));
        assert!(answers.next().is_none());
    }

    #[test]
    fn unterminated_name_in_answer() {
        // A name of back to back maximum size labels never reaching a
        // terminating zero label within the allowed length.
        let mut record = std::vec::Vec::new();
        for _ in 0..5 {
            record.push(63u8);
            record.extend_from_slice(&[b'a'; 63]);
        }
        record.push(63u8);
        let msg = response(0, 0, 1, &record);
        let msg = Message::from_slice(&msg).unwrap();
        assert_eq!(
            msg.first_a(),
            Err(ParseError::form_error("unterminated name"))
        );
    }
}
