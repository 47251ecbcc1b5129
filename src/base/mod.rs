//! Protocol-level building blocks.
//!
//! This module provides the types needed to produce and consume DNS
//! messages on the wire: the bounds-checked [`Parser`] for reading
//! network data, the message [`Header`] and its section counts, the
//! IANA parameter types, bounded [host names][name], and the actual
//! [message reader][message] and [query builder][message_builder].

pub mod header;
pub mod iana;
pub mod message;
pub mod message_builder;
pub mod name;
pub mod wire;

pub use self::header::{Header, HeaderCounts, HeaderSection};
pub use self::iana::{Class, Rcode, Rtype};
pub use self::message::{AnswerIter, Message, ParsedAnswer};
pub use self::message_builder::QueryBuilder;
pub use self::name::{HostName, NameError};
pub use self::wire::{FormError, ParseError, Parser, ShortBuf};
