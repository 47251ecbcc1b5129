//! The resolver.
//!
//! This module contains the actual resolver machinery on top of the
//! protocol types from [base][crate::base]: the fixed-size
//! [query table][table] holding in-flight lookups, the
//! [configuration][conf], the [transport seam][transport] through which
//! datagrams leave the device, and the [`StubResolver`] engine tying it
//! all together.
//!
//! The engine is driven entirely from the outside: the runtime calls
//! [`StubResolver::on_tick`] from its periodic timer and
//! [`StubResolver::on_response`] for every datagram received on the
//! resolver's socket. Neither call blocks and nothing here spawns
//! threads; see the crate documentation for the overall model.

pub mod conf;
pub mod errors;
pub mod resolver;
pub mod table;
pub mod transport;

pub use self::conf::ResolvConf;
pub use self::errors::{Failure, QueryError};
pub use self::resolver::StubResolver;
pub use self::table::{
    EntryState, FoundCallback, QueryEntry, QueryTable, MAX_ENTRIES,
    MAX_RETRIES,
};
pub use self::transport::{Transport, TransportError};
