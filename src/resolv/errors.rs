//! Errors and failures.
//!
//! Two kinds of things go wrong for a resolver and they are kept apart
//! deliberately: [`QueryError`] is returned synchronously when a lookup
//! cannot even be admitted to the query table, while [`Failure`] is the
//! terminal outcome of an admitted lookup, retained on its table entry
//! and signalled through the completion callback as an absent address.

use crate::base::iana::Rcode;
use crate::base::name::NameError;
use core::fmt;

//------------ QueryError ----------------------------------------------------

/// Starting a query failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueryError {
    /// The host name was not acceptable.
    Name(NameError),

    /// All query table slots are taken.
    ///
    /// Outstanding lookups are untouched; the caller may retry once one
    /// of them completes and its slot is released.
    TableFull,
}

//--- From

impl From<NameError> for QueryError {
    fn from(err: NameError) -> Self {
        QueryError::Name(err)
    }
}

//--- Display and Error

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            QueryError::Name(ref err) => err.fmt(f),
            QueryError::TableFull => f.write_str("query table full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for QueryError {}

//------------ Failure -------------------------------------------------------

/// The terminal outcome of a lookup that did not produce an address.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Failure {
    /// The server answered with the given nonzero response code.
    Dns(Rcode),

    /// The server answered without an error but its answer did not
    /// contain a usable address record.
    NoAnswer,

    /// No response arrived within the retry budget.
    TimedOut,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Failure::Dns(rcode) => write!(f, "server failure: {}", rcode),
            Failure::NoAnswer => f.write_str("no address in answer"),
            Failure::TimedOut => f.write_str("query timed out"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Failure {}
