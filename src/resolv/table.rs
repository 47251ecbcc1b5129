//! The query table.
//!
//! All in-flight and recently finished lookups live in a fixed array of
//! [`MAX_ENTRIES`] slots. The index of a slot doubles as the DNS
//! transaction ID of its query, which is how a received response finds
//! the lookup it belongs to: the ID comes back unchanged in the response
//! header. The mapping is stable for the lifetime of an entry.
//!
//! Each slot runs through a small state machine:
//!
//! ```text
//! Unused -> New        query() claimed the slot
//! New -> Asking        first transmission went out
//! Asking -> Asking     retransmission, linear backoff
//! Asking -> Done       a response carried an address
//! Asking -> Failed     error response, useless answer, or retries
//!                      exhausted
//! ```
//!
//! `Done` and `Failed` are terminal; such slots keep their result as a
//! small answer cache until [`QueryTable::reset`] clears the table. The
//! completion callback stored with the entry fires exactly once, on the
//! transition out of `Asking`.

use super::errors::{Failure, QueryError};
use crate::base::name::HostName;
use core::net::Ipv4Addr;

/// The number of slots in the query table.
///
/// Transaction IDs run from zero to one below this value.
pub const MAX_ENTRIES: usize = 4;

/// The number of transmission attempts for a single query.
pub const MAX_RETRIES: u8 = 8;

/// The completion callback of a lookup.
///
/// Invoked exactly once per lookup, with the queried name and the
/// resolved address, or `None` if the lookup failed.
pub type FoundCallback = fn(&HostName, Option<Ipv4Addr>);

//------------ EntryState ----------------------------------------------------

/// The lifecycle state of a query table slot.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EntryState {
    /// The slot is free.
    #[default]
    Unused,

    /// A lookup was accepted but nothing has been sent yet.
    New,

    /// A query is on the wire and a response is awaited.
    Asking,

    /// The lookup finished with an address.
    Done,

    /// The lookup finished without an address.
    Failed,
}

//------------ QueryEntry ----------------------------------------------------

/// One slot of the query table.
#[derive(Clone, Debug, Default)]
pub struct QueryEntry {
    /// The lifecycle state deciding which other fields are meaningful.
    pub(super) state: EntryState,

    /// The host name being resolved.
    pub(super) name: HostName,

    /// The resolved address. Meaningful in `Done` only.
    pub(super) addr: Option<Ipv4Addr>,

    /// Ticks until the next retransmission is due.
    pub(super) timer: u8,

    /// Transmission attempts so far.
    pub(super) retries: u8,

    /// Why the lookup failed. Meaningful in `Failed` only.
    pub(super) failure: Option<Failure>,

    /// The completion callback, taken when it fires.
    pub(super) found: Option<FoundCallback>,
}

impl QueryEntry {
    /// Returns the lifecycle state of the slot.
    pub fn state(&self) -> EntryState {
        self.state
    }

    /// Returns the host name the slot is resolving.
    pub fn name(&self) -> &HostName {
        &self.name
    }

    /// Returns the resolved address of a finished lookup.
    pub fn address(&self) -> Option<Ipv4Addr> {
        match self.state {
            EntryState::Done => self.addr,
            _ => None,
        }
    }

    /// Returns why a finished lookup failed.
    pub fn failure(&self) -> Option<Failure> {
        match self.state {
            EntryState::Failed => self.failure,
            _ => None,
        }
    }

    /// Returns the number of transmission attempts so far.
    pub fn retries(&self) -> u8 {
        self.retries
    }
}

//------------ QueryTable ----------------------------------------------------

/// The fixed array of lookup slots.
#[derive(Debug)]
pub struct QueryTable {
    /// The slots, indexed by transaction ID.
    entries: [QueryEntry; MAX_ENTRIES],
}

impl QueryTable {
    /// Creates a table with all slots unused.
    pub fn new() -> Self {
        QueryTable {
            entries: core::array::from_fn(|_| QueryEntry::default()),
        }
    }

    /// Resets all slots to unused.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            *entry = QueryEntry::default();
        }
    }

    /// Claims a free slot for a new lookup.
    ///
    /// Scans the slots in index order and puts the lookup into the
    /// first unused one, returning its index as the transaction ID.
    /// With no free slot the table is left entirely untouched and the
    /// caller gets [`QueryError::TableFull`]; outstanding lookups are
    /// never evicted.
    pub fn allocate(
        &mut self,
        name: HostName,
        found: FoundCallback,
    ) -> Result<u16, QueryError> {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if entry.state == EntryState::Unused {
                *entry = QueryEntry {
                    state: EntryState::New,
                    name,
                    addr: None,
                    timer: 0,
                    retries: 0,
                    failure: None,
                    found: Some(found),
                };
                return Ok(index as u16);
            }
        }
        Err(QueryError::TableFull)
    }

    /// Returns the slot for a transaction ID.
    ///
    /// Returns `None` for IDs outside the table.
    pub fn entry(&self, id: u16) -> Option<&QueryEntry> {
        self.entries.get(usize::from(id))
    }

    /// Returns the mutable slot for a transaction ID.
    pub fn entry_mut(&mut self, id: u16) -> Option<&mut QueryEntry> {
        self.entries.get_mut(usize::from(id))
    }

    /// Finishes the lookup in the given slot and fires its callback.
    ///
    /// Only a slot in `Asking` can finish; anything else leaves the
    /// table untouched, which makes late, duplicate or spoofed triggers
    /// harmless. Taking the callback out of the entry guarantees it
    /// cannot fire a second time.
    pub fn complete(&mut self, id: u16, outcome: Result<Ipv4Addr, Failure>) {
        let entry = match self.entry_mut(id) {
            Some(entry) => entry,
            None => return,
        };
        if entry.state != EntryState::Asking {
            return;
        }
        match outcome {
            Ok(addr) => {
                entry.state = EntryState::Done;
                entry.addr = Some(addr);
            }
            Err(failure) => {
                entry.state = EntryState::Failed;
                entry.failure = Some(failure);
            }
        }
        if let Some(found) = entry.found.take() {
            found(&entry.name, entry.addr);
        }
    }

    /// Looks a name up among the finished lookups.
    ///
    /// Only slots in `Done` are consulted; a name that was never
    /// queried and one whose query failed both come back as `None`.
    pub fn lookup(&self, name: &str) -> Option<Ipv4Addr> {
        self.entries.iter().find_map(|entry| {
            if entry.state == EntryState::Done && entry.name == *name {
                entry.addr
            } else {
                None
            }
        })
    }
}

impl Default for QueryTable {
    fn default() -> Self {
        Self::new()
    }
}

//============ Testing =======================================================
