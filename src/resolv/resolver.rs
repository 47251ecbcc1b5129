//! The resolver engine.

use super::conf::ResolvConf;
use super::errors::{Failure, QueryError};
use super::table::{EntryState, FoundCallback, QueryTable};
use super::transport::{Transport, TransportError};
use crate::base::iana::Rcode;
use crate::base::message::Message;
use crate::base::message_builder::QueryBuilder;
use crate::base::name::HostName;
use core::net::{Ipv4Addr, SocketAddrV4};
use log::{debug, trace, warn};

//------------ StubResolver --------------------------------------------------

/// A stub resolver over a fixed-size query table.
///
/// The resolver owns the query table, its configuration and the
/// transport towards the configured name server. It is an ordinary
/// value: construct one per device, keep it wherever the rest of the
/// network state lives, and pass it by reference into the timer and
/// receive paths of the runtime. All entry points take `&mut self`, so
/// the single-threaded discipline the design assumes is enforced by the
/// borrow checker.
///
/// Lookups are asynchronous. [`query`][Self::query] only claims a table
/// slot; the next [`on_tick`][Self::on_tick] transmits the query and
/// later ticks retransmit it with linearly growing intervals until a
/// response arrives through [`on_response`][Self::on_response] or the
/// retry budget is spent. Completion, successful or not, is delivered
/// through the callback given to `query`, exactly once per lookup.
pub struct StubResolver<T> {
    /// The transport towards the name server.
    transport: T,

    /// The configuration.
    conf: ResolvConf,

    /// The query table.
    table: QueryTable,

    /// The name server, once configured through `init`.
    server: Option<Ipv4Addr>,
}

/// # Creation
///
impl<T> StubResolver<T> {
    /// Creates a resolver with the default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_conf(transport, ResolvConf::default())
    }

    /// Creates a resolver with the given configuration.
    pub fn with_conf(transport: T, conf: ResolvConf) -> Self {
        StubResolver {
            transport,
            conf,
            table: QueryTable::new(),
            server: None,
        }
    }

    /// Returns a reference to the configuration.
    pub fn conf(&self) -> &ResolvConf {
        &self.conf
    }

    /// Returns a reference to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a reference to the query table.
    ///
    /// This gives read access to the individual lookup slots, e.g. to
    /// inspect why a lookup failed.
    pub fn table(&self) -> &QueryTable {
        &self.table
    }

    /// Returns the address of the configured name server, if any.
    pub fn server_address(&self) -> Option<Ipv4Addr> {
        self.server
    }
}

/// # Entry Points
///
impl<T: Transport> StubResolver<T> {
    /// Configures the name server and connects the transport to it.
    ///
    /// All table slots are cleared, dropping any outstanding or cached
    /// lookups. The method may be called again at any time to switch to
    /// a different server.
    pub fn init(&mut self, server: Ipv4Addr) -> Result<(), TransportError> {
        self.table.reset();
        self.transport
            .connect(SocketAddrV4::new(server, self.conf.port))?;
        self.server = Some(server);
        debug!("resolver configured for server {}", server);
        Ok(())
    }

    /// Starts resolving a host name.
    ///
    /// On success the lookup occupies a table slot and its transaction
    /// ID is returned; the first transmission happens on the next call
    /// to [`on_tick`][Self::on_tick]. The callback fires exactly once,
    /// whenever the lookup reaches its terminal state, with the
    /// resolved address or `None` on failure.
    pub fn query(
        &mut self,
        name: &str,
        found: FoundCallback,
    ) -> Result<u16, QueryError> {
        let name = HostName::from_str(name)?;
        let id = self.table.allocate(name, found)?;
        if let Some(entry) = self.table.entry(id) {
            debug!("query {}: accepted lookup for {}", id, entry.name());
        }
        Ok(id)
    }

    /// Looks a name up among the finished lookups.
    ///
    /// This is a pure read on the table: no query is started, nothing
    /// is sent. Names that were never queried and names whose query
    /// failed both come back as `None`; use [`query`][Self::query] to
    /// find out which it was.
    pub fn lookup(&self, name: &str) -> Option<Ipv4Addr> {
        self.table.lookup(name)
    }

    /// Drives transmissions and timeouts. Call once per timer tick.
    ///
    /// A single pass over the table: pending timers count down, dead
    /// lookups are failed, and at most one query datagram is sent, to
    /// bound the work done per tick. A fresh lookup goes out with a
    /// one tick timer; each retransmission waits one tick longer than
    /// the previous one.
    pub fn on_tick(&mut self) {
        for id in 0..self.table_len() {
            let entry = match self.table.entry_mut(id) {
                Some(entry) => entry,
                None => break,
            };
            match entry.state {
                EntryState::New => {
                    entry.state = EntryState::Asking;
                    entry.timer = 1;
                    entry.retries = 0;
                    self.send_query(id);
                    break;
                }
                EntryState::Asking => {
                    if entry.timer > 0 {
                        entry.timer -= 1;
                    }
                    if entry.timer != 0 {
                        continue;
                    }
                    entry.retries += 1;
                    if entry.retries >= self.conf.max_retries {
                        warn!(
                            "query {}: no response for {} after {} attempts",
                            id,
                            entry.name,
                            entry.retries
                        );
                        self.table.complete(id, Err(Failure::TimedOut));
                        continue;
                    }
                    entry.timer = entry.retries;
                    self.send_query(id);
                    break;
                }
                _ => {}
            }
        }
    }

    /// Consumes a datagram received from the name server.
    ///
    /// The transaction ID from the message header selects the table
    /// slot. Datagrams that do not decode, carry an unknown ID, or hit
    /// a slot that is not waiting for a response are dropped without
    /// touching the table; a late, duplicate or spoofed datagram must
    /// not disturb an unrelated lookup. `source` is whom the runtime
    /// received the datagram from; it is reported in the log but not
    /// verified, since the transport is connected to the server.
    pub fn on_response(&mut self, bytes: &[u8], source: SocketAddrV4) {
        let msg = match Message::from_slice(bytes) {
            Ok(msg) => msg,
            Err(err) => {
                warn!("discarding datagram from {}: {}", source, err);
                return;
            }
        };
        let header = msg.header();
        let id = header.id();
        let entry = match self.table.entry(id) {
            Some(entry) => entry,
            None => {
                trace!("discarding response with unknown id {}", id);
                return;
            }
        };
        if entry.state() != EntryState::Asking {
            trace!("discarding late or duplicate response for id {}", id);
            return;
        }
        let rcode = header.rcode();
        if rcode != Rcode::NoError {
            debug!("query {}: server answered {}", id, rcode);
            self.table.complete(id, Err(Failure::Dns(rcode)));
            return;
        }
        match msg.first_a() {
            Ok(Some(addr)) => {
                debug!("query {}: resolved to {}", id, addr);
                self.table.complete(id, Ok(addr));
            }
            Ok(None) => {
                debug!("query {}: answer carries no usable address", id);
                self.table.complete(id, Err(Failure::NoAnswer));
            }
            Err(err) => {
                warn!(
                    "discarding malformed response from {} for id {}: {}",
                    source, id, err
                );
            }
        }
    }
}

/// # Internal Helpers
///
impl<T: Transport> StubResolver<T> {
    /// Returns the number of table slots as a transaction ID bound.
    fn table_len(&self) -> u16 {
        super::table::MAX_ENTRIES as u16
    }

    /// Builds the query for a slot and hands it to the transport.
    ///
    /// A send failure is logged and otherwise ignored: the entry stays
    /// in `Asking` with its timer running, so the normal retry handling
    /// covers the lost transmission.
    fn send_query(&mut self, id: u16) {
        let name = match self.table.entry(id) {
            Some(entry) => entry.name.clone(),
            None => return,
        };
        let mut builder = match QueryBuilder::new(id, self.conf.recurse) {
            Ok(builder) => builder,
            Err(err) => {
                warn!("query {}: building query failed: {}", id, err);
                return;
            }
        };
        if let Err(err) = builder.push_question(&name) {
            warn!("query {}: building query failed: {}", id, err);
            return;
        }
        match self.transport.send(builder.as_slice()) {
            Ok(()) => trace!("query {}: sent query for {}", id, name),
            Err(err) => {
                warn!("query {}: sending query for {} failed: {}", id, name, err)
            }
        }
    }
}

//============ Testing =======================================================

#[cfg(all(test, feature = "std"))]
mod test {
    use super::*;
    use std::vec::Vec;

    /// A transport recording everything the resolver sends.
    #[derive(Default)]
    struct MockTransport {
        connected: Option<SocketAddrV4>,
        sent: Vec<Vec<u8>>,
    }

    impl Transport for MockTransport {
        fn connect(
            &mut self,
            server: SocketAddrV4,
        ) -> Result<(), TransportError> {
            self.connected = Some(server);
            Ok(())
        }

        fn send(&mut self, msg: &[u8]) -> Result<(), TransportError> {
            self.sent.push(msg.into());
            Ok(())
        }
    }

    fn nop(_: &HostName, _: Option<Ipv4Addr>) {}

    const SERVER: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 53);

    fn resolver() -> StubResolver<MockTransport> {
        let mut resolver = StubResolver::new(MockTransport::default());
        resolver.init(SERVER).unwrap();
        resolver
    }

    #[test]
    fn init_connects_transport() {
        let resolver = resolver();
        assert_eq!(
            resolver.transport().connected,
            Some(SocketAddrV4::new(SERVER, 53))
        );
        assert_eq!(resolver.server_address(), Some(SERVER));
    }

    #[test]
    fn server_address_before_init() {
        let resolver = StubResolver::new(MockTransport::default());
        assert_eq!(resolver.server_address(), None);
    }

    #[test]
    fn custom_port() {
        let conf = ResolvConf {
            port: 5353,
            ..Default::default()
        };
        let mut resolver =
            StubResolver::with_conf(MockTransport::default(), conf);
        resolver.init(SERVER).unwrap();
        assert_eq!(
            resolver.transport().connected,
            Some(SocketAddrV4::new(SERVER, 5353))
        );
    }

    #[test]
    fn query_does_not_send() {
        let mut resolver = resolver();
        resolver.query("example.com", nop).unwrap();
        assert!(resolver.transport().sent.is_empty());
    }

    #[test]
    fn tick_sends_query() {
        let mut resolver = resolver();
        let id = resolver.query("example.com", nop).unwrap();
        resolver.on_tick();
        assert_eq!(resolver.transport().sent.len(), 1);
        assert_eq!(
            resolver.transport().sent[0],
            b"\x00\x00\x01\x00\x00\x01\x00\x00\x00\x00\x00\x00\
              \x07example\x03com\x00\
              \x00\x01\x00\x01"
        );
        assert_eq!(id, 0);
    }

    #[test]
    fn one_send_per_tick() {
        let mut resolver = resolver();
        resolver.query("a.example", nop).unwrap();
        resolver.query("b.example", nop).unwrap();
        resolver.on_tick();
        assert_eq!(resolver.transport().sent.len(), 1);
        resolver.on_tick();
        assert_eq!(resolver.transport().sent.len(), 2);
    }

    #[test]
    fn query_rejects_long_name() {
        let mut resolver = resolver();
        assert!(matches!(
            resolver.query(
                "a-name-that-goes-on-and-on-and-on.example",
                nop
            ),
            Err(QueryError::Name(_))
        ));
    }
}
