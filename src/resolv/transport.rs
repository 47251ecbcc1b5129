//! The transport seam.
//!
//! The resolver does not own a socket. Whatever network stack the device
//! runs provides an implementation of [`Transport`] and the resolver
//! hands it finished query datagrams. The receive direction runs the
//! other way around: the runtime delivers received datagrams into
//! [`StubResolver::on_response`][super::StubResolver::on_response]
//! itself, the way a UDP receive callback registered with the stack
//! would.

use core::fmt;
use core::net::SocketAddrV4;

//------------ Transport -----------------------------------------------------

/// A connected UDP transport towards the name server.
pub trait Transport {
    /// Connects the transport to the given server.
    ///
    /// Called from [`StubResolver::init`][super::StubResolver::init],
    /// possibly repeatedly: a second call reconfigures the transport
    /// for a new server.
    fn connect(&mut self, server: SocketAddrV4) -> Result<(), TransportError>;

    /// Hands one finished query datagram to the network stack.
    fn send(&mut self, msg: &[u8]) -> Result<(), TransportError>;
}

//------------ TransportError ------------------------------------------------

/// Sending through the transport failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransportError {
    /// The transport has not been connected to a server.
    NotConnected,

    /// The network stack refused the datagram.
    SendFailed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TransportError::NotConnected => {
                f.write_str("transport not connected")
            }
            TransportError::SendFailed => f.write_str("send failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {}
