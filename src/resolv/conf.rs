//! Resolver configuration.

use super::table::MAX_RETRIES;

//------------ ResolvConf ----------------------------------------------------

/// Configuration of the resolver.
///
/// The defaults match what practically every deployment wants: the
/// standard DNS port, recursion requested from the server, and the full
/// retry budget. A value can be handed to
/// [`StubResolver::with_conf`][super::StubResolver::with_conf] to
/// deviate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResolvConf {
    /// The UDP port of the name server.
    pub port: u16,

    /// The number of transmission attempts before a query is declared
    /// dead.
    pub max_retries: u8,

    /// Whether to set the recursion desired bit in queries.
    ///
    /// Enabled by default; a stub resolver relies on its server to do
    /// the actual resolving.
    pub recurse: bool,
}

impl Default for ResolvConf {
    fn default() -> Self {
        ResolvConf {
            port: 53,
            max_retries: MAX_RETRIES,
            recurse: true,
        }
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default() {
        let conf = ResolvConf::default();
        assert_eq!(conf.port, 53);
        assert_eq!(conf.max_retries, 8);
        assert!(conf.recurse);
    }
}
