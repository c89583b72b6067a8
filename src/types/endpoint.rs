// ABOUTME: Public address assigned to an exposed service.
// ABOUTME: Final output of a successful deployment.

use std::fmt;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceEndpoint(Ipv4Addr);

impl ServiceEndpoint {
    pub fn new(address: Ipv4Addr) -> Self {
        Self(address)
    }

    pub fn address(&self) -> Ipv4Addr {
        self.0
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
