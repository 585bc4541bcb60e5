//! Peer registry
//!
//! A deduplicated set of peer network locations. Addresses arrive as full
//! URLs or bare `host:port` strings and are normalized to the authority
//! part before storage.

use std::collections::HashSet;

use reqwest::Url;
use thiserror::Error;

/// Peer registration errors
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("invalid peer address: {0}")]
    InvalidAddress(String),
}

/// Known peer network locations (`host:port`), set semantics.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: HashSet<String>,
}

impl PeerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize an address and add it to the set.
    ///
    /// Returns the normalized `host:port` form. Duplicates collapse.
    pub fn register(&mut self, address: &str) -> Result<String, RegisterError> {
        let location = normalize_address(address)?;
        self.peers.insert(location.clone());
        Ok(location)
    }

    /// Normalize every address, then add them all.
    ///
    /// All-or-nothing: if any address fails to parse, the registry is left
    /// untouched. Returns the normalized locations in input order.
    pub fn register_all(&mut self, addresses: &[&str]) -> Result<Vec<String>, RegisterError> {
        let locations = addresses
            .iter()
            .map(|address| normalize_address(address))
            .collect::<Result<Vec<_>, _>>()?;

        for location in &locations {
            self.peers.insert(location.clone());
        }
        Ok(locations)
    }

    /// Whether the registry knows this normalized location
    pub fn contains(&self, location: &str) -> bool {
        self.peers.contains(location)
    }

    /// All known peer locations, sorted for stable output
    pub fn addresses(&self) -> Vec<String> {
        let mut addrs: Vec<String> = self.peers.iter().cloned().collect();
        addrs.sort();
        addrs
    }

    /// Number of known peers
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Whether no peers are registered
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

/// Reduce a peer address to its network location (`host` or `host:port`).
///
/// Accepts full URLs (`http://192.168.1.1:5000/chain`) and bare authorities
/// (`192.168.1.1:5000`). Bare forms parse as scheme-relative garbage, so a
/// second pass with an `http://` prefix recovers them.
fn normalize_address(address: &str) -> Result<String, RegisterError> {
    let invalid = || RegisterError::InvalidAddress(address.to_string());

    let url = match Url::parse(address) {
        Ok(url) if url.has_host() => url,
        // A scheme-bearing string that still has no host is garbage like
        // "http://"; prefixing it again would misread the scheme as a host
        _ if address.contains("://") => return Err(invalid()),
        _ => Url::parse(&format!("http://{address}")).map_err(|_| invalid())?,
    };

    let host = url.host_str().ok_or_else(invalid)?;
    if host.is_empty() {
        return Err(invalid());
    }

    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
