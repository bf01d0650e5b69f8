//! Client identity resolution
//!
//! Every request is answered for a specific client, keyed by a
//! `ClientIdentity` string. The key is derived from the connection by one of
//! three strategies (peer address, forwarding header, ARP translation),
//! selected once at startup from configuration. The strategies are not
//! interchangeable at runtime: an ARP deployment keys documents by MAC and
//! must never silently degrade to the raw IP.

use crate::arp::{ArpTable, ProcArpTable};
use crate::config::IdentityConfig;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use http::HeaderMap;
use std::fmt;
use std::net::IpAddr;

/// Key used to select which stored document applies to a requester
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives a stable client identity from an inbound request.
///
/// Must be deterministic for a fixed request and free of side effects.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap, peer: IpAddr) -> Result<ClientIdentity>;
}

/// Builds the resolver variant the deployment selected.
pub fn resolver_from_config(config: &IdentityConfig) -> Box<dyn IdentityResolver> {
    match config {
        IdentityConfig::Peer => Box::new(PeerResolver),
        IdentityConfig::ForwardedHeader { header } => {
            Box::new(HeaderResolver::new(header.clone()))
        }
        IdentityConfig::Arp { table_path } => {
            Box::new(ArpResolver::new(ProcArpTable::new(table_path.clone())))
        }
    }
}

/// Identifies clients by their peer IP address, port stripped.
pub struct PeerResolver;

#[async_trait]
impl IdentityResolver for PeerResolver {
    async fn resolve(&self, _headers: &HeaderMap, peer: IpAddr) -> Result<ClientIdentity> {
        Ok(ClientIdentity::new(peer.to_string()))
    }
}

/// Identifies clients by a forwarding header, falling back to the peer
/// address when the header is absent or empty.
///
/// Only constructed when the deployment explicitly opts in; the header is
/// client-spoofable unless a trusted reverse proxy strips it.
pub struct HeaderResolver {
    header: String,
}

impl HeaderResolver {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }
}

#[async_trait]
impl IdentityResolver for HeaderResolver {
    async fn resolve(&self, headers: &HeaderMap, peer: IpAddr) -> Result<ClientIdentity> {
        if let Some(value) = headers
            .get(self.header.as_str())
            .and_then(|value| value.to_str().ok())
        {
            // Multi-hop proxies append to the list; the leftmost entry is
            // the originating client
            let client = value.split(',').next().unwrap_or(value).trim();
            if !client.is_empty() {
                return Ok(ClientIdentity::new(client));
            }
        }

        Ok(ClientIdentity::new(peer.to_string()))
    }
}

/// Identifies clients by the hardware address their peer IP maps to.
///
/// A missing ARP entry is `IdentityNotFound`: MAC-keyed and IP-keyed
/// stores are different identity domains, so no fallback to the raw IP.
pub struct ArpResolver<T> {
    table: T,
}

impl<T: ArpTable> ArpResolver<T> {
    pub fn new(table: T) -> Self {
        Self { table }
    }
}

#[async_trait]
impl<T: ArpTable> IdentityResolver for ArpResolver<T> {
    async fn resolve(&self, _headers: &HeaderMap, peer: IpAddr) -> Result<ClientIdentity> {
        match self.table.lookup(peer).await? {
            Some(hw_address) => Ok(ClientIdentity::new(hw_address)),
            None => Err(Error::IdentityNotFound(peer)),
        }
    }
}
