use async_trait::async_trait;
use std::net::IpAddr;
use std::path::PathBuf;

/// IP-to-hardware-address lookup capability.
///
/// A miss is `Ok(None)`; only an unreadable table is an error.
#[async_trait]
pub trait ArpTable: Send + Sync {
    async fn lookup(&self, ip: IpAddr) -> std::io::Result<Option<String>>;
}

/// ARP table backed by a `/proc/net/arp`-format file, re-read on every
/// lookup so externally refreshed entries are visible immediately.
pub struct ProcArpTable {
    path: PathBuf,
}

impl ProcArpTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ArpTable for ProcArpTable {
    async fn lookup(&self, ip: IpAddr) -> std::io::Result<Option<String>> {
        let table = tokio::fs::read_to_string(&self.path).await?;
        Ok(find_entry(&table, ip))
    }
}

fn find_entry(table: &str, ip: IpAddr) -> Option<String> {
    let needle = ip.to_string();

    // First line is the column header
    for line in table.lines().skip(1) {
        let mut fields = line.split_whitespace();
        let (Some(address), Some(_hw_type), Some(flags), Some(hw_address)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            continue;
        };

        if address != needle {
            continue;
        }

        // Flags 0x0 marks an incomplete entry
        if flags == "0x0" || hw_address == "00:00:00:00:00:00" {
            continue;
        }

        return Some(hw_address.to_string());
    }

    None
}
