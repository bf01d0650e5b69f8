use crate::errors::{Error, Result};
use crate::identity::ClientIdentity;
use std::path::PathBuf;

/// Name of the fallback document served to identities without their own file
pub const DEFAULT_DOCUMENT: &str = "default";

/// Read-only document store, one file per client identity plus `default`.
///
/// The directory is populated by an external provisioning process; this
/// service never writes to it, so concurrent reads need no coordination.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    base_dir: PathBuf,
}

impl DocumentStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Loads the identity-specific document, falling back to `default`.
    ///
    /// A missing or unreadable `default` surfaces as `ConfigRead`; it is
    /// never masked.
    pub async fn load(&self, identity: &ClientIdentity) -> Result<Vec<u8>> {
        let name = sanitized(identity)?;

        let specific = self.base_dir.join(name);
        let path = match tokio::fs::metadata(&specific).await {
            Ok(metadata) if metadata.is_file() => specific,
            _ => self.base_dir.join(DEFAULT_DOCUMENT),
        };

        tokio::fs::read(&path).await.map_err(|source| Error::ConfigRead {
            identity: identity.to_string(),
            source,
        })
    }
}

/// The identity can originate from a client-controlled header or address
/// string, so anything that is not a single plain path component is
/// rejected before a lookup path is built from it.
fn sanitized(identity: &ClientIdentity) -> Result<&str> {
    let name = identity.as_str();
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
    {
        return Err(Error::InvalidIdentity(name.to_string()));
    }

    Ok(name)
}
