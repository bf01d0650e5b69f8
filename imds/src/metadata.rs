use crate::document::{ConfigDocument, META_DATA_KEY};
use crate::errors::{Error, Result};

/// Synthetic identity marker served for the `instance-id` key.
///
/// Never read from the document; cloud-init's CloudStack/EC2 datasource
/// probes for it before asking for anything else.
pub const INSTANCE_ID: &str = "iid-datasource-cloudstack";

pub const CONTENT_TYPE: &str = "text/plain";

/// Renders the `meta-data` section for one requested key.
///
/// The empty key is a directory listing: `instance-id` followed by every
/// document key, sorted for deterministic output. An unknown key is
/// `NotFound`, never a server error.
pub fn render(document: &ConfigDocument, key: &str) -> Result<String> {
    if key == "instance-id" {
        return Ok(INSTANCE_ID.to_string());
    }

    let meta_data = document
        .meta_data
        .as_ref()
        .ok_or(Error::MissingSection(META_DATA_KEY))?;

    if key.is_empty() {
        let mut listing = String::from("instance-id\n");
        for key in meta_data.keys() {
            listing.push_str(key);
            listing.push('\n');
        }
        return Ok(listing);
    }

    meta_data.get(key).cloned().ok_or(Error::NotFound)
}
