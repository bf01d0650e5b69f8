use crate::errors::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const META_DATA_KEY: &str = "meta-data";
pub const USER_DATA_KEY: &str = "user-data";

/// Encoding of the stored documents, fixed per deployment
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
}

/// Decoded per-client configuration, recomputed fresh for every request.
///
/// A section that is absent from the document is `None`; only requests
/// touching that section fail, at render time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigDocument {
    /// Flat instance attributes (hostname and friends)
    pub meta_data: Option<BTreeMap<String, String>>,
    /// Opaque cloud-config mapping, re-serializable without loss
    pub user_data: Option<serde_json::Map<String, Value>>,
}

/// Decodes and validates one stored document.
///
/// The shape is checked explicitly rather than assumed: a non-mapping root,
/// a non-mapping section, or a non-string metadata value is a `Parse`
/// failure, never a panic later in the pipeline.
pub fn parse(bytes: &[u8], format: DocumentFormat) -> Result<ConfigDocument> {
    let root: Value = match format {
        DocumentFormat::Json => {
            serde_json::from_slice(bytes).map_err(|e| Error::Parse(e.to_string()))?
        }
        DocumentFormat::Yaml => {
            serde_yaml::from_slice(bytes).map_err(|e| Error::Parse(e.to_string()))?
        }
    };

    let Value::Object(mut root) = root else {
        return Err(Error::Parse("document root is not a mapping".into()));
    };

    let meta_data = root.remove(META_DATA_KEY).map(parse_meta_data).transpose()?;
    let user_data = root.remove(USER_DATA_KEY).map(parse_user_data).transpose()?;

    Ok(ConfigDocument {
        meta_data,
        user_data,
    })
}

fn parse_meta_data(value: Value) -> Result<BTreeMap<String, String>> {
    let Value::Object(map) = value else {
        return Err(Error::Parse(format!("{META_DATA_KEY} is not a mapping")));
    };

    map.into_iter()
        .map(|(key, value)| match value {
            Value::String(value) => Ok((key, value)),
            other => Err(Error::Parse(format!(
                "{META_DATA_KEY} value for {key} is not a string: {other}"
            ))),
        })
        .collect()
}

fn parse_user_data(value: Value) -> Result<serde_json::Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::Parse(format!("{USER_DATA_KEY} is not a mapping"))),
    }
}
