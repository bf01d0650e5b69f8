use crate::config::{UserDataConfig, UserDataOutput};
use crate::document::{ConfigDocument, USER_DATA_KEY};
use crate::errors::{Error, Result};
use serde_json::{Value, json};

/// Header line cloud-init expects on a YAML cloud-config body
pub const CLOUD_CONFIG_HEADER: &str = "#cloud-config";

pub const YAML_CONTENT_TYPE: &str = "text/yaml";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Rendered user-data body plus the content type to declare
#[derive(Debug, PartialEq)]
pub struct RenderedUserData {
    pub body: String,
    pub content_type: &'static str,
}

/// Re-encodes the `user-data` mapping for the consuming cloud-init client.
///
/// When enabled, a fixed datasource directive is injected so the client
/// does not treat this emulated datasource as strict.
pub fn render(document: &ConfigDocument, options: &UserDataConfig) -> Result<RenderedUserData> {
    let user_data = document
        .user_data
        .as_ref()
        .ok_or(Error::MissingSection(USER_DATA_KEY))?;

    let mut user_data = user_data.clone();
    if options.inject_datasource {
        user_data.insert(
            "datasource".to_string(),
            json!({ "Ec2": { "strict_id": false } }),
        );
    }

    match options.output {
        UserDataOutput::CloudConfig => {
            let yaml = serde_yaml::to_string(&Value::Object(user_data))
                .map_err(|e| Error::Render(e.to_string()))?;
            Ok(RenderedUserData {
                body: format!("{CLOUD_CONFIG_HEADER}\n{yaml}"),
                content_type: YAML_CONTENT_TYPE,
            })
        }
        UserDataOutput::Json => {
            let body = serde_json::to_string(&Value::Object(user_data))
                .map_err(|e| Error::Render(e.to_string()))?;
            Ok(RenderedUserData {
                body,
                content_type: JSON_CONTENT_TYPE,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentFormat, parse};
    use crate::testutils::SAMPLE_JSON;

    fn sample_document() -> ConfigDocument {
        parse(SAMPLE_JSON.as_bytes(), DocumentFormat::Json).unwrap()
    }

    fn options(output: UserDataOutput, inject_datasource: bool) -> UserDataConfig {
        UserDataConfig {
            output,
            inject_datasource,
        }
    }

    #[test]
    fn test_cloud_config_output() {
        let rendered = render(
            &sample_document(),
            &options(UserDataOutput::CloudConfig, true),
        )
        .unwrap();

        assert_eq!(rendered.content_type, YAML_CONTENT_TYPE);

        let mut lines = rendered.body.lines();
        assert_eq!(lines.next(), Some(CLOUD_CONFIG_HEADER));

        // Round trip: body minus the header equals the original mapping
        // plus the injected directive
        let yaml_body = rendered
            .body
            .strip_prefix(CLOUD_CONFIG_HEADER)
            .unwrap()
            .trim_start();
        let reparsed: Value = serde_yaml::from_str(yaml_body).unwrap();
        assert_eq!(
            reparsed,
            json!({
                "packages": ["curl"],
                "datasource": { "Ec2": { "strict_id": false } },
            })
        );
    }

    #[test]
    fn test_json_output_has_no_header() {
        let rendered = render(&sample_document(), &options(UserDataOutput::Json, true)).unwrap();

        assert_eq!(rendered.content_type, JSON_CONTENT_TYPE);
        assert!(!rendered.body.starts_with(CLOUD_CONFIG_HEADER));

        let reparsed: Value = serde_json::from_str(&rendered.body).unwrap();
        assert_eq!(
            reparsed,
            json!({
                "packages": ["curl"],
                "datasource": { "Ec2": { "strict_id": false } },
            })
        );
    }

    #[test]
    fn test_directive_injection_is_optional() {
        let rendered =
            render(&sample_document(), &options(UserDataOutput::Json, false)).unwrap();

        let reparsed: Value = serde_json::from_str(&rendered.body).unwrap();
        assert_eq!(reparsed, json!({ "packages": ["curl"] }));
    }

    #[test]
    fn test_missing_section_is_a_server_error() {
        let err = render(
            &ConfigDocument::default(),
            &options(UserDataOutput::CloudConfig, true),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingSection(USER_DATA_KEY)));
    }
}
