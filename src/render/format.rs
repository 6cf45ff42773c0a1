//! JSON and template formatting of loaded configurations

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::FormatError;

/// Output format selected by the `--json` and `--template` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat<'a> {
    Json,
    Template(&'a str),
}

impl<'a> OutputFormat<'a> {
    /// Select a format. `Ok(None)` means no formatting was requested; asking
    /// for both JSON and a template is an error.
    pub fn from_flags(json: bool, template: &'a str) -> Result<Option<Self>, FormatError> {
        match (json, template.is_empty()) {
            (true, false) => Err(FormatError::Conflict),
            (true, true) => Ok(Some(OutputFormat::Json)),
            (false, false) => Ok(Some(OutputFormat::Template(template))),
            (false, true) => Ok(None),
        }
    }

    pub fn render<T: Serialize>(&self, data: &T) -> Result<String, FormatError> {
        match self {
            OutputFormat::Json => render_json(data),
            OutputFormat::Template(template) => render_template(template, data),
        }
    }
}

/// Format `data` as JSON or through `template`. Returns an empty string when
/// neither is requested.
pub fn format<T: Serialize>(json: bool, template: &str, data: &T) -> Result<String, FormatError> {
    match OutputFormat::from_flags(json, template)? {
        Some(format) => format.render(data),
        None => Ok(String::new()),
    }
}

/// Pretty-print with four-space indentation.
pub fn render_json<T: Serialize>(data: &T) -> Result<String, FormatError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut ser).map_err(FormatError::Json)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Render a handlebars template. Missing fields are errors and output is not
/// HTML-escaped.
pub fn render_template<T: Serialize>(template: &str, data: &T) -> Result<String, FormatError> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);
    Ok(registry.render_template(template, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::agent::{ClientConfig, Config};

    fn sample() -> Config {
        Config {
            datacenter: Some("dc1".to_string()),
            client: Some(ClientConfig {
                enabled: Some(true),
                servers: vec!["10.0.0.1:4647".to_string(), "10.0.0.2:4647".to_string()],
                ..ClientConfig::default()
            }),
            ..Config::default()
        }
    }

    #[test]
    fn test_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, "").expect("ok"), None);
        assert_eq!(OutputFormat::from_flags(true, "").expect("ok"), Some(OutputFormat::Json));
        assert_eq!(
            OutputFormat::from_flags(false, "{{datacenter}}").expect("ok"),
            Some(OutputFormat::Template("{{datacenter}}"))
        );
        assert!(matches!(OutputFormat::from_flags(true, "x"), Err(FormatError::Conflict)));
    }

    #[test]
    fn test_no_format_is_empty() {
        assert_eq!(format(false, "", &sample()).expect("format"), "");
    }

    #[test]
    fn test_json_uses_four_space_indent_and_omits_unset() {
        let out = format(true, "", &sample()).expect("format");
        let expected = r#"{
    "datacenter": "dc1",
    "client": {
        "enabled": true,
        "servers": [
            "10.0.0.1:4647",
            "10.0.0.2:4647"
        ]
    }
}"#;
        similar_asserts::assert_eq!(out, expected);
    }

    #[test]
    fn test_template_renders_fields() {
        let out = format(
            false,
            "{{datacenter}} client={{client.enabled}}{{#each client.servers}} {{this}}{{/each}}",
            &sample(),
        )
        .expect("format");
        assert_eq!(out, "dc1 client=true 10.0.0.1:4647 10.0.0.2:4647");
    }

    #[test]
    fn test_template_is_not_html_escaped() {
        let config = Config { name: Some("a&b<c>".to_string()), ..Config::default() };
        assert_eq!(format(false, "{{name}}", &config).expect("format"), "a&b<c>");
    }

    #[test]
    fn test_template_missing_field_is_error() {
        let err = format(false, "{{region}}", &sample()).expect_err("strict mode");
        assert!(matches!(err, FormatError::Template(_)));
    }

    #[test]
    fn test_malformed_template_is_error() {
        assert!(format(false, "{{#if datacenter}}open", &sample()).is_err());
    }

    #[test]
    fn test_json_and_template_conflict() {
        let err = format(true, "{{datacenter}}", &sample()).expect_err("conflict");
        assert!(err.to_string().contains("both json and template"));
    }
}
