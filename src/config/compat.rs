//! HCL1-era syntax support
//!
//! Nomad agent files predate HCL2. Two older forms need adjusting before the
//! decoders see them: quoted attribute keys such as
//! `"driver.raw_exec.enable" = "1"`, which HCL2 only allows inside object
//! expressions, and the JSON encoding that wraps every block in an array.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::borrow::Cow;

use super::merge::merge_value;

const QUOTED_KEY_PREFIX: &str = "quoted_key__";

static QUOTED_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\s*)"((?:[^"\\]|\\.)*)"(\s*=)([^=]|$)"#).expect("valid quoted key regex")
});

static HEREDOC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<<-?([A-Za-z_][A-Za-z0-9_-]*)\s*$").expect("valid heredoc regex"));

/// Replace quoted attribute keys with identifiers that [`restore_key`] maps
/// back. Line structure is preserved so parse errors keep their positions.
/// Heredoc bodies are left untouched.
pub fn rewrite_quoted_keys(input: &str) -> Cow<'_, str> {
    if !input.contains('"') {
        return Cow::Borrowed(input);
    }

    let mut changed = false;
    let mut heredoc: Option<String> = None;
    let mut out = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if let Some(marker) = &heredoc {
            if line.trim() == marker.as_str() {
                heredoc = None;
            }
            out.push_str(line);
            continue;
        }

        let (text, newline) = line.strip_suffix('\n').map_or((line, ""), |t| (t, "\n"));
        let rewritten = QUOTED_KEY_RE.replace(text, |caps: &Captures| {
            format!("{}{}{}{}", &caps[1], encode_key(&unescape(&caps[2])), &caps[3], &caps[4])
        });
        if matches!(rewritten, Cow::Owned(_)) {
            changed = true;
        }
        if let Some(caps) = HEREDOC_RE.captures(&rewritten) {
            heredoc = Some(caps[1].to_string());
        }
        out.push_str(&rewritten);
        out.push_str(newline);
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(input)
    }
}

/// Undo [`rewrite_quoted_keys`] for a single key. Other keys pass through.
pub fn restore_key(key: &str) -> Cow<'_, str> {
    let Some(hex) = key.strip_prefix(QUOTED_KEY_PREFIX) else {
        return Cow::Borrowed(key);
    };
    decode_hex(hex)
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .map_or(Cow::Borrowed(key), Cow::Owned)
}

/// Collapse JSON block arrays (`"client": [{"enabled": true}]`) into objects.
/// Arrays made only of objects are deep-merged in order; other arrays keep
/// their shape.
pub fn collapse_block_lists(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, collapse_block_lists(v))).collect())
        }
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
            let mut merged = Value::Object(Map::new());
            for item in items {
                merge_value(&mut merged, collapse_block_lists(item));
            }
            merged
        }
        Value::Array(items) => Value::Array(items.into_iter().map(collapse_block_lists).collect()),
        other => other,
    }
}

fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(QUOTED_KEY_PREFIX.len() + key.len() * 2);
    encoded.push_str(QUOTED_KEY_PREFIX);
    for byte in key.bytes() {
        encoded.push_str(&format!("{:02x}", byte));
    }
    encoded
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| hex.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}

fn unescape(raw: &str) -> String {
    raw.replace("\\\"", "\"").replace("\\\\", "\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quoted_keys_rewritten_and_restored() {
        let input = "options {\n  \"driver.raw_exec.enable\" = \"1\"\n}\n";
        let rewritten = rewrite_quoted_keys(input);
        assert!(!rewritten.contains("\"driver.raw_exec.enable\""));
        assert_eq!(rewritten.lines().count(), input.lines().count());

        let key = rewritten
            .lines()
            .nth(1)
            .and_then(|line| line.split('=').next())
            .map(str::trim)
            .expect("key");
        assert_eq!(restore_key(key), "driver.raw_exec.enable");
    }

    #[test]
    fn test_plain_input_is_borrowed() {
        let input = "datacenter = \"dc1\"\nclient {\n  enabled = true\n}\n";
        assert!(matches!(rewrite_quoted_keys(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_string_values_and_comparisons_untouched() {
        let input = "servers = [\n  \"a:4647\",\n  \"b:4647\"\n]\nx = \"a\" == \"b\"\n";
        assert!(matches!(rewrite_quoted_keys(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_heredoc_body_untouched() {
        let input = "banner = <<EOF\n\"not\" = \"a key\"\nEOF\n\"real.key\" = 1\n";
        let rewritten = rewrite_quoted_keys(input);
        assert!(rewritten.contains("\"not\" = \"a key\""));
        assert!(!rewritten.contains("\"real.key\""));
    }

    #[test]
    fn test_restore_key_passes_plain_keys() {
        assert_eq!(restore_key("datacenter"), "datacenter");
        assert_eq!(restore_key("quoted_key__zz"), "quoted_key__zz");
    }

    #[test]
    fn test_collapse_block_lists() {
        let value = json!({
            "client": [{"enabled": true, "servers": ["10.0.0.1:4647"]}],
            "plugin": [
                {"docker": [{"config": [{"allow_privileged": true}]}]},
                {"raw_exec": [{"config": [{"enabled": true}]}]}
            ],
            "empty": []
        });
        similar_asserts::assert_eq!(
            collapse_block_lists(value),
            json!({
                "client": {"enabled": true, "servers": ["10.0.0.1:4647"]},
                "plugin": {
                    "docker": {"config": {"allow_privileged": true}},
                    "raw_exec": {"config": {"enabled": true}}
                },
                "empty": []
            })
        );
    }
}
