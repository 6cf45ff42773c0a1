//! Agent configuration file loading

use serde_json::Value;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::agent::Config;
use super::body;
use super::compat;
use super::merge::Merge;
use crate::error::LoadError;

/// Load a configuration file, or every configuration file in a directory.
///
/// The loaded path is recorded in [`Config::files`].
pub fn load_config(path: &Path) -> Result<Config, LoadError> {
    let metadata =
        fs::metadata(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;

    if metadata.is_dir() {
        return load_config_dir(path);
    }

    let cleaned = clean_path(path);
    let mut config = parse_config_file(&cleaned)?;
    config.files.push(cleaned.display().to_string());
    Ok(config)
}

/// Load all `.hcl` and `.json` files directly inside `dir`, in name order,
/// merging each onto the previous ones. Subdirectories are not descended.
pub fn load_config_dir(dir: &Path) -> Result<Config, LoadError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| LoadError::Io {
            path: err.path().unwrap_or(dir).to_path_buf(),
            source: err.into(),
        })?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if is_temporary_file(&name) {
            tracing::debug!("Skipping editor temporary file {}", entry.path().display());
            continue;
        }
        if !has_config_extension(entry.path()) {
            tracing::debug!("Skipping non-configuration file {}", entry.path().display());
            continue;
        }
        files.push(clean_path(entry.path()));
    }

    let mut result = Config::default();
    if files.is_empty() {
        tracing::debug!("No configuration files found in {}", dir.display());
        return Ok(result);
    }

    for file in files {
        let mut config = parse_config_file(&file)?;
        config.files.push(file.display().to_string());
        result.merge(config);
    }
    Ok(result)
}

/// Decode a single file. `.json` files are read as JSON, anything else as HCL.
///
/// JSON block arrays are collapsed into objects first, and a top-level
/// `files` key is dropped since only the loader records source files.
pub fn parse_config_file(path: &Path) -> Result<Config, LoadError> {
    tracing::debug!("Loading configuration from {}", path.display());

    let content = fs::read_to_string(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    let mut raw = match ext.as_str() {
        "json" => serde_json::from_str::<Value>(&content)
            .map(compat::collapse_block_lists)
            .map_err(|source| LoadError::Json { path: path.to_path_buf(), source })?,
        _ => body::decode(&content, path)?,
    };

    if let Some(map) = raw.as_object_mut() {
        if map.remove("files").is_some() {
            tracing::debug!("Ignoring `files` set in {}", path.display());
        }
    }

    serde_json::from_value(raw)
        .map_err(|source| LoadError::Schema { path: path.to_path_buf(), source })
}

fn has_config_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("hcl" | "json")
    )
}

/// Emacs lock/autosave files and backup files.
fn is_temporary_file(name: &str) -> bool {
    name.starts_with(".#")
        || name.ends_with('~')
        || (name.len() > 1 && name.starts_with('#') && name.ends_with('#'))
}

/// Lexically normalize a path: drop `.` components and duplicate separators,
/// and fold `..` into the preceding name. `..` directly under the root is
/// dropped; leading `..` in a relative path is kept.
fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(Component::Normal(_))) {
                    parts.pop();
                } else if !matches!(parts.last(), Some(Component::RootDir | Component::Prefix(_))) {
                    parts.push(component);
                }
            }
            other => parts.push(other),
        }
    }

    let cleaned: PathBuf = parts.iter().collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const AGENT_HCL: &str = r#"
region     = "europe"
datacenter = "dc1"
data_dir   = "/opt/nomad/data"

ports {
  http = 4646
  rpc  = 4647
}

client {
  enabled    = true
  node_class = "batch"
  meta {
    rack = "r1"
  }
  host_volume "certs" {
    path      = "/etc/ssl/certs"
    read_only = true
  }
}

plugin "docker" {
  config {
    allow_privileged = false
  }
}
"#;

    #[test]
    fn test_load_hcl_config() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("agent.hcl");
        fs::write(&path, AGENT_HCL).expect("write");

        let cfg = load_config(&path).expect("config");
        assert_eq!(cfg.region.as_deref(), Some("europe"));
        assert_eq!(cfg.ports.as_ref().and_then(|p| p.http), Some(4646));

        let client = cfg.client.as_ref().expect("client");
        assert_eq!(client.enabled, Some(true));
        assert_eq!(client.meta.get("rack").map(String::as_str), Some("r1"));
        assert_eq!(client.host_volume["certs"].read_only, Some(true));

        assert!(cfg.plugin.contains_key("docker"));
        assert_eq!(cfg.files, vec![path.display().to_string()]);
    }

    #[test]
    fn test_load_json_config() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("agent.json");
        let json = r#"{"datacenter": "dc2", "server": {"enabled": true, "bootstrap_expect": 3}}"#;
        fs::write(&path, json).expect("write");

        let cfg = load_config(&path).expect("config");
        assert_eq!(cfg.datacenter.as_deref(), Some("dc2"));
        let server = cfg.server.expect("server");
        assert_eq!(server.bootstrap_expect, Some(3));
    }

    #[test]
    fn test_missing_path_is_io_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("nope.hcl");

        let err = load_config(&path).expect_err("missing file");
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("nope.hcl"));
    }

    #[test]
    fn test_unmodelled_settings_are_kept() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("agent.hcl");
        fs::write(
            &path,
            r#"
datacenter = "dc1"
autopilot {
  cleanup_dead_servers = true
}
limits {
  http_max_conns_per_client = 100
}
client {
  enabled  = true
  cni_path = "/opt/cni/bin"
}
server {
  raft_multiplier = 2
}
consul {
  grpc_address = "127.0.0.1:8502"
}
vault {
  namespace = "ops"
}
"#,
        )
        .expect("write");

        let cfg = load_config(&path).expect("config");
        assert_eq!(cfg.datacenter.as_deref(), Some("dc1"));
        assert_eq!(cfg.extra["autopilot"], serde_json::json!({"cleanup_dead_servers": true}));
        assert_eq!(cfg.extra["limits"], serde_json::json!({"http_max_conns_per_client": 100}));

        let client = cfg.client.as_ref().expect("client");
        assert_eq!(client.enabled, Some(true));
        assert_eq!(client.extra["cni_path"], "/opt/cni/bin");
        assert_eq!(cfg.server.as_ref().expect("server").extra["raft_multiplier"], 2);
        assert_eq!(cfg.consul.as_ref().expect("consul").extra["grpc_address"], "127.0.0.1:8502");
        assert_eq!(cfg.vault.as_ref().expect("vault").extra["namespace"], "ops");

        let printed = serde_json::to_value(&cfg).expect("serialize");
        assert_eq!(printed["autopilot"]["cleanup_dead_servers"], true);
        assert_eq!(printed["client"]["cni_path"], "/opt/cni/bin");
        assert_eq!(printed["consul"]["grpc_address"], "127.0.0.1:8502");
    }

    #[test]
    fn test_wrong_type_is_schema_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.hcl");
        fs::write(&path, "ports {\n  http = \"not-a-port\"\n}\n").expect("write");

        let err = load_config(&path).expect_err("wrong type");
        assert!(matches!(err, LoadError::Schema { .. }));
    }

    #[test]
    fn test_files_cannot_be_set_by_configuration() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("agent.json");
        fs::write(&path, r#"{"datacenter": "dc1", "files": ["other.hcl"]}"#).expect("write");

        let cfg = load_config(&path).expect("config");
        assert_eq!(cfg.files, vec![path.display().to_string()]);
        assert!(!cfg.extra.contains_key("files"));
    }

    #[test]
    fn test_json_block_arrays() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("agent.json");
        let json = r#"{
  "client": [{"enabled": true, "servers": ["10.0.0.1:4647"]}],
  "plugin": [{"docker": [{"config": [{"allow_privileged": true}]}]}]
}"#;
        fs::write(&path, json).expect("write");

        let cfg = load_config(&path).expect("config");
        let client = cfg.client.as_ref().expect("client");
        assert_eq!(client.enabled, Some(true));
        assert_eq!(client.servers, vec!["10.0.0.1:4647".to_string()]);
        assert!(cfg.plugin.contains_key("docker"));
    }

    #[test]
    fn test_hcl1_quoted_option_keys() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("agent.hcl");
        fs::write(&path, "client {\n  options {\n    \"driver.raw_exec.enable\" = \"1\"\n  }\n}\n")
            .expect("write");

        let cfg = load_config(&path).expect("config");
        let client = cfg.client.expect("client");
        assert_eq!(client.options.get("driver.raw_exec.enable").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_invalid_json_syntax() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{\"datacenter\": ").expect("write");

        let err = load_config(&path).expect_err("bad json");
        assert!(matches!(err, LoadError::Json { .. }));
    }

    #[test]
    fn test_load_dir_merges_in_name_order() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("01-base.hcl"), "datacenter = \"dc1\"\nregion = \"global\"\n")
            .expect("write");
        fs::write(tmp.path().join("02-override.json"), r#"{"datacenter": "dc2"}"#)
            .expect("write");
        fs::write(tmp.path().join("README.md"), "not config").expect("write");
        fs::write(tmp.path().join("03-scratch.hcl~"), "datacenter = \"dc9\"").expect("write");
        fs::write(tmp.path().join(".#04-lock.hcl"), "datacenter = \"dc9\"").expect("write");
        fs::create_dir(tmp.path().join("nested.hcl")).expect("mkdir");

        let cfg = load_config(tmp.path()).expect("config");
        assert_eq!(cfg.datacenter.as_deref(), Some("dc2"));
        assert_eq!(cfg.region.as_deref(), Some("global"));
        assert_eq!(cfg.files.len(), 2);
        assert!(cfg.files[0].ends_with("01-base.hcl"));
        assert!(cfg.files[1].ends_with("02-override.json"));
    }

    #[test]
    fn test_load_empty_dir_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = load_config(tmp.path()).expect("config");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_is_temporary_file() {
        assert!(is_temporary_file(".#agent.hcl"));
        assert!(is_temporary_file("agent.hcl~"));
        assert!(is_temporary_file("#agent.hcl#"));
        assert!(!is_temporary_file("agent.hcl"));
        assert!(!is_temporary_file("#"));
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(Path::new("./conf//agent.hcl")), PathBuf::from("conf/agent.hcl"));
        assert_eq!(clean_path(Path::new(".")), PathBuf::from("."));
        assert_eq!(clean_path(Path::new("a/../b.hcl")), PathBuf::from("b.hcl"));
        assert_eq!(clean_path(Path::new("conf/agent/")), PathBuf::from("conf/agent"));
        assert_eq!(clean_path(Path::new("../x.hcl")), PathBuf::from("../x.hcl"));
        assert_eq!(clean_path(Path::new("../../x.hcl")), PathBuf::from("../../x.hcl"));
        assert_eq!(clean_path(Path::new("/../etc/x.hcl")), PathBuf::from("/etc/x.hcl"));
        assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
    }
}
