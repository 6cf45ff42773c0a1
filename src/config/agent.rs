//! Nomad agent configuration model
//!
//! Every setting is optional so a configuration loaded from a single file
//! reports only what that file says. Keys without a typed field are carried
//! in each block's `extra` map and written back out unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Top-level agent configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_addr: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_json: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_rotate_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_rotate_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_rotate_max_files: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_debug: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_syslog: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syslog_facility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leave_on_interrupt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leave_on_terminate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_update_check: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_anonymous_signature: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<Ports>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Addresses>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertise: Option<Addresses>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acl: Option<AclConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<TelemetryConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consul: Option<ConsulConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault: Option<VaultConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiConfig>,

    /// `plugin "<name>" { ... }` blocks, keyed by plugin name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub plugin: BTreeMap<String, PluginConfig>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub http_api_response_headers: BTreeMap<String, String>,

    /// Source files this configuration was assembled from. Filled by the
    /// loader; a `files` key in a configuration file is ignored.
    #[serde(skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,

    /// Settings this model does not name, kept as written.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ports {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serf: Option<u16>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Shared shape of the `addresses` and `advertise` blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Addresses {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serf: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alloc_dir: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_pool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_speed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_total_compute: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_total_mb: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_kill_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gc_interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gc_max_allocs: Option<u32>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved: Option<Resources>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_join: Option<ServerJoin>,
    /// `host_volume "<name>" { ... }` blocks, keyed by volume name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub host_volume: BTreeMap<String, HostVolume>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_ports: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostVolume {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_expect: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_schedulers: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enabled_schedulers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authoritative_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raft_protocol: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartbeat_grace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_gc_threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_gc_threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_gc_threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejoin_after_leave: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_join: Option<ServerJoin>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerJoin {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub retry_join: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_interval: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub start_join: Vec<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AclConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replication_token: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_hostname: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_node_name: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_allocation_metrics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_node_metrics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prometheus_metrics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statsd_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statsite_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datadog_address: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsulConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_ssl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_advertise: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_auto_join: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_auto_join: Option<bool>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_from_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_token_ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_skip_verify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_server_hostname: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_https_client: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_upgrade_mode: Option<bool>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A task driver or device plugin block. The `config` body is free-form and
/// owned by the plugin, so it is kept as a raw value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
