//! Field-wise merging of agent configurations
//!
//! `a.merge(b)` overlays every setting `b` defines on top of `a`. Unset values
//! in `b` never clear values in `a`.

use serde_json::Value;
use std::collections::BTreeMap;

use super::agent::{
    AclConfig, Addresses, ClientConfig, Config, ConsulConfig, HostVolume, PluginConfig, Ports,
    Resources, ServerConfig, ServerJoin, TelemetryConfig, TlsConfig, UiConfig, VaultConfig,
};

pub trait Merge {
    fn merge(&mut self, other: Self);
}

/// Overlay the listed `Option` fields of `$other` onto `$base`.
macro_rules! overlay {
    ($base:expr, $other:expr; $($field:ident),+ $(,)?) => {
        $(
            if $other.$field.is_some() {
                $base.$field = $other.$field;
            }
        )+
    };
}

fn merge_block<T: Merge>(base: &mut Option<T>, other: Option<T>) {
    if let Some(incoming) = other {
        match base {
            Some(existing) => existing.merge(incoming),
            None => *base = Some(incoming),
        }
    }
}

fn merge_list(base: &mut Vec<String>, other: Vec<String>) {
    if !other.is_empty() {
        *base = other;
    }
}

fn merge_strings(base: &mut BTreeMap<String, String>, other: BTreeMap<String, String>) {
    base.extend(other);
}

fn merge_keyed<T: Merge>(base: &mut BTreeMap<String, T>, other: BTreeMap<String, T>) {
    for (key, incoming) in other {
        match base.get_mut(&key) {
            Some(existing) => existing.merge(incoming),
            None => {
                base.insert(key, incoming);
            }
        }
    }
}

fn merge_extra(base: &mut BTreeMap<String, Value>, other: BTreeMap<String, Value>) {
    for (key, incoming) in other {
        match base.get_mut(&key) {
            Some(existing) => merge_value(existing, incoming),
            None => {
                base.insert(key, incoming);
            }
        }
    }
}

/// Deep-merge two JSON values: objects merge key by key, anything else is
/// replaced by `incoming`.
pub fn merge_value(base: &mut Value, incoming: Value) {
    match (base, incoming) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) => merge_value(slot, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

impl Merge for Config {
    fn merge(&mut self, other: Self) {
        overlay!(self, other;
            region, datacenter, name, data_dir, plugin_dir, bind_addr,
            log_level, log_json, log_file, log_rotate_duration, log_rotate_bytes,
            log_rotate_max_files, enable_debug, enable_syslog, syslog_facility,
            leave_on_interrupt, leave_on_terminate, disable_update_check,
            disable_anonymous_signature,
        );
        merge_block(&mut self.ports, other.ports);
        merge_block(&mut self.addresses, other.addresses);
        merge_block(&mut self.advertise, other.advertise);
        merge_block(&mut self.client, other.client);
        merge_block(&mut self.server, other.server);
        merge_block(&mut self.acl, other.acl);
        merge_block(&mut self.telemetry, other.telemetry);
        merge_block(&mut self.consul, other.consul);
        merge_block(&mut self.vault, other.vault);
        merge_block(&mut self.tls, other.tls);
        merge_block(&mut self.ui, other.ui);
        merge_keyed(&mut self.plugin, other.plugin);
        merge_strings(&mut self.http_api_response_headers, other.http_api_response_headers);
        self.files.extend(other.files);
        merge_extra(&mut self.extra, other.extra);
    }
}

impl Merge for Ports {
    fn merge(&mut self, other: Self) {
        overlay!(self, other; http, rpc, serf);
        merge_extra(&mut self.extra, other.extra);
    }
}

impl Merge for Addresses {
    fn merge(&mut self, other: Self) {
        overlay!(self, other; http, rpc, serf);
        merge_extra(&mut self.extra, other.extra);
    }
}

impl Merge for ClientConfig {
    fn merge(&mut self, other: Self) {
        overlay!(self, other;
            enabled, state_dir, alloc_dir, node_class, node_pool, network_interface,
            network_speed, cpu_total_compute, memory_total_mb, max_kill_timeout,
            gc_interval, gc_max_allocs,
        );
        merge_list(&mut self.servers, other.servers);
        merge_strings(&mut self.meta, other.meta);
        merge_strings(&mut self.options, other.options);
        merge_block(&mut self.reserved, other.reserved);
        merge_block(&mut self.server_join, other.server_join);
        merge_keyed(&mut self.host_volume, other.host_volume);
        merge_extra(&mut self.extra, other.extra);
    }
}

impl Merge for Resources {
    fn merge(&mut self, other: Self) {
        overlay!(self, other; cpu, cores, memory, disk, reserved_ports);
        merge_extra(&mut self.extra, other.extra);
    }
}

impl Merge for HostVolume {
    fn merge(&mut self, other: Self) {
        overlay!(self, other; path, read_only);
        merge_extra(&mut self.extra, other.extra);
    }
}

impl Merge for ServerConfig {
    fn merge(&mut self, other: Self) {
        overlay!(self, other;
            enabled, bootstrap_expect, data_dir, num_schedulers, authoritative_region,
            raft_protocol, heartbeat_grace, node_gc_threshold, job_gc_threshold,
            eval_gc_threshold, rejoin_after_leave, encrypt,
        );
        merge_list(&mut self.enabled_schedulers, other.enabled_schedulers);
        merge_block(&mut self.server_join, other.server_join);
        merge_extra(&mut self.extra, other.extra);
    }
}

impl Merge for ServerJoin {
    fn merge(&mut self, other: Self) {
        overlay!(self, other; retry_max, retry_interval);
        merge_list(&mut self.retry_join, other.retry_join);
        merge_list(&mut self.start_join, other.start_join);
        merge_extra(&mut self.extra, other.extra);
    }
}

impl Merge for AclConfig {
    fn merge(&mut self, other: Self) {
        overlay!(self, other; enabled, token_ttl, policy_ttl, role_ttl, replication_token);
        merge_extra(&mut self.extra, other.extra);
    }
}

impl Merge for TelemetryConfig {
    fn merge(&mut self, other: Self) {
        overlay!(self, other;
            collection_interval, disable_hostname, use_node_name,
            publish_allocation_metrics, publish_node_metrics, prometheus_metrics,
            statsd_address, statsite_address, datadog_address,
        );
        merge_extra(&mut self.extra, other.extra);
    }
}

impl Merge for ConsulConfig {
    fn merge(&mut self, other: Self) {
        overlay!(self, other;
            address, token, auth, ssl, verify_ssl, ca_file, cert_file, key_file,
            server_service_name, client_service_name, auto_advertise,
            server_auto_join, client_auto_join,
        );
        merge_extra(&mut self.extra, other.extra);
    }
}

impl Merge for VaultConfig {
    fn merge(&mut self, other: Self) {
        overlay!(self, other;
            enabled, address, token, create_from_role, task_token_ttl,
            tls_skip_verify, ca_file, cert_file, key_file,
        );
        merge_extra(&mut self.extra, other.extra);
    }
}

impl Merge for TlsConfig {
    fn merge(&mut self, other: Self) {
        overlay!(self, other;
            http, rpc, ca_file, cert_file, key_file, verify_server_hostname,
            verify_https_client, rpc_upgrade_mode,
        );
        merge_extra(&mut self.extra, other.extra);
    }
}

impl Merge for UiConfig {
    fn merge(&mut self, other: Self) {
        overlay!(self, other; enabled);
        merge_extra(&mut self.extra, other.extra);
    }
}

impl Merge for PluginConfig {
    fn merge(&mut self, other: Self) {
        merge_list(&mut self.args, other.args);
        if let Some(incoming) = other.config {
            match &mut self.config {
                Some(existing) => merge_value(existing, incoming),
                None => self.config = Some(incoming),
            }
        }
        merge_extra(&mut self.extra, other.extra);
    }
}
