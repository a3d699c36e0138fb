//! Routing table lookup: logical node name -> host:port.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum RoutingError {
    #[error("cannot read routing config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid routing config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("node '{0}' not present in routing table")]
    KeyNotFound(String),
    #[error("address '{address}' for node '{node}' is malformed: {reason}")]
    MalformedAddress {
        node: String,
        address: String,
        reason: String,
    },
}

/// On-disk shape of the shared routing config. Only the address map is
/// consumed here; other sections belong to the server side.
#[derive(Debug, Deserialize)]
struct RoutingDoc {
    #[serde(default)]
    address_map: HashMap<String, String>,
}

/// Loaded once per run, read-only afterwards.
#[derive(Debug)]
pub struct RoutingTable {
    addresses: HashMap<String, String>,
}

impl RoutingTable {
    pub async fn load(path: &Path) -> Result<Self, RoutingError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| RoutingError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, RoutingError> {
        let doc: RoutingDoc = serde_json::from_str(raw)?;
        Ok(Self {
            addresses: doc.address_map,
        })
    }

    /// Returns the stored address unmodified after validating its
    /// host:port shape. No connection is attempted here.
    pub fn resolve(&self, node: &str) -> Result<&str, RoutingError> {
        let address = self
            .addresses
            .get(node)
            .ok_or_else(|| RoutingError::KeyNotFound(node.to_string()))?;
        if let Err(reason) = check_host_port(address) {
            return Err(RoutingError::MalformedAddress {
                node: node.to_string(),
                address: address.clone(),
                reason,
            });
        }
        Ok(address)
    }
}

fn check_host_port(address: &str) -> Result<(), String> {
    let Some((host, port)) = address.rsplit_once(':') else {
        return Err("missing ':' separator".to_string());
    };
    if host.is_empty() {
        return Err("empty host".to_string());
    }
    match port.parse::<u16>() {
        Ok(0) => Err("port 0".to_string()),
        Ok(_) => Ok(()),
        Err(_) => Err(format!("invalid port '{port}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_returns_stored_address_unmodified() {
        let table = RoutingTable::from_json(r#"{"address_map": {"A": "localhost:50051"}}"#)
            .expect("parse");
        assert_eq!(table.resolve("A").expect("resolve"), "localhost:50051");
    }

    #[test]
    fn unrelated_config_sections_are_ignored() {
        let raw = r#"{
            "nodes": {"A": {"listen_port": 50051}},
            "routing_table": {"A": ["B"]},
            "address_map": {"A": "10.0.0.7:50051", "B": "10.0.0.8:50052"}
        }"#;
        let table = RoutingTable::from_json(raw).expect("parse");
        assert_eq!(table.resolve("B").expect("resolve"), "10.0.0.8:50052");
    }

    #[test]
    fn absent_key_is_key_not_found() {
        let table = RoutingTable::from_json(r#"{"address_map": {"A": "localhost:50051"}}"#)
            .expect("parse");
        assert!(matches!(
            table.resolve("Z"),
            Err(RoutingError::KeyNotFound(node)) if node == "Z"
        ));
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        let cases = [
            ("no_colon", "localhost"),
            ("empty_host", ":50051"),
            ("port_zero", "localhost:0"),
            ("port_too_big", "localhost:70000"),
            ("port_not_numeric", "localhost:grpc"),
        ];
        for (node, address) in cases {
            let raw = format!(r#"{{"address_map": {{"{node}": "{address}"}}}}"#);
            let table = RoutingTable::from_json(&raw).expect("parse");
            assert!(
                matches!(table.resolve(node), Err(RoutingError::MalformedAddress { .. })),
                "expected MalformedAddress for {address}"
            );
        }
    }

    #[test]
    fn garbage_document_is_a_parse_error() {
        assert!(matches!(
            RoutingTable::from_json("not json"),
            Err(RoutingError::Parse(_))
        ));
    }
}
