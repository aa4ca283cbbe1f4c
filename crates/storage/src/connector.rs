//! Seed-host connector for the in-memory cluster

use std::collections::HashSet;
use std::sync::Arc;

use kvcompat_core::{ClientError, ClientResult, Connector, Host, NativeCode, RecordClient};
use tracing::{debug, info};

use crate::client::MemoryClient;

/// Connects to a shared [`MemoryClient`] when one of the given hosts is a
/// known seed.
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    client: Arc<MemoryClient>,
    seeds: HashSet<Host>,
}

impl MemoryConnector {
    /// Create a connector serving `client` behind `seeds`
    pub fn new(client: Arc<MemoryClient>, seeds: impl IntoIterator<Item = Host>) -> Self {
        MemoryConnector {
            client,
            seeds: seeds.into_iter().collect(),
        }
    }

    /// Connector reachable at `127.0.0.1:3000`
    pub fn localhost(client: Arc<MemoryClient>) -> Self {
        Self::new(client, [Host::new("127.0.0.1", 3000)])
    }

    /// Add a reachable seed
    pub fn add_seed(&mut self, host: Host) {
        self.seeds.insert(host);
    }

    /// Shared client handed out on connect
    pub fn client(&self) -> &Arc<MemoryClient> {
        &self.client
    }
}

impl Connector for MemoryConnector {
    fn connect(&self, hosts: &[Host]) -> ClientResult<Arc<dyn RecordClient>> {
        if hosts.is_empty() {
            return Err(ClientError::new(NativeCode::ParameterError, "no seed hosts given"));
        }
        match hosts.iter().find(|host| self.seeds.contains(*host)) {
            Some(host) => {
                info!(seed = %host, "connected to cluster");
                self.client.set_connected(true);
                let client: Arc<dyn RecordClient> = self.client.clone();
                Ok(client)
            }
            None => {
                debug!(hosts = hosts.len(), "no reachable seed host");
                Err(ClientError::new(
                    NativeCode::InvalidNode,
                    "no seed host reachable",
                ))
            }
        }
    }
}
