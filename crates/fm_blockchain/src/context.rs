use std::sync::Arc;

use fm_core::{FundError, FundManagerConfig};

use crate::auth_token::{AuthToken, AuthTokenIssuer};
use crate::rpc_nodes::{RpcNode, RpcNodeRegistry};

/// Shared state handed to request handlers in place of process globals.
///
/// Cloning is cheap; clones share the same config and registry.
#[derive(Debug, Clone)]
pub struct FundManagerContext {
    config: Arc<FundManagerConfig>,
    rpc_nodes: Arc<RpcNodeRegistry>,
}

impl FundManagerContext {
    pub fn new(config: FundManagerConfig) -> Self {
        Self::with_registry(config, Arc::new(RpcNodeRegistry::new()))
    }

    pub fn with_registry(config: FundManagerConfig, rpc_nodes: Arc<RpcNodeRegistry>) -> Self {
        Self {
            config: Arc::new(config),
            rpc_nodes,
        }
    }

    pub fn config(&self) -> &FundManagerConfig {
        &self.config
    }

    pub fn rpc_nodes(&self) -> &RpcNodeRegistry {
        &self.rpc_nodes
    }

    pub fn save_rpc_nodes(&self, nodes: Vec<RpcNode>) {
        self.rpc_nodes.save_rpc_nodes(nodes);
    }

    pub fn rpc_node_by_chain_id(&self, chain_id: &str) -> RpcNode {
        self.rpc_nodes.rpc_node_by_chain_id(chain_id)
    }

    pub fn auth_token_issuer(&self) -> Result<AuthTokenIssuer, FundError> {
        AuthTokenIssuer::from_config(&self.config)
    }

    pub fn issue_auth_token(&self) -> Result<AuthToken, FundError> {
        self.auth_token_issuer()?.issue()
    }

    pub fn private_key(&self) -> Result<String, FundError> {
        self.config.private_key()
    }
}
