use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use fm_core::FundError;

/// One RPC endpoint for one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcNode {
    pub chain_id: String,
    pub url: String,
}

impl RpcNode {
    pub fn new(chain_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            url: url.into(),
        }
    }

    /// The stand-in returned when no node is known for `chain_id`.
    pub fn placeholder(chain_id: impl Into<String>) -> Self {
        Self::new(chain_id, String::new())
    }

    /// Whether this node carries no URL. A node saved with an empty URL
    /// also reports `true`; use [`RpcNodeRegistry::find_by_chain_id`] to
    /// tell an unknown chain apart from such an entry.
    pub fn is_placeholder(&self) -> bool {
        self.url.is_empty()
    }
}

/// Holds the latest known list of RPC nodes.
///
/// The list is unset until the first [`save_rpc_nodes`](Self::save_rpc_nodes).
/// Every save replaces the whole list; the last writer wins.
#[derive(Debug, Default)]
pub struct RpcNodeRegistry {
    nodes: RwLock<Option<Vec<RpcNode>>>,
}

impl RpcNodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored list with `nodes`. No merge with the previous list.
    ///
    /// Entries whose URL is not a valid http(s) URL are kept but logged.
    pub fn save_rpc_nodes(&self, nodes: Vec<RpcNode>) {
        for node in nodes.iter().filter(|n| !validate_url(&n.url)) {
            warn!(chain_id = %node.chain_id, url = %node.url, "rpc node has an invalid url");
        }
        info!(count = nodes.len(), "rpc node list replaced");
        *self.nodes.write() = Some(nodes);
    }

    /// Parse a JSON array of `{ "chainId", "url" }` objects and save it.
    /// Returns the number of nodes stored.
    pub fn save_rpc_nodes_json(&self, json: &str) -> Result<usize, FundError> {
        let nodes: Vec<RpcNode> = serde_json::from_str(json)?;
        let count = nodes.len();
        self.save_rpc_nodes(nodes);
        Ok(count)
    }

    /// A copy of the stored list, or `None` if nothing was saved yet.
    pub fn rpc_nodes(&self) -> Option<Vec<RpcNode>> {
        self.nodes.read().clone()
    }

    /// First node registered for `chain_id`, if any.
    pub fn find_by_chain_id(&self, chain_id: &str) -> Option<RpcNode> {
        self.nodes
            .read()
            .as_deref()?
            .iter()
            .find(|n| n.chain_id == chain_id)
            .cloned()
    }

    /// First node registered for `chain_id`, or a placeholder with an empty
    /// URL when the chain is unknown or the registry is empty or unset.
    pub fn rpc_node_by_chain_id(&self, chain_id: &str) -> RpcNode {
        self.find_by_chain_id(chain_id)
            .unwrap_or_else(|| RpcNode::placeholder(chain_id))
    }

    pub fn is_initialized(&self) -> bool {
        self.nodes.read().is_some()
    }

    pub fn len(&self) -> usize {
        self.nodes.read().as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validate that a URL is well-formed and uses HTTP or HTTPS.
pub fn validate_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            (scheme == "http" || scheme == "https") && parsed.host().is_some()
        }
        Err(_) => false,
    }
}
