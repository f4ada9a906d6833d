pub mod auth_token;
pub mod context;
pub mod networks;
pub mod params;
pub mod rpc_nodes;

// Re-export primary types for convenient access.
pub use auth_token::{
    AuthToken, AuthTokenBody, AuthTokenIssuer, create_auth_token_for_multiswap_backend,
};
pub use context::FundManagerContext;
pub use networks::{
    BEARER, CUDOS_CHAIN_ID, FOUNDARY, NAME, NETWORKS, NetworkConfig, ONE_INCH, VERSION,
    network_by_chain_id,
};
pub use params::{expiry, expiry_from, threshold};
pub use rpc_nodes::{RpcNode, RpcNodeRegistry, validate_url};
