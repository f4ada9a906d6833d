use serde::Serialize;

pub const NAME: &str = "FUND_MANAGER";
pub const VERSION: &str = "000.004";
pub const CUDOS_CHAIN_ID: &str = "cudos-1";
pub const FOUNDARY: &str = "Foundary";
pub const ONE_INCH: &str = "1Inch";
/// Prefix of an `Authorization` header value carrying an auth token.
pub const BEARER: &str = "Bearer ";

/// Contract addresses deployed on a single chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub chain_id: &'static str,
    pub fund_manager_address: &'static str,
    pub fiber_router_address: &'static str,
    pub foundary_token_address: &'static str,
}

pub const NETWORKS: &[NetworkConfig] = &[
    // Ethereum mainnet
    NetworkConfig {
        chain_id: "1",
        fund_manager_address: "0x985824b8623e523162122461e081721b4bcc778b",
        fiber_router_address: "0xc05117600673a83AEa4C326b6ea542E42D53426a",
        foundary_token_address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
    },
    // BNB chain
    NetworkConfig {
        chain_id: "56",
        fund_manager_address: "0x6F6Fd99292911EB13cE92827742D5919941A4fb5",
        fiber_router_address: "0xE8539d5493F6e7B6333e45897CfEaAA7C7c15A08",
        foundary_token_address: "0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d",
    },
    // Arbitrum One
    NetworkConfig {
        chain_id: "42161",
        fund_manager_address: "0x5036c099df53323c2d6122dC9583adB906523ceC",
        fiber_router_address: "0xF9fBc63A291798515B08198427165c58ebE69A91",
        foundary_token_address: "0xFF970A61A04b1cA14834A43f5dE4533eBDDB5CC8",
    },
];

/// Look up the contract addresses for a chain.
pub fn network_by_chain_id(chain_id: &str) -> Option<&'static NetworkConfig> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}
