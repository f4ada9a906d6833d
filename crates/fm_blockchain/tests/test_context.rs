use std::sync::Arc;
use std::thread;

use fm_blockchain::{
    AuthTokenBody, FundManagerContext, NETWORKS, RpcNode, RpcNodeRegistry, network_by_chain_id,
};
use fm_core::{AwsEnvironment, EnvSecrets, FundManagerConfig, crypto};

fn configured() -> FundManagerConfig {
    let encrypted_private_key = crypto::encrypt("0xabc123", "aws-half:env-half").unwrap();
    FundManagerConfig::default()
        .with_aws(AwsEnvironment {
            security_key: Some("aws-half:".into()),
            api_key: Some("backend-api-key".into()),
        })
        .with_env(
            EnvSecrets::from_vars(vec![
                ("PRIVATE_KEY".to_string(), encrypted_private_key),
                ("SECURITY_KEY".to_string(), "env-half".to_string()),
            ])
            .unwrap(),
        )
}

#[test]
fn resolves_endpoints_for_every_configured_network() {
    let ctx = FundManagerContext::new(configured());
    ctx.rpc_nodes()
        .save_rpc_nodes_json(
            r#"[
                {"chainId":"1","url":"https://eth.example.com"},
                {"chainId":"56","url":"https://bsc.example.com"},
                {"chainId":"42161","url":"https://arb.example.com"}
            ]"#,
        )
        .unwrap();

    for network in NETWORKS {
        let node = ctx.rpc_node_by_chain_id(network.chain_id);
        assert!(!node.is_placeholder(), "no node for {}", network.chain_id);
        assert!(network_by_chain_id(&node.chain_id).is_some());
    }
}

#[test]
fn unknown_chain_falls_back_to_placeholder() {
    let ctx = FundManagerContext::new(configured());
    assert_eq!(ctx.rpc_node_by_chain_id("137"), RpcNode::placeholder("137"));

    ctx.save_rpc_nodes(vec![RpcNode::new("1", "https://eth.example.com")]);
    assert_eq!(ctx.rpc_node_by_chain_id("137"), RpcNode::placeholder("137"));
}

#[test]
fn private_key_and_token_from_injected_secrets() {
    let ctx = FundManagerContext::new(configured());
    assert_eq!(ctx.private_key().unwrap(), "0xabc123");

    let token = ctx.issue_auth_token().unwrap();
    assert!(token.bearer_header().starts_with("Bearer "));

    let body = AuthTokenBody::decode(token.as_str(), "backend-api-key").unwrap();
    assert!(body.is_valid_at(chrono::Utc::now()).unwrap());
}

#[test]
fn concurrent_writers_leave_one_complete_list() {
    let registry = Arc::new(RpcNodeRegistry::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                registry.save_rpc_nodes(vec![
                    RpcNode::new("1", format!("https://eth-{i}.example.com")),
                    RpcNode::new("56", format!("https://bsc-{i}.example.com")),
                ]);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Whichever writer won, both entries come from the same save.
    let eth = registry.rpc_node_by_chain_id("1").url;
    let bsc = registry.rpc_node_by_chain_id("56").url;
    let writer = eth.trim_start_matches("https://eth-");
    assert_eq!(bsc, format!("https://bsc-{writer}"));
    assert_eq!(registry.len(), 2);
}
