//! Balance resolver behaviour: ordering, fallback, budgets and mainnet policy

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use wallet_balance::blockchain::{
    deadline::EndpointBudgets,
    models::{BalanceError, BalanceQuery, BalanceResult, ChainIdentity, ChainType},
    policy::{MainnetPolicy, SOLANA_MAINNET_GENESIS},
    services::balance::BalanceResolver,
    ChainClients, U256,
};

use common::{clients, ether, Script, ScriptedClient, ACCOUNT, SOL_ACCOUNT};

fn resolver(client: &Arc<ScriptedClient>) -> BalanceResolver {
    BalanceResolver::new(
        clients(client),
        Arc::new(MainnetPolicy::default()),
        EndpointBudgets::default(),
    )
}

fn evm_query(urls: &[&str]) -> BalanceQuery {
    let urls: Vec<String> = urls.iter().map(|u| u.to_string()).collect();
    BalanceQuery::new(ACCOUNT, &urls, ChainType::Evm)
}

#[tokio::test(start_paused = true)]
async fn empty_candidate_list_makes_no_calls() {
    let client = Arc::new(ScriptedClient::new());
    let result = resolver(&client).resolve_balance(&evm_query(&[])).await;

    assert_eq!(result, BalanceResult::NoEndpointConfigured);
    assert_eq!(result.balance(), "0");
    assert_eq!(result.terminal_error(), Some(BalanceError::NoEndpointConfigured));
    assert!(client.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn first_success_stops_the_walk() {
    let client = Arc::new(
        ScriptedClient::new()
            .endpoint("https://a.example", Script::balance(ether(2.0)))
            .endpoint("https://b.example", Script::balance(ether(9.0))),
    );

    let result = resolver(&client)
        .resolve_balance(&evm_query(&["https://a.example", "https://b.example"]))
        .await;

    assert_eq!(result.balance(), "2");
    assert!(result.diagnostics().is_empty());
    assert_eq!(client.calls().len(), 1);
    assert_eq!(client.calls()[0].url, "https://a.example");
}

#[tokio::test(start_paused = true)]
async fn falls_back_past_failures_in_order() {
    let client = Arc::new(
        ScriptedClient::new()
            .endpoint("https://a.example", Script::failing("connection reset"))
            .endpoint(
                "https://b.example",
                Script::balance(ether(3.0)).after(Duration::from_secs(30)),
            )
            .endpoint("https://c.example", Script::balance(ether(0.75))),
    );

    let result = resolver(&client)
        .resolve_balance(&evm_query(&[
            "https://a.example",
            "https://b.example",
            "https://c.example",
        ]))
        .await;

    match &result {
        BalanceResult::Resolved { balance, endpoint, diagnostics } => {
            assert_eq!(balance, "0.75");
            assert_eq!(endpoint, "https://c.example");
            assert_eq!(diagnostics.len(), 2);
            assert_eq!(diagnostics[0].endpoint, "a.example");
            assert_eq!(
                diagnostics[0].reason,
                BalanceError::ConnectionFailure("connection reset".into())
            );
            assert_eq!(diagnostics[1].endpoint, "b.example");
            assert_eq!(
                diagnostics[1].reason,
                BalanceError::EndpointTimeout { budget_ms: 8000 }
            );
        }
        other => panic!("expected a resolved balance, got {:?}", other),
    }
    let urls: Vec<String> = client.calls().into_iter().map(|c| c.url).collect();
    assert_eq!(
        urls,
        vec!["https://a.example", "https://b.example", "https://c.example"]
    );
}

#[tokio::test(start_paused = true)]
async fn blocked_local_chain_skips_balance_fetch() {
    let client = Arc::new(ScriptedClient::new().endpoint(
        "http://127.0.0.1:8545",
        Script::balance(ether(100.0)).chain_id(1),
    ));

    let result = resolver(&client)
        .resolve_balance(&evm_query(&["http://127.0.0.1:8545"]))
        .await;

    assert_eq!(result.balance(), "0");
    assert!(result.is_mainnet_blocked());
    assert_eq!(
        result.terminal_error(),
        Some(BalanceError::PolicyViolation {
            identity: ChainIdentity::Evm { chain_id: 1 }
        })
    );
    assert_eq!(client.calls_to("chain_identity"), 1);
    assert_eq!(client.calls_to("balance"), 0);
}

#[tokio::test(start_paused = true)]
async fn local_dev_chain_is_checked_then_queried() {
    let client = Arc::new(ScriptedClient::new().endpoint(
        "http://localhost:8545",
        Script::balance(ether(10000.0)).chain_id(31337),
    ));

    let result = resolver(&client)
        .resolve_balance(&evm_query(&["http://localhost:8545"]))
        .await;

    assert_eq!(result.balance(), "10000");
    let methods: Vec<&str> = client.calls().iter().map(|c| c.method).collect();
    assert_eq!(methods, vec!["chain_identity", "balance"]);
}

#[tokio::test(start_paused = true)]
async fn public_endpoints_skip_the_identity_check() {
    let client = Arc::new(
        ScriptedClient::new().endpoint("https://a.example", Script::balance(ether(1.0)).chain_id(1)),
    );

    let result = resolver(&client)
        .resolve_balance(&evm_query(&["https://a.example"]))
        .await;

    assert_eq!(result.balance(), "1");
    assert_eq!(client.calls_to("chain_identity"), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_endpoint_is_abandoned_at_its_budget() {
    let client = Arc::new(
        ScriptedClient::new()
            .endpoint(
                "https://slow.example",
                Script::balance(ether(1.0)).after(Duration::from_secs(60)),
            )
            .endpoint("https://fast.example", Script::balance(ether(2.0))),
    );

    let start = Instant::now();
    let result = resolver(&client)
        .resolve_balance(&evm_query(&["https://slow.example", "https://fast.example"]))
        .await;
    let elapsed = start.elapsed();

    assert_eq!(result.balance(), "2");
    assert!(elapsed >= Duration::from_millis(8000), "gave up early: {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(8100), "gave up late: {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn local_endpoints_get_the_longer_budget() {
    let client = Arc::new(ScriptedClient::new().endpoint(
        "http://127.0.0.1:8545",
        Script::balance(ether(5.0))
            .chain_id(31337)
            .after(Duration::from_secs(6)),
    ));

    // identity + balance take 12s in total: over the public budget, inside the local one
    let result = resolver(&client)
        .resolve_balance(&evm_query(&["http://127.0.0.1:8545"]))
        .await;

    assert_eq!(result.balance(), "5");
}

#[tokio::test(start_paused = true)]
async fn one_deadline_covers_identity_and_balance() {
    let client = Arc::new(ScriptedClient::new().endpoint(
        "http://127.0.0.1:8545",
        Script::balance(ether(5.0))
            .chain_id(31337)
            .after(Duration::from_secs(10)),
    ));

    let start = Instant::now();
    let result = resolver(&client)
        .resolve_balance(&evm_query(&["http://127.0.0.1:8545"]))
        .await;

    assert_eq!(
        result.terminal_error(),
        Some(BalanceError::EndpointTimeout { budget_ms: 15000 })
    );
    assert!(start.elapsed() < Duration::from_millis(15100));
}

#[tokio::test(start_paused = true)]
async fn exhaustion_returns_zero_with_every_reason() {
    let client = Arc::new(
        ScriptedClient::new()
            .endpoint("https://a.example", Script::failing("HTTP 503"))
            .endpoint("https://b.example", Script::failing("HTTP 429")),
    );

    let result = resolver(&client)
        .resolve_balance(&evm_query(&[
            "https://a.example",
            "https://b.example",
            "https://unknown.example",
        ]))
        .await;

    assert!(!result.is_resolved());
    assert_eq!(result.balance(), "0");
    assert_eq!(
        result.diagnostic_lines(),
        vec![
            "a.example: HTTP 503",
            "b.example: HTTP 429",
            "unknown.example: connection refused",
        ]
    );
    assert!(!result.is_mainnet_blocked());
}

#[tokio::test(start_paused = true)]
async fn repeated_resolution_is_idempotent() {
    let client = Arc::new(
        ScriptedClient::new()
            .endpoint("https://a.example", Script::failing("HTTP 500"))
            .endpoint("https://b.example", Script::balance(ether(0.5))),
    );
    let resolver = resolver(&client);
    let query = evm_query(&["https://a.example", "https://b.example"]);

    let first = resolver.resolve_balance(&query).await;
    let second = resolver.resolve_balance(&query).await;

    assert_eq!(first, second);
    assert_eq!(first.balance(), "0.5");
}

#[tokio::test(start_paused = true)]
async fn blocked_local_node_falls_back_to_public_testnet() {
    let client = Arc::new(
        ScriptedClient::new()
            .endpoint(
                "http://127.0.0.1:8545",
                Script::balance(ether(42.0)).chain_id(1),
            )
            .endpoint("https://public-testnet.example", Script::balance(ether(1.5))),
    );

    let result = resolver(&client)
        .resolve_balance(&evm_query(&[
            "http://127.0.0.1:8545",
            "https://public-testnet.example",
        ]))
        .await;

    assert_eq!(result.balance(), "1.5");
    assert_eq!(
        result.diagnostic_lines(),
        vec!["127.0.0.1:8545: mainnet not allowed"]
    );
}

#[tokio::test(start_paused = true)]
async fn timed_out_endpoint_then_fast_fallback() {
    let client = Arc::new(
        ScriptedClient::new()
            .endpoint(
                "https://a.example",
                Script::balance(ether(7.0)).after(Duration::from_secs(120)),
            )
            .endpoint(
                "https://b.example",
                Script::balance(ether(0.25)).after(Duration::from_millis(50)),
            ),
    );

    let start = Instant::now();
    let result = resolver(&client)
        .resolve_balance(&evm_query(&["https://a.example", "https://b.example"]))
        .await;
    let elapsed = start.elapsed();

    assert_eq!(result.balance(), "0.25");
    assert_eq!(result.diagnostics().len(), 1);
    assert_eq!(result.diagnostics()[0].endpoint, "a.example");
    assert_eq!(
        result.diagnostics()[0].reason,
        BalanceError::EndpointTimeout { budget_ms: 8000 }
    );
    assert!(elapsed >= Duration::from_millis(8050));
    assert!(elapsed < Duration::from_millis(8150));
}

#[tokio::test(start_paused = true)]
async fn solana_queries_use_the_solana_client_and_lamports() {
    let evm = Arc::new(ScriptedClient::new());
    let solana = Arc::new(ScriptedClient::new().endpoint(
        "https://api.devnet.solana.com",
        Script::balance(U256::from(2_500_000_000u64)),
    ));
    let resolver = BalanceResolver::new(
        ChainClients::new(evm.clone(), solana.clone()),
        Arc::new(MainnetPolicy::default()),
        EndpointBudgets::default(),
    );

    let query = BalanceQuery::new(
        SOL_ACCOUNT,
        &["https://api.devnet.solana.com".to_string()],
        ChainType::Solana,
    );
    let result = resolver.resolve_balance(&query).await;

    assert_eq!(result.balance(), "2.5");
    assert!(evm.calls().is_empty());
    assert_eq!(solana.calls_to("balance"), 1);
}

#[tokio::test(start_paused = true)]
async fn local_solana_mainnet_validator_is_refused() {
    let client = Arc::new(ScriptedClient::new().endpoint(
        "http://127.0.0.1:8899",
        Script::balance(U256::from(1_000_000_000u64)).genesis(SOLANA_MAINNET_GENESIS),
    ));

    let query = BalanceQuery::new(
        SOL_ACCOUNT,
        &["http://127.0.0.1:8899".to_string()],
        ChainType::Solana,
    );
    let result = resolver(&client).resolve_balance(&query).await;

    assert!(result.is_mainnet_blocked());
    assert_eq!(client.calls_to("balance"), 0);
}
