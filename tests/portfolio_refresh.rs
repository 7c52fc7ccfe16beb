use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;
use leptos::*;

use stock_trader_wasm::application::portfolio::{HoldingsFetcher, PortfolioStore};
use stock_trader_wasm::domain::errors::{ApiError, ApiResult};
use stock_trader_wasm::domain::market::{FetchStatus, Holding, PortfolioSnapshot, Symbol};
use stock_trader_wasm::domain::session::{CredentialStore, SessionStore};
use stock_trader_wasm::infrastructure::MemoryCredentials;

fn authed_session() -> SessionStore {
    let port = Rc::new(MemoryCredentials::default());
    port.store("tok1");
    SessionStore::new(port)
}

/// Fetcher that pops one canned response per call.
fn scripted_fetcher(
    responses: Vec<ApiResult<PortfolioSnapshot>>,
) -> (HoldingsFetcher, Rc<Cell<u32>>) {
    let calls = Rc::new(Cell::new(0u32));
    let queue = Rc::new(RefCell::new(VecDeque::from(responses)));
    let counter = calls.clone();
    let fetcher: HoldingsFetcher = Rc::new(move || {
        counter.set(counter.get() + 1);
        let response = queue.borrow_mut().pop_front().expect("unexpected fetch");
        async move { response }.boxed_local()
    });
    (fetcher, calls)
}

fn snapshot_a() -> PortfolioSnapshot {
    PortfolioSnapshot::new(
        1000.0,
        vec![
            Holding::new(Symbol::from("AAPL"), 3),
            Holding::new(Symbol::from("MSFT"), 7),
        ],
    )
}

fn snapshot_b() -> PortfolioSnapshot {
    PortfolioSnapshot::new(994.5, vec![Holding::new(Symbol::from("NVDA"), 1)])
}

#[test]
fn refresh_replaces_the_snapshot_wholesale() {
    let (fetcher, _) = scripted_fetcher(vec![Ok(snapshot_a()), Ok(snapshot_b())]);
    let portfolio = PortfolioStore::new(authed_session(), fetcher);
    assert!(portfolio.loading().get_untracked());

    block_on(portfolio.refresh());
    assert_eq!(portfolio.current_snapshot().0, Some(1000.0));
    assert_eq!(portfolio.current_snapshot().1.len(), 2);
    assert!(!portfolio.loading().get_untracked());

    // the second response wins completely; nothing of the first survives
    block_on(portfolio.refresh());
    let (balance, holdings) = portfolio.current_snapshot();
    assert_eq!(balance, Some(994.5));
    assert_eq!(holdings, snapshot_b().holdings);
    assert_eq!(portfolio.status().get_untracked(), FetchStatus::Ok);
}

#[test]
fn refresh_without_token_skips_the_fetch_and_fails_closed() {
    let (fetcher, calls) = scripted_fetcher(vec![Ok(snapshot_a())]);
    let session = SessionStore::new(Rc::new(MemoryCredentials::default()));
    let portfolio = PortfolioStore::new(session, fetcher);

    block_on(portfolio.refresh());

    assert_eq!(calls.get(), 0);
    assert!(!portfolio.loading().get_untracked());
    let (balance, holdings) = portfolio.current_snapshot();
    assert_eq!(balance, None);
    assert!(holdings.is_empty());
}

#[test]
fn failed_refresh_keeps_the_previous_snapshot() {
    let (fetcher, _) = scripted_fetcher(vec![
        Ok(snapshot_a()),
        Err(ApiError::Network("connection reset".to_string())),
    ]);
    let portfolio = PortfolioStore::new(authed_session(), fetcher);

    block_on(portfolio.refresh());
    let before = portfolio.current_snapshot();

    block_on(portfolio.refresh());
    assert_eq!(portfolio.current_snapshot(), before);
    assert_eq!(portfolio.status().get_untracked(), FetchStatus::Stale);
    assert!(!portfolio.loading().get_untracked());
}

#[test]
fn failure_before_any_data_reports_error_not_stale() {
    let (fetcher, _) = scripted_fetcher(vec![Err(ApiError::Network("offline".to_string()))]);
    let portfolio = PortfolioStore::new(authed_session(), fetcher);

    block_on(portfolio.refresh());
    assert_eq!(portfolio.current_snapshot().0, None);
    assert_eq!(portfolio.status().get_untracked(), FetchStatus::Error);
}

#[test]
fn a_rejected_token_forces_login() {
    let session = authed_session();
    let (fetcher, _) = scripted_fetcher(vec![Ok(snapshot_a()), Err(ApiError::Unauthorized)]);
    let portfolio = PortfolioStore::new(session.clone(), fetcher);
    block_on(portfolio.refresh());

    block_on(portfolio.refresh());

    assert!(!session.is_authenticated(), "session must be cleared");
    let (balance, holdings) = portfolio.current_snapshot();
    assert_eq!(balance, None);
    assert!(holdings.is_empty());
    assert!(!portfolio.loading().get_untracked());
}

#[test]
fn a_superseded_refresh_response_is_discarded() {
    let (tx_first, rx_first) = oneshot::channel::<ApiResult<PortfolioSnapshot>>();
    let (tx_second, rx_second) = oneshot::channel::<ApiResult<PortfolioSnapshot>>();
    let gates = Rc::new(RefCell::new(VecDeque::from([rx_first, rx_second])));
    let fetcher: HoldingsFetcher = Rc::new(move || {
        let gate = gates.borrow_mut().pop_front().expect("unexpected fetch");
        async move { gate.await.expect("response sender dropped") }.boxed_local()
    });
    let portfolio = PortfolioStore::new(authed_session(), fetcher);

    let mut pool = LocalPool::new();
    let spawner = pool.spawner();
    for _ in 0..2 {
        let portfolio = portfolio.clone();
        spawner
            .spawn_local(async move { portfolio.refresh().await })
            .unwrap();
        pool.run_until_stalled();
    }

    // the later request resolves first and is applied
    tx_second.send(Ok(snapshot_b())).unwrap();
    pool.run_until_stalled();
    assert_eq!(portfolio.current_snapshot().0, Some(994.5));

    // the stale response lands afterwards and must be thrown away
    tx_first.send(Ok(snapshot_a())).unwrap();
    pool.run_until_stalled();
    let (balance, holdings) = portfolio.current_snapshot();
    assert_eq!(balance, Some(994.5));
    assert_eq!(holdings, snapshot_b().holdings);
}
