use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;
use leptos::*;

use stock_trader_wasm::application::notifications::{Notification, NotificationKind};
use stock_trader_wasm::application::portfolio::{HoldingsFetcher, PortfolioStore};
use stock_trader_wasm::application::trade::{
    NotificationSink, SubmitPhase, TradeExecutor, TradeSubmitter,
};
use stock_trader_wasm::domain::errors::ApiError;
use stock_trader_wasm::domain::market::{
    Holding, PortfolioSnapshot, Price, PriceQuote, Symbol, TradeRequest, TradeSide,
};
use stock_trader_wasm::domain::session::{CredentialStore, SessionStore};
use stock_trader_wasm::infrastructure::MemoryCredentials;
use stock_trader_wasm::infrastructure::http::TradeFill;

fn authed_session() -> SessionStore {
    let port = Rc::new(MemoryCredentials::default());
    port.store("tok1");
    SessionStore::new(port)
}

fn counting_fetcher(snapshot: PortfolioSnapshot) -> (HoldingsFetcher, Rc<Cell<u32>>) {
    let calls = Rc::new(Cell::new(0u32));
    let counter = calls.clone();
    let fetcher: HoldingsFetcher = Rc::new(move || {
        counter.set(counter.get() + 1);
        let snapshot = snapshot.clone();
        async move { Ok(snapshot) }.boxed_local()
    });
    (fetcher, calls)
}

fn collecting_sink() -> (NotificationSink, Rc<RefCell<Vec<Notification>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let store = seen.clone();
    let sink: NotificationSink = Rc::new(move |notification| store.borrow_mut().push(notification));
    (sink, seen)
}

#[test]
fn successful_buy_refreshes_once_and_reports_the_receipt() {
    let session = authed_session();
    let (fetcher, refreshes) = counting_fetcher(PortfolioSnapshot::new(
        994.5,
        vec![Holding::new(Symbol::from("AAPL"), 5)],
    ));
    let portfolio = PortfolioStore::new(session.clone(), fetcher);
    let (sink, seen) = collecting_sink();
    let executor: TradeExecutor =
        Rc::new(|_| async { Ok(TradeFill { remaining_balance: 994.5 }) }.boxed_local());
    let submitter = TradeSubmitter::new(session, portfolio, executor, sink);

    let request = TradeRequest::new(TradeSide::Buy, Symbol::from("AAPL"), 5);
    let quote = Some(PriceQuote::new(Symbol::from("AAPL"), Price::from(190.0)));
    block_on(submitter.submit(request, quote));

    assert_eq!(refreshes.get(), 1, "exactly one portfolio refresh");

    let toasts = seen.borrow();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, NotificationKind::Success);
    assert_eq!(toasts[0].title, "Purchase Successful");
    let text = toasts[0].to_plain_text();
    assert!(text.contains("Symbol: AAPL"));
    assert!(text.contains("Quantity: 5"));
    assert!(text.contains("Price: $190.00"));
    assert!(text.contains("Total: $950.00"));
    assert!(text.contains("Balance: $994.50"));

    assert_eq!(submitter.phase().get_untracked(), SubmitPhase::Idle);
}

#[test]
fn rejected_sell_leaves_the_snapshot_untouched() {
    let session = authed_session();
    let (fetcher, refreshes) = counting_fetcher(PortfolioSnapshot::new(
        1000.0,
        vec![Holding::new(Symbol::from("MSFT"), 2)],
    ));
    let portfolio = PortfolioStore::new(session.clone(), fetcher);
    block_on(portfolio.refresh());
    let before = portfolio.current_snapshot();
    let fetches_before = refreshes.get();

    let (sink, seen) = collecting_sink();
    let executor: TradeExecutor = Rc::new(|_| {
        async { Err(ApiError::Rejected("Insufficient holdings".to_string())) }.boxed_local()
    });
    let submitter = TradeSubmitter::new(session, portfolio.clone(), executor, sink);

    let request = TradeRequest::new(TradeSide::Sell, Symbol::from("MSFT"), 2);
    block_on(submitter.submit(request, None));

    assert_eq!(refreshes.get(), fetches_before, "no refresh after a failure");
    assert_eq!(portfolio.current_snapshot(), before);

    let toasts = seen.borrow();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, NotificationKind::Error);
    assert_eq!(toasts[0].body, "Insufficient holdings");

    assert_eq!(submitter.phase().get_untracked(), SubmitPhase::Idle);
}

#[test]
fn submit_without_a_token_never_contacts_the_service() {
    let session = SessionStore::new(Rc::new(MemoryCredentials::default()));
    let (fetcher, refreshes) = counting_fetcher(PortfolioSnapshot::default());
    let portfolio = PortfolioStore::new(session.clone(), fetcher);

    let calls = Rc::new(Cell::new(0u32));
    let counter = calls.clone();
    let executor: TradeExecutor = Rc::new(move |_| {
        counter.set(counter.get() + 1);
        async { Ok(TradeFill { remaining_balance: 0.0 }) }.boxed_local()
    });
    let (sink, seen) = collecting_sink();
    let submitter = TradeSubmitter::new(session, portfolio, executor, sink);

    let request = TradeRequest::new(TradeSide::Buy, Symbol::from("AAPL"), 1);
    block_on(submitter.submit(request, None));

    assert_eq!(calls.get(), 0);
    assert_eq!(refreshes.get(), 0);
    let toasts = seen.borrow();
    assert_eq!(toasts[0].kind, NotificationKind::Error);
    assert_eq!(toasts[0].body, "Unauthorized: No token found");
}

#[test]
fn a_rejected_token_gates_back_to_login() {
    let session = authed_session();
    let (fetcher, refreshes) = counting_fetcher(PortfolioSnapshot::default());
    let portfolio = PortfolioStore::new(session.clone(), fetcher);

    let executor: TradeExecutor =
        Rc::new(|_| async { Err(ApiError::Unauthorized) }.boxed_local());
    let (sink, seen) = collecting_sink();
    let submitter = TradeSubmitter::new(session.clone(), portfolio, executor, sink);

    block_on(submitter.submit(TradeRequest::new(TradeSide::Buy, Symbol::from("AAPL"), 1), None));

    assert!(!session.is_authenticated());
    assert_eq!(refreshes.get(), 0);
    assert_eq!(seen.borrow()[0].kind, NotificationKind::Error);
}

#[test]
fn zero_quantity_fails_locally() {
    let session = authed_session();
    let (fetcher, _) = counting_fetcher(PortfolioSnapshot::default());
    let portfolio = PortfolioStore::new(session.clone(), fetcher);

    let calls = Rc::new(Cell::new(0u32));
    let counter = calls.clone();
    let executor: TradeExecutor = Rc::new(move |_| {
        counter.set(counter.get() + 1);
        async { Ok(TradeFill { remaining_balance: 0.0 }) }.boxed_local()
    });
    let (sink, seen) = collecting_sink();
    let submitter = TradeSubmitter::new(session, portfolio, executor, sink);

    block_on(submitter.submit(TradeRequest::new(TradeSide::Buy, Symbol::from("AAPL"), 0), None));

    assert_eq!(calls.get(), 0, "invalid quantity must not reach the service");
    assert_eq!(seen.borrow()[0].kind, NotificationKind::Error);
}

#[test]
fn only_one_order_is_in_flight_per_submitter() {
    let session = authed_session();
    let (fetcher, _) = counting_fetcher(PortfolioSnapshot::default());
    let portfolio = PortfolioStore::new(session.clone(), fetcher);

    let calls = Rc::new(Cell::new(0u32));
    let (release, gate) = oneshot::channel::<()>();
    let gate = Rc::new(RefCell::new(Some(gate)));
    let counter = calls.clone();
    let executor: TradeExecutor = Rc::new(move |_| {
        counter.set(counter.get() + 1);
        let gate = gate.borrow_mut().take();
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(TradeFill { remaining_balance: 500.0 })
        }
        .boxed_local()
    });
    let (sink, seen) = collecting_sink();
    let submitter = TradeSubmitter::new(session, portfolio, executor, sink);

    let mut pool = LocalPool::new();
    let spawner = pool.spawner();
    for _ in 0..2 {
        let submitter = submitter.clone();
        spawner
            .spawn_local(async move {
                submitter
                    .submit(TradeRequest::new(TradeSide::Buy, Symbol::from("AAPL"), 1), None)
                    .await
            })
            .unwrap();
        pool.run_until_stalled();
    }

    // the second submit was a no-op while the first was in flight
    assert_eq!(calls.get(), 1);
    assert_eq!(submitter.phase().get_untracked(), SubmitPhase::Submitting);

    release.send(()).unwrap();
    pool.run();

    assert_eq!(submitter.phase().get_untracked(), SubmitPhase::Idle);
    assert_eq!(seen.borrow().len(), 1, "only the settled order notified");
}
