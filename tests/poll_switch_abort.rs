#![cfg(target_arch = "wasm32")]
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};
use gloo_timers::future::sleep;
use leptos::*;
use wasm_bindgen_test::*;

use stock_trader_wasm::application::price_feed::{abort_stale_polls, stop_all_polls};
use stock_trader_wasm::domain::market::Symbol;
use stock_trader_wasm::global_state::{current_symbol, poll_abort_handles};

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test(async)]
async fn switching_symbols_aborts_the_old_poll() {
    let (handle, registration) = AbortHandle::new_pair();
    current_symbol().set(Symbol::from("AAPL"));
    poll_abort_handles().update(|handles| {
        handles.insert(Symbol::from("AAPL"), handle.clone());
    });
    let poll = Abortable::new(sleep(Duration::from_millis(50)), registration);

    let next = Symbol::from("MSFT");
    abort_stale_polls(&next);

    // the old poll future resolves aborted; no further AAPL request can fire
    assert!(poll.await.is_err());
    assert!(poll_abort_handles().with(|handles| !handles.contains_key(&Symbol::from("AAPL"))));

    stop_all_polls();
}

#[wasm_bindgen_test(async)]
async fn the_poll_for_the_still_selected_symbol_survives() {
    let (handle, registration) = AbortHandle::new_pair();
    let symbol = Symbol::from("MSFT");
    poll_abort_handles().update(|handles| {
        handles.insert(symbol.clone(), handle.clone());
    });
    let poll = Abortable::new(sleep(Duration::from_millis(10)), registration);

    abort_stale_polls(&symbol);
    assert!(poll_abort_handles().with(|handles| handles.contains_key(&symbol)));

    // untouched: the sleep completes normally
    assert!(poll.await.is_ok());

    stop_all_polls();
    assert!(poll_abort_handles().with(|handles| handles.is_empty()));
}
