use std::rc::Rc;
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};
use gloo_timers::future::sleep;
use leptos::*;

use crate::domain::{
    logging::LogComponent,
    market::{FetchStatus, PriceQuote, Symbol},
};
use crate::global_state::{current_symbol, last_quote, poll_abort_handles, quote_status};
use crate::infrastructure::TradingApiClient;
use crate::{log_debug, log_warn};

/// Quote refresh cadence for the selected instrument.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// A quote may only be applied while its symbol is still the selected one.
/// An in-flight request for the previous selection can resolve after the
/// switch; its result is discarded, not displayed under the new label.
pub fn should_apply_quote(selected: &Symbol, quote: &PriceQuote) -> bool {
    &quote.symbol == selected
}

/// Abort every outstanding poll except the one for `next`.
pub fn abort_stale_polls(next: &Symbol) {
    poll_abort_handles().update(|handles| {
        handles.retain(|symbol, handle| {
            if symbol == next {
                true
            } else {
                handle.abort();
                false
            }
        });
    });
}

/// Teardown: abort and forget every poll (logout, shell unmount).
pub fn stop_all_polls() {
    poll_abort_handles().update(|handles| {
        for handle in handles.values() {
            handle.abort();
        }
        handles.clear();
    });
}

/// Begin polling the selected symbol: an immediate fetch, then one request
/// every [`POLL_INTERVAL`] until the selection changes or the view goes away.
/// Idempotent per symbol - an already-running poll is left alone.
pub fn start_price_poll(api: Rc<TradingApiClient>, symbol: Symbol) {
    abort_stale_polls(&symbol);
    if poll_abort_handles().with_untracked(|handles| handles.contains_key(&symbol)) {
        return;
    }

    let (handle, registration) = AbortHandle::new_pair();
    poll_abort_handles().update(|handles| {
        handles.insert(symbol.clone(), handle);
    });

    let poll = {
        let symbol = symbol.clone();
        async move {
            loop {
                match api.stock_price(&symbol).await {
                    Ok(quote) => {
                        if should_apply_quote(&current_symbol().get_untracked(), &quote) {
                            last_quote().set(Some(quote));
                            quote_status().set(FetchStatus::Ok);
                        } else {
                            log_debug!(
                                LogComponent::Application("PriceFeed"),
                                "Dropping late quote for {}",
                                quote.symbol.value()
                            );
                        }
                    }
                    Err(err) => {
                        // keep showing the previous quote; next tick retries
                        log_warn!(
                            LogComponent::Application("PriceFeed"),
                            "Price fetch failed for {}: {}",
                            symbol.value(),
                            err
                        );
                        let degraded = if last_quote().get_untracked().is_some() {
                            FetchStatus::Stale
                        } else {
                            FetchStatus::Error
                        };
                        quote_status().set(degraded);
                    }
                }
                sleep(POLL_INTERVAL).await;
            }
        }
    };

    spawn_local(async move {
        // resolves Err(Aborted) when the selection changes; nothing to do
        let _ = Abortable::new(poll, registration).await;
    });
}
