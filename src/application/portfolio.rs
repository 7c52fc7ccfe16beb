use std::cell::Cell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use leptos::*;

use crate::domain::{
    errors::{ApiError, ApiResult},
    logging::LogComponent,
    market::{FetchStatus, Holding, PortfolioSnapshot},
    session::SessionStore,
};
use crate::infrastructure::TradingApiClient;
use crate::{log_debug, log_error};

/// Data source for the snapshot, injectable so the remote service can be
/// stubbed out.
pub type HoldingsFetcher = Rc<dyn Fn() -> LocalBoxFuture<'static, ApiResult<PortfolioSnapshot>>>;

/// Shared balance/holdings state, one instance per authenticated session,
/// handed to every consuming view through Leptos context.
///
/// Overlapping `refresh` calls are fenced by a monotonically increasing
/// ticket: only the most recently issued request may apply its response, so
/// a late-arriving stale response can never clobber a newer snapshot.
#[derive(Clone)]
pub struct PortfolioStore {
    balance: RwSignal<Option<f64>>,
    holdings: RwSignal<Vec<Holding>>,
    loading: RwSignal<bool>,
    status: RwSignal<FetchStatus>,
    session: SessionStore,
    fetcher: HoldingsFetcher,
    latest_ticket: Rc<Cell<u64>>,
}

impl PortfolioStore {
    pub fn new(session: SessionStore, fetcher: HoldingsFetcher) -> Self {
        Self {
            balance: create_rw_signal(None),
            holdings: create_rw_signal(Vec::new()),
            loading: create_rw_signal(true),
            status: create_rw_signal(FetchStatus::Ok),
            session,
            fetcher,
            latest_ticket: Rc::new(Cell::new(0)),
        }
    }

    /// Production wiring against the trading service.
    pub fn for_api(session: SessionStore, api: Rc<TradingApiClient>) -> Self {
        let fetcher: HoldingsFetcher = Rc::new(move || {
            let api = api.clone();
            async move { api.holdings().await }.boxed_local()
        });
        Self::new(session, fetcher)
    }

    pub fn balance(&self) -> ReadSignal<Option<f64>> {
        self.balance.read_only()
    }

    pub fn holdings(&self) -> ReadSignal<Vec<Holding>> {
        self.holdings.read_only()
    }

    pub fn loading(&self) -> ReadSignal<bool> {
        self.loading.read_only()
    }

    pub fn status(&self) -> ReadSignal<FetchStatus> {
        self.status.read_only()
    }

    /// Non-reactive copy of the current snapshot.
    pub fn current_snapshot(&self) -> (Option<f64>, Vec<Holding>) {
        (
            self.balance.get_untracked(),
            self.holdings.get_untracked(),
        )
    }

    /// Re-fetch balance + holdings and replace the snapshot wholesale.
    ///
    /// Without a session token the fetch is skipped and the store settles
    /// into an empty, non-loading state. On failure the previous snapshot is
    /// kept and only the status flag degrades.
    pub async fn refresh(&self) {
        if self.session.current_token().is_none() {
            self.balance.set(None);
            self.holdings.set(Vec::new());
            self.loading.set(false);
            return;
        }

        let ticket = self.latest_ticket.get() + 1;
        self.latest_ticket.set(ticket);

        let result = (self.fetcher)().await;

        if self.latest_ticket.get() != ticket {
            log_debug!(
                LogComponent::Application("Portfolio"),
                "Discarding superseded holdings response (ticket {})",
                ticket
            );
            return;
        }

        match result {
            Ok(snapshot) => {
                // full replacement, never a merge
                self.balance.set(Some(snapshot.balance));
                self.holdings.set(snapshot.holdings);
                self.status.set(FetchStatus::Ok);
            }
            Err(ApiError::Unauthorized) => {
                // the service no longer honors the token; force login
                self.session.logout();
                self.balance.set(None);
                self.holdings.set(Vec::new());
            }
            Err(err) => {
                log_error!(
                    LogComponent::Application("Portfolio"),
                    "Failed to fetch holdings: {}",
                    err
                );
                let degraded = if self.balance.get_untracked().is_some() {
                    FetchStatus::Stale
                } else {
                    FetchStatus::Error
                };
                self.status.set(degraded);
            }
        }
        self.loading.set(false);
    }
}

/// Make the store available to the component subtree.
pub fn provide_portfolio(store: PortfolioStore) {
    provide_context(store);
}

/// Fetch the shared store; panics outside a providing subtree.
pub fn use_portfolio() -> PortfolioStore {
    expect_context::<PortfolioStore>()
}
