use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::AbortHandle;
use leptos::*;
use once_cell::sync::OnceCell;
use strum::{AsRefStr, Display as StrumDisplay};

use crate::application::notifications::Notification;
use crate::domain::market::{FetchStatus, Instrument, PriceQuote, Symbol};
use crate::global_signals;

/// Instrument shown before the user picks one.
pub const DEFAULT_SYMBOL: &str = "AAPL";

/// The two mutually exclusive authenticated views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay, AsRefStr)]
pub enum ActiveView {
    #[default]
    #[strum(serialize = "market")]
    Market,
    #[strum(serialize = "event")]
    Event,
}

pub struct Globals {
    pub current_symbol: RwSignal<Symbol>,
    pub active_view: RwSignal<ActiveView>,
    pub catalog: RwSignal<Vec<Instrument>>,
    pub catalog_loading: RwSignal<bool>,
    pub last_quote: RwSignal<Option<PriceQuote>>,
    pub quote_status: RwSignal<FetchStatus>,
    pub poll_abort_handles: RwSignal<HashMap<Symbol, AbortHandle>>,
    pub notifications: RwSignal<Vec<Notification>>,
    notification_seq: AtomicU64,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        current_symbol: create_rw_signal(Symbol::from(DEFAULT_SYMBOL)),
        active_view: create_rw_signal(ActiveView::default()),
        catalog: create_rw_signal(Vec::new()),
        catalog_loading: create_rw_signal(true),
        last_quote: create_rw_signal(None),
        quote_status: create_rw_signal(FetchStatus::default()),
        poll_abort_handles: create_rw_signal(HashMap::new()),
        notifications: create_rw_signal(Vec::new()),
        notification_seq: AtomicU64::new(0),
    })
}

/// Monotonic toast ids; starts at 1 so 0 can mean "not yet assigned".
pub fn next_notification_id() -> u64 {
    globals().notification_seq.fetch_add(1, Ordering::SeqCst) + 1
}

global_signals! {
    pub current_symbol => current_symbol: Symbol,
    pub active_view => active_view: ActiveView,
    pub catalog => catalog: Vec<Instrument>,
    pub catalog_loading => catalog_loading: bool,
    pub last_quote => last_quote: Option<PriceQuote>,
    pub quote_status => quote_status: FetchStatus,
    pub poll_abort_handles => poll_abort_handles: HashMap<Symbol, AbortHandle>,
    pub notifications => notifications: Vec<Notification>,
}
