use leptos::*;
use std::rc::Rc;

use crate::{
    application::{
        notifications::{self, NotificationKind},
        portfolio::{PortfolioStore, provide_portfolio, use_portfolio},
        price_feed::{start_price_poll, stop_all_polls},
        trade::{SubmitPhase, TradeSubmitter, parse_quantity},
    },
    domain::{
        logging::{LogComponent, get_logger},
        market::{FetchStatus, TradeRequest, TradeSide, load_catalog},
        session::SessionStore,
    },
    global_state::{
        ActiveView, active_view, catalog, catalog_loading, current_symbol, last_quote,
        notifications as toast_stack, quote_status,
    },
    infrastructure::{BrowserCredentials, TradingApiClient},
};

/// The event this terminal is built for.
pub const EVENT_NAME: &str = "Cisbosium 2025";

const CSS: &str = r#"
.trading-app {
    font-family: 'SF Pro Display', -apple-system, BlinkMacSystemFont, sans-serif;
    background: #0a0d1c;
    min-height: 100vh;
    color: white;
}

.login-screen {
    display: flex;
    min-height: 100vh;
    align-items: center;
    justify-content: center;
    gap: 60px;
    background: linear-gradient(180deg, #0a0d1c 0%, #131836 100%);
}

.login-brand h1 { font-size: 32px; margin-bottom: 8px; }
.login-brand p { color: #9aa3b5; max-width: 320px; }
.login-brand ul { margin-top: 16px; color: #c5cbd9; line-height: 1.8; list-style: none; }

.login-form {
    background: rgba(255, 255, 255, 0.04);
    border: 1px solid #2c3550;
    border-radius: 12px;
    padding: 32px;
    width: 320px;
    display: flex;
    flex-direction: column;
    gap: 14px;
}

.login-form input {
    background: #1a2138;
    border: 1px solid #2c3550;
    border-radius: 8px;
    color: white;
    padding: 10px 12px;
}

.form-error {
    background: rgba(127, 29, 29, 0.4);
    border: 1px solid #7f1d1d;
    border-radius: 8px;
    color: #fca5a5;
    font-size: 13px;
    padding: 8px 10px;
}

.primary-btn {
    background: linear-gradient(90deg, #2563eb, #4f46e5);
    border: none;
    border-radius: 8px;
    color: white;
    cursor: pointer;
    font-size: 15px;
    padding: 11px;
}
.primary-btn:disabled { opacity: 0.6; cursor: not-allowed; }

.shell { display: flex; height: 100vh; overflow: hidden; }

.side-nav {
    width: 64px;
    background: #11162a;
    border-right: 1px solid #1f2740;
    display: flex;
    flex-direction: column;
    align-items: center;
    padding: 18px 0;
    gap: 12px;
}

.nav-btn {
    background: transparent;
    border: none;
    border-radius: 8px;
    color: #8b93a7;
    cursor: pointer;
    font-size: 18px;
    height: 40px;
    width: 40px;
}
.nav-btn.active { background: #2563eb; color: white; }
.nav-btn.logout { margin-top: auto; }

.main-column { flex: 1; display: flex; flex-direction: column; overflow: hidden; }

.top-bar {
    border-bottom: 1px solid #1f2740;
    display: flex;
    align-items: center;
    gap: 10px;
    padding: 12px 20px;
}
.top-bar .full-name { color: #8b93a7; font-size: 13px; }

.market-layout { display: flex; flex: 1; overflow: hidden; }

.market-list {
    width: 260px;
    border-right: 1px solid #1f2740;
    display: flex;
    flex-direction: column;
    overflow-y: auto;
}
.market-list input {
    background: #1a2138;
    border: 1px solid #2c3550;
    border-radius: 8px;
    color: white;
    margin: 12px;
    padding: 8px 10px;
}
.market-list ul { list-style: none; }
.market-list li button {
    background: transparent;
    border: none;
    color: white;
    cursor: pointer;
    display: block;
    padding: 10px 16px;
    text-align: left;
    width: 100%;
}
.market-list li button:hover { background: #1a2138; }
.market-list .category { color: #8b93a7; font-size: 12px; }
.empty-note { color: #69718a; padding: 16px; text-align: center; }

.content-pane { flex: 1; overflow-y: auto; padding: 16px; display: flex; flex-direction: column; gap: 16px; }

.panel {
    background: #11162a;
    border: 1px solid #1f2740;
    border-radius: 10px;
    padding: 16px;
}
.panel h3 { margin-bottom: 12px; }

.quote-line { display: flex; align-items: center; gap: 8px; font-size: 20px; }
.quote-line .price { color: #4ade80; font-weight: 700; }
.status-dot { border-radius: 50%; display: inline-block; height: 8px; width: 8px; }
.status-dot.stale { background: #facc15; }
.status-dot.error { background: #f87171; }

.qty-row { display: flex; margin: 12px 0; }
.qty-row button {
    background: #2c3550;
    border: none;
    color: white;
    cursor: pointer;
    width: 36px;
}
.qty-row input {
    background: #1a2138;
    border: 1px solid #2c3550;
    color: white;
    padding: 8px;
    text-align: center;
    width: 80px;
}

.order-buttons { display: flex; flex-direction: column; gap: 8px; }
.buy-btn, .sell-btn {
    border: none;
    border-radius: 8px;
    color: white;
    cursor: pointer;
    padding: 10px;
}
.buy-btn { background: #16a34a; }
.sell-btn { background: #dc2626; }
.buy-btn:disabled, .sell-btn:disabled { background: #374151; cursor: not-allowed; }

.balance-card {
    background: #1a2138;
    border-radius: 8px;
    display: flex;
    justify-content: space-between;
    margin-bottom: 12px;
    padding: 10px 14px;
}
.balance-card .amount { color: #4ade80; font-weight: 600; }

.holdings-table { border-collapse: collapse; width: 100%; }
.holdings-table th, .holdings-table td {
    border-bottom: 1px solid #1f2740;
    padding: 8px 10px;
    text-align: left;
}
.holdings-table th:last-child, .holdings-table td:last-child { text-align: right; }

.event-page { overflow-y: auto; padding: 24px; }
.event-card {
    background: #11162a;
    border: 1px solid #1f2740;
    border-radius: 10px;
    margin-bottom: 14px;
    padding: 16px;
}
.event-card .coordinators { color: #8b93a7; font-size: 13px; margin-top: 6px; }

.toast-stack {
    display: flex;
    flex-direction: column;
    gap: 10px;
    position: fixed;
    right: 16px;
    top: 16px;
    width: 300px;
    z-index: 1000;
}
.toast {
    background: #1f2937;
    border: 1px solid #374151;
    border-radius: 10px;
    padding: 12px 14px;
    position: relative;
}
.toast.success { border-left: 4px solid #16a34a; }
.toast.error { border-left: 4px solid #dc2626; }
.toast .toast-title { font-weight: 700; margin-bottom: 4px; }
.toast .toast-grid { display: grid; font-size: 13px; gap: 2px 12px; grid-template-columns: auto 1fr; }
.toast .toast-grid .label { color: #9ca3af; }
.toast .dismiss {
    background: transparent;
    border: none;
    color: #9ca3af;
    cursor: pointer;
    position: absolute;
    right: 8px;
    top: 8px;
}
"#;

/// 🦀 Root component: the session gate. No token renders only the login
/// surface; a token renders the authenticated shell.
#[component]
pub fn App() -> impl IntoView {
    let session = SessionStore::new(Rc::new(BrowserCredentials::new()));
    provide_context(session.clone());
    let token = session.token();

    view! {
        <style>{CSS}</style>
        <div class="trading-app">
            {move || if token.get().is_some() {
                view! { <AuthenticatedShell /> }.into_view()
            } else {
                view! { <LoginPage /> }.into_view()
            }}
            <NotificationStack />
        </div>
    }
}

/// Login surface with inline error text. Enter submits.
#[component]
fn LoginPage() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let api = Rc::new(TradingApiClient::new(session.clone()));

    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) = create_signal(String::new());
    let (pending, set_pending) = create_signal(false);

    let attempt_login = move || {
        if pending.get_untracked() {
            return;
        }
        let username_value = username.get_untracked();
        let password_value = password.get_untracked();
        if username_value.is_empty() || password_value.is_empty() {
            set_error.set("Please enter both username and password".to_string());
            return;
        }
        set_pending.set(true);
        set_error.set(String::new());

        let api = api.clone();
        let session = session.clone();
        spawn_local(async move {
            match api.login(&username_value, &password_value).await {
                Ok(access) => {
                    get_logger().info(LogComponent::Presentation("Login"), "Login successful");
                    session.login(access);
                }
                Err(err) => set_error.set(err.user_message()),
            }
            set_pending.set(false);
        });
    };

    let submit = {
        let attempt_login = attempt_login.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            attempt_login();
        }
    };

    view! {
        <div class="login-screen">
            <div class="login-brand">
                <h1>{EVENT_NAME}</h1>
                <p>"Stock Market Challenge - test your financial acumen in our simulated trading competition."</p>
                <ul>
                    <li>"💳 Start with virtual credits to build your portfolio"</li>
                    <li>"🔄 Trade stocks with real-time market prices"</li>
                    <li>"🏆 Compete for prizes with the highest portfolio value"</li>
                </ul>
            </div>
            <form class="login-form" on:submit=submit>
                <h2>"Welcome Back"</h2>
                <input
                    type="text"
                    placeholder="Username"
                    prop:value=username
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=password
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                <Show when=move || !error.get().is_empty()>
                    <div class="form-error">{move || error.get()}</div>
                </Show>
                <button type="submit" class="primary-btn" disabled=pending>
                    {move || if pending.get() { "Signing in..." } else { "Sign In" }}
                </button>
            </form>
        </div>
    }
}

/// Authenticated shell: navigation plus exactly one of the two views. Owns
/// the shared portfolio store and the price-poll lifecycle.
#[component]
fn AuthenticatedShell() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let api = Rc::new(TradingApiClient::new(session.clone()));

    let portfolio = PortfolioStore::for_api(session.clone(), api.clone());
    provide_portfolio(portfolio.clone());
    provide_context(TradeSubmitter::for_api(api.clone(), session, portfolio.clone()));

    // one automatic refresh at provider creation
    spawn_local(async move { portfolio.refresh().await });

    // the catalog is a fresh one-shot load per shell mount
    spawn_local(async move {
        catalog().set(load_catalog().await);
        catalog_loading().set(false);
    });

    // restart the quote poll whenever the selection changes
    {
        let api = api.clone();
        create_effect(move |_| {
            start_price_poll(api.clone(), current_symbol().get());
        });
    }
    on_cleanup(stop_all_polls);

    view! {
        <div class="shell">
            <SideNav />
            <div class="main-column">
                <TopBar />
                {move || match active_view().get() {
                    ActiveView::Market => view! { <MarketView /> }.into_view(),
                    ActiveView::Event => view! { <EventPage /> }.into_view(),
                }}
            </div>
        </div>
    }
}

#[component]
fn SideNav() -> impl IntoView {
    let session = expect_context::<SessionStore>();

    let nav_class = |view: ActiveView| {
        move || {
            if active_view().get() == view {
                "nav-btn active"
            } else {
                "nav-btn"
            }
        }
    };

    let logout = move |_| {
        stop_all_polls();
        session.logout();
    };

    view! {
        <nav class="side-nav">
            <button
                class=nav_class(ActiveView::Market)
                title="Market View"
                on:click=move |_| active_view().set(ActiveView::Market)
            >
                "📈"
            </button>
            <button
                class=nav_class(ActiveView::Event)
                title=EVENT_NAME
                on:click=move |_| active_view().set(ActiveView::Event)
            >
                "📋"
            </button>
            <button class="nav-btn logout" title="Logout" on:click=logout>
                "⏻"
            </button>
        </nav>
    }
}

#[component]
fn TopBar() -> impl IntoView {
    let full_name = move || {
        let symbol = current_symbol().get();
        catalog().with(|instruments| {
            instruments
                .iter()
                .find(|i| i.symbol == symbol)
                .map(|i| i.display_name.clone())
        })
    };

    view! {
        <header class="top-bar">
            {move || match active_view().get() {
                ActiveView::Market => view! {
                    <span>{move || current_symbol().get().value().to_string()}</span>
                    <span class="full-name">{full_name}</span>
                }.into_view(),
                ActiveView::Event => view! { <h1>{EVENT_NAME}</h1> }.into_view(),
            }}
        </header>
    }
}

#[component]
fn MarketView() -> impl IntoView {
    view! {
        <div class="market-layout">
            <MarketList />
            <div class="content-pane">
                <TradingPanel />
                <HoldingsTable />
            </div>
        </div>
    }
}

/// Searchable instrument list; selecting an entry drives the quote poll and
/// the trading panel.
#[component]
fn MarketList() -> impl IntoView {
    let (search, set_search) = create_signal(String::new());

    let filtered = move || {
        let term = search.get();
        catalog().with(|instruments| {
            instruments
                .iter()
                .filter(|i| term.is_empty() || i.matches(&term))
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="market-list">
            <input
                type="text"
                placeholder="Search stocks..."
                prop:value=search
                on:input=move |ev| set_search.set(event_target_value(&ev))
            />
            <h2 class="empty-note">"Available Stocks"</h2>
            {move || if catalog_loading().get() {
                view! { <div class="empty-note">"Loading stocks..."</div> }.into_view()
            } else if filtered().is_empty() {
                view! {
                    <div class="empty-note">
                        {format!("No stocks found matching \"{}\"", search.get())}
                    </div>
                }.into_view()
            } else {
                view! {
                    <ul>
                        <For
                            each=filtered
                            key=|instrument| instrument.symbol.clone()
                            children=move |instrument| {
                                let symbol = instrument.symbol.clone();
                                view! {
                                    <li>
                                        <button on:click=move |_| current_symbol().set(symbol.clone())>
                                            <div>{instrument.symbol.value().to_string()}</div>
                                            <div class="category">{instrument.display_name.clone()}</div>
                                        </button>
                                    </li>
                                }
                            }
                        />
                    </ul>
                }.into_view()
            }}
        </div>
    }
}

/// Quote display plus the buy/sell form. The displayed price is only ever
/// the quote for the currently selected symbol.
#[component]
fn TradingPanel() -> impl IntoView {
    let portfolio = use_portfolio();
    let submitter = expect_context::<TradeSubmitter>();

    let (quantity_input, set_quantity_input) = create_signal("1".to_string());
    let (form_error, set_form_error) = create_signal(String::new());

    let balance = portfolio.balance();
    let phase = submitter.phase();

    let displayed_quote =
        move || last_quote().get().filter(|quote| quote.symbol == current_symbol().get());

    let step_quantity = move |delta: i64| {
        let current = parse_quantity(&quantity_input.get_untracked()).unwrap_or(1) as i64;
        let next = (current + delta).max(1) as u32;
        set_quantity_input.set(next.to_string());
    };

    let can_afford = move || {
        match (
            balance.get(),
            displayed_quote(),
            parse_quantity(&quantity_input.get()),
        ) {
            (Some(balance), Some(quote), Some(quantity)) => {
                balance >= quote.price.value() * quantity as f64
            }
            // without a balance or quote the service is the judge
            _ => true,
        }
    };

    let place_order = {
        let submitter = submitter.clone();
        move |side: TradeSide| {
            set_form_error.set(String::new());
            let Some(quantity) = parse_quantity(&quantity_input.get_untracked()) else {
                set_form_error.set("Quantity must be a positive integer".to_string());
                return;
            };
            let request = TradeRequest::new(side, current_symbol().get_untracked(), quantity);
            let quote = last_quote()
                .get_untracked()
                .filter(|quote| quote.symbol == request.symbol);
            let submitter = submitter.clone();
            spawn_local(async move { submitter.submit(request, quote).await });
        }
    };
    let buy = {
        let place_order = place_order.clone();
        move |_| place_order(TradeSide::Buy)
    };
    let sell = {
        let place_order = place_order.clone();
        move |_| place_order(TradeSide::Sell)
    };

    let submitting = move || phase.get() == SubmitPhase::Submitting;

    view! {
        <div class="panel">
            <h3>"Trading Panel"</h3>
            <div class="quote-line">
                <span>{move || current_symbol().get().value().to_string()}</span>
                {move || match displayed_quote() {
                    Some(quote) => view! {
                        <span class="price">{format!("${:.2}", quote.price.value())}</span>
                        {quote_indicator()}
                    }.into_view(),
                    None => view! { <span class="full-name">"awaiting quote"</span> }.into_view(),
                }}
            </div>
            <div class="balance-card">
                <span>"Available Balance:"</span>
                <span class="amount">
                    {move || balance.get().map_or_else(|| "$0.00".to_string(), |b| format!("${:.2}", b))}
                </span>
            </div>
            <div class="qty-row">
                <button on:click=move |_| step_quantity(-1)>"−"</button>
                <input
                    type="number"
                    min="1"
                    prop:value=quantity_input
                    on:input=move |ev| set_quantity_input.set(event_target_value(&ev))
                />
                <button on:click=move |_| step_quantity(1)>"+"</button>
            </div>
            <div class="order-buttons">
                <button
                    class="buy-btn"
                    disabled=move || submitting() || !can_afford()
                    on:click=buy
                >
                    {move || if submitting() { "Processing...".to_string() } else {
                        format!("Buy {}", current_symbol().get().value())
                    }}
                </button>
                <button class="sell-btn" disabled=submitting on:click=sell>
                    {move || if submitting() { "Processing...".to_string() } else {
                        format!("Sell {}", current_symbol().get().value())
                    }}
                </button>
            </div>
            <Show when=move || !form_error.get().is_empty()>
                <div class="form-error">{move || form_error.get()}</div>
            </Show>
        </div>
    }
}

/// Small staleness dot next to the quote when the last poll failed.
fn quote_indicator() -> View {
    (move || match quote_status().get() {
        FetchStatus::Ok => ().into_view(),
        FetchStatus::Stale => view! { <span class="status-dot stale" title="quote may be stale"></span> }.into_view(),
        FetchStatus::Error => view! { <span class="status-dot error" title="quote unavailable"></span> }.into_view(),
    })
    .into_view()
}

/// Balance plus positions from the shared portfolio store.
#[component]
fn HoldingsTable() -> impl IntoView {
    let portfolio = use_portfolio();
    let holdings = portfolio.holdings();
    let balance = portfolio.balance();
    let loading = portfolio.loading();
    let status = portfolio.status();

    let refresh = {
        let portfolio = portfolio.clone();
        move |_| {
            let portfolio = portfolio.clone();
            spawn_local(async move { portfolio.refresh().await });
        }
    };

    view! {
        <div class="panel">
            <h3>"Your Stock Holdings"</h3>
            <div class="balance-card">
                <span>
                    "Available Balance:"
                    {move || match status.get() {
                        FetchStatus::Ok => ().into_view(),
                        FetchStatus::Stale => view! { <span class="status-dot stale" title="showing last known data"></span> }.into_view(),
                        FetchStatus::Error => view! { <span class="status-dot error" title="holdings unavailable"></span> }.into_view(),
                    }}
                </span>
                <span class="amount">
                    {move || balance.get().map_or_else(|| "$0.00".to_string(), |b| format!("${:.2}", b))}
                </span>
            </div>
            <button class="primary-btn" on:click=refresh>"Refresh"</button>
            {move || if loading.get() {
                view! { <div class="empty-note">"Loading your holdings..."</div> }.into_view()
            } else if holdings.get().is_empty() {
                view! {
                    <div class="empty-note">
                        <p>"No stock holdings available"</p>
                        <p>"Start trading to see your portfolio here"</p>
                    </div>
                }.into_view()
            } else {
                view! {
                    <table class="holdings-table">
                        <thead>
                            <tr>
                                <th>"Stock Symbol"</th>
                                <th>"Quantity"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || holdings.get()
                                key=|holding| holding.symbol.clone()
                                children=move |holding| {
                                    view! {
                                        <tr>
                                            <td>{holding.symbol.value().to_string()}</td>
                                            <td>{holding.quantity}</td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                }.into_view()
            }}
        </div>
    }
}

/// Static information page for the event. Content only; no remote calls.
#[component]
fn EventPage() -> impl IntoView {
    let events = [
        (
            "Research Guru",
            "Unleash your research potential and showcase innovative ideas.",
            "Varshaa, Aswin and Partha",
        ),
        (
            "Shark Tank",
            "Pitch your innovative business ideas to a panel of industry experts.",
            "Harini, Keerthana and Yuvasri",
        ),
        (
            "Coding and Debugging",
            "Showcase your coding skills and debug challenging programs.",
            "Sheegan Sri, Prasath and Niktha Sahin",
        ),
        (
            "Think Hack",
            "Crack the code, race the clock - to seize the Ultimate Innovator title!",
            "Siva, Sharvesh Guru, Nivetha",
        ),
        (
            "Stock Market Challenge",
            "Trade simulated stocks with virtual credits and climb the leaderboard.",
            "Department of Computer Science and Business Systems",
        ),
    ];

    view! {
        <div class="event-page">
            <h2>{format!("{} - Event Catalog", EVENT_NAME)}</h2>
            {events
                .into_iter()
                .map(|(title, description, coordinators)| view! {
                    <div class="event-card">
                        <h3>{title}</h3>
                        <p>{description}</p>
                        <p class="coordinators">{format!("Coordinators: {}", coordinators)}</p>
                    </div>
                })
                .collect_view()}
        </div>
    }
}

/// Dismissible toast stack fed by the notification module.
#[component]
fn NotificationStack() -> impl IntoView {
    view! {
        <div class="toast-stack">
            <For
                each=move || toast_stack().get()
                key=|notification| notification.id
                children=move |notification| {
                    let id = notification.id;
                    let kind_class = match notification.kind {
                        NotificationKind::Success => "toast success",
                        NotificationKind::Error => "toast error",
                    };
                    view! {
                        <div class=kind_class>
                            <div class="toast-title">{notification.title.clone()}</div>
                            <Show when={let body = notification.body.clone(); move || !body.is_empty()}>
                                <p>{notification.body.clone()}</p>
                            </Show>
                            <div class="toast-grid">
                                {notification
                                    .details
                                    .iter()
                                    .map(|(label, value)| view! {
                                        <span class="label">{format!("{}:", label)}</span>
                                        <span>{value.clone()}</span>
                                    })
                                    .collect_view()}
                            </div>
                            <button class="dismiss" on:click=move |_| notifications::dismiss(id)>
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
