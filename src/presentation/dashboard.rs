use leptos::*;
use std::rc::Rc;

use crate::domain::{
    logging::{LogComponent, get_logger},
    session::SessionStore,
};
use crate::infrastructure::http::{TradingApiClient, TransactionRecord, UserProfile};

/// Account overview with transaction history. Auxiliary surface: exported
/// for embedding, not mounted by the shell.
#[component]
pub fn ProfileDashboard() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let api = Rc::new(TradingApiClient::new(session));

    let (profile, set_profile) = create_signal(None::<UserProfile>);
    let (transactions, set_transactions) = create_signal(Vec::<TransactionRecord>::new());
    let (loading, set_loading) = create_signal(true);

    spawn_local(async move {
        match api.profile().await {
            Ok(fetched) => set_profile.set(Some(fetched)),
            Err(err) => get_logger().error(
                LogComponent::Presentation("Dashboard"),
                &format!("Failed to fetch user profile: {}", err),
            ),
        }
        match api.transactions().await {
            Ok(history) => set_transactions.set(history),
            Err(err) => get_logger().error(
                LogComponent::Presentation("Dashboard"),
                &format!("Failed to fetch transaction history: {}", err),
            ),
        }
        set_loading.set(false);
    });

    view! {
        <div class="panel">
            <h3>"Your Profile"</h3>
            {move || if loading.get() {
                view! { <div class="empty-note">"Loading profile..."</div> }.into_view()
            } else {
                view! {
                    {move || match profile.get() {
                        Some(profile) => view! {
                            <div class="balance-card">
                                <span>{format!("{} ({})", profile.username, profile.email)}</span>
                                <span class="amount">{format!("${:.2}", profile.balance)}</span>
                            </div>
                        }.into_view(),
                        None => view! {
                            <div class="empty-note">"Unable to load profile information."</div>
                        }.into_view(),
                    }}
                    <h3>"Recent Transactions"</h3>
                    {move || if transactions.get().is_empty() {
                        view! { <div class="empty-note">"No transaction history available."</div> }.into_view()
                    } else {
                        view! {
                            <table class="holdings-table">
                                <thead>
                                    <tr>
                                        <th>"Date"</th>
                                        <th>"Symbol"</th>
                                        <th>"Type"</th>
                                        <th>"Quantity"</th>
                                        <th>"Price"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {transactions
                                        .get()
                                        .into_iter()
                                        .map(|record| view! {
                                            <tr>
                                                <td>{record.timestamp.clone()}</td>
                                                <td>{record.symbol.clone()}</td>
                                                <td>{record.side.to_string().to_uppercase()}</td>
                                                <td>{record.quantity}</td>
                                                <td>{format!("${:.2}", record.price)}</td>
                                            </tr>
                                        })
                                        .collect_view()}
                                </tbody>
                            </table>
                        }.into_view()
                    }}
                }.into_view()
            }}
        </div>
    }
}
