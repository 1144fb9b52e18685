//! Waste Admin App
//!
//! Root component: builds the session, API client and store, provides them
//! through context, and switches between the login form and the dashboard.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use tracing::{info, warn};

use crate::api::{self, ApiClient};
use crate::components::{Dashboard, LoginForm};
use crate::config::AppConfig;
use crate::context::{AppContext, AuthContext};
use crate::session::Session;
use crate::store::AppState;

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::load();
    let session = Session::browser();
    let api = ApiClient::new(config.api_base_url.clone(), session.clone());
    let auth = AuthContext::new(session);

    provide_context(AppContext::new());
    provide_context(auth);
    provide_context(StoredValue::new(api.clone()));
    provide_context(StoredValue::new(config));
    provide_context(Store::new(AppState::default()));

    // A restored session is confirmed against the backend before use
    let (checking, set_checking) = signal(auth.identity.get_untracked().is_some());
    if checking.get_untracked() {
        spawn_local(async move {
            match api::profile(&api).await {
                Ok(_) => info!("stored session accepted"),
                Err(err) if err.is_unauthorized() => {
                    warn!("stored session rejected by backend");
                    auth.logout();
                }
                Err(err) => warn!(%err, "profile check failed"),
            }
            set_checking.set(false);
        });
    }

    view! {
        {move || {
            if checking.get() {
                view! { <div class="loading-screen">"Cargando..."</div> }.into_any()
            } else if auth.identity.with(Option::is_some) {
                view! { <Dashboard /> }.into_any()
            } else {
                view! { <LoginForm /> }.into_any()
            }
        }}
    }
}
