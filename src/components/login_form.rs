//! Login Form Component
//!
//! Phone and password sign-in. Only administrator accounts get past it.

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;

use crate::api::{self, Credentials};
use crate::context::{use_api, use_auth};

#[component]
pub fn LoginForm() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();

    let phone = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<&'static str>>(None);
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let phone = phone.get().trim().to_string();
        let password = password.get();
        if phone.is_empty() || password.is_empty() {
            set_error.set(Some("Ingresa tu teléfono y contraseña."));
            return;
        }

        set_submitting.set(true);
        set_error.set(None);
        let api = api.get_value();
        spawn_local(async move {
            let credentials = Credentials {
                phone: &phone,
                password: &password,
            };
            match api::login(&api, &credentials).await {
                Ok(identity) => auth.sign_in(identity),
                Err(err) => {
                    warn!(%err, "login rejected");
                    set_error.set(Some(err.user_message()));
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="login-page">
            <form class="login-form" on:submit=on_submit>
                <h1>"Recolección de Residuos"</h1>
                <h2>"Iniciar Sesión"</h2>
                <label class="form-field">
                    <span>"Teléfono"</span>
                    <input
                        type="tel"
                        autocomplete="username"
                        prop:value=move || phone.get()
                        on:input=move |ev| phone.set(event_target_value(&ev))
                    />
                </label>
                <label class="form-field">
                    <span>"Contraseña"</span>
                    <input
                        type="password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>
                {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
                <button type="submit" class="btn-primary" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Ingresando..." } else { "Ingresar" }}
                </button>
            </form>
        </div>
    }
}
