//! Modal and Page Header
//!
//! Layout pieces shared by the management screens.

use leptos::prelude::*;

/// Overlay dialog; clicking the backdrop or × runs `on_close`
#[component]
pub fn Modal(
    #[prop(into)] title: String,
    #[prop(into)] on_close: Callback<()>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="modal-backdrop" on:click=move |_| on_close.run(())>
            <div class="modal" on:click=|ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h3>{title}</h3>
                    <button class="modal-close" on:click=move |_| on_close.run(())>"×"</button>
                </div>
                <div class="modal-body">{children()}</div>
            </div>
        </div>
    }
}

/// Screen heading with an optional primary action button
#[component]
pub fn PageHeader(
    #[prop(into)] title: String,
    #[prop(optional, into)] action_label: Option<String>,
    #[prop(optional, into)] on_action: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <div class="page-header">
            <h2>{title}</h2>
            {action_label.zip(on_action).map(|(label, on_action)| view! {
                <button class="btn-primary" on:click=move |_| on_action.run(())>{label}</button>
            })}
        </div>
    }
}

/// Labelled text input bound to a signal
#[component]
pub fn TextField(
    #[prop(into)] label: String,
    value: RwSignal<String>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional, into)] placeholder: String,
) -> impl IntoView {
    view! {
        <label class="form-field">
            <span>{label}</span>
            <input
                type=input_type
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </label>
    }
}
