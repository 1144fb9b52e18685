//! Two-step delete action used in table rows and route chips.

use leptos::prelude::*;
use leptos::ev::MouseEvent;

/// Row-level delete that only fires `on_confirm` after the user accepts the
/// inline "¿Eliminar?" prompt. Clicks never bubble to the enclosing row.
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    #[prop(into, default = "Eliminar".to_string())] label: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let armed = RwSignal::new(false);
    let settle = move |ev: MouseEvent, accepted: bool| {
        ev.stop_propagation();
        armed.set(false);
        if accepted {
            on_confirm.run(());
        }
    };

    let trigger = move || {
        let class = button_class.clone();
        let label = label.clone();
        view! {
            <button class=class on:click=move |ev: MouseEvent| {
                ev.stop_propagation();
                armed.set(true);
            }>{label}</button>
        }
    };

    view! {
        <Show when=move || armed.get() fallback=trigger>
            <span class="delete-confirm">
                <span class="delete-confirm-text">"¿Eliminar?"</span>
                <button class="confirm-btn" on:click=move |ev| settle(ev, true)>"✓"</button>
                <button class="cancel-btn" on:click=move |ev| settle(ev, false)>"✗"</button>
            </span>
        </Show>
    }
}
