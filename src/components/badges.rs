//! Status Badges

use leptos::prelude::*;

use crate::models::{CollectionMethod, Role};

#[component]
pub fn RoleBadge(role: Role) -> impl IntoView {
    let class = match role {
        Role::Administrator => "badge badge-admin",
        Role::Collector => "badge badge-collector",
        Role::Unknown => "badge",
    };
    view! { <span class=class>{role.label()}</span> }
}

#[component]
pub fn StatusBadge(collected: bool) -> impl IntoView {
    let (class, text) = if collected {
        ("badge badge-collected", "Recolectado")
    } else {
        ("badge badge-pending", "Pendiente")
    };
    view! { <span class=class>{text}</span> }
}

#[component]
pub fn MethodBadge(method: CollectionMethod) -> impl IntoView {
    let class = match method {
        CollectionMethod::Qr => "badge badge-qr",
        CollectionMethod::Nfc => "badge badge-nfc",
        CollectionMethod::Other => "badge",
    };
    view! { <span class=class>{method.as_str()}</span> }
}
