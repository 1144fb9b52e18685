//! Sidebar Menu Item
//!
//! Menu entries with their icons. Icons are a closed set drawn as inline SVG.

use leptos::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuIcon {
    Dashboard,
    Users,
    Trash,
    Route,
    MapPin,
    Clipboard,
    Logout,
}

impl MenuIcon {
    /// SVG path data (24×24 viewBox, stroked)
    fn path(&self) -> &'static str {
        match self {
            MenuIcon::Dashboard => "M3 3h7v9H3zM14 3h7v5h-7zM14 12h7v9h-7zM3 16h7v5H3z",
            MenuIcon::Users => "M16 21v-2a4 4 0 0 0-4-4H6a4 4 0 0 0-4 4v2M9 11a4 4 0 1 0 0-8 4 4 0 0 0 0 8zM22 21v-2a4 4 0 0 0-3-3.87M16 3.13a4 4 0 0 1 0 7.75",
            MenuIcon::Trash => "M3 6h18M8 6V4h8v2M19 6l-1 14H6L5 6M10 11v6M14 11v6",
            MenuIcon::Route => "M6 19a2 2 0 1 0 0-4 2 2 0 0 0 0 4zM18 9a2 2 0 1 0 0-4 2 2 0 0 0 0 4zM6 15V9a4 4 0 0 1 4-4h6M18 9v6a4 4 0 0 1-4 4H8",
            MenuIcon::MapPin => "M21 10c0 7-9 13-9 13S3 17 3 10a9 9 0 0 1 18 0zM12 13a3 3 0 1 0 0-6 3 3 0 0 0 0 6z",
            MenuIcon::Clipboard => "M16 4h2a2 2 0 0 1 2 2v14a2 2 0 0 1-2 2H6a2 2 0 0 1-2-2V6a2 2 0 0 1 2-2h2M9 2h6v4H9zM9 12h6M9 16h6",
            MenuIcon::Logout => "M9 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h4M16 17l5-5-5-5M21 12H9",
        }
    }

    pub fn render(self) -> impl IntoView {
        view! {
            <svg class="menu-icon" viewBox="0 0 24 24" width="20" height="20" fill="none"
                stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
                <path d=self.path() />
            </svg>
        }
    }
}

#[component]
pub fn MenuItem(
    icon: MenuIcon,
    #[prop(into)] label: String,
    #[prop(into)] active: Signal<bool>,
    #[prop(into)] on_select: Callback<()>,
) -> impl IntoView {
    view! {
        <li>
            <button
                class=move || if active.get() { "menu-item active" } else { "menu-item" }
                on:click=move |_| on_select.run(())
            >
                {icon.render()}
                <span>{label}</span>
            </button>
        </li>
    }
}
