//! Dashboard Shell
//!
//! Sidebar navigation, page header and the active management screen.

use leptos::prelude::*;

use crate::components::menu_item::{MenuIcon, MenuItem};
use crate::components::{
    CollectionPointsPage, CollectionsPage, ContainersPage, Overview, RoutesPage, UsersPage,
};
use crate::context::use_auth;

/// Screens reachable from the sidebar
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Overview,
    Users,
    Containers,
    Routes,
    CollectionPoints,
    Collections,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Overview,
        Section::Users,
        Section::Containers,
        Section::Routes,
        Section::CollectionPoints,
        Section::Collections,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Overview => "Panel Principal",
            Section::Users => "Gestión de Usuarios",
            Section::Containers => "Gestión de Contenedores",
            Section::Routes => "Gestión de Rutas",
            Section::CollectionPoints => "Puntos de Recolección",
            Section::Collections => "Gestión de Recolecciones",
        }
    }

    pub fn menu_label(&self) -> &'static str {
        match self {
            Section::Overview => "Inicio",
            Section::Users => "Usuarios",
            Section::Containers => "Contenedores",
            Section::Routes => "Rutas",
            Section::CollectionPoints => "Puntos de Recolección",
            Section::Collections => "Recolecciones",
        }
    }

    pub fn icon(&self) -> MenuIcon {
        match self {
            Section::Overview => MenuIcon::Dashboard,
            Section::Users => MenuIcon::Users,
            Section::Containers => MenuIcon::Trash,
            Section::Routes => MenuIcon::Route,
            Section::CollectionPoints => MenuIcon::MapPin,
            Section::Collections => MenuIcon::Clipboard,
        }
    }
}

#[component]
pub fn Dashboard() -> impl IntoView {
    let auth = use_auth();
    let (section, set_section) = signal(Section::default());

    let user_name = move || {
        auth.identity
            .get()
            .map(|identity| identity.name)
            .unwrap_or_default()
    };

    view! {
        <div class="dashboard">
            <aside class="sidebar">
                <div class="sidebar-brand">"Recolección"</div>
                <ul class="menu">
                    {Section::ALL.into_iter().map(|item| view! {
                        <MenuItem
                            icon=item.icon()
                            label=item.menu_label()
                            active=Signal::derive(move || section.get() == item)
                            on_select=move |_| set_section.set(item)
                        />
                    }).collect_view()}
                    <MenuItem
                        icon=MenuIcon::Logout
                        label="Cerrar Sesión"
                        active=Signal::derive(|| false)
                        on_select=move |_| auth.logout()
                    />
                </ul>
            </aside>
            <div class="dashboard-main">
                <header class="dashboard-header">
                    <h1>{move || section.get().title()}</h1>
                    <span class="dashboard-user">{user_name}</span>
                </header>
                <main class="dashboard-content">
                    {move || match section.get() {
                        Section::Overview => view! { <Overview /> }.into_any(),
                        Section::Users => view! { <UsersPage /> }.into_any(),
                        Section::Containers => view! { <ContainersPage /> }.into_any(),
                        Section::Routes => view! { <RoutesPage /> }.into_any(),
                        Section::CollectionPoints => view! { <CollectionPointsPage /> }.into_any(),
                        Section::Collections => view! { <CollectionsPage /> }.into_any(),
                    }}
                </main>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_titles_and_icons() {
        assert_eq!(Section::default().title(), "Panel Principal");
        assert_eq!(Section::CollectionPoints.title(), "Puntos de Recolección");
        assert_eq!(Section::Containers.icon(), MenuIcon::Trash);

        let titles: std::collections::HashSet<&str> = Section::ALL.iter().map(Section::title).collect();
        assert_eq!(titles.len(), Section::ALL.len());
    }
}
