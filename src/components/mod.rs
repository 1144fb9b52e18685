//! UI Components
//!
//! Leptos components for the login flow and the dashboard screens.

pub mod badges;
pub mod menu_item;
pub mod modal;
pub mod notify;

mod collection_points_page;
mod collections_page;
mod containers_map;
mod containers_page;
mod dashboard;
mod delete_confirm_button;
mod login_form;
mod overview;
mod routes_page;
mod users_page;

pub use collection_points_page::CollectionPointsPage;
pub use collections_page::CollectionsPage;
pub use containers_map::ContainersMap;
pub use containers_page::ContainersPage;
pub use dashboard::Dashboard;
pub use delete_confirm_button::DeleteConfirmButton;
pub use login_form::LoginForm;
pub use overview::Overview;
pub use routes_page::RoutesPage;
pub use users_page::UsersPage;
