pub mod admin;
pub mod health;
pub mod redirect;
pub mod storefront;

pub use health::{AppStartTime, HealthService, health_routes};
pub use redirect::{RedirectHandler, redirect_routes};
pub use storefront::storefront_routes;
