//! Business services
//!
//! Each service validates and normalizes input before it reaches storage.
//! HTTP handlers and the CLI share them.

pub mod affiliate;
pub mod blog;
pub mod catalog;
pub mod promotion;
pub mod redirect;
pub mod review;
pub mod seed;
pub mod seo;

pub use affiliate::AffiliateService;
pub use blog::{BlogService, PostView};
pub use catalog::{CartLineRequest, CatalogService};
pub use promotion::{CouponCheck, PromotionService};
pub use redirect::RedirectService;
pub use review::ReviewService;
pub use seed::{SeedReport, seed_demo_data};
