pub mod affiliate;
pub mod blog_post;
pub mod product;
pub mod promotion;
pub mod redirect;
pub mod review;

pub use affiliate::Entity as AffiliateEntity;
pub use blog_post::Entity as BlogPostEntity;
pub use product::Entity as ProductEntity;
pub use promotion::Entity as PromotionEntity;
pub use redirect::Entity as RedirectEntity;
pub use review::Entity as ReviewEntity;
