use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// 商品分类
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProductCategory {
    #[default]
    Firestick,
    Iptv,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DiscountType {
    /// `value` is in basis points
    #[default]
    Percentage,
    /// `value` is in cents
    Fixed,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price_cents: i64,
    pub description: String,
    pub features: Vec<String>,
    pub category: ProductCategory,
    pub badge: Option<String>,
    pub image_url: Option<String>,
    pub active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: i32,
    pub code: String,
    pub discount_type: DiscountType,
    pub value: i64,
    pub min_purchase_cents: i64,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redirect {
    pub id: i32,
    pub from_path: String,
    pub to_path: String,
    pub status_code: u16,
    pub active: bool,
    pub hit_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<String>,
    pub status: PostStatus,
    pub view_count: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affiliate {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub code: String,
    pub commission_bps: i32,
    pub total_sales_cents: i64,
    pub total_commission_cents: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i32,
    pub product_id: Option<i32>,
    pub author_name: String,
    pub rating: i32,
    pub title: Option<String>,
    pub body: String,
    pub status: ReviewStatus,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================
// Drafts: the editable fields of each entity, already validated.
// Counters, ids and timestamps are owned by storage.
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price_cents: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub category: ProductCategory,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionDraft {
    pub code: String,
    #[serde(default)]
    pub discount_type: DiscountType,
    pub value: i64,
    #[serde(default)]
    pub min_purchase_cents: i64,
    #[serde(default)]
    pub max_uses: Option<i32>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectDraft {
    pub from_path: String,
    pub to_path: String,
    #[serde(default = "default_redirect_status")]
    pub status_code: u16,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    /// Empty means "derive from the title"
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    #[serde(default)]
    pub seo_keywords: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateDraft {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Generated from the name on insert when absent
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default = "default_commission_bps")]
    pub commission_bps: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDraft {
    #[serde(default)]
    pub product_id: Option<i32>,
    pub author_name: String,
    pub rating: i32,
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub featured: bool,
}

fn default_true() -> bool {
    true
}

fn default_redirect_status() -> u16 {
    301
}

fn default_commission_bps() -> i32 {
    1000
}

// ============================================================
// Query helpers
// ============================================================

/// 一页数据及总数
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<ProductCategory>,
    pub active_only: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub search: Option<String>,
    pub status: Option<PostStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub search: Option<String>,
    pub product_id: Option<i32>,
    pub status: Option<ReviewStatus>,
}

/// Dashboard counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub products_total: u64,
    pub products_active: u64,
    pub promotions_total: u64,
    pub promotions_live: u64,
    pub posts_published: u64,
    pub posts_draft: u64,
    pub blog_views: i64,
    pub reviews_pending: u64,
    pub reviews_approved: u64,
    pub average_rating: Option<f64>,
    pub redirects_total: u64,
    pub redirect_hits: i64,
    pub affiliates_active: u64,
    pub affiliate_sales_cents: i64,
    pub affiliate_commission_cents: i64,
}

/// 存储后端信息
#[derive(Debug, Clone, Serialize)]
pub struct StorageConfig {
    pub storage_type: String,
}
