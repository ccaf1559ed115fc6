//! schema.org JSON-LD documents for search engines

use serde_json::{Value, json};

use crate::config::StoreConfig;
use crate::pricing::format_cents;
use crate::storage::{BlogPost, Product};

const CONTEXT: &str = "https://schema.org";

pub fn organization(store: &StoreConfig) -> Value {
    let mut doc = json!({
        "@context": CONTEXT,
        "@type": "Organization",
        "name": store.name,
        "url": store.site_url,
    });
    if let Some(logo) = &store.logo_url {
        doc["logo"] = json!(absolute(store, logo));
    }
    doc
}

fn offer(product: &Product, store: &StoreConfig) -> Value {
    let availability = if product.active {
        "https://schema.org/InStock"
    } else {
        "https://schema.org/OutOfStock"
    };
    json!({
        "@type": "Offer",
        "price": format_cents(product.price_cents),
        "priceCurrency": store.currency,
        "availability": availability,
        "url": store.absolute_url(&format!("/products/{}", product.id)),
    })
}

pub fn product(product: &Product, store: &StoreConfig) -> Value {
    let image = product
        .image_url
        .as_deref()
        .unwrap_or(&store.default_image_url);
    json!({
        "@type": "Product",
        "name": product.name,
        "description": product.description,
        "image": absolute(store, image),
        "category": product.category.to_string(),
        "brand": { "@type": "Brand", "name": store.name },
        "offers": offer(product, store),
    })
}

pub fn product_list(products: &[Product], store: &StoreConfig) -> Value {
    let items: Vec<Value> = products
        .iter()
        .enumerate()
        .map(|(i, p)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "item": product(p, store),
            })
        })
        .collect();
    json!({
        "@context": CONTEXT,
        "@type": "ItemList",
        "numberOfItems": items.len(),
        "itemListElement": items,
    })
}

fn posting(post: &BlogPost, store: &StoreConfig) -> Value {
    let mut doc = json!({
        "@type": "BlogPosting",
        "headline": post.seo_title.as_deref().unwrap_or(&post.title),
        "description": post.seo_description.as_deref().unwrap_or(&post.excerpt),
        "url": store.absolute_url(&format!("/blog/{}", post.slug)),
        "dateModified": post.updated_at.to_rfc3339(),
        "author": { "@type": "Person", "name": author_name(post, store) },
        "publisher": { "@type": "Organization", "name": store.name },
    });
    if let Some(published) = post.published_at {
        doc["datePublished"] = json!(published.to_rfc3339());
    }
    if let Some(keywords) = &post.seo_keywords {
        doc["keywords"] = json!(keywords);
    }
    doc
}

pub fn blog_posting(post: &BlogPost, store: &StoreConfig) -> Value {
    let mut doc = posting(post, store);
    doc["@context"] = json!(CONTEXT);
    let url = doc["url"].clone();
    doc["mainEntityOfPage"] = url;
    doc
}

pub fn blog(posts: &[BlogPost], store: &StoreConfig) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "Blog",
        "name": format!("{} Blog", store.name),
        "url": store.absolute_url("/blog"),
        "blogPost": posts.iter().map(|p| posting(p, store)).collect::<Vec<_>>(),
    })
}

fn author_name<'a>(post: &'a BlogPost, store: &'a StoreConfig) -> &'a str {
    if post.author.is_empty() {
        &store.name
    } else {
        &post.author
    }
}

fn absolute(store: &StoreConfig, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        store.absolute_url(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{PostStatus, ProductCategory};
    use chrono::Utc;

    fn store() -> StoreConfig {
        StoreConfig {
            name: "Stream Store".into(),
            site_url: "https://shop.example".into(),
            logo_url: Some("/logo.png".into()),
            currency: "USD".into(),
            default_image_url: "/img/placeholder.png".into(),
        }
    }

    fn sample_product() -> Product {
        let now = Utc::now();
        Product {
            id: 7,
            name: "Fire Stick 4K Max".into(),
            price_cents: 5999,
            description: "Fastest stick".into(),
            features: vec![],
            category: ProductCategory::Firestick,
            badge: None,
            image_url: None,
            active: true,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_post() -> BlogPost {
        let now = Utc::now();
        BlogPost {
            id: 1,
            title: "Setup guide".into(),
            slug: "setup-guide".into(),
            excerpt: "How to set up".into(),
            content: "...".into(),
            author: String::new(),
            seo_title: Some("Fire Stick setup guide".into()),
            seo_description: None,
            seo_keywords: None,
            status: PostStatus::Published,
            view_count: 0,
            published_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_organization() {
        let doc = organization(&store());
        assert_eq!(doc["@type"], "Organization");
        assert_eq!(doc["logo"], "https://shop.example/logo.png");
    }

    #[test]
    fn test_product_list() {
        let doc = product_list(&[sample_product()], &store());
        assert_eq!(doc["numberOfItems"], 1);
        let item = &doc["itemListElement"][0];
        assert_eq!(item["position"], 1);
        assert_eq!(item["item"]["offers"]["price"], "59.99");
        assert_eq!(item["item"]["offers"]["priceCurrency"], "USD");
        assert_eq!(item["item"]["image"], "https://shop.example/img/placeholder.png");
        assert_eq!(item["item"]["category"], "firestick");
    }

    #[test]
    fn test_blog_posting() {
        let doc = blog_posting(&sample_post(), &store());
        assert_eq!(doc["@context"], CONTEXT);
        assert_eq!(doc["headline"], "Fire Stick setup guide");
        assert_eq!(doc["description"], "How to set up");
        assert_eq!(doc["author"]["name"], "Stream Store");
        assert_eq!(doc["url"], "https://shop.example/blog/setup-guide");
        assert!(doc.get("datePublished").is_some());
    }

    #[test]
    fn test_blog() {
        let doc = blog(&[sample_post()], &store());
        assert_eq!(doc["@type"], "Blog");
        assert_eq!(doc["blogPost"].as_array().map(|a| a.len()), Some(1));
    }
}
