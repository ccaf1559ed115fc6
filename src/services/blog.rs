//! Blog service

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::errors::{Result, StoreError};
use crate::storage::{BlogPost, Paged, PostDraft, PostFilter, PostStatus, SeaOrmStorage};
use crate::utils::non_empty;
use crate::utils::slug::{is_valid_slug, slugify};

const WORDS_PER_MINUTE: usize = 200;

/// A post as shown to readers
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: BlogPost,
    pub reading_minutes: u32,
}

impl From<BlogPost> for PostView {
    fn from(post: BlogPost) -> Self {
        let reading_minutes = reading_minutes(&post.content);
        Self {
            post,
            reading_minutes,
        }
    }
}

pub struct BlogService {
    storage: Arc<SeaOrmStorage>,
}

impl BlogService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn list(
        &self,
        filter: &PostFilter,
        page: u64,
        page_size: u64,
    ) -> Result<Paged<BlogPost>> {
        self.storage.list_posts(filter, page, page_size).await
    }

    pub async fn list_published(
        &self,
        search: Option<String>,
        page: u64,
        page_size: u64,
    ) -> Result<Paged<PostView>> {
        let filter = PostFilter {
            search,
            status: Some(PostStatus::Published),
        };
        let paged = self.storage.list_posts(&filter, page, page_size).await?;
        Ok(Paged {
            items: paged.items.into_iter().map(PostView::from).collect(),
            total: paged.total,
        })
    }

    pub async fn get(&self, id: i32) -> Result<BlogPost> {
        self.storage
            .get_post(id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("Blog post not found: {}", id)))
    }

    /// A published post by slug, without counting a view
    pub async fn find_published(&self, slug: &str) -> Result<BlogPost> {
        match self.storage.find_post_by_slug(slug).await? {
            Some(post) if post.status == PostStatus::Published => Ok(post),
            _ => Err(StoreError::not_found(format!("Blog post not found: {}", slug))),
        }
    }

    /// A published post by slug; counts one view
    pub async fn read_published(&self, slug: &str) -> Result<PostView> {
        let mut post = self.find_published(slug).await?;
        self.storage.record_post_view(post.id).await?;
        post.view_count += 1;
        Ok(PostView::from(post))
    }

    /// Insert when `id` is `None`, update otherwise.
    ///
    /// `published_at` is stamped the first time a post is saved as published
    /// and kept from then on.
    pub async fn save(&self, id: Option<i32>, draft: PostDraft) -> Result<BlogPost> {
        let draft = normalize_post_draft(draft)?;

        let existing = match id {
            Some(id) => Some(self.get(id).await?),
            None => None,
        };

        if let Some(other) = self.storage.find_post_by_slug(&draft.slug).await?
            && Some(other.id) != id
        {
            return Err(StoreError::conflict(format!(
                "Slug already in use: {}",
                draft.slug
            )));
        }

        let published_at = existing
            .as_ref()
            .and_then(|p| p.published_at)
            .or_else(|| (draft.status == PostStatus::Published).then(Utc::now));

        match id {
            None => self.storage.insert_post(&draft, published_at).await,
            Some(id) => self.storage.update_post(id, &draft, published_at).await,
        }
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        self.storage.delete_post(id).await
    }
}

/// ceil(words / 200), at least one minute
pub fn reading_minutes(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

pub fn normalize_post_draft(draft: PostDraft) -> Result<PostDraft> {
    let title = draft.title.trim().to_string();
    if title.is_empty() {
        return Err(StoreError::validation("Post title cannot be empty"));
    }

    let slug = match draft.slug.trim() {
        "" => slugify(&title),
        given => given.to_lowercase(),
    };
    if !is_valid_slug(&slug) {
        return Err(StoreError::validation(format!(
            "Invalid slug '{}': use lowercase letters, digits and single dashes",
            slug
        )));
    }

    Ok(PostDraft {
        title,
        slug,
        excerpt: draft.excerpt.trim().to_string(),
        author: draft.author.trim().to_string(),
        seo_title: non_empty(draft.seo_title),
        seo_description: non_empty(draft.seo_description),
        seo_keywords: non_empty(draft.seo_keywords),
        ..draft
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, slug: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            slug: slug.to_string(),
            excerpt: " short ".to_string(),
            content: "body".to_string(),
            author: " Team ".to_string(),
            seo_title: Some(" ".into()),
            seo_description: None,
            seo_keywords: Some("iptv, firestick".into()),
            status: PostStatus::Draft,
        }
    }

    #[test]
    fn test_reading_minutes() {
        assert_eq!(reading_minutes(""), 1);
        assert_eq!(reading_minutes("one two three"), 1);
        assert_eq!(reading_minutes(&"word ".repeat(200)), 1);
        assert_eq!(reading_minutes(&"word ".repeat(201)), 2);
        assert_eq!(reading_minutes(&"word ".repeat(1000)), 5);
    }

    #[test]
    fn test_slug_derived_from_title() {
        let d = normalize_post_draft(draft("Best IPTV Apps for 2026", "")).unwrap();
        assert_eq!(d.slug, "best-iptv-apps-for-2026");
        assert_eq!(d.excerpt, "short");
        assert_eq!(d.author, "Team");
        assert_eq!(d.seo_title, None);
    }

    #[test]
    fn test_explicit_slug_lowercased() {
        let d = normalize_post_draft(draft("Title", "My-Post")).unwrap();
        assert_eq!(d.slug, "my-post");
    }

    #[test]
    fn test_rejects_bad_drafts() {
        assert!(normalize_post_draft(draft("  ", "")).is_err());
        assert!(normalize_post_draft(draft("!!!", "")).is_err());
        assert!(normalize_post_draft(draft("Title", "has space")).is_err());
    }
}
