//! Customer review service

use std::sync::Arc;

use tracing::info;

use crate::errors::{Result, StoreError};
use crate::storage::{Paged, Review, ReviewDraft, ReviewFilter, ReviewStatus, SeaOrmStorage};
use crate::utils::non_empty;

const MAX_BODY_LEN: usize = 5000;

pub struct ReviewService {
    storage: Arc<SeaOrmStorage>,
}

impl ReviewService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn list(
        &self,
        filter: &ReviewFilter,
        page: u64,
        page_size: u64,
    ) -> Result<Paged<Review>> {
        self.storage.list_reviews(filter, page, page_size).await
    }

    /// Approved reviews only, featured first
    pub async fn list_approved(
        &self,
        product_id: Option<i32>,
        page: u64,
        page_size: u64,
    ) -> Result<Paged<Review>> {
        let filter = ReviewFilter {
            search: None,
            product_id,
            status: Some(ReviewStatus::Approved),
        };
        self.storage.list_reviews(&filter, page, page_size).await
    }

    pub async fn get(&self, id: i32) -> Result<Review> {
        self.storage
            .get_review(id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("Review not found: {}", id)))
    }

    /// Customer submission: always pending and never featured
    pub async fn submit(&self, draft: ReviewDraft) -> Result<Review> {
        let draft = ReviewDraft {
            status: ReviewStatus::Pending,
            featured: false,
            ..draft
        };
        let draft = normalize_review_draft(draft)?;
        self.ensure_product_exists(draft.product_id).await?;

        let review = self.storage.insert_review(&draft).await?;
        info!("Review submitted for moderation: {}", review.id);
        Ok(review)
    }

    /// Admin save: insert when `id` is `None`, update otherwise
    pub async fn save(&self, id: Option<i32>, draft: ReviewDraft) -> Result<Review> {
        let draft = normalize_review_draft(draft)?;
        self.ensure_product_exists(draft.product_id).await?;
        match id {
            None => self.storage.insert_review(&draft).await,
            Some(id) => self.storage.update_review(id, &draft).await,
        }
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        self.storage.delete_review(id).await
    }

    async fn ensure_product_exists(&self, product_id: Option<i32>) -> Result<()> {
        if let Some(product_id) = product_id
            && self.storage.get_product(product_id).await?.is_none()
        {
            return Err(StoreError::validation(format!(
                "Unknown product: {}",
                product_id
            )));
        }
        Ok(())
    }
}

/// Only approved reviews can stay featured
pub fn normalize_review_draft(draft: ReviewDraft) -> Result<ReviewDraft> {
    let author_name = draft.author_name.trim().to_string();
    if author_name.is_empty() {
        return Err(StoreError::validation("Reviewer name cannot be empty"));
    }
    if !(1..=5).contains(&draft.rating) {
        return Err(StoreError::validation(format!(
            "Rating must be between 1 and 5, got {}",
            draft.rating
        )));
    }
    let body = draft.body.trim().to_string();
    if body.is_empty() {
        return Err(StoreError::validation("Review text cannot be empty"));
    }
    if body.chars().count() > MAX_BODY_LEN {
        return Err(StoreError::validation(format!(
            "Review text is longer than {} characters",
            MAX_BODY_LEN
        )));
    }

    let featured = draft.featured && draft.status == ReviewStatus::Approved;

    Ok(ReviewDraft {
        author_name,
        title: non_empty(draft.title),
        body,
        featured,
        ..draft
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(rating: i32, status: ReviewStatus, featured: bool) -> ReviewDraft {
        ReviewDraft {
            product_id: None,
            author_name: " Sam ".to_string(),
            rating,
            title: Some(" ".into()),
            body: " Works great ".to_string(),
            status,
            featured,
        }
    }

    #[test]
    fn test_normalize_review_draft() {
        let d = normalize_review_draft(draft(5, ReviewStatus::Approved, true)).unwrap();
        assert_eq!(d.author_name, "Sam");
        assert_eq!(d.body, "Works great");
        assert_eq!(d.title, None);
        assert!(d.featured);
    }

    #[test]
    fn test_featured_requires_approval() {
        let pending = normalize_review_draft(draft(4, ReviewStatus::Pending, true)).unwrap();
        assert!(!pending.featured);
        let rejected = normalize_review_draft(draft(4, ReviewStatus::Rejected, true)).unwrap();
        assert!(!rejected.featured);
    }

    #[test]
    fn test_rating_bounds() {
        assert!(normalize_review_draft(draft(0, ReviewStatus::Pending, false)).is_err());
        assert!(normalize_review_draft(draft(6, ReviewStatus::Pending, false)).is_err());
        assert!(normalize_review_draft(draft(1, ReviewStatus::Pending, false)).is_ok());
    }
}
