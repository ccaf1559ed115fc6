//! Redirect rules service

use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::{Result, StoreError};
use crate::storage::{Paged, Redirect, RedirectDraft, SeaOrmStorage};

pub struct RedirectService {
    storage: Arc<SeaOrmStorage>,
}

impl RedirectService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn list(
        &self,
        search: &Option<String>,
        page: u64,
        page_size: u64,
    ) -> Result<Paged<Redirect>> {
        self.storage.list_redirects(search, page, page_size).await
    }

    pub async fn get(&self, id: i32) -> Result<Redirect> {
        self.storage
            .get_redirect(id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("Redirect not found: {}", id)))
    }

    pub async fn save(&self, id: Option<i32>, draft: RedirectDraft) -> Result<Redirect> {
        let draft = normalize_redirect_draft(draft)?;

        if let Some(existing) = self.storage.find_redirect_by_path(&draft.from_path).await?
            && Some(existing.id) != id
        {
            return Err(StoreError::conflict(format!(
                "A redirect from {} already exists",
                draft.from_path
            )));
        }

        match id {
            None => self.storage.insert_redirect(&draft).await,
            Some(id) => self.storage.update_redirect(id, &draft).await,
        }
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        self.storage.delete_redirect(id).await
    }

    /// Find the active redirect for a request path and count the hit
    pub async fn resolve(&self, path: &str) -> Result<Option<Redirect>> {
        let path = normalize_source_path(path);
        let redirect = match self.storage.find_redirect_by_path(&path).await? {
            Some(redirect) if redirect.active => redirect,
            _ => return Ok(None),
        };

        if let Err(e) = self.storage.record_redirect_hit(redirect.id).await {
            warn!("Failed to record redirect hit for {}: {}", path, e);
        }
        debug!("Redirect {} -> {} ({})", path, redirect.to_path, redirect.status_code);
        Ok(Some(redirect))
    }
}

/// 去掉首尾空白、查询串和结尾的 `/`（根路径除外）
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// 匹配用的源路径：先做百分号解码再 [`normalize_path`]
///
/// `/blog/caf%C3%A9` and `/blog/café` normalize to the same key. Input that
/// does not decode to UTF-8 is kept as sent.
pub fn normalize_source_path(path: &str) -> String {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match urlencoding::decode(path) {
        Ok(decoded) => normalize_path(&decoded),
        Err(_) => normalize_path(path),
    }
}

/// Site-relative path or absolute http(s) URL
fn is_valid_target(target: &str) -> bool {
    if target.starts_with('/') {
        return !target.starts_with("//");
    }
    match url::Url::parse(target) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

pub fn normalize_redirect_draft(draft: RedirectDraft) -> Result<RedirectDraft> {
    let raw_from = draft.from_path.trim();
    if !raw_from.starts_with('/') {
        return Err(StoreError::invalid_redirect(format!(
            "Source path must start with '/': {}",
            raw_from
        )));
    }
    let from_path = normalize_source_path(raw_from);

    let raw_to = draft.to_path.trim();
    if !is_valid_target(raw_to) {
        return Err(StoreError::invalid_redirect(format!(
            "Target must be a site path or an http(s) URL: {}",
            raw_to
        )));
    }
    let to_path = if raw_to.starts_with('/') {
        normalize_path(raw_to)
    } else {
        raw_to.to_string()
    };

    if raw_to.starts_with('/') && normalize_source_path(raw_to) == from_path {
        return Err(StoreError::invalid_redirect(
            "Source and target paths must be different",
        ));
    }
    if !matches!(draft.status_code, 301 | 302) {
        return Err(StoreError::invalid_redirect(format!(
            "Redirect status must be 301 or 302, got {}",
            draft.status_code
        )));
    }

    Ok(RedirectDraft {
        from_path,
        to_path,
        ..draft
    })
}
