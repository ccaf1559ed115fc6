//! Affiliate service

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::{Result, StoreError};
use crate::pricing::{BPS_SCALE, apply_bps};
use crate::storage::{Affiliate, AffiliateDraft, Paged, SeaOrmStorage};
use crate::utils::{generate_random_code, non_empty};

const CODE_PREFIX_LEN: usize = 6;
const CODE_SUFFIX_LEN: usize = 4;
const MAX_CODE_ATTEMPTS: usize = 8;

pub struct AffiliateService {
    storage: Arc<SeaOrmStorage>,
}

impl AffiliateService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn list(
        &self,
        search: &Option<String>,
        page: u64,
        page_size: u64,
    ) -> Result<Paged<Affiliate>> {
        self.storage.list_affiliates(search, page, page_size).await
    }

    pub async fn get(&self, id: i32) -> Result<Affiliate> {
        self.storage
            .get_affiliate(id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("Affiliate not found: {}", id)))
    }

    /// Insert when `id` is `None`, update otherwise.
    ///
    /// A missing code is generated on insert and kept on update.
    pub async fn save(&self, id: Option<i32>, draft: AffiliateDraft) -> Result<Affiliate> {
        let draft = normalize_affiliate_draft(draft)?;

        let code = match (&draft.code, id) {
            (Some(code), _) => {
                if self.code_taken_by_other(code, id).await? {
                    return Err(StoreError::conflict(format!(
                        "Affiliate code already exists: {}",
                        code
                    )));
                }
                code.clone()
            }
            (None, Some(id)) => self.get(id).await?.code,
            (None, None) => self.generate_unique_code(&draft.name).await?,
        };

        match id {
            None => self.storage.insert_affiliate(&draft, &code).await,
            Some(id) => self.storage.update_affiliate(id, &draft, &code).await,
        }
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        self.storage.delete_affiliate(id).await
    }

    /// Credit a sale and its commission to an active affiliate
    pub async fn record_sale(&self, id: i32, amount_cents: i64) -> Result<Affiliate> {
        if amount_cents <= 0 {
            return Err(StoreError::validation("Sale amount must be positive"));
        }
        let affiliate = self.get(id).await?;
        if !affiliate.active {
            return Err(StoreError::affiliate_inactive(format!(
                "Affiliate {} is inactive",
                affiliate.code
            )));
        }

        let commission_cents = commission_for(amount_cents, affiliate.commission_bps);
        if !self
            .storage
            .add_affiliate_sale(id, amount_cents, commission_cents)
            .await?
        {
            return Err(StoreError::not_found(format!("Affiliate not found: {}", id)));
        }

        info!(
            "Affiliate sale recorded: {} +{} cents (commission {} cents)",
            affiliate.code, amount_cents, commission_cents
        );
        self.get(id).await
    }

    async fn code_taken_by_other(&self, code: &str, id: Option<i32>) -> Result<bool> {
        if !self.storage.affiliate_code_exists(code).await? {
            return Ok(false);
        }
        match id {
            // 编辑时保留自己原有的代码不算冲突
            Some(id) => Ok(self.get(id).await?.code != code),
            None => Ok(true),
        }
    }

    async fn generate_unique_code(&self, name: &str) -> Result<String> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_affiliate_code(name);
            if !self.storage.affiliate_code_exists(&code).await? {
                return Ok(code);
            }
            warn!("Affiliate code collision: {}, regenerating", code);
        }
        Err(StoreError::conflict(format!(
            "Could not generate a unique affiliate code after {} attempts",
            MAX_CODE_ATTEMPTS
        )))
    }
}

/// `PREFIX-XXXX`: up to six alphanumerics of the name, upper-cased
/// (`AFF` when the name has none), then four random characters
pub fn generate_affiliate_code(name: &str) -> String {
    let prefix: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(CODE_PREFIX_LEN)
        .collect::<String>()
        .to_uppercase();
    let prefix = if prefix.is_empty() { "AFF".to_string() } else { prefix };
    format!("{}-{}", prefix, generate_random_code(CODE_SUFFIX_LEN))
}

pub fn commission_for(amount_cents: i64, commission_bps: i32) -> i64 {
    apply_bps(amount_cents, i64::from(commission_bps))
}

pub fn normalize_affiliate_draft(draft: AffiliateDraft) -> Result<AffiliateDraft> {
    let name = draft.name.trim().to_string();
    if name.is_empty() {
        return Err(StoreError::validation("Affiliate name cannot be empty"));
    }

    let email = non_empty(draft.email);
    if let Some(email) = &email
        && !is_plausible_email(email)
    {
        return Err(StoreError::validation(format!("Invalid email: {}", email)));
    }

    if !(0..=BPS_SCALE).contains(&i64::from(draft.commission_bps)) {
        return Err(StoreError::validation(format!(
            "Commission must be between 0 and {} basis points",
            BPS_SCALE
        )));
    }

    let code = non_empty(draft.code).map(|c| c.to_uppercase());
    if let Some(code) = &code
        && !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(StoreError::validation(format!(
            "Affiliate code may only contain letters, digits and '-': {}",
            code
        )));
    }

    Ok(AffiliateDraft {
        name,
        email,
        code,
        ..draft
    })
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> AffiliateDraft {
        AffiliateDraft {
            name: name.to_string(),
            email: None,
            code: None,
            commission_bps: 1000,
            active: true,
        }
    }

    #[test]
    fn test_generate_affiliate_code() {
        let code = generate_affiliate_code("Jane O'Connor Media");
        let (prefix, suffix) = code.split_once('-').unwrap();
        assert_eq!(prefix, "JANEOC");
        assert_eq!(suffix.len(), 4);

        let fallback = generate_affiliate_code("   ");
        assert!(fallback.starts_with("AFF-"));
    }

    #[test]
    fn test_commission_for() {
        assert_eq!(commission_for(10_000, 1000), 1000);
        assert_eq!(commission_for(4999, 1500), 750);
        assert_eq!(commission_for(4999, 0), 0);
    }

    #[test]
    fn test_normalize_affiliate_draft() {
        let mut d = draft("  Stream Guru ");
        d.email = Some(" guru@example.com ".into());
        d.code = Some("guru-01".into());
        let n = normalize_affiliate_draft(d).unwrap();
        assert_eq!(n.name, "Stream Guru");
        assert_eq!(n.email.as_deref(), Some("guru@example.com"));
        assert_eq!(n.code.as_deref(), Some("GURU-01"));
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(normalize_affiliate_draft(draft(" ")).is_err());

        let mut bad_email = draft("A");
        bad_email.email = Some("nope".into());
        assert!(normalize_affiliate_draft(bad_email).is_err());

        let mut bad_bps = draft("A");
        bad_bps.commission_bps = 10_001;
        assert!(normalize_affiliate_draft(bad_bps).is_err());

        let mut bad_code = draft("A");
        bad_code.code = Some("has space".into());
        assert!(normalize_affiliate_draft(bad_code).is_err());
    }
}
