//! Create, update, and display use cases for banners.

use std::sync::Arc;

use banner_core::{
    is_unset_instant, unset_instant, Banner, BannerId, BannerStore, Clock, OriginResolver,
    Selector,
};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use tracing::{debug, info};

use super::error::ServiceError;

/// Request to create a banner. Missing timestamps deserialize as unset and
/// are rejected by [`validate`](Self::validate).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBannerRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default = "unset_instant")]
    pub scheduled_at: DateTime<FixedOffset>,
    #[serde(default = "unset_instant")]
    pub expires_at: DateTime<FixedOffset>,
}

impl CreateBannerRequest {
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] if the name is blank or either
    /// timestamp is unset.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.name.trim().is_empty()
            || is_unset_instant(&self.scheduled_at)
            || is_unset_instant(&self.expires_at)
        {
            return Err(ServiceError::invalid(
                "name, scheduled_at and expires_at are required",
            ));
        }
        Ok(())
    }
}

/// Partial update. Only the provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBannerRequest {
    #[serde(default)]
    pub id: BannerId,
    pub name: Option<String>,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    pub expires_at: Option<DateTime<FixedOffset>>,
}

impl UpdateBannerRequest {
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] if the id is zero or a provided
    /// name is blank.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.id.is_unset() {
            return Err(ServiceError::invalid("banner id is required"));
        }
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ServiceError::invalid("name must not be empty"));
        }
        Ok(())
    }

    fn apply(self, banner: &mut Banner) {
        if let Some(name) = self.name {
            banner.name = name;
        }
        if let Some(scheduled_at) = self.scheduled_at {
            banner.scheduled_at = scheduled_at;
        }
        if let Some(expires_at) = self.expires_at {
            banner.expires_at = expires_at;
        }
    }
}

/// Application service coordinating banner use cases.
pub struct BannerService {
    store: Arc<dyn BannerStore>,
    selector: Arc<Selector>,
    clock: Arc<dyn Clock>,
}

impl BannerService {
    #[must_use]
    pub fn new(
        store: Arc<dyn BannerStore>,
        selector: Arc<Selector>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            selector,
            clock,
        }
    }

    /// Validates and persists a new banner, stamping its creation time.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Validation`] or [`ServiceError::Storage`].
    pub async fn create(&self, req: CreateBannerRequest) -> Result<BannerId, ServiceError> {
        req.validate()?;

        let banner = Banner {
            id: BannerId::UNSET,
            name: req.name,
            created_at: self.clock.now().fixed_offset(),
            scheduled_at: req.scheduled_at,
            expires_at: req.expires_at,
        };

        let id = self.store.save(banner).await.map_err(ServiceError::Storage)?;
        metrics::counter!("banner_writes_total", "op" => "create").increment(1);
        info!(banner_id = %id, "banner created");
        Ok(id)
    }

    /// Applies the provided fields to an existing banner and re-persists it.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Validation`], [`ServiceError::NotFound`] or
    /// [`ServiceError::Storage`].
    pub async fn update(&self, req: UpdateBannerRequest) -> Result<Banner, ServiceError> {
        req.validate()?;

        let id = req.id;
        let mut banner = self.get(id).await?;
        req.apply(&mut banner);

        self.store
            .save(banner.clone())
            .await
            .map_err(ServiceError::Storage)?;
        metrics::counter!("banner_writes_total", "op" => "update").increment(1);
        info!(banner_id = %id, "banner updated");
        Ok(banner)
    }

    /// # Errors
    ///
    /// [`ServiceError::NotFound`] or [`ServiceError::Storage`].
    pub async fn get(&self, id: BannerId) -> Result<Banner, ServiceError> {
        self.store
            .fetch_by_id(id)
            .await
            .map_err(ServiceError::Storage)?
            .ok_or(ServiceError::NotFound(id))
    }

    /// All banners ordered by id.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Storage`].
    pub async fn list(&self) -> Result<Vec<Banner>, ServiceError> {
        let mut banners = self.store.list().await.map_err(ServiceError::Storage)?;
        banners.sort_by_key(|b| b.id);
        Ok(banners)
    }

    /// Removes a banner. A cached active selection is left in place until it
    /// expires.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] or [`ServiceError::Storage`].
    pub async fn delete(&self, id: BannerId) -> Result<Banner, ServiceError> {
        let removed = self
            .store
            .delete(id)
            .await
            .map_err(ServiceError::Storage)?
            .ok_or(ServiceError::NotFound(id))?;
        metrics::counter!("banner_writes_total", "op" => "delete").increment(1);
        info!(banner_id = %id, "banner deleted");
        Ok(removed)
    }

    /// The banner to show now, from the selector's configured origin.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Selection`].
    pub async fn display(&self) -> Result<Banner, ServiceError> {
        record_display(self.selector.resolve().await)
    }

    /// The banner to show now for a specific caller origin.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Selection`].
    pub async fn display_for(
        &self,
        origin: &dyn OriginResolver,
    ) -> Result<Banner, ServiceError> {
        record_display(self.selector.resolve_with(origin).await)
    }
}

fn record_display(
    result: Result<Banner, banner_core::SelectionError>,
) -> Result<Banner, ServiceError> {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    metrics::counter!("banner_display_total", "outcome" => outcome).increment(1);
    if let Ok(banner) = &result {
        debug!(banner_id = %banner.id, "displaying banner");
    }
    result.map_err(ServiceError::from)
}
