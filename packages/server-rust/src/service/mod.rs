//! Banner application service.
//!
//! Thin orchestration over the store and the selector:
//!
//! 1. **Create / update** (`banner`): field validation plus a store write
//! 2. **Display** (`banner`): delegates to [`banner_core::Selector`]
//! 3. **Errors** (`error`): validation, lookup, storage and selection failures

pub mod banner;
pub mod error;

pub use banner::{BannerService, CreateBannerRequest, UpdateBannerRequest};
pub use error::ServiceError;
