//! Admin API 仪表盘统计

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::trace;

use crate::storage::SeaOrmStorage;

use super::helpers::api_result;

pub async fn get_stats(storage: web::Data<Arc<SeaOrmStorage>>) -> ActixResult<impl Responder> {
    trace!("Admin API: request for dashboard stats");
    Ok(api_result(storage.dashboard_stats().await))
}
