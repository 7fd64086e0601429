use actix_web::{dev::ServiceRequest, web, HttpMessage};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use std::sync::Arc;
use tracing::{debug, error};

use crate::db::postgres_service::PostgresService;
use crate::types::error::AppError;

/// Bearer validator for session-protected scopes. On success the resolved
/// [`crate::types::session::AuthedUser`] lands in the request extensions.
pub async fn validate_session(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (actix_web::Error, ServiceRequest)> {
    let db = match req.app_data::<web::Data<Arc<PostgresService>>>() {
        Some(db) => db.clone(),
        None => {
            error!("PostgresService missing from app data");
            return Err((AppError::Internal("database unavailable".into()).into(), req));
        }
    };

    match db.validate_session(credentials.token()).await {
        Ok(authed) => {
            req.extensions_mut().insert(authed);
            Ok(req)
        }
        Err(e) => {
            debug!(kind = e.kind(), "session rejected");
            Err((actix_web::Error::from(e), req))
        }
    }
}

