use actix_web::{get, web};
use std::sync::Arc;

use crate::db::postgres_service::PostgresService;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::session::AuthedUser;
use crate::types::user::PublicUser;

#[get("")]
pub async fn get_data(
    db: web::Data<Arc<PostgresService>>,
    authed: web::ReqData<AuthedUser>,
) -> ApiResult<PublicUser> {
    let user = db.get_user_by_id(&authed.user_id).await?;
    Ok(ApiResponse::Ok(user.into()))
}
