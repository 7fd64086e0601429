use uuid::Uuid;

/// Identity resolved by the bearer middleware, available to handlers as `ReqData<AuthedUser>`.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub email: String,
}
