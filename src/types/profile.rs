use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Company;
use crate::types::UserInfo;

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserInfo,
    pub company: Option<Company>,
}
