//! PostgreSQL users inside the addressed clusters.

use pgo_msgs::user::{
    CreateUserRequest, DeleteUserRequest, ShowUserRequest, UpdateUserRequest, UserResult,
};

use super::{post, ApiResult};
use crate::session::Session;

pub async fn show(session: &Session, request: &ShowUserRequest) -> ApiResult<UserResult> {
    post(session, "/usershow", request).await
}

pub async fn create(session: &Session, request: &CreateUserRequest) -> ApiResult<UserResult> {
    post(session, "/usercreate", request).await
}

pub async fn delete(session: &Session, request: &DeleteUserRequest) -> ApiResult<UserResult> {
    post(session, "/userdelete", request).await
}

pub async fn update(session: &Session, request: &UpdateUserRequest) -> ApiResult<UserResult> {
    post(session, "/userupdate", request).await
}
