use pgo_msgs::policy::{
    ApplyPolicyRequest, ApplyPolicyResult, CreatePolicyRequest, DeletePolicyRequest,
    ShowPolicyRequest, ShowPolicyResult,
};
use pgo_msgs::MessagesResult;

use super::{post, ApiResult};
use crate::session::Session;

pub async fn show(session: &Session, request: &ShowPolicyRequest) -> ApiResult<ShowPolicyResult> {
    post(session, "/showpolicies", request).await
}

pub async fn create(session: &Session, request: &CreatePolicyRequest) -> ApiResult<MessagesResult> {
    post(session, "/policies", request).await
}

pub async fn delete(session: &Session, request: &DeletePolicyRequest) -> ApiResult<MessagesResult> {
    post(session, "/policiesdelete", request).await
}

pub async fn apply(session: &Session, request: &ApplyPolicyRequest) -> ApiResult<ApplyPolicyResult> {
    post(session, "/policies/apply", request).await
}
