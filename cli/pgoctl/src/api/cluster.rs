use pgo_msgs::cluster::{
    CreateClusterRequest, CreateClusterResult, DeleteClusterRequest, ShowClusterRequest,
    ShowClusterResult, TestClusterRequest, TestClusterResult, UpdateClusterRequest,
};
use pgo_msgs::MessagesResult;

use super::{post, ApiResult};
use crate::session::Session;

pub async fn show(session: &Session, request: &ShowClusterRequest) -> ApiResult<ShowClusterResult> {
    post(session, "/showclusters", request).await
}

pub async fn create(
    session: &Session,
    request: &CreateClusterRequest,
) -> ApiResult<CreateClusterResult> {
    post(session, "/clusters", request).await
}

pub async fn delete(session: &Session, request: &DeleteClusterRequest) -> ApiResult<MessagesResult> {
    post(session, "/clustersdelete", request).await
}

pub async fn update(session: &Session, request: &UpdateClusterRequest) -> ApiResult<MessagesResult> {
    post(session, "/clustersupdate", request).await
}

/// Connectivity check of every endpoint of the addressed clusters.
pub async fn test(session: &Session, request: &TestClusterRequest) -> ApiResult<TestClusterResult> {
    post(session, "/testclusters", request).await
}
