use pgo_msgs::namespace::{NamespaceRequest, ShowNamespaceResult};
use pgo_msgs::MessagesResult;

use super::{post, ApiResult};
use crate::session::Session;

pub async fn show(session: &Session, request: &NamespaceRequest) -> ApiResult<ShowNamespaceResult> {
    post(session, "/namespace", request).await
}

pub async fn create(session: &Session, request: &NamespaceRequest) -> ApiResult<MessagesResult> {
    post(session, "/namespacecreate", request).await
}

pub async fn delete(session: &Session, request: &NamespaceRequest) -> ApiResult<MessagesResult> {
    post(session, "/namespacedelete", request).await
}

pub async fn update(session: &Session, request: &NamespaceRequest) -> ApiResult<MessagesResult> {
    post(session, "/namespaceupdate", request).await
}
