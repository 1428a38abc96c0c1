use pgo_msgs::schedule::{CreateScheduleRequest, ScheduleRequest};
use pgo_msgs::MessagesResult;

use super::{post, ApiResult};
use crate::session::Session;

pub async fn create(
    session: &Session,
    request: &CreateScheduleRequest,
) -> ApiResult<MessagesResult> {
    post(session, "/schedule", request).await
}

pub async fn delete(session: &Session, request: &ScheduleRequest) -> ApiResult<MessagesResult> {
    post(session, "/scheduledelete", request).await
}

pub async fn show(session: &Session, request: &ScheduleRequest) -> ApiResult<MessagesResult> {
    post(session, "/scheduleshow", request).await
}
