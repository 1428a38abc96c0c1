//! pgBouncer is managed with one path and the verb picks the operation.

use pgo_msgs::pgbouncer::{
    CreatePgbouncerRequest, DeletePgbouncerRequest, ShowPgbouncerRequest, ShowPgbouncerResult,
    UpdatePgbouncerRequest, UpdatePgbouncerResult,
};
use pgo_msgs::MessagesResult;

use super::{post, send, ApiResult};
use crate::executor::Call;
use crate::session::Session;

pub async fn create(
    session: &Session,
    request: &CreatePgbouncerRequest,
) -> ApiResult<MessagesResult> {
    post(session, "/pgbouncer", request).await
}

pub async fn delete(
    session: &Session,
    request: &DeletePgbouncerRequest,
) -> ApiResult<MessagesResult> {
    send(session, Call::delete("/pgbouncer"), request).await
}

pub async fn update(
    session: &Session,
    request: &UpdatePgbouncerRequest,
) -> ApiResult<UpdatePgbouncerResult> {
    send(session, Call::put("/pgbouncer"), request).await
}

pub async fn show(
    session: &Session,
    request: &ShowPgbouncerRequest,
) -> ApiResult<ShowPgbouncerResult> {
    post(session, "/pgbouncer/show", request).await
}
