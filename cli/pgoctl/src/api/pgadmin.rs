use pgo_msgs::pgadmin::{
    CreatePgadminRequest, DeletePgadminRequest, ShowPgadminRequest, ShowPgadminResult,
};
use pgo_msgs::MessagesResult;

use super::{post, send, ApiResult};
use crate::executor::Call;
use crate::session::Session;

pub async fn create(
    session: &Session,
    request: &CreatePgadminRequest,
) -> ApiResult<MessagesResult> {
    post(session, "/pgadmin", request).await
}

pub async fn delete(
    session: &Session,
    request: &DeletePgadminRequest,
) -> ApiResult<MessagesResult> {
    send(session, Call::delete("/pgadmin"), request).await
}

pub async fn show(
    session: &Session,
    request: &ShowPgadminRequest,
) -> ApiResult<ShowPgadminResult> {
    post(session, "/pgadmin/show", request).await
}
