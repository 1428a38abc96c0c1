use pgo_msgs::backup::{CreateBackrestBackupRequest, ShowBackrestResult};
use pgo_msgs::{Addressing, MessagesResult};

use super::{post, ApiResult};
use crate::executor::Call;
use crate::session::Session;

pub async fn create(
    session: &Session,
    request: &CreateBackrestBackupRequest,
) -> ApiResult<MessagesResult> {
    post(session, "/backrestbackup", request).await
}

/// `GET /backrest/{name}`. The name is empty when addressing by selector.
pub async fn show(
    session: &Session,
    name: &str,
    addressing: &Addressing,
) -> ApiResult<ShowBackrestResult> {
    let call = Call::get("/backrest")
        .segment(name)
        .query_pairs(addressing.query_pairs());
    session.execute(call).await
}
