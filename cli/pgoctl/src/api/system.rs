use pgo_msgs::system::{StatusResult, VersionResult};
use pgo_msgs::CLIENT_VERSION;

use super::ApiResult;
use crate::executor::Call;
use crate::session::Session;

pub async fn version(session: &Session) -> ApiResult<VersionResult> {
    let call = Call::get("/version").query("version", CLIENT_VERSION);
    session.execute(call).await
}

pub async fn status(session: &Session, namespace: &str) -> ApiResult<StatusResult> {
    let call = Call::get("/status")
        .query("version", CLIENT_VERSION)
        .query("namespace", namespace);
    session.execute(call).await
}
