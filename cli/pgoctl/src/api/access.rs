//! API server accounts (pgo users) and their roles.

use pgo_msgs::access::{
    PgoroleRequest, PgoroleSpec, PgouserRequest, PgouserSpec, ShowPgoroleResult,
    ShowPgouserResult,
};
use pgo_msgs::MessagesResult;

use super::{post, ApiResult};
use crate::session::Session;

pub async fn show_pgousers(
    session: &Session,
    request: &PgouserRequest,
) -> ApiResult<ShowPgouserResult> {
    post(session, "/pgousershow", request).await
}

pub async fn create_pgouser(session: &Session, request: &PgouserSpec) -> ApiResult<MessagesResult> {
    post(session, "/pgousercreate", request).await
}

pub async fn delete_pgousers(
    session: &Session,
    request: &PgouserRequest,
) -> ApiResult<MessagesResult> {
    post(session, "/pgouserdelete", request).await
}

pub async fn update_pgouser(session: &Session, request: &PgouserSpec) -> ApiResult<MessagesResult> {
    post(session, "/pgouserupdate", request).await
}

pub async fn show_pgoroles(
    session: &Session,
    request: &PgoroleRequest,
) -> ApiResult<ShowPgoroleResult> {
    post(session, "/pgoroleshow", request).await
}

pub async fn create_pgorole(session: &Session, request: &PgoroleSpec) -> ApiResult<MessagesResult> {
    post(session, "/pgorolecreate", request).await
}

pub async fn delete_pgoroles(
    session: &Session,
    request: &PgoroleRequest,
) -> ApiResult<MessagesResult> {
    post(session, "/pgoroledelete", request).await
}

pub async fn update_pgorole(session: &Session, request: &PgoroleSpec) -> ApiResult<MessagesResult> {
    post(session, "/pgoroleupdate", request).await
}
