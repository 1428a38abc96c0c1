//! Call execution against a mock API server over plain HTTP.

use pgo_msgs::cluster::{ShowClusterRequest, ShowClusterResult};
use pgo_msgs::pgbouncer::{DeletePgbouncerRequest, PgbouncerResources, UpdatePgbouncerRequest};
use pgo_msgs::user::UserResult;
use pgo_msgs::{Addressing, MessagesResult, ResponseEnvelope, StatusCode};
use pgoctl::commands::TargetArgs;
use pgoctl::{api, Call, CallError, Credentials, SecureChannel, Session};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_for(server_url: &str) -> Session {
    let credentials = Credentials {
        username: "alice".to_string(),
        password: "secret".to_string(),
        server_url: server_url.to_string(),
    };
    Session::new(credentials, SecureChannel::from_client(reqwest::Client::new()))
}

fn show_request(name: &str) -> ShowClusterRequest {
    ShowClusterRequest {
        addressing: Addressing::new("pgo").with_names([name]),
        image_tag: String::new(),
    }
}

#[tokio::test]
async fn basic_auth_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/version"))
        .and(query_param("version", pgo_msgs::CLIENT_VERSION))
        .and(header("authorization", "Basic YWxpY2U6c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Status": { "Code": "ok", "Msg": "" },
            "Version": "4.5.0"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server.uri());
    let envelope = api::system::version(&session).await.unwrap();

    assert!(envelope.is_ok());
    assert_eq!(envelope.payload.version, "4.5.0");
}

#[tokio::test]
async fn post_sends_json_body_with_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/showclusters"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Status": { "Code": "ok", "Msg": "" },
            "Results": [{ "Name": "hippo", "Namespace": "pgo" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server.uri());
    let envelope = api::cluster::show(&session, &show_request("hippo")).await.unwrap();
    let result = envelope.into_result().unwrap();
    assert_eq!(result.results[0].name, "hippo");

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["Args"], json!(["hippo"]));
    assert_eq!(body["Namespace"], "pgo");
    assert!(body["ClientVersion"].is_string());
}

#[tokio::test]
async fn get_carries_no_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .and(query_param("namespace", "pgo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Status": { "Code": "ok", "Msg": "" },
            "Result": { "NumDatabases": 2 }
        })))
        .mount(&server)
        .await;

    let session = session_for(&server.uri());
    let envelope = api::system::status(&session, "pgo").await.unwrap();
    assert_eq!(envelope.payload.result.num_databases, 2);

    let received = server.received_requests().await.unwrap();
    assert!(received[0].body.is_empty());
    assert!(received[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn unauthorized_is_authentication_failure_regardless_of_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let session = session_for(&server.uri());
    let err = api::system::version(&session).await.unwrap_err();

    assert!(matches!(err, CallError::AuthenticationFailed));
    assert_eq!(err.to_string(), "Authentication Failed");
}

#[tokio::test]
async fn other_statuses_are_unexpected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "Status": { "Code": "ok", "Msg": "" }
        })))
        .mount(&server)
        .await;

    let session = session_for(&server.uri());
    let err = api::cluster::show(&session, &show_request("hippo"))
        .await
        .unwrap_err();

    assert!(matches!(err, CallError::UnexpectedStatus(500)));
    assert_eq!(err.to_string(), "Invalid Status Code: 500");
}

#[tokio::test]
async fn application_error_arrives_with_http_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clustersdelete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Status": { "Code": "error", "Msg": "cluster hippo not found" },
            "Results": []
        })))
        .mount(&server)
        .await;

    let session = session_for(&server.uri());
    let call = Call::post("/clustersdelete")
        .json(&json!({ "Namespace": "pgo", "Args": ["hippo"] }))
        .unwrap();
    let envelope: ResponseEnvelope<MessagesResult> = session.execute(call).await.unwrap();

    assert!(!envelope.is_ok());
    let err = envelope.into_result().unwrap_err();
    assert_eq!(err.message, "cluster hippo not found");
}

#[tokio::test]
async fn null_results_still_surface_the_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/usershow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Status": { "Code": "error", "Msg": "no such user" },
            "Results": null
        })))
        .mount(&server)
        .await;

    let session = session_for(&server.uri());
    let call = Call::post("/usershow")
        .json(&json!({ "Namespace": "pgo", "Clusters": ["hippo"] }))
        .unwrap();
    let envelope: ResponseEnvelope<UserResult> = session.execute(call).await.unwrap();

    assert!(envelope.payload.results.is_empty());
    let err = envelope.into_result().unwrap_err();
    assert_eq!(err.message, "no such user");
}

#[tokio::test]
async fn status_fields_at_the_top_level_are_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clustersdelete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Code": "error",
            "Msg": "cluster hippo not found",
            "Results": null
        })))
        .mount(&server)
        .await;

    let session = session_for(&server.uri());
    let call = Call::post("/clustersdelete")
        .json(&json!({ "Namespace": "pgo", "Args": ["hippo"] }))
        .unwrap();
    let envelope: ResponseEnvelope<MessagesResult> = session.execute(call).await.unwrap();

    assert_eq!(envelope.status.code, StatusCode::Error);
    let err = envelope.into_result().unwrap_err();
    assert_eq!(err.message, "cluster hippo not found");
}

#[tokio::test]
async fn delete_with_body_is_sent_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/pgbouncer"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Code": "ok",
            "Msg": "",
            "Results": ["pgbouncer removed from hippo"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server.uri());
    let request = DeletePgbouncerRequest {
        addressing: Addressing::new("pgo").with_names(["hippo"]),
        uninstall: true,
    };
    let result = api::pgbouncer::delete(&session, &request)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(result.results, vec!["pgbouncer removed from hippo"]);

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["Args"], json!(["hippo"]));
    assert_eq!(body["Uninstall"], true);
}

#[tokio::test]
async fn pgbouncer_update_is_a_put_by_cluster_names() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/pgbouncer"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Code": "ok",
            "Msg": "",
            "Results": [{ "ClusterName": "hippo", "HasPgBouncer": true, "Error": false }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server.uri());
    let request = UpdatePgbouncerRequest {
        selection: Addressing::new("pgo").with_names(["hippo"]).into(),
        resources: PgbouncerResources {
            replicas: 2,
            ..Default::default()
        },
        rotate_password: true,
    };
    let result = api::pgbouncer::update(&session, &request)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert!(result.results[0].has_pgbouncer);

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["ClusterNames"], json!(["hippo"]));
    assert!(body.get("Args").is_none());
    assert_eq!(body["Replicas"], 2);
    assert_eq!(body["RotatePassword"], true);
}

#[tokio::test]
async fn undecodable_body_is_kept_raw() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let session = session_for(&server.uri());
    let result: Result<ResponseEnvelope<ShowClusterResult>, _> =
        api::cluster::show(&session, &show_request("hippo")).await;

    match result {
        Err(CallError::Decode { body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    // Bind then drop a listener so the port is known to be closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let session = session_for(&format!("http://{addr}"));
    let err = api::system::version(&session).await.unwrap_err();
    assert!(matches!(err, CallError::Transport(_)));
}

#[tokio::test]
async fn backup_listing_puts_name_in_path_and_addressing_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/backrest/hippo"))
        .and(query_param("namespace", "pgo"))
        .and(query_param("selector", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Status": { "Code": "ok", "Msg": "" },
            "Items": [{ "Name": "hippo", "Backups": [] }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server.uri());
    let addressing = Addressing::new("pgo").with_names(["hippo"]);
    let envelope = api::backup::show(&session, "hippo", &addressing).await.unwrap();
    assert_eq!(envelope.payload.items.len(), 1);
}

#[tokio::test]
async fn empty_target_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let target = TargetArgs::default();
    assert!(target.plan("pgo").is_err());
    assert!(target.single("pgo").is_err());

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn one_call_per_name_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clustersdelete"))
        .and(body_json(json!({
            "Namespace": "pgo",
            "Args": ["a"],
            "Selector": "",
            "AllFlag": false,
            "ClientVersion": pgo_msgs::CLIENT_VERSION,
            "DeleteData": false,
            "DeleteBackups": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Status": { "Code": "ok", "Msg": "" },
            "Results": ["deleted a"]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/clustersdelete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Status": { "Code": "ok", "Msg": "" },
            "Results": ["deleted"]
        })))
        .mount(&server)
        .await;

    let session = session_for(&server.uri());
    let target = TargetArgs {
        names: vec!["a".to_string(), "b".to_string()],
        ..Default::default()
    };
    for addressing in target.plan("pgo").unwrap() {
        let request = pgo_msgs::cluster::DeleteClusterRequest {
            addressing,
            delete_data: false,
            delete_backups: false,
        };
        api::cluster::delete(&session, &request)
            .await
            .unwrap()
            .into_result()
            .unwrap();
    }

    let received = server.received_requests().await.unwrap();
    let names: Vec<serde_json::Value> = received
        .iter()
        .map(|request| serde_json::from_slice::<serde_json::Value>(&request.body).unwrap()["Args"].clone())
        .collect();
    assert_eq!(names, vec![json!(["a"]), json!(["b"])]);
}
