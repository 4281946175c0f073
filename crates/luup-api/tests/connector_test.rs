#![allow(clippy::unwrap_used)]
// Integration tests for `Connector` and its facades using wiremock.

use std::collections::HashMap;

use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use luup_api::service_ids::{HOME_AUTOMATION_GATEWAY, SWITCH_POWER};
use luup_api::{Connector, Error, OutputFormat, ParamValue, Params, RequestOptions};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup_with_query(query: &str) -> (MockServer, Connector) {
    let server = MockServer::start().await;
    let base = Url::parse(&format!("{}/data_request{query}", server.uri())).unwrap();
    let connector = Connector::with_client(reqwest::Client::new(), base);
    (server, connector)
}

async fn setup() -> (MockServer, Connector) {
    setup_with_query("").await
}

async fn mount_ok(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/data_request"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_unreachable(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

/// Decoded query pairs of the only request the server saw.
async fn sent_params(server: &MockServer) -> HashMap<String, String> {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests[0].url.query_pairs().into_owned().collect()
}

async fn sent_raw_query(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap();
    requests[0].url.query().unwrap_or_default().to_owned()
}

/// Decoded query pairs of every request the server saw, in order.
async fn sent_queries(server: &MockServer) -> Vec<HashMap<String, String>> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.query_pairs().into_owned().collect())
        .collect()
}

fn pairs(expected: &[(&str, &str)]) -> HashMap<String, String> {
    expected
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

// ── Defaults & merging ──────────────────────────────────────────────

#[tokio::test]
async fn test_status_carries_default_output_format() {
    let (server, connector) = setup_with_query("?output_format=json").await;

    Mock::given(method("GET"))
        .and(path("/data_request"))
        .and(query_param("id", "status"))
        .and(query_param("output_format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"devices\":[]}"))
        .expect(1)
        .mount(&server)
        .await;

    let body = connector.status(Params::new()).await.unwrap();

    assert_eq!(body, "{\"devices\":[]}");
    assert_eq!(
        connector.default_params().get("output_format"),
        Some(&ParamValue::from("json"))
    );
}

#[tokio::test]
async fn test_call_params_override_defaults_case_insensitively() {
    let (server, connector) = setup_with_query("?output_format=json&timeout=10").await;
    mount_ok(&server, "<root/>").await;

    connector
        .user_data(Params::new().with("OUTPUT_FORMAT", "xml"))
        .await
        .unwrap();

    assert_eq!(
        sent_params(&server).await,
        pairs(&[("id", "user_data"), ("output_format", "xml"), ("timeout", "10")])
    );
}

#[tokio::test]
async fn test_request_options_become_polling_params() {
    let (server, connector) = setup().await;
    mount_ok(&server, "{}").await;

    let opts = RequestOptions::new()
        .output_format(OutputFormat::Json)
        .load_time(1_700_000_000)
        .data_version(12345)
        .timeout(60)
        .minimum_delay(1500);
    connector.sdata(opts).await.unwrap();

    assert_eq!(
        sent_params(&server).await,
        pairs(&[
            ("id", "sdata"),
            ("output_format", "json"),
            ("LoadTime", "1700000000"),
            ("DataVersion", "12345"),
            ("timeout", "60"),
            ("minimumdelay", "1500"),
        ])
    );
}

#[tokio::test]
async fn test_caller_cannot_override_request_id() {
    let (server, connector) = setup().await;
    mount_ok(&server, "ok").await;

    connector
        .user_data2(Params::new().with("Id", "reload"))
        .await
        .unwrap();

    assert_eq!(sent_params(&server).await, pairs(&[("id", "user_data2")]));
}

#[tokio::test]
async fn test_raw_request_translates_keys() {
    let (server, connector) = setup().await;
    mount_ok(&server, "ok").await;

    connector
        .request(Params::new().with("ID", "lu_status").with("devicenum", 7))
        .await
        .unwrap();

    assert_eq!(
        sent_params(&server).await,
        pairs(&[("id", "lu_status"), ("DeviceNum", "7")])
    );
}

#[test]
fn test_connector_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Connector>();
    assert_send_sync::<luup_api::Device>();
    assert_send_sync::<luup_api::DeviceService>();
    assert_send_sync::<luup_api::Scenes>();
    assert_send_sync::<luup_api::SceneRecorder>();
    assert_send_sync::<luup_api::Rooms>();
}

// ── Argument errors ─────────────────────────────────────────────────

#[tokio::test]
async fn test_empty_id_issues_no_request() {
    let (server, connector) = setup().await;
    mount_unreachable(&server).await;

    let result = connector.request_by_id("", Params::new()).await;
    assert!(
        matches!(result, Err(Error::MissingArgument { name: "id" })),
        "expected MissingArgument(id), got: {result:?}"
    );

    let result = connector.request(Params::new().with("foo", "bar")).await;
    assert!(matches!(result, Err(Error::MissingArgument { name: "id" })));
}

#[tokio::test]
async fn test_empty_action_issues_no_request() {
    let (server, connector) = setup().await;
    mount_unreachable(&server).await;

    let result = connector
        .request_by_id_and_action("scene", "", Params::new())
        .await;
    assert!(
        matches!(result, Err(Error::MissingArgument { name: "action" })),
        "expected MissingArgument(action), got: {result:?}"
    );
}

#[tokio::test]
async fn test_blank_device_names_are_rejected() {
    let (server, connector) = setup().await;
    mount_unreachable(&server).await;

    for name in ["", "  ", "\t\n"] {
        let err = connector.device(5).rename(name, None).await.unwrap_err();
        assert!(err.is_argument_error(), "expected argument error, got: {err:?}");
    }

    assert!(connector.room().create(" ").await.unwrap_err().is_argument_error());
    assert!(
        connector
            .scene()
            .record()
            .save("", None)
            .await
            .unwrap_err()
            .is_argument_error()
    );
    assert!(
        connector
            .device(5)
            .service(SWITCH_POWER)
            .get_variable("")
            .await
            .unwrap_err()
            .is_argument_error()
    );
}

// ── Device facade ───────────────────────────────────────────────────

#[tokio::test]
async fn test_device_rename() {
    let (server, connector) = setup().await;
    mount_ok(&server, "OK").await;

    let body = connector.device(5).rename("Kitchen Light", None).await.unwrap();

    assert_eq!(body, "OK");
    assert_eq!(
        sent_params(&server).await,
        pairs(&[
            ("DeviceNum", "5"),
            ("name", "Kitchen Light"),
            ("action", "rename"),
            ("id", "device"),
        ])
    );
    assert_eq!(
        sent_raw_query(&server).await,
        "DeviceNum=5&name=Kitchen%20Light&action=rename&id=device"
    );
}

#[tokio::test]
async fn test_device_rename_with_room() {
    let (server, connector) = setup().await;
    mount_ok(&server, "OK").await;

    connector
        .device(5)
        .rename("Porch", Some(ParamValue::from(3_u32)))
        .await
        .unwrap();

    assert_eq!(sent_params(&server).await.get("room").map(String::as_str), Some("3"));
}

#[tokio::test]
async fn test_device_number_wins_over_caller_params() {
    let (server, connector) = setup().await;
    mount_ok(&server, "<status/>").await;

    connector
        .device(9)
        .status(Params::new().with("devicenum", 1))
        .await
        .unwrap();

    assert_eq!(
        sent_params(&server).await,
        pairs(&[("id", "status"), ("DeviceNum", "9")])
    );
}

#[tokio::test]
async fn test_device_actions_and_delete() {
    let (server, connector) = setup().await;
    mount_ok(&server, "OK").await;

    let device = connector.device(12);
    device.actions(Params::new()).await.unwrap();
    device.delete().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let queries: Vec<HashMap<String, String>> = requests
        .iter()
        .map(|r| r.url.query_pairs().into_owned().collect())
        .collect();

    assert_eq!(queries[0], pairs(&[("id", "actions"), ("DeviceNum", "12")]));
    assert_eq!(
        queries[1],
        pairs(&[("id", "device"), ("action", "delete"), ("DeviceNum", "12")])
    );
}

// ── Device-service facade ───────────────────────────────────────────

#[tokio::test]
async fn test_service_action_defaults_to_xml() {
    let (server, connector) = setup_with_query("?output_format=json").await;
    mount_ok(&server, "<u:SetTargetResponse/>").await;

    connector
        .device(6)
        .service(SWITCH_POWER)
        .action("SetTarget", Params::new().with("newTargetValue", 1))
        .await
        .unwrap();

    assert_eq!(
        sent_params(&server).await,
        pairs(&[
            ("id", "action"),
            ("action", "SetTarget"),
            ("output_format", "xml"),
            ("DeviceNum", "6"),
            ("serviceId", SWITCH_POWER),
            ("newTargetValue", "1"),
        ])
    );
}

#[tokio::test]
async fn test_service_action_output_format_can_be_overridden() {
    let (server, connector) = setup().await;
    mount_ok(&server, "{}").await;

    connector
        .device(6)
        .service(SWITCH_POWER)
        .action("SetTarget", Params::new().with("Output_Format", "json"))
        .await
        .unwrap();

    assert_eq!(
        sent_params(&server).await.get("output_format").map(String::as_str),
        Some("json")
    );
}

#[tokio::test]
async fn test_device_invoke() {
    let (server, connector) = setup().await;
    mount_ok(&server, "<html/>").await;

    connector.device(8).invoke().await.unwrap();

    assert_eq!(
        sent_params(&server).await,
        pairs(&[("id", "invoke"), ("DeviceNum", "8")])
    );
}

#[tokio::test]
async fn test_service_variables() {
    let (server, connector) = setup().await;

    Mock::given(method("GET"))
        .and(query_param("id", "variableget"))
        .and(query_param("Variable", "Status"))
        .and(query_param("DeviceNum", "6"))
        .and(query_param("serviceId", "urn:micasaverde-com:serviceId:DoorLock1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("1"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("id", "variableset"))
        .and(query_param("Variable", "Status"))
        .and(query_param("Value", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let lock = connector
        .device(6)
        .service("urn:micasaverde-com:serviceId:DoorLock1");
    assert_eq!(lock.get_variable("Status").await.unwrap(), "1");
    assert_eq!(lock.set_variable("Status", 0).await.unwrap(), "OK");
}

#[tokio::test]
async fn test_set_variable_binds_device_and_service() {
    let (server, connector) = setup().await;
    mount_ok(&server, "OK").await;

    connector
        .device(6)
        .service(SWITCH_POWER)
        .set_variable("Target", 1)
        .await
        .unwrap();

    assert_eq!(
        sent_params(&server).await,
        pairs(&[
            ("id", "variableset"),
            ("DeviceNum", "6"),
            ("serviceId", SWITCH_POWER),
            ("Variable", "Target"),
            ("Value", "1"),
        ])
    );
    assert_eq!(
        sent_raw_query(&server).await,
        format!(
            "DeviceNum=6&serviceId={}&Variable=Target&Value=1&id=variableset",
            SWITCH_POWER.replace(':', "%3A")
        )
    );
}

// ── Scene facade ────────────────────────────────────────────────────

#[tokio::test]
async fn test_scene_run_goes_through_gateway() {
    let (server, connector) = setup().await;
    mount_ok(&server, "OK").await;

    connector.scene().run(4).await.unwrap();

    assert_eq!(
        sent_params(&server).await,
        pairs(&[
            ("id", "action"),
            ("action", "RunScene"),
            ("SceneNum", "4"),
            ("serviceId", HOME_AUTOMATION_GATEWAY),
        ])
    );
}

#[tokio::test]
async fn test_scene_rename_and_create() {
    let (server, connector) = setup().await;
    mount_ok(&server, "OK").await;

    connector
        .scene()
        .rename(5, "Chandelier", Some(ParamValue::from("Garage")))
        .await
        .unwrap();
    connector.scene().create("{\"name\":\"Night\"}").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let rename: HashMap<String, String> = requests[0].url.query_pairs().into_owned().collect();
    let create: HashMap<String, String> = requests[1].url.query_pairs().into_owned().collect();

    assert_eq!(
        rename,
        pairs(&[
            ("id", "scene"),
            ("action", "rename"),
            ("scene", "5"),
            ("name", "Chandelier"),
            ("room", "Garage"),
        ])
    );
    assert_eq!(
        create,
        pairs(&[("id", "scene"), ("action", "create"), ("json", "{\"name\":\"Night\"}")])
    );
}

#[tokio::test]
async fn test_scene_list_and_delete() {
    let (server, connector) = setup().await;
    mount_ok(&server, "OK").await;

    connector.scene().list(7).await.unwrap();
    connector.scene().delete(7).await.unwrap();
    connector.scene().record().list().await.unwrap();

    let queries = sent_queries(&server).await;
    assert_eq!(
        queries[0],
        pairs(&[("id", "scene"), ("action", "list"), ("scene", "7")])
    );
    assert_eq!(
        queries[1],
        pairs(&[("id", "scene"), ("action", "delete"), ("scene", "7")])
    );
    assert_eq!(queries[2], pairs(&[("id", "scene"), ("action", "listrecord")]));
}

#[tokio::test]
async fn test_scene_record_flow() {
    let (server, connector) = setup().await;
    mount_ok(&server, "OK").await;

    let record = connector.scene().record();
    record.start().await.unwrap();
    record.pause(30).await.unwrap();
    record.stop().await.unwrap();
    record.delete(2).await.unwrap();
    record.save("Evening", Some(ParamValue::from(1_u32))).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let queries: Vec<HashMap<String, String>> = requests
        .iter()
        .map(|r| r.url.query_pairs().into_owned().collect())
        .collect();

    assert_eq!(queries[0], pairs(&[("id", "scene"), ("action", "record")]));
    assert_eq!(
        queries[1],
        pairs(&[("id", "scene"), ("action", "pause"), ("seconds", "30")])
    );
    assert_eq!(queries[2], pairs(&[("id", "scene"), ("action", "stoprecord")]));
    assert_eq!(
        queries[3],
        pairs(&[("id", "scene"), ("action", "deleterecord"), ("number", "2")])
    );
    assert_eq!(
        queries[4],
        pairs(&[
            ("id", "scene"),
            ("action", "saverecord"),
            ("name", "Evening"),
            ("room", "1"),
        ])
    );
}

// ── Room facade ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_room_operations() {
    let (server, connector) = setup().await;
    mount_ok(&server, "OK").await;

    let rooms = connector.room();
    rooms.create("Kitchen").await.unwrap();
    rooms.rename(5, "Garage").await.unwrap();
    rooms.delete(5).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let queries: Vec<HashMap<String, String>> = requests
        .iter()
        .map(|r| r.url.query_pairs().into_owned().collect())
        .collect();

    assert_eq!(
        queries[0],
        pairs(&[("id", "room"), ("action", "create"), ("name", "Kitchen")])
    );
    assert_eq!(
        queries[1],
        pairs(&[("id", "room"), ("action", "rename"), ("room", "5"), ("name", "Garage")])
    );
    assert_eq!(
        queries[2],
        pairs(&[("id", "room"), ("action", "delete"), ("room", "5")])
    );
}

// ── Controller operations ───────────────────────────────────────────

#[tokio::test]
async fn test_run_lua() {
    let (server, connector) = setup().await;
    mount_ok(&server, "<RunLuaResponse/>").await;

    connector.run_lua("luup.reload()").await.unwrap();

    assert_eq!(
        sent_params(&server).await,
        pairs(&[
            ("id", "action"),
            ("action", "RunLua"),
            ("serviceId", HOME_AUTOMATION_GATEWAY),
            ("Code", "luup.reload()"),
        ])
    );
}

#[tokio::test]
async fn test_alive_checks_for_ok() {
    let (server, connector) = setup().await;

    Mock::given(method("GET"))
        .and(query_param("id", "alive"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("id", "resync"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ERROR: busy"))
        .mount(&server)
        .await;

    assert!(connector.alive().await.unwrap());
    assert!(!connector.resync().await.unwrap());
}

#[tokio::test]
async fn test_lookup_and_diagnostics() {
    let (server, connector) = setup().await;
    mount_ok(&server, "OK").await;

    connector.find_device(6).await.unwrap();
    connector.job_status(13, Some("zwave")).await.unwrap();
    connector.ip_requests(None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let queries: Vec<HashMap<String, String>> = requests
        .iter()
        .map(|r| r.url.query_pairs().into_owned().collect())
        .collect();

    assert_eq!(queries[0], pairs(&[("id", "finddevice"), ("devnum", "6")]));
    assert_eq!(
        queries[1],
        pairs(&[("id", "jobstatus"), ("job", "13"), ("plugin", "zwave")])
    );
    assert_eq!(queries[2], pairs(&[("id", "iprequests")]));
}

#[tokio::test]
async fn test_data_queries() {
    let (server, connector) = setup().await;
    mount_ok(&server, "{}").await;

    connector.user_data2(Params::new()).await.unwrap();
    connector
        .status_with_udn("uuid:4d494342-5342-5645-0002-000000000002", Params::new())
        .await
        .unwrap();
    connector.file("D_BinaryLight1.xml").await.unwrap();

    let queries = sent_queries(&server).await;
    assert_eq!(queries[0], pairs(&[("id", "user_data2")]));
    assert_eq!(
        queries[1],
        pairs(&[
            ("id", "status"),
            ("UDN", "uuid:4d494342-5342-5645-0002-000000000002"),
        ])
    );
    assert_eq!(
        queries[2],
        pairs(&[("id", "file"), ("parameters", "D_BinaryLight1.xml")])
    );
}

#[tokio::test]
async fn test_blank_lookup_arguments_are_rejected() {
    let (server, connector) = setup().await;
    mount_unreachable(&server).await;

    assert!(connector.status_with_udn(" ", Params::new()).await.unwrap_err().is_argument_error());
    assert!(connector.file("").await.unwrap_err().is_argument_error());
    assert!(connector.invoke_udn("").await.unwrap_err().is_argument_error());
    assert!(connector.find_device_by_alt_id("\t").await.unwrap_err().is_argument_error());
    assert!(connector.wget("", 5, None).await.unwrap_err().is_argument_error());
}

#[tokio::test]
async fn test_plugin_requests() {
    let (server, connector) = setup().await;
    mount_ok(&server, "OK").await;

    connector.install_plugin(1234).await.unwrap();
    connector.update_plugin(1234).await.unwrap();

    let queries = sent_queries(&server).await;
    assert_eq!(
        queries[0],
        pairs(&[
            ("id", "action"),
            ("action", "CreatePlugin"),
            ("serviceId", HOME_AUTOMATION_GATEWAY),
            ("PluginNum", "1234"),
        ])
    );
    assert_eq!(
        queries[1],
        pairs(&[("id", "update_plugin"), ("Plugin", "1234")])
    );
}

#[tokio::test]
async fn test_invoke_alt_id_and_energy() {
    let (server, connector) = setup().await;
    mount_ok(&server, "OK").await;

    connector.invoke().await.unwrap();
    connector.invoke_udn("uuid:abc").await.unwrap();
    connector.find_device_by_alt_id("e7").await.unwrap();
    connector.live_energy_usage().await.unwrap();

    let queries = sent_queries(&server).await;
    assert_eq!(queries[0], pairs(&[("id", "invoke")]));
    assert_eq!(queries[1], pairs(&[("id", "invoke"), ("UDN", "uuid:abc")]));
    assert_eq!(queries[2], pairs(&[("id", "finddevice"), ("devid", "e7")]));
    assert_eq!(queries[3], pairs(&[("id", "live_energy_usage")]));
}

#[tokio::test]
async fn test_wget_with_and_without_credentials() {
    let (server, connector) = setup().await;
    mount_ok(&server, "OK").await;

    connector.wget("http://example.com/ping", 5, None).await.unwrap();
    connector
        .wget("http://example.com/ping", 10, Some(("admin", "s3cret")))
        .await
        .unwrap();

    let queries = sent_queries(&server).await;
    assert_eq!(
        queries[0],
        pairs(&[
            ("id", "wget"),
            ("url", "http://example.com/ping"),
            ("timeout", "5"),
        ])
    );
    assert_eq!(
        queries[1],
        pairs(&[
            ("id", "wget"),
            ("url", "http://example.com/ping"),
            ("username", "admin"),
            ("password", "s3cret"),
            ("timeout", "10"),
        ])
    );
}

// ── Response handling ───────────────────────────────────────────────

#[tokio::test]
async fn test_luup_error_body_is_returned_verbatim() {
    let (server, connector) = setup().await;
    mount_ok(&server, "ERROR: Invalid Service").await;

    let body = connector
        .device(3)
        .service("urn:example:serviceId:Nope1")
        .action("Frobnicate", Params::new())
        .await
        .unwrap();

    assert_eq!(body, "ERROR: Invalid Service");
}

#[tokio::test]
async fn test_http_error_status() {
    let (server, connector) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("engine reloading"))
        .mount(&server)
        .await;

    let err = connector.reload().await.unwrap_err();

    assert!(err.is_transient());
    assert_eq!(err.status_code(), Some(500));
    match err {
        Error::Status { body, .. } => assert_eq!(body, "engine reloading"),
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind an ephemeral port and release it so nothing listens there.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let base = Url::parse(&format!("http://{addr}/data_request")).unwrap();
    let connector = Connector::with_client(reqwest::Client::new(), base);

    let err = connector.status(Params::new()).await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let (server, connector) = setup().await;
    mount_ok(&server, "OK").await;

    let device = connector.device(1);
    let (a, b, c) = tokio::join!(
        connector.status(Params::new()),
        device.status(Params::new()),
        connector.scene().list(2),
    );

    assert_eq!(a.unwrap(), "OK");
    assert_eq!(b.unwrap(), "OK");
    assert_eq!(c.unwrap(), "OK");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}
