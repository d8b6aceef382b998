use std::path::PathBuf;

use outlook_core::client::GraphConfig;
use outlook_core::control::{
    ClassifyAs, DraftRequest, DraftUpdate, LargeAttachmentUpload, MailControlPlane, Mailbox,
    MessageQuery, MessageRuleFields,
};
use outlook_core::services::GraphClientProvider;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{
    any, body_json, body_partial_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "server-token";

fn provider(server: &MockServer, chunk_bytes: Option<u64>) -> GraphClientProvider {
    let mut config = GraphConfig::new(server.uri());
    if let Some(chunk_bytes) = chunk_bytes {
        config = config.with_upload_chunk_bytes(chunk_bytes);
    }
    GraphClientProvider::new(config)
        .expect("failed to build graph client provider")
        .with_default_token(Some(TOKEN.to_string()))
}

fn control(server: &MockServer) -> MailControlPlane {
    provider(server, None).control(None)
}

fn write_fixture(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let file = dir.path().join(name);
    std::fs::write(&file, contents)
        .unwrap_or_else(|err| panic!("failed to write fixture {}: {err}", file.display()));
    file
}

#[tokio::test]
async fn list_messages_sends_only_supplied_odata_options() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/messages"))
        .and(header("authorization", "Bearer server-token"))
        .and(query_param("$top", "5"))
        .and(query_param("$filter", "isRead eq false"))
        .and(query_param_is_missing("$orderby"))
        .and(query_param_is_missing("$select"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let query = MessageQuery {
        top: Some(5),
        filter: Some("isRead eq false".to_string()),
        orderby: Some("   ".to_string()),
        select: None,
    };
    let result = control(&server)
        .list_messages(&query)
        .await
        .expect("list should succeed");

    assert_eq!(result, json!({ "value": [] }));
}

#[tokio::test]
async fn folder_messages_default_to_ten() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/mailFolders/inbox/messages"))
        .and(query_param("$top", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    control(&server)
        .list_folder_messages("inbox", &MessageQuery::default())
        .await
        .expect("list should succeed");
}

#[tokio::test]
async fn request_token_overrides_default_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/mailFolders/inbox/messageRules"))
        .and(header("authorization", "Bearer caller-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    provider(&server, None)
        .control(Some("caller-token".to_string()))
        .list_rules()
        .await
        .expect("rules should list");
}

#[tokio::test]
async fn missing_token_fails_without_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let control = GraphClientProvider::new(GraphConfig::new(server.uri()))
        .expect("failed to build graph client provider")
        .control(None);
    let err = control
        .list_messages(&MessageQuery::default())
        .await
        .expect_err("missing token should fail");

    assert_eq!(err.kind(), "missing_auth");
    assert!(err.to_payload().get("status").is_none());
}

#[tokio::test]
async fn draft_round_trip_sends_explicit_empty_categories() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/messages"))
        .and(body_json(json!({
            "subject": "Quarterly",
            "importance": "Normal",
            "body": { "contentType": "HTML", "content": "<p>numbers</p>" },
            "toRecipients": [{ "emailAddress": { "address": "a@x.com" } }],
            "categories": ["X"]
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "draft-1", "categories": ["X"] })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/me/messages/draft-1"))
        .and(body_json(json!({ "categories": [] })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "draft-1", "categories": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let control = control(&server);
    let created = control
        .create_draft(&DraftRequest {
            subject: "Quarterly".to_string(),
            body_content: "<p>numbers</p>".to_string(),
            to_recipients: vec!["a@x.com".to_string()],
            categories: Some(vec!["X".to_string()]),
            ..DraftRequest::default()
        })
        .await
        .expect("draft should be created");
    let id = created["id"].as_str().expect("draft id");

    let updated = control
        .update_draft(
            id,
            &DraftUpdate {
                categories: Some(Vec::new()),
                ..DraftUpdate::default()
            },
        )
        .await
        .expect("draft should update");

    assert_eq!(updated["categories"], json!([]));
}

#[tokio::test]
async fn empty_update_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = control(&server)
        .update_draft("draft-1", &DraftUpdate::default())
        .await
        .expect_err("empty update should fail");

    assert_eq!(err.kind(), "invalid_input");
}

#[tokio::test]
async fn not_found_maps_to_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/mailFolders/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": "ErrorItemNotFound",
                "message": "The specified object was not found in the store."
            }
        })))
        .mount(&server)
        .await;

    let err = control(&server)
        .get_folder("missing")
        .await
        .expect_err("404 should fail");
    let payload = err.to_payload();

    assert_eq!(payload["kind"], "http_status");
    assert_eq!(payload["status"], 404);
    assert_eq!(
        payload["error"],
        "graph returned 404: The specified object was not found in the store."
    );
}

#[tokio::test]
async fn no_content_deletes_report_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/me/messages/m1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/me/inferenceClassification/overrides/o1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let control = control(&server);

    assert_eq!(
        control.delete_message("m1").await.expect("delete message"),
        json!({ "success": true })
    );
    assert_eq!(
        control.delete_override("o1").await.expect("delete override"),
        json!({ "success": true })
    );
}

#[tokio::test]
async fn accepted_send_reports_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/messages/m1/send"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let result = control(&server).send_draft("m1").await.expect("send");

    assert_eq!(result, json!({ "success": true }));
}

#[tokio::test]
async fn copy_message_posts_destination() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/messages/m1/copy"))
        .and(body_json(json!({ "destinationId": "archive" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "m2" })))
        .expect(1)
        .mount(&server)
        .await;

    let copied = control(&server)
        .copy_message("m1", "archive")
        .await
        .expect("copy should succeed");

    assert_eq!(copied["id"], "m2");
}

#[tokio::test]
async fn reply_uses_named_recipients() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/messages/m1/reply"))
        .and(body_json(json!({
            "message": {
                "toRecipients": [
                    { "emailAddress": { "address": "b@x.com", "name": "Bea" } }
                ]
            },
            "comment": "Thanks"
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let to = [outlook_core::payload::EmailAddress::new("b@x.com").with_name("Bea")];
    control(&server)
        .reply_with_recipients("m1", "Thanks", &to)
        .await
        .expect("reply should succeed");
}

#[tokio::test]
async fn permanent_delete_targets_selected_mailbox() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/someone%40contoso.com/messages/m1/permanentDelete"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/me/mailFolders/f1/permanentDelete"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let control = control(&server);
    control
        .permanent_delete_message(&Mailbox::User("someone@contoso.com".to_string()), "m1")
        .await
        .expect("message delete");
    control
        .permanent_delete_folder(&Mailbox::Me, "f1")
        .await
        .expect("folder delete");
}

#[tokio::test]
async fn folder_listing_respects_hidden_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/mailFolders"))
        .and(query_param("includeHiddenFolders", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me/mailFolders/inbox/childFolders"))
        .and(query_param_is_missing("includeHiddenFolders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let control = control(&server);
    control.list_folders(true).await.expect("folders");
    control
        .list_child_folders("inbox", false)
        .await
        .expect("child folders");
}

#[tokio::test]
async fn folder_delta_sets_page_size_preference() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/mailFolders/delta"))
        .and(header("prefer", "odata.maxpagesize=2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    control(&server)
        .folder_delta(None)
        .await
        .expect("delta should succeed");
}

#[tokio::test]
async fn search_folder_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/mailFolders/root/childFolders"))
        .and(body_json(json!({
            "@odata.type": "microsoft.graph.mailSearchFolder",
            "displayName": "Digests",
            "includeNestedFolders": true,
            "sourceFolderIds": ["inbox"],
            "filterQuery": "contains(subject, 'weekly digest')"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "sf1" })))
        .expect(1)
        .mount(&server)
        .await;

    let request = outlook_core::control::SearchFolderRequest {
        display_name: "Digests".to_string(),
        include_nested_folders: true,
        source_folder_ids: vec!["inbox".to_string()],
        filter_query: "contains(subject, 'weekly digest')".to_string(),
    };
    control(&server)
        .create_search_folder("root", &request)
        .await
        .expect("search folder");
}

#[tokio::test]
async fn rule_update_forwards_empty_conditions() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/me/mailFolders/inbox/messageRules/r1"))
        .and(body_json(json!({ "conditions": {} })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "r1" })))
        .expect(1)
        .mount(&server)
        .await;

    let fields = MessageRuleFields {
        conditions: Some(json!({})),
        ..MessageRuleFields::default()
    };
    control(&server)
        .update_rule("r1", &fields)
        .await
        .expect("rule update");
}

#[tokio::test]
async fn rule_create_requires_core_fields() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let fields = MessageRuleFields {
        display_name: Some("Move receipts".to_string()),
        ..MessageRuleFields::default()
    };
    let err = control(&server)
        .create_rule(&fields)
        .await
        .expect_err("incomplete rule should fail");

    assert_eq!(
        err.to_string(),
        "invalid input: missing required rule fields: sequence, actions"
    );
}

#[tokio::test]
async fn override_update_sends_classification() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/me/inferenceClassification/overrides/o1"))
        .and(body_json(json!({ "classifyAs": "other" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "o1" })))
        .expect(1)
        .mount(&server)
        .await;

    control(&server)
        .update_override("o1", ClassifyAs::Other)
        .await
        .expect("override update");
}

#[tokio::test]
async fn add_attachment_encodes_file() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_fixture(&dir, "notes.txt", b"hello");
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/messages/m1/attachments"))
        .and(body_json(json!({
            "@odata.type": "#microsoft.graph.fileAttachment",
            "name": "notes.txt",
            "contentBytes": "aGVsbG8="
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "a1" })))
        .expect(1)
        .mount(&server)
        .await;

    control(&server)
        .add_attachment("m1", &file, None)
        .await
        .expect("attachment added");
}

#[tokio::test]
async fn download_attachment_writes_raw_value() {
    let dir = TempDir::new().expect("tempdir");
    let target = dir.path().join("download.bin");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/messages/m1/attachments/a1/$value"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x00\x01binary".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let result = control(&server)
        .download_attachment("m1", "a1", &target)
        .await
        .expect("download");

    assert_eq!(result["bytes"], 8);
    assert_eq!(std::fs::read(&target).expect("saved file"), b"\x00\x01binary");
}

#[tokio::test]
async fn large_upload_sends_ordered_unauthenticated_chunks() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_fixture(&dir, "report.bin", b"0123456789");
    let server = MockServer::start().await;
    let upload_url = format!("{}/upload/session-1", server.uri());
    Mock::given(method("POST"))
        .and(path("/me/messages/m1/attachments/createUploadSession"))
        .and(body_partial_json(json!({
            "AttachmentItem": { "attachmentType": "file", "name": "report.bin", "size": 10 }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "uploadUrl": upload_url })))
        .expect(1)
        .mount(&server)
        .await;
    for range in ["bytes 0-3/10", "bytes 4-7/10"] {
        Mock::given(method("PUT"))
            .and(path("/upload/session-1"))
            .and(header("content-range", range))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "nextExpectedRanges": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("PUT"))
        .and(path("/upload/session-1"))
        .and(header("content-range", "bytes 8-9/10"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "att-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let request = LargeAttachmentUpload {
        message_id: "m1".to_string(),
        file_path: file,
        is_inline: false,
        content_id: None,
    };
    let result = provider(&server, Some(4))
        .control(None)
        .upload_large_attachment(&request)
        .await
        .expect("upload should succeed");

    assert_eq!(result["id"], "att-1");
    let puts: Vec<_> = server
        .received_requests()
        .await
        .expect("request recording enabled")
        .into_iter()
        .filter(|request| request.method.as_str() == "PUT")
        .collect();
    let bodies: Vec<&[u8]> = puts.iter().map(|request| request.body.as_slice()).collect();
    assert_eq!(bodies, vec![&b"0123"[..], &b"4567"[..], &b"89"[..]]);
    assert!(
        puts.iter()
            .all(|request| !request.headers.contains_key("authorization"))
    );
}

#[tokio::test]
async fn upload_without_session_url_fails() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_fixture(&dir, "report.bin", b"abc");
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/messages/m1/attachments/createUploadSession"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let request = LargeAttachmentUpload {
        message_id: "m1".to_string(),
        file_path: file,
        ..LargeAttachmentUpload::default()
    };
    let err = control(&server)
        .upload_large_attachment(&request)
        .await
        .expect_err("missing uploadUrl should fail");

    assert_eq!(err.kind(), "upload_session");
}

#[tokio::test]
async fn empty_upload_is_rejected_before_any_request() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_fixture(&dir, "empty.bin", b"");
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = LargeAttachmentUpload {
        message_id: "m1".to_string(),
        file_path: file,
        ..LargeAttachmentUpload::default()
    };
    let err = control(&server)
        .upload_large_attachment(&request)
        .await
        .expect_err("empty file should fail");

    assert_eq!(err.kind(), "invalid_input");
}

#[tokio::test]
async fn directory_upload_is_rejected_before_any_request() {
    let dir = TempDir::new().expect("tempdir");
    let folder = dir.path().join("attachments");
    std::fs::create_dir(&folder).expect("create subdirectory");
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/messages/m1/attachments/createUploadSession"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "uploadUrl": "unused" })))
        .expect(0)
        .mount(&server)
        .await;

    let request = LargeAttachmentUpload {
        message_id: "m1".to_string(),
        file_path: folder,
        ..LargeAttachmentUpload::default()
    };
    let err = control(&server)
        .upload_large_attachment(&request)
        .await
        .expect_err("directory should fail");

    assert_eq!(err.kind(), "invalid_input");
}

#[tokio::test]
async fn failed_chunk_aborts_remaining_upload() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_fixture(&dir, "report.bin", b"0123456789");
    let server = MockServer::start().await;
    let upload_url = format!("{}/upload/session-2", server.uri());
    Mock::given(method("POST"))
        .and(path("/me/messages/m1/attachments/createUploadSession"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "uploadUrl": upload_url })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload/session-2"))
        .and(header("content-range", "bytes 0-3/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nextExpectedRanges": ["4-"] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload/session-2"))
        .and(header("content-range", "bytes 4-7/10"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "code": "generalException", "message": "chunk rejected" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload/session-2"))
        .and(header("content-range", "bytes 8-9/10"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "att-2" })))
        .expect(0)
        .mount(&server)
        .await;

    let request = LargeAttachmentUpload {
        message_id: "m1".to_string(),
        file_path: file,
        ..LargeAttachmentUpload::default()
    };
    let err = provider(&server, Some(4))
        .control(None)
        .upload_large_attachment(&request)
        .await
        .expect_err("failed chunk should abort");

    assert_eq!(err.kind(), "http_status");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn non_json_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/mailFolders/f1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = control(&server)
        .get_folder("f1")
        .await
        .expect_err("html body should not decode");

    assert_eq!(err.kind(), "decode");
    assert!(err.status().is_none());
}
