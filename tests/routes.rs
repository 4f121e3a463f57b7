mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{file_request, form_request, Harness};

const TWO_LABELS: &str = "rice blast and late blight are both modulated by miR-156 in leaves.";

#[tokio::test]
async fn index_serves_both_forms() {
    let harness = Harness::new();
    let request = Request::get("/").body(Body::empty()).unwrap();
    let (status, _, body) = harness.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"action="/extract_entities""#));
    assert!(body.contains(r#"name="text_file""#));
}

#[tokio::test]
async fn empty_or_blank_text_is_rejected() {
    let harness = Harness::new();
    for text in ["", "   ", " \n\t  "] {
        let (status, _, body) = harness.send(form_request(text)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "No text provided!");
    }
    assert!(harness.static_files().is_empty());
}

#[tokio::test]
async fn missing_text_field_is_rejected() {
    let harness = Harness::new();
    let request = Request::post("/extract_entities")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("other=1"))
        .unwrap();
    let (status, _, body) = harness.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "No text provided!");
}

#[tokio::test]
async fn text_with_two_labels_renders_result_page() {
    let harness = Harness::new();
    let (status, _, body) = harness.send(form_request(TWO_LABELS)).await;
    assert_eq!(status, StatusCode::OK);

    assert!(body.contains("<td>DISEASE</td>"));
    assert!(body.contains("<td>NON-CODING_RNA</td>"));
    assert!(body.find("<td>DISEASE</td>") < body.find("<td>NON-CODING_RNA</td>"));
    assert!(body.contains(r#"<mark class="entity""#));
    assert!(body.contains("/static/wordcloud_"));
    assert!(body.contains("/static/network_"));
    assert!(body.contains("/download/wordcloud_"));

    let files = harness.static_files();
    assert_eq!(files.len(), 2);
    assert!(files.iter().any(|f| f.starts_with("network_") && f.ends_with(".png")));
    assert!(files.iter().any(|f| f.starts_with("wordcloud_") && f.ends_with(".png")));
}

#[tokio::test]
async fn entity_links_use_label_colour_and_plus_joined_query() {
    let harness = Harness::new();
    let (status, _, body) = harness
        .send(form_request("foo bar was seen with miR-172."))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(
        r#"<a href="https://www.google.com/search?q=foo+bar" target="_blank"><span style="color: crimson;">foo bar</span></a>"#
    ));
    assert!(body.contains(r#"<span style="color: darkgreen;">miR-172</span>"#));
}

#[tokio::test]
async fn repeated_mentions_appear_once_in_table_but_count_in_word_cloud() {
    let harness = Harness::new();
    let text = "rice blast spreads. rice blast persists. rice blast returns with miR-156.";
    let (status, _, body) = harness.send(form_request(text)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("search?q=rice+blast").count(), 1);

    let cloud = harness
        .static_files()
        .into_iter()
        .find(|f| f.starts_with("wordcloud_"))
        .expect("word cloud written");
    let recorded = std::fs::read_to_string(harness.settings.static_dir.join(cloud)).unwrap();
    assert!(recorded.lines().any(|line| line == "rice blast=3"));
    assert!(recorded.lines().any(|line| line == "miR-156=1"));
}

#[tokio::test]
async fn one_label_is_an_unsupported_label_count() {
    let harness = Harness::new();
    let (status, _, body) = harness.send(form_request("rice blast and late blight")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Network diagram requires exactly two entity labels (found 1)");
    assert!(harness.static_files().is_empty());
}

#[tokio::test]
async fn three_labels_is_an_unsupported_label_count() {
    let harness = Harness::new();
    let text = "rice blast, miR-156 and OsWRKY45";
    let (status, _, body) = harness.send(form_request(text)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Network diagram requires exactly two entity labels (found 3)");
    assert!(harness.static_files().is_empty());
}

#[tokio::test]
async fn no_entities_is_an_unsupported_label_count() {
    let harness = Harness::new();
    let (status, _, body) = harness.send(form_request("nothing to see here")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.ends_with("(found 0)"));
}

#[tokio::test]
async fn identical_requests_get_fresh_image_names() {
    let harness = Harness::new();
    let (first, _, _) = harness.send(form_request(TWO_LABELS)).await;
    let (second, _, _) = harness.send(form_request(TWO_LABELS)).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(harness.static_files().len(), 4);
}

#[tokio::test]
async fn uploaded_file_is_saved_and_analysed() {
    let harness = Harness::new();
    let request = file_request("text_file", "../field notes.txt", TWO_LABELS.as_bytes());
    let (status, _, body) = harness.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<td>DISEASE</td>"));
    assert_eq!(harness.upload_files(), vec!["field_notes.txt".to_string()]);
    assert_eq!(harness.static_files().len(), 2);
}

#[tokio::test]
async fn whitespace_file_is_empty_content() {
    let harness = Harness::new();
    let (status, _, body) = harness
        .send(file_request("text_file", "blank.txt", b"   \n  "))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Empty file content");
    assert_eq!(harness.upload_files(), vec!["blank.txt".to_string()]);
}

#[tokio::test]
async fn non_utf8_file_fails_decoding() {
    let harness = Harness::new();
    let (status, _, body) = harness
        .send(file_request("text_file", "latin1.txt", &[0x72, 0xe9, 0x73, 0xff]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        "File decoding failed. Ensure it is a UTF-8 encoded text file."
    );
}

#[tokio::test]
async fn missing_or_unnamed_file_is_rejected() {
    let harness = Harness::new();
    let cases = [
        file_request("other_field", "notes.txt", b"rice blast"),
        file_request("text_file", "", b"rice blast"),
        Request::post("/predict_file")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("rice blast"))
            .unwrap(),
    ];
    for request in cases {
        let (status, _, body) = harness.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Error: No file uploaded");
    }
    assert!(harness.upload_files().is_empty());
}

#[tokio::test]
async fn download_serves_generated_files_as_attachments() {
    let harness = Harness::new();
    std::fs::write(harness.settings.static_dir.join("wordcloud_abc.png"), b"png").unwrap();

    let request = Request::get("/download/wordcloud_abc.png")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = harness.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "png");
    assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        r#"attachment; filename="wordcloud_abc.png""#
    );
}

#[tokio::test]
async fn download_of_unknown_or_escaping_name_is_not_found() {
    let harness = Harness::new();
    std::fs::write(harness.dir.path().join("secret.txt"), b"secret").unwrap();
    for uri in ["/download/missing.png", "/download/..%2Fsecret.txt"] {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        let (status, _, _) = harness.send(request).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn generated_images_are_served_under_static() {
    let harness = Harness::new();
    harness.send(form_request(TWO_LABELS)).await;
    let network = harness
        .static_files()
        .into_iter()
        .find(|f| f.starts_with("network_"))
        .expect("network written");

    let request = Request::get(format!("/static/{network}"))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = harness.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "DISEASE:2\nNON-CODING_RNA:1");
}

#[tokio::test]
async fn json_api_reports_entities_without_images() {
    let harness = Harness::new();
    let request = Request::post("/api/entities")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text": "rice blast, rice blast and OsWRKY45"}"#))
        .unwrap();
    let (status, _, body) = harness.send(request).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["entities"].as_array().unwrap().len(), 3);
    assert_eq!(json["entities"][0]["label"], "DISEASE");
    assert_eq!(json["entities"][0]["start"], 0);
    assert_eq!(json["entities"][0]["end"], 10);
    assert_eq!(json["labels"]["DISEASE"], serde_json::json!(["rice blast"]));
    assert_eq!(json["frequencies"]["rice blast"], 2);
    assert!(harness.static_files().is_empty());
}

#[tokio::test]
async fn json_api_rejects_blank_text() {
    let harness = Harness::new();
    let request = Request::post("/api/entities")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text": "  "}"#))
        .unwrap();
    let (status, _, body) = harness.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "No text provided!");
}
