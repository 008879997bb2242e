mod common;

use catalog_admin_client::card::{CardCreate, CardListParams, CardUpdate};
use catalog_admin_client::config::ClientOptions;
use catalog_admin_client::error::Error;
use catalog_admin_client::rating::FeedbackCreate;
use catalog_admin_client::search::SearchParams;
use catalog_admin_client::ste::{Characteristics, SteCreate, SteListParams, SteUpdate, UploadFile};
use catalog_admin_client::CatalogClient;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_string_contains, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_for, signed_in_client, ste_json, ste_page};

fn query_of(request: &wiremock::Request) -> Vec<(String, String)> {
    request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[tokio::test]
async fn list_ste_sends_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/ste"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ste_page(1..3)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let params = SteListParams::new().with_query("bolt").with_categories(&[11, 12]);
    let stes = client.ste().list(&params).await.unwrap();
    assert_eq!(stes.len(), 2);
    assert_eq!(stes[0].name, "STE 1");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        query_of(&requests[0]),
        vec![
            ("q".to_string(), "bolt".to_string()),
            ("category_id".to_string(), "11".to_string()),
            ("limit".to_string(), "100".to_string()),
            ("skip".to_string(), "0".to_string()),
        ]
    );
}

#[tokio::test]
async fn fetch_all_walks_three_batches() {
    let server = MockServer::start().await;
    for (skip, range) in [(0, 0..500), (500, 500..1000), (1000, 1000..1200)] {
        Mock::given(method("GET"))
            .and(path("/api/admin/ste"))
            .and(query_param("skip", skip.to_string().as_str()))
            .and(query_param("limit", "500"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ste_page(range)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server.uri());
    let all = client.ste().fetch_all(&SteListParams::new()).await.unwrap();

    assert_eq!(all.len(), 1200);
    assert!(all.iter().enumerate().all(|(i, ste)| ste.id == i as i64));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn fetch_all_on_empty_catalog_makes_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/ste"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let all = client.ste().fetch_all(&SteListParams::new()).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn fetch_all_forwards_filters_and_honours_page_bound() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/ste"))
        .and(query_param("q", "pump"))
        .and(query_param("category_id", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ste_page(0..2)))
        .expect(3)
        .mount(&server)
        .await;

    let options = ClientOptions::default()
        .with_base_url(&server.uri())
        .with_fetch_all_batch_size(2)
        .with_fetch_all_max_pages(Some(3));
    let client = CatalogClient::new(options).unwrap();

    let params = SteListParams::new().with_query("pump").with_categories(&[4, 5]);
    let err = client.ste().fetch_all(&params).await.unwrap_err();
    assert!(matches!(err, Error::PaginationLimit { pages: 3, fetched: 6 }));
}

#[tokio::test]
async fn ste_crud() {
    let server = MockServer::start().await;
    let (client, token) = signed_in_client(&server.uri());
    let auth = format!("Bearer {}", token);

    Mock::given(method("POST"))
        .and(path("/api/admin/ste"))
        .and(header("Authorization", auth.as_str()))
        .and(body_json(json!({
            "name": "Drill",
            "category_id": 3,
            "characteristics": {"Power": 800, "Cordless": true}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ste_json(10)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/ste/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ste_json(10)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/ste/10"))
        .and(body_json(json!({"name": "Hammer drill", "card_id": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10, "name": "Hammer drill", "category_id": 3, "characteristics": {}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/ste/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "Deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let ste = client.ste();
    let chars = Characteristics::new().with("Power", 800).with("Cordless", true);
    let created = ste
        .create(&SteCreate::new("Drill", 3).with_characteristics(chars))
        .await
        .unwrap();
    assert_eq!(created.id, 10);

    let fetched = ste.get(10).await.unwrap();
    assert_eq!(fetched, created);

    let updated = ste
        .update(10, &SteUpdate::new().with_name("Hammer drill").with_card(None))
        .await
        .unwrap();
    assert_eq!(updated.name, "Hammer drill");

    assert_eq!(ste.delete(10).await.unwrap().msg, "Deleted");
}

#[tokio::test]
async fn upload_rejects_wrong_type_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let file = UploadFile::new("data.txt", b"hello".to_vec()).with_mime_type("text/plain");
    let err = client.ste().upload(file).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn upload_sends_multipart_with_token() {
    let server = MockServer::start().await;
    let (client, token) = signed_in_client(&server.uri());

    Mock::given(method("POST"))
        .and(path("/api/admin/ste/upload"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/ste/upload"))
        .and(header("Authorization", format!("Bearer {}", token).as_str()))
        .and(header_exists("Content-Type"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"data.CSV\""))
        .and(body_string_contains("id,name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "msg": "Import completed", "created": 4, "updated": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = UploadFile::new("data.CSV", b"id,name\n1,Bolt\n".to_vec()).with_mime_type("application/octet-stream");
    let summary = client.ste().upload(file).await.unwrap();
    assert_eq!(summary.msg, "Import completed");
    assert_eq!(summary.created, Some(4));
    assert_eq!(summary.updated, Some(1));
}

#[tokio::test]
async fn upload_accepts_csv_with_unknown_mime_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/ste/upload"))
        .and(body_string_contains("filename=\"data.CSV\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "Import completed"})))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    for mime in ["", "csv"] {
        let file = UploadFile::new("data.CSV", b"id,name\n1,Bolt\n".to_vec()).with_mime_type(mime);
        let summary = client.ste().upload(file).await.unwrap();
        assert_eq!(summary.msg, "Import completed");
    }
}

#[tokio::test]
async fn upload_failure_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/ste/upload"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Unsupported file format. Use CSV or Excel."
        })))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let err = client
        .ste()
        .upload(UploadFile::new("sheet.xlsx", vec![1, 2, 3]))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unsupported file format. Use CSV or Excel.");
}

#[tokio::test]
async fn upload_json_import() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/ste/upload-json"))
        .and(body_string_contains("filename=\"stes.json\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "Successfully uploaded 2 STEs"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let body = br#"[{"name": "a"}, {"name": "b"}]"#.to_vec();
    let response = client.ste().upload_json(UploadFile::new("stes.json", body)).await.unwrap();
    assert_eq!(response.msg, "Successfully uploaded 2 STEs");

    let err = client
        .ste()
        .upload_json(UploadFile::new("stes.csv", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn search_returns_page_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("query", "дрель"))
        .and(query_param("exact", "true"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "2"))
        .and(query_param("category_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [ste_json(3), ste_json(4)],
            "total": 5,
            "page": 2,
            "per_page": 2,
            "total_pages": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let params = SearchParams::new("дрель").exact(true).page(2).per_page(2).categories(&[7, 8]);
    let page = client.search().search(&params).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 5);
    assert!(page.has_next());
    assert!(page.items.len() <= page.per_page as usize);
}

#[tokio::test]
async fn search_omits_unset_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [], "total": 0, "page": 1, "per_page": 10, "total_pages": 1
        })))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let page = client.search().search(&SearchParams::new("none")).await.unwrap();
    assert!(page.is_empty());
    assert!(!page.has_next());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(query_of(&requests[0]), vec![("query".to_string(), "none".to_string())]);
}

#[tokio::test]
async fn reaggregate_selected_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/reaggregate"))
        .and(body_json(json!({"ste_ids": [1, 2, 3]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok", "total": 3, "updated": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let result = client.aggregation().reaggregate_selection(Some(&[1, 2, 3])).await.unwrap();
    assert_eq!(result.status, "ok");
    assert_eq!((result.total, result.updated), (3, 2));
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn reaggregate_all_sends_no_id_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/reaggregate/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed", "total": 1200, "updated": 57
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let result = client.aggregation().reaggregate_selection(None).await.unwrap();
    assert_eq!(result.status, "completed");
    assert_eq!(result.total, 1200);
    assert_eq!(result.updated, 57);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn card_endpoints() {
    let server = MockServer::start().await;
    let card = json!({"id": 4, "name": "Drills", "stes": [ste_json(1), ste_json(2)]});

    Mock::given(method("GET"))
        .and(path("/api/admin/card/"))
        .and(query_param("q", "dr"))
        .and(query_param("category_id", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([card.clone()])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/card/"))
        .and(body_json(json!({"name": "Drills", "ste_ids": [1, 2]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(card.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/card/4"))
        .and(body_json(json!({"name": "Power drills"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 4, "name": "Power drills", "stes": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/card/4/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ste_json(2)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/card/4/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Relation not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let cards = client_for(&server.uri()).cards();

    let listed = cards
        .list(&CardListParams::new().with_query("dr").with_categories(&[2, 3]))
        .await
        .unwrap();
    assert_eq!(listed[0].stes.len(), 2);

    let created = cards
        .create(&CardCreate::new().with_name("Drills").with_stes(&[1, 2]))
        .await
        .unwrap();
    assert_eq!(created.name.as_deref(), Some("Drills"));

    let update = CardUpdate {
        name: Some("Power drills".to_string()),
    };
    assert!(cards.update(4, &update).await.unwrap().stes.is_empty());

    assert_eq!(cards.ste_relation(4, 2).await.unwrap().id, 2);

    let err = cards.ste_relation(4, 9).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Relation not found");
}

#[tokio::test]
async fn ratings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rating"))
        .and(body_json(json!({"card_id": 4, "ste_id": 2, "score": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "card_id": 4, "ste_id": 2, "score": 1, "user_id": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/rating/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(vec![json!({
            "id": 1, "card_id": 4, "ste_id": 2, "score": 1
        })])))
        .expect(1)
        .mount(&server)
        .await;

    let ratings = client_for(&server.uri()).ratings();
    let stored = ratings
        .rate(&FeedbackCreate {
            card_id: 4,
            ste_id: 2,
            score: 1,
        })
        .await
        .unwrap();
    assert_eq!(stored.id, 1);

    let err = ratings
        .rate(&FeedbackCreate {
            card_id: 4,
            ste_id: 2,
            score: 5,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    assert_eq!(ratings.history().await.unwrap().len(), 1);
}
