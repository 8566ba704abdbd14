use axum::Router;
use axum::body::Body;
use clap::Parser;
use http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use learning_hub::app::create_app;
use learning_hub::bootstrap::initialize_admin_user;
use learning_hub::config::{APP_CONFIG, Config, init_config};
use learning_hub::static_service::get_database_connection;

const BOUNDARY: &str = "learninghubboundary";

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// `access_token=...` pair from the response's Set-Cookie header.
fn token_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("access_token="))
        .and_then(|value| value.split(';').next())
        .unwrap_or_default()
        .to_string()
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn empty_post(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn multipart_upload(cookie: &str, fields: &[(&str, &str)], file: (&str, &[u8])) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/pdf\r\n\r\n",
            file.0
        )
        .as_bytes(),
    );
    body.extend_from_slice(file.1);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/v1/materials")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_material_sharing_flow() {
    let upload_dir = tempfile::tempdir().unwrap();
    let upload_path = upload_dir.path().to_string_lossy().to_string();
    init_config(Config::parse_from([
        "learning_hub_api",
        "--database-url",
        "sqlite::memory:",
        "--jwt-secret",
        "integration-secret",
        "--upload-dir",
        upload_path.as_str(),
        "--swagger-enabled",
        "false",
        "--admin-username",
        "root",
        "--admin-email",
        "root@uni.edu",
        "--admin-password",
        "Adm1n-passphrase",
    ]));

    let db = get_database_connection().await.unwrap();
    initialize_admin_user(db, &APP_CONFIG).await.unwrap();
    let app = create_app().await.unwrap();

    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // admin signs in and sets up the catalogue
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            json!({"username": "root", "password": "Adm1n-passphrase"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let admin_cookie = token_cookie(&response);
    assert!(!admin_cookie.is_empty());

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/departments",
            Some(&admin_cookie),
            json!({"code": "CSE", "name": "Computer Science and Engineering"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let department_id = location(&response)
        .trim_start_matches("/api/v1/departments/")
        .to_string();

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/subjects",
            Some(&admin_cookie),
            json!({"name": "Data Structures", "code": "CSE220", "department": department_id}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let subject_id = location(&response)
        .trim_start_matches("/api/v1/subjects/")
        .to_string();

    // a student registers
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            json!({
                "username": "nadia",
                "email": "nadia@uni.edu",
                "first_name": "Nadia",
                "last_name": "Rahman",
                "password1": "Str0ng-passphrase",
                "password2": "Str0ng-passphrase"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let student_cookie = token_cookie(&response);

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            json!({
                "username": "nadia",
                "email": "other@uni.edu",
                "first_name": "N",
                "last_name": "R",
                "password1": "12345678",
                "password2": "12345678"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let errors = json_body(response).await;
    assert_eq!(errors["errors"]["username"][0], "This username is already taken.");
    assert!(errors["errors"]["password1"].is_array());

    // students are sent home from admin endpoints
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/departments",
            Some(&student_cookie),
            json!({"code": "EEE", "name": "Electrical"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    // upload
    let file_bytes = b"%PDF-1.4 graph notes";
    let response = send(
        &app,
        multipart_upload(
            &student_cookie,
            &[
                ("title", "Graph Traversal Notes"),
                ("description", "BFS and DFS with examples"),
                ("subject", subject_id.as_str()),
                ("material_type", "note"),
                ("tags", "graphs,bfs"),
            ],
            ("graphs.pdf", file_bytes),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let material_url = location(&response);
    assert!(material_url.starts_with("/api/v1/materials/"));

    // each detail view counts
    send(&app, get(&material_url, None)).await;
    let detail = json_body(send(&app, get(&material_url, Some(&student_cookie))).await).await;
    assert_eq!(detail["material"]["views"], 2);
    assert_eq!(detail["is_saved"], false);

    // rating overwrites
    for score in [3, 5] {
        let response = send(
            &app,
            json_request(
                "POST",
                &format!("{material_url}/rate"),
                Some(&student_cookie),
                json!({ "score": score }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
    let response = send(
        &app,
        json_request(
            "POST",
            &format!("{material_url}/rate"),
            Some(&student_cookie),
            json!({ "score": 9 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = send(&app, empty_post(&format!("{material_url}/save"), &student_cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let detail = json_body(send(&app, get(&material_url, Some(&student_cookie))).await).await;
    assert_eq!(detail["ratings"].as_array().unwrap().len(), 1);
    assert_eq!(detail["user_rating"], 5);
    assert_eq!(detail["avg_rating"], 5.0);
    assert_eq!(detail["is_saved"], true);

    let saved = json_body(send(&app, get("/api/v1/saved", Some(&student_cookie))).await).await;
    assert_eq!(saved["total"], 1);

    // download
    let response = send(&app, get(&format!("{material_url}/download"), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("graphs.pdf"));
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], file_bytes);

    // another user cannot delete it
    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(&material_url)
            .header(header::COOKIE, &admin_cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // search and list filters
    let results = json_body(send(&app, get("/api/v1/search?q=GRAPH", None)).await).await;
    assert_eq!(results["materials"].as_array().unwrap().len(), 1);
    assert_eq!(results["subjects"].as_array().unwrap().len(), 0);

    let listing = json_body(send(&app, get("/api/v1/materials?type=invalid_type", None)).await).await;
    assert_eq!(listing["total"], 0);
    let listing = json_body(send(&app, get("/api/v1/materials?q=", None)).await).await;
    assert_eq!(listing["total"], 1);

    // study group capacity
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/study-groups",
            Some(&student_cookie),
            json!({
                "name": "Graph study",
                "description": "Practice problems",
                "subject": subject_id,
                "max_members": 1
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let group_url = location(&response);

    let response = send(&app, empty_post(&format!("{group_url}/join"), &admin_cookie)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Study group is full!");

    let group = json_body(send(&app, get(&group_url, Some(&student_cookie))).await).await;
    assert_eq!(group["member_count"], 1);
    assert_eq!(group["is_member"], true);

    // posts need a signed-in user
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/posts",
            None,
            json!({"title": "Hi", "content": "Hello"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/v1/posts",
            Some(&student_cookie),
            json!({"title": "Graph exam tips", "content": "Practice BFS", "post_type": "question"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let posts = json_body(send(&app, get("/api/v1/posts", None)).await).await;
    let post_url = format!(
        "/api/v1/posts/{}",
        posts["posts"][0]["post_id"].as_str().unwrap()
    );

    // pinning is for admins only
    let pin_url = format!("/api/v1/admin{}/pin", post_url.trim_start_matches("/api/v1"));
    let response = send(&app, empty_post(&pin_url, &student_cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let post = json_body(send(&app, get(&post_url, None)).await).await;
    assert_eq!(post["post"]["is_pinned"], false);

    let response = send(&app, empty_post(&pin_url, &admin_cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/api/v1/admin/dashboard");
    let post = json_body(send(&app, get(&post_url, None)).await).await;
    assert_eq!(post["post"]["is_pinned"], true);

    let home = json_body(send(&app, get("/", None)).await).await;
    assert_eq!(home["recent_materials"].as_array().unwrap().len(), 1);
    assert_eq!(home["study_groups"].as_array().unwrap().len(), 1);
}
