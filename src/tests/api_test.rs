#[cfg(test)]
mod tests {
    use crate::app::{build_app, build_state};
    use crate::config::Settings;
    use crate::services::{MemoryUserStore, UserStore};
    use crate::utils::ShutdownCoordinator;
    use axum::body::Body;
    use axum::http::{header, HeaderMap, Method, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const INDEX_HTML: &str = "<!doctype html><div ng-view></div>";

    struct TestApp {
        router: Router,
        www: TempDir,
    }

    fn setup(with_store: bool) -> TestApp {
        let www = tempfile::tempdir().unwrap();
        std::fs::write(www.path().join("index.html"), INDEX_HTML).unwrap();
        std::fs::create_dir_all(www.path().join("views")).unwrap();
        std::fs::write(www.path().join("views/login.html"), "<form></form>").unwrap();

        let mut settings = Settings::default();
        settings.server.www_root = www.path().to_string_lossy().to_string();
        settings.auth.jwt_secret = Some("test-secret".to_string());
        settings.auth.scrypt_log_n = 4;

        let store: Option<Arc<dyn UserStore>> = if with_store {
            Some(Arc::new(MemoryUserStore::new()))
        } else {
            None
        };
        let state = build_state(&settings, store, ShutdownCoordinator::new());
        TestApp {
            router: build_app(state, settings.upload.max_body_bytes),
            www,
        }
    }

    async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = app.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, body.to_vec())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn json_body(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    async fn register(app: &TestApp, email: &str, password: &str) -> String {
        let (status, _, body) = send(
            app,
            post_json(
                "/api/register",
                None,
                json!({"email": email, "password": password}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        json_body(&body)["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_known_view_serves_application_shell() {
        let app = setup(false);
        for path in ["/", "/login", "/signup", "/profile"] {
            let (status, _, body) = send(&app, get(path)).await;
            assert_eq!(status, StatusCode::OK, "{}", path);
            assert_eq!(String::from_utf8(body).unwrap(), INDEX_HTML);
        }
    }

    #[tokio::test]
    async fn test_unknown_path_redirects_to_root() {
        let app = setup(false);
        let (status, headers, _) = send(&app, get("/unknown")).await;
        assert_eq!(status, StatusCode::PERMANENT_REDIRECT);
        assert_eq!(headers.get(header::LOCATION).unwrap(), "/");
    }

    #[tokio::test]
    async fn test_templates_are_served_as_files() {
        let app = setup(false);
        let (status, _, body) = send(&app, get("/views/login.html")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<form></form>");
    }

    #[tokio::test]
    async fn test_resolve_view_endpoint() {
        let app = setup(false);

        let (status, _, body) = send(&app, get("/api/views/resolve?path=/signup")).await;
        assert_eq!(status, StatusCode::OK);
        let signup = json_body(&body);
        assert_eq!(signup["template_url"], "/views/signup.html");
        assert_eq!(signup["controller"], "SignupController");
        assert_eq!(signup["redirected"], false);

        let (_, _, body) = send(&app, get("/api/views/resolve?path=/unknown")).await;
        let unknown = json_body(&body);
        assert_eq!(unknown["requested"], "/unknown");
        assert_eq!(unknown["path"], "/");
        assert_eq!(unknown["template_url"], "/views/frontpage.html");
        assert_eq!(unknown["controller"], Value::Null);
        assert_eq!(unknown["redirected"], true);
    }

    #[tokio::test]
    async fn test_view_table_endpoint() {
        let app = setup(false);
        let (status, _, body) = send(&app, get("/api/views")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["entries"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_upload_overlay_plan_endpoint() {
        let app = setup(false);

        let (status, _, body) = send(&app, get("/api/ui/directives")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["directives"], json!(["file-upload-button"]));

        let (status, _, body) = send(
            &app,
            get("/api/ui/directives/file-upload-button?width=120&height=32"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let plan = json_body(&body);
        assert_eq!(plan["input_attributes"]["type"], "file");
        assert_eq!(plan["input_attributes"]["multiple"], "");
        assert_eq!(plan["input_style"]["opacity"], "0");
        assert_eq!(plan["host_style"]["position"], "relative");
        assert_eq!(plan["overlay_box"]["width"], 120.0);

        let (status, _, _) = send(
            &app,
            get("/api/ui/directives/file-upload-button?children=0"),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_account_and_profile_flow() {
        let app = setup(true);
        let token = register(&app, "ada@example.com", "secret").await;

        let (status, _, body) = send(
            &app,
            post_json(
                "/api/login",
                None,
                json!({"email": "ada@example.com", "password": "secret"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(json_body(&body)["token"].is_string());

        let (status, _, body) = send(&app, post_json("/api/profile/get-edit", Some(&token), json!({}))).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let user_id = json_body(&body)["user_id"].as_str().unwrap().to_string();
        assert!(!user_id.is_empty());

        let (status, _, _) = send(
            &app,
            post_json(
                "/api/profile/save",
                Some(&token),
                json!({
                    "full_name": "Ada Lovelace",
                    "public_name": "ada",
                    "pdfs": [{"name": "Notes", "path": "pdf/notes.pdf"}]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, body) = send(
            &app,
            post_json("/api/profile/get-view", None, json!({"user_id": user_id})),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let contents = json_body(&body);
        assert_eq!(contents["full_name"], "Ada Lovelace");
        assert_eq!(contents["pdfs"][0]["path"], "pdf/notes.pdf");

        let (status, _, body) = send(&app, get("/api/profile/public/ada")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["user_id"], user_id.as_str());

        let (status, _, _) = send(&app, get("/api/profile/public/nobody")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_profile_rejected() {
        let app = setup(true);
        let token = register(&app, "ada@example.com", "secret").await;

        let (status, _, body) = send(
            &app,
            post_json(
                "/api/profile/save",
                Some(&token),
                json!({"description": "x".repeat(400)}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
        assert_eq!(body, b"Invalid content");

        let pdfs: Vec<Value> = (0..2000)
            .map(|i| json!({"name": format!("report {}", i), "path": "pdf/report.pdf"}))
            .collect();
        for oversized in [json!({"public_name": "x".repeat(500)}), json!({"pdfs": pdfs})] {
            let (status, _, _) = send(
                &app,
                post_json("/api/profile/save", Some(&token), oversized),
            )
            .await;
            assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
        }
    }

    #[tokio::test]
    async fn test_public_name_is_unique() {
        let app = setup(true);
        let first = register(&app, "ada@example.com", "secret").await;
        let second = register(&app, "bob@example.com", "secret").await;

        let claim = json!({"public_name": "mango"});
        let (status, _, _) = send(&app, post_json("/api/profile/save", Some(&first), claim.clone())).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _, _) = send(&app, post_json("/api/profile/save", Some(&second), claim)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_auth_failures() {
        let app = setup(true);
        register(&app, "ada@example.com", "secret").await;

        let (status, _, body) = send(
            &app,
            post_json(
                "/api/register",
                None,
                json!({"email": "ada@example.com", "password": "other"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, b"User already registered");

        let (status, _, body) = send(
            &app,
            post_json(
                "/api/login",
                None,
                json!({"email": "ada@example.com", "password": "wrong"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, b"Incorrect email or password");

        let (status, _, _) = send(
            &app,
            post_json(
                "/api/login",
                None,
                json!({"email": "nobody@example.com", "password": "secret"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let malformed = Request::builder()
            .method(Method::POST)
            .uri("/api/refreshtoken")
            .header(header::AUTHORIZATION, "no-scheme")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(&app, malformed).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = send(&app, post_json("/api/refreshtoken", Some("forged"), json!({}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_and_logout() {
        let app = setup(true);
        let token = register(&app, "ada@example.com", "secret").await;

        let (status, _, body) = send(&app, post_json("/api/refreshtoken", Some(&token), json!({}))).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let refreshed = json_body(&body)["token"].as_str().unwrap().to_string();

        let (status, _, _) = send(&app, post_json("/api/logout", Some(&token), json!({}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _, _) = send(&app, post_json("/api/logout", Some(&refreshed), json!({}))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, _) = send(&app, post_json("/api/profile/get-edit", Some(&refreshed), json!({}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_without_database() {
        let app = setup(false);

        let (status, _, body) = send(
            &app,
            post_json(
                "/api/login",
                None,
                json!({"email": "ada@example.com", "password": "secret"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, b"No database present");

        let (status, _, body) = send(&app, post_json("/api/profile/get-edit", Some("t"), json!({}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, b"No database associated");

        let (status, _, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["database"], "absent");
    }

    fn multipart(uri: &str, files: &[(&str, &str)]) -> Request<Body> {
        let boundary = "mango-boundary";
        let mut body = String::new();
        for (name, content) in files {
            body.push_str(&format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{n}\"\r\nContent-Type: application/octet-stream\r\n\r\n{c}\r\n",
                b = boundary,
                n = name,
                c = content
            ));
        }
        body.push_str(&format!("--{}--\r\n", boundary));
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_multiple_files() {
        let app = setup(false);
        let (status, _, body) = send(
            &app,
            multipart("/api/upload/pdf", &[("a.pdf", "first"), ("../b.pdf", "second")]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["paths"], json!(["pdf/a.pdf", "pdf/b.pdf"]));
        assert_eq!(
            std::fs::read_to_string(app.www.path().join("pdf/b.pdf")).unwrap(),
            "second"
        );

        // Uploaded files are then served statically.
        let (status, _, body) = send(&app, get("/pdf/a.pdf")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"first");
    }

    #[tokio::test]
    async fn test_upload_kinds_and_errors() {
        let app = setup(false);

        let (status, _, body) = send(
            &app,
            multipart("/api/upload/profile-header", &[("top.png", "png")]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["paths"], json!(["img/profile-headers/top.png"]));

        let (status, _, _) = send(&app, multipart("/api/upload/profile-icon", &[])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = send(&app, multipart("/api/upload/profile-icon", &[("..", "x")])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = send(&app, multipart("/api/upload/executable", &[("a", "x")])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
