//! In-process HTTP client for driving the full router in tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use profilehub::test_utils::test_helpers;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

pub const SEED_EMAIL: &str = "u1@gmail.com";
pub const SEED_USERNAME: &str = "user1";
pub const SEED_PASSWORD: &str = "user123";

const BOUNDARY: &str = "profilehub-test-boundary";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
    /// Path of the request that produced this response.
    pub path: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

pub struct TestClient {
    app: Router,
    cookies: BTreeMap<String, String>,
    pub pool: SqlitePool,
    pub uploads: TempDir,
    pub seed_user_id: i64,
}

impl TestClient {
    /// Fresh database seeded with one account, plus a private upload directory.
    pub async fn new() -> Self {
        let pool = test_helpers::create_test_db().await.unwrap();
        let seed_user_id =
            test_helpers::insert_test_user(&pool, SEED_EMAIL, SEED_USERNAME, SEED_PASSWORD)
                .await
                .unwrap();
        let uploads = TempDir::new().unwrap();
        let app = test_helpers::build_test_app(pool.clone(), uploads.path())
            .await
            .unwrap();

        Self {
            app,
            cookies: BTreeMap::new(),
            pool,
            uploads,
            seed_user_id,
        }
    }

    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        let path = request.uri().path().to_string();

        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .values()
                .cloned()
                .collect::<Vec<_>>()
                .join("; ");
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.app.clone().oneshot(request).await.unwrap();
        self.store_cookies(response.headers());

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
            path,
        }
    }

    fn store_cookies(&mut self, headers: &HeaderMap) {
        for value in headers.get_all(header::SET_COOKIE) {
            let raw = value.to_str().unwrap();
            let pair = raw.split(';').next().unwrap().trim();
            let name = pair.split('=').next().unwrap().to_string();
            let removed = raw.to_ascii_lowercase().contains("max-age=0");

            if removed {
                self.cookies.remove(&name);
            } else {
                self.cookies.insert(name, pair.to_string());
            }
        }
    }

    pub fn has_session_cookie(&self) -> bool {
        !self.cookies.is_empty()
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = serde_urlencoded::to_string(fields).unwrap();
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// `file` is `(field name, file name, contents)`.
    pub async fn post_multipart(
        &mut self,
        path: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
    ) -> TestResponse {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    BOUNDARY, name, value
                )
                .as_bytes(),
            );
        }
        if let Some((name, file_name, contents)) = file {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    BOUNDARY, name, file_name
                )
                .as_bytes(),
            );
            body.extend_from_slice(contents);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Follows redirects with GET until a non-redirect response.
    pub async fn follow(&mut self, mut response: TestResponse) -> TestResponse {
        for _ in 0..5 {
            if !response.status.is_redirection() {
                return response;
            }
            let location = response.location().unwrap().to_string();
            response = self.get(&location).await;
        }
        panic!("too many redirects");
    }

    pub async fn post_form_follow(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let response = self.post_form(path, fields).await;
        self.follow(response).await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        self.post_form_follow("/", &[("email", email), ("password", password)])
            .await
    }

    pub async fn login_seed_user(&mut self) -> TestResponse {
        self.login(SEED_EMAIL, SEED_PASSWORD).await
    }
}
