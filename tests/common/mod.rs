//! Shared harness for the HTTP integration tests.
//!
//! Each test gets its own temp-file SQLite database and drives the real
//! router with `oneshot`, carrying the session cookie by hand.

#![allow(dead_code)]

use assetdesk::api::{self, AppState};
use assetdesk::config::Config;
use assetdesk::db::hash_password;
use assetdesk::models::user::{NewUser, Role, User};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

pub const BOUNDARY: &str = "assetdesk-test-boundary";

pub fn test_config() -> Config {
    let db_path =
        std::env::temp_dir().join(format!("assetdesk-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.server.secure_cookies = false;
    config.observability.metrics_enabled = false;
    // keep hashing cheap in tests
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
    cookie: Option<String>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    pub async fn spawn_with(config: Config) -> Self {
        let state = api::create_app_state_from_config(config, None)
            .await
            .expect("failed to create app state");
        let router = api::router(state.clone());
        Self {
            state,
            router,
            cookie: None,
        }
    }

    /// A second client against the same server, with its own session.
    pub fn new_client(&self) -> Self {
        Self {
            state: self.state.clone(),
            router: self.router.clone(),
            cookie: None,
        }
    }

    pub async fn seed_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        must_change_password: bool,
    ) -> User {
        let store = self.state.store();
        let hash = hash_password(password, &self.state.config().security).unwrap();
        let user = store
            .create_user(NewUser {
                username: username.to_string(),
                full_name: None,
                role,
                password_hash: hash.clone(),
            })
            .await
            .unwrap();
        store
            .set_user_password(user.id, hash, must_change_password)
            .await
            .unwrap();
        store.get_user(user.id).await.unwrap().unwrap()
    }

    pub async fn user(&self, username: &str) -> Option<User> {
        self.state.store().get_user_by_username(username).await.unwrap()
    }

    async fn send(&mut self, mut request: Request<Body>) -> Response {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let raw = value.to_str().unwrap();
            let pair = raw.split(';').next().unwrap_or_default().trim();
            if raw.contains("Max-Age=0") || pair.ends_with('=') {
                self.cookie = None;
            } else {
                self.cookie = Some(pair.to_string());
            }
        }

        response
    }

    pub async fn get(&mut self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn upload(&mut self, uri: &str, filename: &str, content: &str) -> Response {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );

        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Response {
        self.post_form(
            "/login",
            &format!("username={}&password={}", encode(username), encode(password)),
        )
        .await
    }

    /// Log in and expect to land on the dashboard.
    pub async fn login_ok(&mut self, username: &str, password: &str) {
        let response = self.login(username, password).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");
    }

    /// Drain pending notices as `(level, message)` pairs.
    pub async fn notices(&mut self) -> Vec<(String, String)> {
        let response = self.get("/notices").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| {
                (
                    n["level"].as_str().unwrap().to_string(),
                    n["message"].as_str().unwrap().to_string(),
                )
            })
            .collect()
    }
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Percent-encode a form value.
pub fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

/// A rendered workbook, reduced to what the export promises.
pub struct Workbook {
    pub sheet_names: Vec<String>,
    /// First sheet, one entry per spreadsheet row, cells as text.
    pub rows: Vec<Vec<String>>,
}

fn zip_entry(archive: &mut zip::ZipArchive<std::io::Cursor<&[u8]>>, name: &str) -> String {
    use std::io::Read;

    let mut content = String::new();
    if let Ok(mut file) = archive.by_name(name) {
        file.read_to_string(&mut content).unwrap();
    }
    content
}

/// Open an xlsx archive and read back sheet names and the first sheet's
/// cells. Shared strings are resolved; numbers are kept as written.
pub fn read_workbook(bytes: &[u8]) -> Workbook {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    let workbook = zip_entry(&mut archive, "xl/workbook.xml");
    let shared = zip_entry(&mut archive, "xl/sharedStrings.xml");
    let sheet = zip_entry(&mut archive, "xl/worksheets/sheet1.xml");

    let sheet_names = regex::Regex::new(r#"<sheet [^>]*name="([^"]*)""#)
        .unwrap()
        .captures_iter(&workbook)
        .map(|c| c[1].to_string())
        .collect();

    let text_re = regex::Regex::new(r"(?s)<si>.*?<t[^>]*>(.*?)</t>.*?</si>").unwrap();
    let strings: Vec<String> = text_re
        .captures_iter(&shared)
        .map(|c| c[1].to_string())
        .collect();

    let row_re = regex::Regex::new(r"(?s)<row [^>]*>(.*?)</row>").unwrap();
    let cell_re = regex::Regex::new(r#"(?s)<c r="([A-Z]+)\d+"([^>/]*)>(.*?)</c>"#).unwrap();
    let value_re = regex::Regex::new(r"(?s)<v>(.*?)</v>|<t[^>]*>(.*?)</t>").unwrap();

    let rows = row_re
        .captures_iter(&sheet)
        .map(|row| {
            let mut cells = Vec::new();
            for cell in cell_re.captures_iter(&row[1]) {
                let col = cell[1]
                    .bytes()
                    .fold(0usize, |acc, b| acc * 26 + usize::from(b - b'A' + 1))
                    - 1;
                let text = match value_re.captures(&cell[3]) {
                    Some(value) => match (value.get(1), value.get(2)) {
                        (Some(v), _) if cell[2].contains(r#"t="s""#) => {
                            strings[v.as_str().parse::<usize>().unwrap()].clone()
                        }
                        (Some(v), _) => v.as_str().to_string(),
                        (None, Some(t)) => t.as_str().to_string(),
                        (None, None) => String::new(),
                    },
                    None => String::new(),
                };
                if cells.len() <= col {
                    cells.resize(col + 1, String::new());
                }
                cells[col] = text;
            }
            cells
        })
        .collect();

    Workbook { sheet_names, rows }
}
