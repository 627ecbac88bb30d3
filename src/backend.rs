//! Mock REST backend serving the sample collections.
//!
//! [`MockBackend::handle`] is a pure request handler; [`MockBackend::serve`]
//! runs it behind a `tiny_http` server. Every response carries permissive CORS
//! headers.

use crate::{fixtures, Error, Result};
use rand::Rng;
use serde_json::{json, Map, Value};
use std::io::Read;
use std::net::SocketAddr;

pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
];

pub const NOT_FOUND: &str = "Endpoint não encontrado";
pub const MISSING_FIELDS: &str = "Campos obrigatórios não preenchidos";

const REQUIRED_CONTACT_FIELDS: [&str; 3] = ["nome", "email", "mensagem"];

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `None` for bodiless replies (preflight)
    pub body: Option<Value>,
}

impl ApiResponse {
    fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    pub fn body_string(&self) -> String {
        self.body.as_ref().map(Value::to_string).unwrap_or_default()
    }
}

/// Integer prefix of a query value: optional sign then digits. Anything
/// else reads as 0.
pub fn parse_limit(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(0)
}

/// First `limit` items; a negative limit drops that many from the end
pub fn apply_limit(items: &[Value], limit: Option<i64>) -> Vec<Value> {
    let len = items.len() as i64;
    let n = match limit {
        None => len,
        Some(l) if l >= 0 => l.min(len),
        Some(l) => (len + l).max(0),
    };
    items[..n as usize].to_vec()
}

/// Percent-decoded value of `key`; the last occurrence wins
fn query_param(query: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(k, _)| k == key)
        .last()
        .map(|(_, v)| v.into_owned())
}

pub struct MockBackend {
    collections: Vec<(&'static str, Vec<Value>)>,
}

impl MockBackend {
    pub fn new() -> Result<Self> {
        let load = |src: &str| -> Result<Vec<Value>> { Ok(serde_json::from_str(src)?) };
        Ok(Self {
            collections: vec![
                ("/api/posts", load(fixtures::backend::POSTS)?),
                ("/api/users", load(fixtures::backend::USERS)?),
                ("/api/products", load(fixtures::backend::PRODUCTS)?),
                ("/api/testimonials", load(fixtures::backend::TESTIMONIALS)?),
            ],
        })
    }

    /// Answer one request. `url` is the request target, query included.
    pub fn handle(&self, method: &str, url: &str, body: &str) -> ApiResponse {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let method = method.to_ascii_uppercase();

        if method == "OPTIONS" {
            return ApiResponse {
                status: 200,
                body: None,
            };
        }

        if method == "GET" {
            if let Some((_, items)) = self.collections.iter().find(|(p, _)| path.contains(p)) {
                let limit = query_param(query, "_limit").map(|raw| parse_limit(&raw));
                return ApiResponse::json(200, Value::Array(apply_limit(items, limit)));
            }
        }

        if method == "POST" && path.contains("/api/contact") {
            return contact(body);
        }

        ApiResponse::error(404, NOT_FOUND)
    }

    /// Bind a server on `addr`
    pub fn bind(addr: &str) -> Result<tiny_http::Server> {
        tiny_http::Server::http(addr)
            .map_err(|e| Error::InitializationError(format!("bind {}: {}", addr, e)))
    }

    pub fn local_addr(server: &tiny_http::Server) -> Option<SocketAddr> {
        server.server_addr().to_ip()
    }

    /// Serve requests until the server is dropped or unblocked
    pub fn serve(&self, server: &tiny_http::Server) {
        for mut request in server.incoming_requests() {
            let method = request.method().to_string();
            let url = request.url().to_string();
            let mut body = String::new();
            if let Err(e) = request.as_reader().read_to_string(&mut body) {
                log::warn!("failed to read body of {} {}: {}", method, url, e);
            }

            let reply = self.handle(&method, &url, &body);
            log::info!("{} {} -> {}", method, url, reply.status);

            let mut response =
                tiny_http::Response::from_string(reply.body_string()).with_status_code(reply.status);
            let mut headers: Vec<(&str, &str)> = CORS_HEADERS.to_vec();
            if reply.body.is_some() {
                headers.push(("Content-Type", "application/json; charset=utf-8"));
            }
            for (name, value) in headers {
                match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                    Ok(h) => response.add_header(h),
                    Err(()) => log::warn!("invalid header {}", name),
                }
            }
            if let Err(e) = request.respond(response) {
                log::warn!("failed to respond to {} {}: {}", method, url, e);
            }
        }
    }
}

fn contact(body: &str) -> ApiResponse {
    let input: Map<String, Value> = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => return ApiResponse::error(400, MISSING_FIELDS),
    };
    let present = |k: &str| input.get(k).map(|v| !v.is_null()).unwrap_or(false);
    if !REQUIRED_CONTACT_FIELDS.iter().all(|k| present(*k)) {
        return ApiResponse::error(400, MISSING_FIELDS);
    }

    let field = |k: &str| input.get(k).cloned().unwrap_or(Value::Null);
    let assunto = match input.get("assunto") {
        Some(v) if !v.is_null() => v.clone(),
        _ => Value::String(String::new()),
    };
    let id: u32 = rand::thread_rng().gen_range(1000..=9999);
    let created_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    ApiResponse::json(
        200,
        json!({
            "success": true,
            "message": "Mensagem enviada com sucesso!",
            "data": {
                "id": id,
                "nome": field("nome"),
                "email": field("email"),
                "assunto": assunto,
                "mensagem": field("mensagem"),
                "created_at": created_at,
            }
        }),
    )
}
