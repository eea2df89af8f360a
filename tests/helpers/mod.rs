#![allow(dead_code)]

use scitran::types::{ApiUrl, Token};
use scitran::SciTranClient;
use serde_json::{json, Value};

pub const TOKEN: &str = "b3fc21a0f93d4d7a";

pub fn api_url(server: &mockito::Server) -> ApiUrl {
    ApiUrl::try_from(format!("{}/api/", server.url())).unwrap()
}

pub fn authorization(token: &str) -> String {
    format!("scitran-user {}", token)
}

/// A client which is logged in with [TOKEN].
pub fn logged_in(server: &mockito::Server) -> SciTranClient {
    SciTranClient::builder(api_url(server))
        .token(Token::from_static(TOKEN))
        .build()
        .unwrap()
}

/// A search result as produced by the service.
pub fn result(id: &str, kind: &str, source: Value) -> Value {
    json!({
        "_id": id,
        "_source": source,
        "permalink": format!("https://scitran.example.org/api/{}/{}", kind, id)
    })
}
