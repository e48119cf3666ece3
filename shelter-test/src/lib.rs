mod app;
mod jwt;

pub use app::{resolve_path, tokenize_path, PathToken, TestApp, TestRequest, TestResponse};
pub use jwt::TestJwt;
