//! Authentication middleware for injecting Bearer tokens.

use async_trait::async_trait;
use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

/// Middleware that injects the personal access token into requests.
pub struct AuthMiddleware {
    token: String,
}

impl AuthMiddleware {
    /// Create a new authentication middleware.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl Middleware for AuthMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        match format!("Bearer {}", self.token).parse() {
            Ok(value) => {
                req.headers_mut().insert(http::header::AUTHORIZATION, value);
            },
            Err(_) => {
                tracing::warn!("Token contains characters not allowed in a header, sending request without it");
            },
        }

        next.run(req, extensions).await
    }
}
