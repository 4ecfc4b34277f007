//! Tower middleware applying [`TenantResolver`] decisions to requests.
//!
//! Must wrap the router (not be added with `Router::layer`) so that the
//! page rewrite happens before routing.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::OriginalUri,
    http::{
        HeaderMap, HeaderValue, Request, StatusCode, Uri,
        header::{AUTHORIZATION, COOKIE, HOST},
        uri::PathAndQuery,
    },
    response::{IntoResponse, Redirect, Response},
};
use tower::{Layer, Service};
use tracing::error;

use super::TENANT_HEADER;
use super::resolver::{RequestFacts, Resolution, TenantResolver};

/// Layer producing [`TenantResolverService`].
#[derive(Clone)]
pub struct TenantResolverLayer {
    resolver: Arc<TenantResolver>,
}

impl TenantResolverLayer {
    pub fn new(resolver: TenantResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

impl<S> Layer<S> for TenantResolverLayer {
    type Service = TenantResolverService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TenantResolverService {
            inner,
            resolver: Arc::clone(&self.resolver),
        }
    }
}

/// Strips any client-sent tenant header, then allows, redirects or
/// rejects the request.
#[derive(Clone)]
pub struct TenantResolverService<S> {
    inner: S,
    resolver: Arc<TenantResolver>,
}

impl<S> Service<Request<Body>> for TenantResolverService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        req.headers_mut().remove(TENANT_HEADER);

        let resolution = {
            let headers = req.headers();
            let token = session_token(headers, self.resolver.session_cookie_name());
            let facts = RequestFacts {
                host: request_host(&req),
                path: req.uri().path(),
                token: token.as_deref(),
            };
            self.resolver.resolve(&facts)
        };

        match resolution {
            Resolution::Allow {
                tenant_id,
                rewrite_path,
            } => {
                if let Some(id) = tenant_id {
                    match HeaderValue::try_from(id.to_string()) {
                        Ok(value) => {
                            req.headers_mut().insert(TENANT_HEADER, value);
                        }
                        Err(e) => {
                            error!(error = %e, "Tenant id is not a valid header value");
                            return respond(StatusCode::INTERNAL_SERVER_ERROR.into_response());
                        }
                    }
                }
                if let Some(path) = rewrite_path {
                    if let Err(status) = rewrite_uri(&mut req, &path) {
                        return respond(status.into_response());
                    }
                }
                // Call the instance that was polled ready; keep a fresh clone.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(req).await })
            }
            Resolution::Redirect(location) => {
                respond(Redirect::temporary(&location).into_response())
            }
            Resolution::Reject(status) => respond(status.into_response()),
        }
    }
}

fn respond<E: Send + 'static>(
    response: Response,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, E>> + Send>> {
    Box::pin(async move { Ok(response) })
}

/// Host from the `Host` header, falling back to the URI authority
/// (HTTP/2 requests carry it there).
fn request_host<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().authority().map(|a| a.as_str()))
}

/// Bearer token if present, otherwise the named session cookie.
fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_owned());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim().to_owned())
        .filter(|t| !t.is_empty())
}

/// Point the request at `path` internally, keeping the query string and
/// recording the client-visible URI as [`OriginalUri`].
fn rewrite_uri(req: &mut Request<Body>, path: &str) -> Result<(), StatusCode> {
    let original = req.uri().clone();
    let target = match original.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_owned(),
    };

    let mut parts = original.clone().into_parts();
    parts.path_and_query =
        Some(PathAndQuery::try_from(target).map_err(|_| StatusCode::BAD_REQUEST)?);
    let rewritten = Uri::from_parts(parts).map_err(|_| StatusCode::BAD_REQUEST)?;

    if req.extensions().get::<OriginalUri>().is_none() {
        req.extensions_mut().insert(OriginalUri(original));
    }
    *req.uri_mut() = rewritten;
    Ok(())
}
