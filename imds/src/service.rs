use crate::config::{Config, UserDataConfig};
use crate::document::{self, DocumentFormat};
use crate::errors::{Error, Result};
use crate::identity::{IdentityResolver, resolver_from_config};
use crate::metadata;
use crate::router::{Endpoint, match_path};
use crate::store::DocumentStore;
use crate::userdata;
use http::header::{CONTENT_TYPE, HeaderValue};
use http_body_util::{BodyExt, Full, combinators::BoxBody};
use hyper::body::Bytes;
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::IpAddr;
use std::pin::Pin;
use std::sync::Arc;

/// State shared by every connection's service instance.
///
/// All of it is immutable after startup; request handling never writes
/// shared state, so unbounded concurrent requests need no locking.
pub struct AppState {
    resolver: Box<dyn IdentityResolver>,
    store: DocumentStore,
    format: DocumentFormat,
    user_data: UserDataConfig,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            resolver: resolver_from_config(&config.identity),
            store: DocumentStore::new(config.store.base_dir.clone()),
            format: config.store.format,
            user_data: config.user_data.clone(),
        }
    }
}

/// Hyper service for one connection, carrying the connection's peer
/// address for identity resolution.
#[derive(Clone)]
pub struct MetadataService {
    state: Arc<AppState>,
    peer: IpAddr,
}

impl MetadataService {
    pub fn new(state: Arc<AppState>, peer: IpAddr) -> Self {
        Self { state, peer }
    }
}

impl<B> Service<Request<B>> for MetadataService
where
    B: Send + Sync + 'static,
{
    type Response = Response<BoxBody<Bytes, Infallible>>;
    type Error = Infallible;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        let state = self.state.clone();
        let peer = self.peer;

        Box::pin(async move {
            let method = req.method().clone();
            let path = req.uri().path().to_string();

            let response = match handle(&state, &req, peer).await {
                Ok((body, content_type)) => {
                    tracing::info!(%method, %path, %peer, status = 200, "request served");
                    respond(StatusCode::OK, Some(content_type), body)
                }
                Err(err) => {
                    let status = err.status();
                    if status == StatusCode::NOT_FOUND {
                        // Expected client probing, not a server fault
                        tracing::debug!(%method, %path, %peer, "not found");
                    } else {
                        tracing::error!(%method, %path, %peer, error = %err, "request failed");
                    }
                    respond(status, None, String::new())
                }
            };

            Ok(response)
        })
    }
}

/// Resolution and rendering pipeline for one request:
/// route, resolve identity, load document, parse, render.
async fn handle<B>(
    state: &AppState,
    req: &Request<B>,
    peer: IpAddr,
) -> Result<(String, &'static str)> {
    let endpoint = match_path(req.method(), req.uri().path()).ok_or(Error::NotFound)?;

    // instance-id is synthetic and never touches the store, so it is
    // answered before identity resolution can fail
    if let Endpoint::Metadata { key } = &endpoint
        && key == "instance-id"
    {
        return Ok((metadata::INSTANCE_ID.to_string(), metadata::CONTENT_TYPE));
    }

    let identity = state.resolver.resolve(req.headers(), peer).await?;
    let bytes = state.store.load(&identity).await?;
    let document = document::parse(&bytes, state.format)?;

    match endpoint {
        Endpoint::Metadata { key } => Ok((
            metadata::render(&document, &key)?,
            metadata::CONTENT_TYPE,
        )),
        Endpoint::UserData => {
            let rendered = userdata::render(&document, &state.user_data)?;
            Ok((rendered.body, rendered.content_type))
        }
    }
}

fn respond(
    status: StatusCode,
    content_type: Option<&'static str>,
    body: String,
) -> Response<BoxBody<Bytes, Infallible>> {
    let mut response = Response::new(
        Full::new(Bytes::from(body))
            .map_err(|e| match e {})
            .boxed(),
    );
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    response
}
