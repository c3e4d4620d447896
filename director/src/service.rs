use crate::errors::{DirectorError, RoutingError};
use crate::router::Router;
use http_body_util::combinators::BoxBody;
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderName, HeaderValue};
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use shared::http::make_text_response;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Header carrying the chosen destination on successful decisions.
pub const DESTINATION_HEADER: HeaderName = HeaderName::from_static("x-webdirector-destination");

/// Answers every request with the routing decision taken for it.
///
/// The request itself is not forwarded anywhere; the fronting proxy reads the
/// destination from the response and does the forwarding.
pub struct DirectorService {
    router: Arc<Router>,
}

impl DirectorService {
    pub fn new(router: Arc<Router>) -> Self {
        Self { router }
    }
}

impl Service<Request<Incoming>> for DirectorService {
    type Response = Response<BoxBody<Bytes, Infallible>>;
    type Error = DirectorError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let router = self.router.clone();
        // Only the head is needed to take a decision
        let (parts, _body) = req.into_parts();
        let head = Request::from_parts(parts, ());

        Box::pin(async move { Ok(decision_response(router.route(&head).await)) })
    }
}

fn decision_response(
    decision: Result<String, RoutingError>,
) -> Response<BoxBody<Bytes, Infallible>> {
    match decision {
        Ok(destination) => {
            let mut response = make_text_response(StatusCode::OK, format!("{destination}\n"));
            match HeaderValue::from_str(&destination) {
                Ok(value) => {
                    response.headers_mut().insert(DESTINATION_HEADER, value);
                }
                Err(_) => {
                    tracing::error!(
                        destination = %destination,
                        "Destination is not a valid header value"
                    );
                }
            }
            response
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouterConfig;
    use crate::testutils::{FixedDestination, MockAvailability, MockHosts};
    use http_body_util::{BodyExt, Empty};
    use hyper::header::HOST;
    use hyper_util::client::legacy::Client;
    use hyper_util::client::legacy::connect::HttpConnector;
    use hyper_util::rt::TokioExecutor;
    use tokio::net::TcpListener;

    fn test_router() -> Arc<Router> {
        Arc::new(Router::new(
            RouterConfig {
                service_domain: "example.com".to_string(),
                read_port: 8088,
                write_port: 8089,
            },
            Arc::new(FixedDestination("mgmt1:9000".to_string())),
            Arc::new(MockHosts::new(&[("mycollection", &["h1", "h2"])])),
            Arc::new(MockAvailability::available(&["h2"])),
        ))
    }

    #[tokio::test]
    async fn test_decision_response() {
        let response = decision_response(Ok("h2:8088".to_string()));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(DESTINATION_HEADER).unwrap(), "h2:8088");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), b"h2:8088\n");

        let response = decision_response(Err(RoutingError::bad_request("Unknown method 'TRACE'")));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(DESTINATION_HEADER).is_none());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), b"Unknown method 'TRACE'\n");
    }

    #[tokio::test]
    async fn test_service_end_to_end() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(shared::http::serve(listener, DirectorService::new(test_router())));

        let client: Client<HttpConnector, Empty<Bytes>> =
            Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let request = |host: &str| {
            Request::builder()
                .uri(format!("http://127.0.0.1:{port}/some/key"))
                .header(HOST, host)
                .body(Empty::new())
                .unwrap()
        };

        let response = client
            .request(request("mycollection.example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(DESTINATION_HEADER).unwrap(), "h2:8088");

        let response = client.request(request("example.com")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(DESTINATION_HEADER).unwrap(),
            "mgmt1:9000"
        );

        let response = client.request(request("unknown.example.com")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), b"no hosts for collection 'unknown'\n");
    }
}
