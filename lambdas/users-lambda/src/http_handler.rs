use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use users_shared::{users, AppState};

pub(crate) type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response<Body>, Error>> + Send>>;

/// One operation bound to a method. Shared across invocations.
pub(crate) type Handler = Arc<dyn Fn(Request) -> HandlerFuture + Send + Sync>;

/// Method to handler bindings. Tests build this with stand-ins.
pub(crate) struct Routes {
    pub get: Handler,
    pub post: Handler,
    pub put: Handler,
    pub delete: Handler,
}

impl Routes {
    /// Bind the store-backed user operations.
    pub(crate) fn new(state: &Arc<AppState>) -> Self {
        Self {
            get: bind(state, |state, event| async move {
                users::fetch_user(state.store.as_ref(), &state.table_name, &event).await
            }),
            post: bind(state, |state, event| async move {
                users::create_user(state.store.as_ref(), &state.table_name, &event).await
            }),
            put: bind(state, |state, event| async move {
                users::update_user(state.store.as_ref(), &state.table_name, &event).await
            }),
            delete: bind(state, |state, event| async move {
                users::delete_user(state.store.as_ref(), &state.table_name, &event).await
            }),
        }
    }
}

fn bind<F, Fut>(state: &Arc<AppState>, handler: F) -> Handler
where
    F: Fn(Arc<AppState>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response<Body>, Error>> + Send + 'static,
{
    let state = Arc::clone(state);
    Arc::new(move |event| -> HandlerFuture { Box::pin(handler(Arc::clone(&state), event)) })
}

/// Main Lambda handler - routes each method to its user operation
pub(crate) async fn function_handler(
    event: Request,
    routes: &Routes,
) -> Result<Response<Body>, Error> {
    let method = event.method().clone();
    tracing::info!(
        "Users Lambda invoked - Method: {} Path: {}",
        method,
        event.uri().path()
    );

    let handler = match method {
        Method::GET => &routes.get,
        Method::POST => &routes.post,
        Method::PUT => &routes.put,
        Method::DELETE => &routes.delete,
        _ => {
            tracing::warn!("Requested for unhandled method {}", method);
            let resp = Response::builder()
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .body(Body::Empty)
                .map_err(Box::new)?;
            return Ok(resp);
        }
    };

    handler(event).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    type Calls = Arc<Mutex<Vec<&'static str>>>;

    fn stand_in(name: &'static str, status: u16, calls: &Calls) -> Handler {
        let calls = Arc::clone(calls);
        Arc::new(move |_event| -> HandlerFuture {
            calls.lock().unwrap().push(name);
            Box::pin(async move {
                let resp = Response::builder()
                    .status(status)
                    .header("X-Handler", name)
                    .body(Body::from(name))
                    .map_err(Box::new)?;
                Ok::<_, Error>(resp)
            })
        })
    }

    fn stand_in_routes(calls: &Calls) -> Routes {
        Routes {
            get: stand_in("get", 200, calls),
            post: stand_in("post", 201, calls),
            put: stand_in("put", 200, calls),
            delete: stand_in("delete", 204, calls),
        }
    }

    fn request(method: &str) -> Request {
        lambda_http::http::Request::builder()
            .method(method)
            .uri("/users")
            .body(Body::Empty)
            .unwrap()
    }

    #[tokio::test]
    async fn known_methods_reach_exactly_their_handler() {
        let cases = [
            ("GET", "get", 200),
            ("POST", "post", 201),
            ("PUT", "put", 200),
            ("DELETE", "delete", 204),
        ];

        for (method, name, status) in cases {
            let calls = Calls::default();
            let routes = stand_in_routes(&calls);

            let resp = function_handler(request(method), &routes).await.unwrap();

            assert_eq!(*calls.lock().unwrap(), vec![name]);
            assert_eq!(resp.status().as_u16(), status);
            assert_eq!(resp.headers()["X-Handler"], name);
            assert_eq!(std::str::from_utf8(resp.body()).unwrap(), name);
        }
    }

    #[tokio::test]
    async fn other_methods_are_not_allowed() {
        for method in ["PATCH", "OPTIONS", "HEAD", "PURGE"] {
            let calls = Calls::default();
            let routes = stand_in_routes(&calls);

            let resp = function_handler(request(method), &routes).await.unwrap();

            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert!(resp.body().is_empty());
            assert!(resp.headers().is_empty());
            assert!(calls.lock().unwrap().is_empty());
        }
    }
}
