use crate::store::{user_key, ItemStore};
use crate::types::{CreateUserResponse, Person};
use lambda_http::{http::StatusCode, Body, Error, Request, RequestExt, Response};
use serde::Serialize;

/// Query-string parameter carrying the user id for fetch, update and delete.
pub const LOOKUP_PARAM: &str = "user";

// Every handler below resolves to `Ok`: failures travel in the status code
// with an empty body, never through the error channel.

/// Create a user with a fresh id and return only that id.
pub async fn create_user(
    store: &dyn ItemStore,
    table_name: &str,
    event: &Request,
) -> Result<Response<Body>, Error> {
    let mut person = match decode_person(event.body()) {
        Ok(person) => person,
        Err(err) => {
            tracing::warn!("Rejecting create request body: {}", err);
            return respond(StatusCode::BAD_REQUEST, Body::Empty);
        }
    };

    person.user_id = uuid::Uuid::new_v4().to_string();
    tracing::info!("Creating user {}", person.user_id);

    let item = match serde_dynamo::to_item(&person) {
        Ok(item) => item,
        Err(err) => {
            tracing::error!("Failed to convert user to attributes: {}", err);
            return respond(StatusCode::INTERNAL_SERVER_ERROR, Body::Empty);
        }
    };

    if let Err(err) = store.put_item(table_name, item).await {
        tracing::error!("Failed to store user {}: {}", person.user_id, err);
        return respond(StatusCode::INTERNAL_SERVER_ERROR, Body::Empty);
    }

    respond_json(StatusCode::CREATED, &CreateUserResponse::from(&person))
}

/// Get a user by the id in the `user` query parameter.
pub async fn fetch_user(
    store: &dyn ItemStore,
    table_name: &str,
    event: &Request,
) -> Result<Response<Body>, Error> {
    let user_id = lookup_key(event);
    tracing::info!("Fetching user {}", user_id);

    let item = match store.get_item(table_name, user_key(&user_id)).await {
        Ok(Some(item)) => item,
        Ok(None) => {
            tracing::warn!("User {} not found", user_id);
            return respond(StatusCode::NOT_FOUND, Body::Empty);
        }
        Err(err) => {
            tracing::error!("Failed to load user {}: {}", user_id, err);
            return respond(StatusCode::INTERNAL_SERVER_ERROR, Body::Empty);
        }
    };

    let person: Person = match serde_dynamo::from_item(item) {
        Ok(person) => person,
        Err(err) => {
            tracing::error!("Stored user {} is malformed: {}", user_id, err);
            return respond(StatusCode::INTERNAL_SERVER_ERROR, Body::Empty);
        }
    };

    respond_json(StatusCode::OK, &person)
}

/// Replace the whole record stored under the `user` query parameter.
///
/// There is no existence check: an unknown id is created (upsert), and any
/// `user_id` in the body is overwritten by the lookup key.
pub async fn update_user(
    store: &dyn ItemStore,
    table_name: &str,
    event: &Request,
) -> Result<Response<Body>, Error> {
    let user_id = lookup_key(event);

    let mut person = match decode_person(event.body()) {
        Ok(person) => person,
        Err(err) => {
            tracing::warn!("Rejecting update body for user {}: {}", user_id, err);
            return respond(StatusCode::BAD_REQUEST, Body::Empty);
        }
    };

    person.user_id = user_id;
    tracing::info!("Updating user {}", person.user_id);

    let item = match serde_dynamo::to_item(&person) {
        Ok(item) => item,
        Err(err) => {
            tracing::error!("Failed to convert user to attributes: {}", err);
            return respond(StatusCode::INTERNAL_SERVER_ERROR, Body::Empty);
        }
    };

    if let Err(err) = store.put_item(table_name, item).await {
        tracing::error!("Failed to store user {}: {}", person.user_id, err);
        return respond(StatusCode::INTERNAL_SERVER_ERROR, Body::Empty);
    }

    respond_json(StatusCode::OK, &person)
}

/// Delete a user. Unknown ids are not an error.
pub async fn delete_user(
    store: &dyn ItemStore,
    table_name: &str,
    event: &Request,
) -> Result<Response<Body>, Error> {
    let user_id = lookup_key(event);
    tracing::info!("Deleting user {}", user_id);

    if let Err(err) = store.delete_item(table_name, user_key(&user_id)).await {
        tracing::error!("Failed to delete user {}: {}", user_id, err);
        return respond(StatusCode::INTERNAL_SERVER_ERROR, Body::Empty);
    }

    respond(StatusCode::NO_CONTENT, Body::Empty)
}

/// A fresh record from a JSON body. A bare `null` yields the empty record.
fn decode_person(body: &[u8]) -> Result<Person, serde_json::Error> {
    serde_json::from_slice::<Option<Person>>(body).map(Option::unwrap_or_default)
}

/// The `user` query parameter, or an empty string when absent.
fn lookup_key(event: &Request) -> String {
    event
        .query_string_parameters_ref()
        .and_then(|params| params.first(LOOKUP_PARAM))
        .unwrap_or_default()
        .to_string()
}

fn respond(status: StatusCode, body: Body) -> Result<Response<Body>, Error> {
    let resp = Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(body)
        .map_err(Box::new)?;
    Ok(resp)
}

fn respond_json<T: Serialize>(status: StatusCode, value: &T) -> Result<Response<Body>, Error> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => respond(status, json.into()),
        Err(err) => {
            tracing::error!("Failed to encode response body: {}", err);
            respond(StatusCode::INTERNAL_SERVER_ERROR, Body::Empty)
        }
    }
}
