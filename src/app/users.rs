// In-memory user directory

use std::sync::RwLock;

use dispatcher::dispatch::Controller;
use dispatcher::error::HandlerError;
use dispatcher::http::{Request, Response};
use hyper::{Method, StatusCode};
use serde::{Deserialize, Serialize};

const JSON: &str = "application/json";

#[derive(Debug, Clone, Serialize)]
struct User {
    id: u64,
    name: String,
}

#[derive(Deserialize)]
struct NewUser {
    name: String,
}

#[derive(Default)]
pub struct Users {
    users: RwLock<Vec<User>>,
}

impl Users {
    fn list(&self, _req: &Request) -> Result<Response, HandlerError> {
        let users = self
            .users
            .read()
            .map_err(|_| HandlerError::new("user directory lock poisoned"))?;
        json_response(StatusCode::OK, &*users)
    }

    fn create(&self, req: &Request) -> Result<Response, HandlerError> {
        let new_user: NewUser = match serde_json::from_slice(req.body()) {
            Ok(user) => user,
            Err(e) => {
                return json_response(
                    StatusCode::BAD_REQUEST,
                    &serde_json::json!({ "error": e.to_string() }),
                )
            }
        };

        let mut users = self
            .users
            .write()
            .map_err(|_| HandlerError::new("user directory lock poisoned"))?;
        let user = User {
            id: users.last().map_or(1, |u| u.id + 1),
            name: new_user.name,
        };
        users.push(user.clone());
        drop(users);

        json_response(StatusCode::CREATED, &user)
    }
}

fn json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    value: &T,
) -> Result<Response, HandlerError> {
    let body = serde_json::to_vec(value).map_err(|e| HandlerError::new(e.to_string()))?;
    Ok(Response::builder()
        .status(status)
        .content_type(JSON)
        .body(body)
        .build())
}

pub fn controller() -> Controller<Users> {
    Controller::new(module_path!())
        .default_constructor()
        .route(Method::GET, "/users", Users::list)
        .route(Method::POST, "/users", Users::create)
}
