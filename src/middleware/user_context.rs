use std::future::{ready, Ready};

use actix_web::{dev::Payload, error::ErrorUnauthorized, Error, FromRequest, HttpRequest};

/// Header the identity provider's gateway sets once it has authenticated
/// the caller.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Caller identity, passed explicitly to the handlers that need it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: String,
}

impl FromRequest for UserContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user_id = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        match user_id {
            Some(user_id) => ready(Ok(UserContext {
                user_id: user_id.to_string(),
            })),
            None => ready(Err(ErrorUnauthorized("User not authenticated"))),
        }
    }
}
