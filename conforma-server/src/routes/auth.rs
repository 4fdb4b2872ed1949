//! Session issuance.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use conforma_auth::verify_password;
use conforma_core::errors::Error;
use conforma_core::records::User;
use conforma_store::{Filter, Store};

use crate::error::{from_json_rejection, ApiError};
use crate::routes::from_doc;
use crate::state::{collections, AppState};
use crate::validate::check_valid;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// POST /auth/login
///
/// Unknown email and wrong password fail identically.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = body.map_err(from_json_rejection)?;
    check_valid(&req)?;

    let rows = state
        .store
        .find(
            collections::USERS,
            &Filter::new().eq("email", req.email.to_lowercase()),
        )
        .await?;

    let user: User = match rows.into_iter().next() {
        Some(doc) => from_doc(doc)?,
        None => return Err(Error::not_authenticated("Invalid login").into()),
    };

    verify_password(&req.password, &user.password_hash)?;

    let access_token = state.tokens.sign(user.id)?;

    Ok(Json(json!({
        "data": {
            "accessToken": access_token,
            "user": user.sanitized(),
        }
    })))
}
