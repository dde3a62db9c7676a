use axum::Json;

use crate::issuer::IssuerId;
use crate::models::WhoAmIResponse;

/// Report the issuer ID the middleware attached to this request.
///
/// # Response Body
///
/// ```json
/// {
///   "issuer_id": "53a636be-fcd6-5304-9a0e-ae5fbc440165",
///   "attributed": true
/// }
/// ```
///
/// Not `#[instrument]`ed: the identifier must stay out of logs.
pub async fn whoami(issuer_id: IssuerId) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse::from(issuer_id))
}
