//! Login and logout against the auth endpoint

use crate::http::{ApiClient, ApiError};
use crate::models::TokenResponse;

/// Authenticate with the backend and persist the returned bearer token.
///
/// The login endpoint takes form-encoded credentials; a 2xx response
/// without a token is still a failure.
pub async fn login(client: &ApiClient, username: &str, password: &str) -> Result<String, ApiError> {
    let form = [("username", username), ("password", password)];

    let response: TokenResponse = client.post_form("/api/v1/auth/login", &form).await?;

    if response.access_token.is_empty() {
        return Err(ApiError::Server(
            "Login successful but no token was provided.".to_string(),
        ));
    }

    client.session().save(&response.access_token);
    tracing::info!("Logged in ({} token)", response.token_type);

    Ok(response.access_token)
}

/// Drop the stored session token.
pub fn logout(client: &ApiClient) {
    client.session().clear();
    tracing::info!("Session token cleared");
}
