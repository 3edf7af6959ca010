use serde::{Deserialize, Serialize};

/// Registration payload. Fields are optional so that missing keys reach
/// the validator and come back as collected messages instead of a serde
/// rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub password: Option<String>,
}

/// Profile of the authenticated user returned by GET /users.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}
