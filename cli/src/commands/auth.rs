//! Login and logout

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{ApiClient, CliError};
use crate::config::Config;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub username: String,
    pub role: String,
    pub area_id: Option<i64>,
    pub expires_at: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub session: SessionView,
}

pub async fn login(
    client: &ApiClient,
    mut config: Config,
    profile: Option<&str>,
    username: &str,
    password: &str,
) -> Result<(), CliError> {
    let response: LoginResponse = client
        .post("/auth/login", &json!({ "username": username, "password": password }))
        .await?;
    config.token = Some(response.token);
    config.username = Some(response.session.username.clone());
    let path = config.save(profile)?;

    let scope = match response.session.area_id {
        Some(area_id) => format!("area {area_id}"),
        None => "all areas".to_string(),
    };
    println!("Signed in as {} ({}, {scope})", response.session.username, response.session.role);
    println!("Session saved to {} until {}", path.display(), response.session.expires_at);
    Ok(())
}

/// Clear the saved token even when the server no longer knows the session.
pub async fn logout(client: &ApiClient, mut config: Config, profile: Option<&str>) -> Result<(), CliError> {
    if !client.is_signed_in() {
        return Err(CliError::NotSignedIn);
    }
    let cleared = match client.post::<bool, _>("/auth/logout", &json!({})).await {
        Ok(cleared) => cleared,
        Err(CliError::Api { code, .. }) if code == "unauthorized" => false,
        Err(e) => return Err(e),
    };
    config.token = None;
    config.save(profile)?;
    if cleared {
        println!("Signed out");
    } else {
        println!("Session had already ended; saved token removed");
    }
    Ok(())
}
