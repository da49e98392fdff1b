use super::credentials::ServiceAccountKey;
use crate::client::Client;
use crate::error::{Result, UploadError};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Claims of the service account assertion exchanged for an access token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub fn sign_assertion(key: &ServiceAccountKey, scope: &str, issued_at: i64) -> Result<String> {
    let claims = Claims {
        iss: key.client_email.clone(),
        scope: scope.to_string(),
        aud: key.token_uri.clone(),
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    };

    let encoding_key =
        EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(UploadError::Signing)?;
    let token =
        encode(&Header::new(Algorithm::RS256), &claims, &encoding_key).map_err(UploadError::Signing)?;
    Ok(token)
}

pub async fn access_token(client: &Client, key: &ServiceAccountKey, scope: &str) -> Result<String> {
    let assertion = sign_assertion(key, scope, Utc::now().timestamp())?;

    let body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", JWT_BEARER_GRANT)
        .append_pair("assertion", &assertion)
        .finish();
    let headers = BTreeMap::from([(
        "content-type".to_string(),
        "application/x-www-form-urlencoded".to_string(),
    )]);

    let response = client
        .post(&key.token_uri, &headers, body.into_bytes())
        .await
        .map_err(|e| UploadError::Token(e.to_string()))?;

    parse_token(&response.content)
}

fn parse_token(body: &str) -> Result<String> {
    let token: TokenResponse =
        serde_json::from_str(body).map_err(|e| UploadError::Token(e.to_string()))?;
    Ok(token.access_token)
}
