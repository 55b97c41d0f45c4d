use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Url;
use tracing::warn;

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::PushSubscription,
    types::{NotificationPayload, PushHeader, Urgency, VapidClaims},
};

const PUSH_TTL: i64 = 12 * 60 * 60;

/// One delivery attempt to a single endpoint. Returns the push service's
/// status code; endpoints answering with a configured "gone" status are
/// removed before returning.
pub async fn send_web_push(
    state: &AppState<State>,
    subscription: &PushSubscription,
    payload: &NotificationPayload,
) -> Result<u16, Error> {
    let url = Url::parse(&subscription.endpoint)?;
    let push_header = PushHeader {
        ttl: PUSH_TTL,
        urgency: Urgency::Normal,
    };
    let exp = Utc::now().timestamp() + push_header.ttl;

    let scheme = url.scheme();
    let host = if let Some(h) = url.host() {
        h.to_string()
    } else {
        return Err(Error::InvalidOption(String::from("endpoint host")));
    };

    let aud = format!("{}://{}", scheme, host);
    let sub = format!("mailto:{}", &state.config.mail_to);

    let key = EncodingKey::from_ec_pem(&state.config.vapid_private_key)?;
    let claims = VapidClaims { aud, sub, exp };
    let token = encode(&Header::new(Algorithm::ES256), &claims, &key)?;

    let p256dh = BASE64_URL.decode(&subscription.p256dh)?;
    let auth = BASE64_URL.decode(&subscription.auth)?;

    let body = serde_json::to_vec(payload)?;
    let data = ece::encrypt(&p256dh, &auth, &body)?;

    let status = state
        .http
        .post_push(&subscription.endpoint, token, push_header, data)
        .await?;

    if state.config.status_codes_to_delete.contains(&status) {
        warn!(
            "Removing stale push endpoint for user {} (status {})",
            subscription.user_id, status
        );
        state
            .database
            .push_subscription
            .delete_by_endpoint(&subscription.endpoint)
            .await?;
    }

    Ok(status)
}
