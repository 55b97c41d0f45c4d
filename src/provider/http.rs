use std::collections::HashMap;
use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use serde::Deserialize;

use crate::{configuration::Config, error::Error, types::PushHeader};

#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
    pub http: Client,
}

#[derive(Debug, Deserialize)]
pub struct ExchangeRates {
    pub base: String,
    pub rates: HashMap<String, f64>,
}

impl HTTP {
    pub fn new(config: Config) -> Result<HTTP, Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(HTTP { config, http })
    }

    pub async fn post_push(
        &self,
        url: &str,
        signature: String,
        push_header: PushHeader,
        data: Vec<u8>,
    ) -> Result<u16, Error> {
        let mut header_map = HeaderMap::new();
        let bearer = format!("WebPush {}", &signature);

        header_map.insert(
            HeaderName::from_static("user-agent"),
            HeaderValue::from_static("subtracker"),
        );
        header_map.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(bearer.as_str())?,
        );
        header_map.insert(
            HeaderName::from_static("content-encoding"),
            HeaderValue::from_static("aes128gcm"),
        );
        header_map.insert(
            HeaderName::from_static("ttl"),
            HeaderValue::from_str(&push_header.ttl.to_string())?,
        );
        header_map.insert(
            HeaderName::from_static("urgency"),
            HeaderValue::from_str(&push_header.urgency.to_string())?,
        );

        let vapid_pub_b64 =
            String::from_utf8(self.config.vapid_public_key.clone())
                .map_err(|_| {
                    Error::ConfigurationError(String::from(
                        "invalid VAPID public key",
                    ))
                })?;
        let crypto_key_value = format!("p256ecdsa={}", vapid_pub_b64.trim());
        header_map.insert(
            HeaderName::from_static("crypto-key"),
            HeaderValue::from_str(&crypto_key_value)?,
        );

        let response = self
            .http
            .post(url)
            .headers(header_map)
            .body(data)
            .send()
            .await?;
        let status = response.status().as_u16();

        Ok(status)
    }

    pub async fn get_exchange_rates(&self) -> Result<ExchangeRates, Error> {
        let url = format!(
            "https://openexchangerates.org/api/latest.json?app_id={}",
            self.config.rates_app_id
        );
        let json = self
            .http
            .get(url)
            .send()
            .await?
            .json::<ExchangeRates>()
            .await?;

        Ok(json)
    }
}
