// src/publish/oauth.rs
//! OAuth 1.0a request signing (HMAC-SHA1) for user-context platform calls.

use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::distr::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use crate::config::TwitterCredentials;
use crate::error::PlatformError;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 percent-encoding (unreserved characters pass through).
pub fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// `METHOD&url&params`, with params percent-encoded, sorted, then joined.
pub fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();
    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    )
}

pub fn sign(base: &str, consumer_secret: &str, token_secret: &str) -> Result<String, PlatformError> {
    let key = format!("{}&{}", percent_encode(consumer_secret), percent_encode(token_secret));
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| PlatformError::Malformed(format!("oauth signing key: {e}")))?;
    mac.update(base.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

#[derive(Clone)]
pub struct OAuthSigner {
    consumer_key: String,
    consumer_secret: String,
    token: String,
    token_secret: String,
}

impl OAuthSigner {
    pub fn new(creds: &TwitterCredentials) -> Self {
        Self {
            consumer_key: creds.api_key.clone(),
            consumer_secret: creds.api_secret.clone(),
            token: creds.access_token.clone(),
            token_secret: creds.access_secret.clone(),
        }
    }

    /// `Authorization` header value for a request. `params` are the query and
    /// form parameters; JSON and multipart bodies are not signed.
    pub fn authorization(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, PlatformError> {
        let nonce: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_with(method, url, params, &nonce, &timestamp)
    }

    pub fn authorization_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String, PlatformError> {
        let mut oauth: Vec<(String, String)> = vec![
            ("oauth_consumer_key".into(), self.consumer_key.clone()),
            ("oauth_nonce".into(), nonce.to_string()),
            ("oauth_signature_method".into(), "HMAC-SHA1".into()),
            ("oauth_timestamp".into(), timestamp.to_string()),
            ("oauth_token".into(), self.token.clone()),
            ("oauth_version".into(), "1.0".into()),
        ];

        let mut all = oauth.clone();
        all.extend(params.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        let base = signature_base_string(method, url, &all);
        let signature = sign(&base, &self.consumer_secret, &self.token_secret)?;
        oauth.push(("oauth_signature".into(), signature));
        oauth.sort();

        let fields = oauth
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {fields}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from the platform's "creating a signature" guide.
    fn doc_signer() -> OAuthSigner {
        OAuthSigner::new(&TwitterCredentials {
            api_key: "xvz1evFS4wEEPTGEFPHBog".into(),
            api_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".into(),
            access_token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".into(),
            access_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".into(),
        })
    }

    const URL: &str = "https://api.twitter.com/1.1/statuses/update.json";
    const STATUS: &str = "Hello Ladies + Gentlemen, a signed OAuth request!";
    const NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";

    #[test]
    fn percent_encoding_is_rfc3986() {
        assert_eq!(percent_encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(percent_encode("An encoded string!"), "An%20encoded%20string%21");
        assert_eq!(percent_encode("a-b.c_d~e"), "a-b.c_d~e");
    }

    #[test]
    fn matches_documented_signature() {
        let header = doc_signer().authorization_with(
            "POST",
            URL,
            &[("include_entities", "true"), ("status", STATUS)],
            NONCE,
            "1318622958",
        )
        .unwrap();
        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
        assert!(header.contains("oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(!header.contains("status="));
    }

    #[test]
    fn base_string_sorts_and_double_encodes() {
        let base = signature_base_string(
            "post",
            "https://x.example/a",
            &[("b".into(), "2 3".into()), ("a".into(), "1".into())],
        );
        assert_eq!(base, "POST&https%3A%2F%2Fx.example%2Fa&a%3D1%26b%3D2%25203");
    }

    #[test]
    fn fresh_nonce_each_call() {
        let s = doc_signer();
        assert_ne!(
            s.authorization("POST", URL, &[]).unwrap(),
            s.authorization("POST", URL, &[]).unwrap()
        );
    }
}
