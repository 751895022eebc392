use std::time::Duration;

use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::prelude::*;

/// Build a default client, optionally authenticating with the bearer token.
pub fn try_new(access_token: Option<&str>) -> Result<Client> {
    let mut headers = HeaderMap::new();
    if let Some(access_token) = access_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .context("the access token is not a valid header value")?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(Client::builder().timeout(Duration::from_secs(10)).default_headers(headers).build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_ok() -> Result {
        let _ = try_new(None)?;
        let _ = try_new(Some("eyJhbGciOiJIUzI1NiJ9.e30.signature"))?;
        Ok(())
    }

    #[test]
    fn test_try_new_invalid_token() {
        assert!(try_new(Some("line\nbreak")).is_err());
    }
}
