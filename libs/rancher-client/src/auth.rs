use base64::{Engine as _, engine::general_purpose};
use http::HeaderValue;
use http::header::InvalidHeaderValue;
use zeroize::Zeroizing;

use crate::config::SecretKey;

/// Build the `Authorization: Basic base64(access_key:secret_key)` value.
///
/// The returned header is marked sensitive so it is omitted from `Debug`
/// output. Intermediate plaintext buffers are zeroed on drop.
pub(crate) fn basic_auth_header(
    access_key: &str,
    secret_key: &SecretKey,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let credentials = Zeroizing::new(format!("{access_key}:{}", secret_key.expose()));
    let encoded = Zeroizing::new(general_purpose::STANDARD.encode(credentials.as_bytes()));
    let header_value = Zeroizing::new(format!("Basic {}", &*encoded));

    let mut value = HeaderValue::from_str(&header_value)?;
    value.set_sensitive(true);
    Ok(value)
}
