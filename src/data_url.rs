use percent_encoding::percent_decode_str;
use url::Url;

use crate::Error;

/// Decode the payload of a `data:` URL, base64 or percent-encoded.
pub(crate) fn decode(url: &Url) -> Result<Vec<u8>, Error> {
    let (meta, payload) = url
        .as_str()
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or(Error::DataUrl)?;

    if meta.to_ascii_lowercase().ends_with(";base64") {
        let payload = percent_decode_str(payload)
            .filter(|b| !b.is_ascii_whitespace())
            .collect::<Vec<u8>>();
        data_encoding::BASE64
            .decode(&payload)
            .or_else(|_| data_encoding::BASE64_NOPAD.decode(&payload))
            .map_err(|_| Error::DataUrl)
    } else {
        Ok(percent_decode_str(payload).collect())
    }
}
