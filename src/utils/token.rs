//! API token generation.

use base64::Engine as _;

/// Random bytes per token; encodes to 48 base64 characters.
const TOKEN_LENGTH_BYTES: usize = 36;

/// Returns a fresh random API token, URL-safe base64 without padding.
///
/// # Errors
///
/// Fails if the system random number generator is unavailable.
pub fn generate_token() -> Result<String, getrandom::Error> {
    let mut buffer = [0u8; TOKEN_LENGTH_BYTES];

    getrandom::fill(&mut buffer)?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}
