use crate::foundation::RegsyncError;

pub fn strip_hex_prefix(s: &str) -> &str {
    let trimmed = s.trim();
    trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")).unwrap_or(trimmed)
}

pub fn decode_hex(s: &str) -> Result<Vec<u8>, RegsyncError> {
    hex::decode(strip_hex_prefix(s)).map_err(|e| e.into())
}

pub fn parse_hex_fixed<const N: usize>(s: &str) -> Result<[u8; N], RegsyncError> {
    let bytes = decode_hex(s)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| RegsyncError::EncodingError(format!("expected {N} bytes, got {len}")))
}
