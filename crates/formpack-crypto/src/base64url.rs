use base64ct::{Base64UrlUnpadded, Encoding};

/// Base64url encode bytes without padding.
pub fn base64url_encode(data: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(data)
}

/// Base64url decode an unpadded string to bytes.
pub fn base64url_decode(s: &str) -> Result<Vec<u8>, base64ct::Error> {
    Base64UrlUnpadded::decode_vec(s)
}

/// Decode a field that must hold exactly `N` bytes.
pub fn base64url_decode_array<const N: usize>(s: &str) -> Option<[u8; N]> {
    base64url_decode(s).ok()?.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_padding() {
        assert_eq!(base64url_encode(b"ab"), "YWI");
    }

    #[test]
    fn url_safe_alphabet() {
        let encoded = base64url_encode(&[0xfb, 0xff, 0xfe]);
        assert_eq!(encoded, "-__-");
        assert_eq!(base64url_decode(&encoded).unwrap(), vec![0xfb, 0xff, 0xfe]);
    }

    #[test]
    fn rejects_standard_alphabet_and_padding() {
        assert!(base64url_decode("+//+").is_err());
        assert!(base64url_decode("YWI=").is_err());
    }

    #[test]
    fn fixed_length_decode() {
        let encoded = base64url_encode(&[7u8; 12]);
        assert_eq!(base64url_decode_array::<12>(&encoded), Some([7u8; 12]));
        assert_eq!(base64url_decode_array::<16>(&encoded), None);
        assert_eq!(base64url_decode_array::<12>("not base64url!"), None);
    }
}
