//! Nonce generation.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand_core::{OsRng, RngCore};
use readproof_canonical::Nonce;

/// Random bytes per generated nonce.
pub const NONCE_BYTES: usize = 16;

/// 16 bytes from the OS random source, base64url without padding.
pub fn generate_nonce() -> Nonce {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    Nonce::new(URL_SAFE_NO_PAD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ten_thousand_nonces_do_not_collide() {
        let nonces: HashSet<_> = (0..10_000).map(|_| generate_nonce()).collect();
        assert_eq!(nonces.len(), 10_000);
    }

    #[test]
    fn generated_nonce_passes_validation() {
        let nonce = generate_nonce();
        assert_eq!(nonce.as_str().len(), 22);
        assert!(Nonce::parse(nonce.as_str()).is_ok());
    }
}
