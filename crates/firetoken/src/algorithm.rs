//! Signer algorithms for token signature verification
use crate::error::{Error, Result};
use crate::limits::MAX_ALG_LENGTH;

use aws_lc_rs::signature::{self, UnparsedPublicKey};

/// Signer algorithm used to verify token signatures
///
/// Tokens issued by the identity platform are signed with RS256, which is
/// the default for every `Verifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlgorithmType {
    #[default]
    RS256,
    RS384,
    RS512,
}

impl AlgorithmType {
    pub(crate) fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_ALG_LENGTH {
            return Err(Error::FormatInvalidJson(format!(
                "Algorithm string too long: {} bytes (maximum: {} bytes)",
                s.len(),
                MAX_ALG_LENGTH
            )));
        }

        match s {
            "RS256" => Ok(AlgorithmType::RS256),
            "RS384" => Ok(AlgorithmType::RS384),
            "RS512" => Ok(AlgorithmType::RS512),
            _ => Err(Error::FormatInvalidJson(format!(
                "Algorithm '{s}' is not supported"
            ))),
        }
    }

    /// Convert to string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlgorithmType::RS256 => "RS256",
            AlgorithmType::RS384 => "RS384",
            AlgorithmType::RS512 => "RS512",
        }
    }

    fn verification_algorithm(&self) -> &'static dyn signature::VerificationAlgorithm {
        match self {
            AlgorithmType::RS256 => &signature::RSA_PKCS1_2048_8192_SHA256,
            AlgorithmType::RS384 => &signature::RSA_PKCS1_2048_8192_SHA384,
            AlgorithmType::RS512 => &signature::RSA_PKCS1_2048_8192_SHA512,
        }
    }

    /// Check a signature over `signing_input`
    ///
    /// # Arguments
    /// * `signing_input` - The data that was signed (header.payload)
    /// * `signature` - The decoded signature bytes
    /// * `key_der` - DER-encoded SubjectPublicKeyInfo or PKCS#1 RSAPublicKey
    pub(crate) fn verify_signature(
        &self,
        signing_input: &str,
        signature: &[u8],
        key_der: &[u8],
    ) -> bool {
        UnparsedPublicKey::new(self.verification_algorithm(), key_der)
            .verify(signing_input.as_bytes(), signature)
            .is_ok()
    }
}

impl std::fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for AlgorithmType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_lc_rs::rand::SystemRandom;
    use aws_lc_rs::signature::{KeyPair, RSA_PKCS1_SHA256, RSA_PKCS1_SHA512, RsaKeyPair};
    use rsa::{RsaPrivateKey, pkcs8::EncodePrivateKey};

    fn generate_keypair() -> RsaKeyPair {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate key");
        let pkcs8_doc = private_key
            .to_pkcs8_der()
            .expect("Failed to serialize to PKCS#8");
        RsaKeyPair::from_pkcs8(pkcs8_doc.as_bytes()).unwrap()
    }

    fn sign(
        keypair: &RsaKeyPair,
        encoding: &'static dyn signature::RsaEncoding,
        input: &str,
    ) -> Vec<u8> {
        let rng = SystemRandom::new();
        let mut signature_bytes = vec![0u8; keypair.public_modulus_len()];
        keypair
            .sign(encoding, &rng, input.as_bytes(), &mut signature_bytes)
            .unwrap();
        signature_bytes
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!(
            AlgorithmType::from_str("RS256").unwrap(),
            AlgorithmType::RS256
        );
        assert_eq!(
            AlgorithmType::from_str("RS384").unwrap(),
            AlgorithmType::RS384
        );
        assert_eq!(
            AlgorithmType::from_str("RS512").unwrap(),
            AlgorithmType::RS512
        );
        assert!(AlgorithmType::from_str("none").is_err());
        assert!(AlgorithmType::from_str("HS256").is_err());
        assert!(AlgorithmType::from_str(&"R".repeat(MAX_ALG_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_algorithm_display_and_default() {
        assert_eq!(format!("{}", AlgorithmType::RS256), "RS256");
        assert_eq!(AlgorithmType::RS512.as_ref(), "RS512");
        assert_eq!(AlgorithmType::default(), AlgorithmType::RS256);
    }

    #[test]
    fn test_verify_signature_rs256() {
        let keypair = generate_keypair();
        let public_key_der = keypair.public_key().as_ref().to_vec();
        let signature = sign(&keypair, &RSA_PKCS1_SHA256, "header.payload");

        assert!(AlgorithmType::RS256.verify_signature("header.payload", &signature, &public_key_der));
    }

    #[test]
    fn test_verify_signature_wrong_input() {
        let keypair = generate_keypair();
        let public_key_der = keypair.public_key().as_ref().to_vec();
        let signature = sign(&keypair, &RSA_PKCS1_SHA256, "header.payload");

        assert!(!AlgorithmType::RS256.verify_signature("header.other", &signature, &public_key_der));
    }

    #[test]
    fn test_verify_signature_algorithm_mismatch() {
        let keypair = generate_keypair();
        let public_key_der = keypair.public_key().as_ref().to_vec();
        let signature = sign(&keypair, &RSA_PKCS1_SHA512, "header.payload");

        assert!(AlgorithmType::RS512.verify_signature("header.payload", &signature, &public_key_der));
        assert!(!AlgorithmType::RS256.verify_signature("header.payload", &signature, &public_key_der));
    }

    #[test]
    fn test_verify_signature_garbage_key() {
        assert!(!AlgorithmType::RS256.verify_signature("header.payload", &[0u8; 256], b"not a key"));
    }
}
