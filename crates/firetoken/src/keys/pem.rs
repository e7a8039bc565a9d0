//! Conversion of published key material into DER for signature checks
//!
//! ID token keys are published as X.509 certificates; other deployments
//! publish bare public keys. Both arrive PEM-armored.

use crate::error::{Error, Result};
use x509_parser::prelude::{FromDer, X509Certificate};

/// Decode PEM key material into DER accepted by the RSA verifier
///
/// Certificates yield their SubjectPublicKeyInfo, `PUBLIC KEY` blocks are
/// SubjectPublicKeyInfo already, and `RSA PUBLIC KEY` blocks are PKCS#1.
pub(crate) fn public_key_der(key: &str) -> Result<Vec<u8>> {
    let block = ::pem::parse(key.trim().as_bytes())
        .map_err(|e| Error::KeyFormatInvalid(format!("failed to parse PEM: {e}")))?;

    match block.tag() {
        "CERTIFICATE" => {
            let (_, certificate) = X509Certificate::from_der(block.contents())
                .map_err(|e| Error::KeyFormatInvalid(format!("failed to parse certificate: {e}")))?;
            Ok(certificate.public_key().raw.to_vec())
        }
        "PUBLIC KEY" | "RSA PUBLIC KEY" => Ok(block.contents().to_vec()),
        other => Err(Error::KeyFormatInvalid(format!(
            "unsupported PEM block '{other}'"
        ))),
    }
}
