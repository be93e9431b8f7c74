//! TLS configuration and certificate loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

/// Error type for TLS setup.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("Certificate file not found: {0}")]
    CertNotFound(String),

    #[error("Private key file not found: {0}")]
    KeyNotFound(String),

    #[error("No certificates in {0}")]
    NoCertificates(String),

    #[error("No private key in {0}")]
    NoPrivateKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Check that the PEM files contain what rustls needs.
///
/// Gives a readable startup error instead of a handshake-time failure.
pub fn check_pem_files(cert_path: &Path, key_path: &Path) -> Result<(), TlsError> {
    if !cert_path.exists() {
        return Err(TlsError::CertNotFound(cert_path.display().to_string()));
    }
    if !key_path.exists() {
        return Err(TlsError::KeyNotFound(key_path.display().to_string()));
    }

    let mut certs = BufReader::new(File::open(cert_path)?);
    let count = rustls_pemfile::certs(&mut certs)
        .collect::<Result<Vec<_>, _>>()?
        .len();
    if count == 0 {
        return Err(TlsError::NoCertificates(cert_path.display().to_string()));
    }

    let mut key = BufReader::new(File::open(key_path)?);
    if rustls_pemfile::private_key(&mut key)?.is_none() {
        return Err(TlsError::NoPrivateKey(key_path.display().to_string()));
    }

    tracing::debug!(
        cert = %cert_path.display(),
        certificates = count,
        "TLS material checked"
    );
    Ok(())
}

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TlsError> {
    check_pem_files(cert_path, key_path)?;
    Ok(RustlsConfig::from_pem_file(cert_path, key_path).await?)
}
