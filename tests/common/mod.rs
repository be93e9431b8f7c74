//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use https_gate::config::TlsConfig;
use https_gate::gate::GateConfig;
use https_gate::{GateServerConfig, HttpServer, Shutdown};
use tokio::net::TcpListener;

/// Start a gate server on `addr` with its gate built from `config`.
#[allow(dead_code)]
pub async fn start_gate(addr: SocketAddr, config: GateServerConfig) -> Shutdown {
    let server = HttpServer::new(config).expect("valid gate settings");
    spawn(addr, server).await
}

/// Start a gate server on `addr` with an explicit gate configuration.
#[allow(dead_code)]
pub async fn start_gate_with(addr: SocketAddr, gate: GateConfig) -> Shutdown {
    let server = HttpServer::with_gate(GateServerConfig::default(), gate);
    spawn(addr, server).await
}

/// Start a gate server with both a plain listener on `addr` and a TLS
/// listener on `tls_addr`, serving a fresh self-signed `localhost` certificate.
///
/// Returns the certificate PEM so a client can trust it.
#[allow(dead_code)]
pub async fn start_gate_tls(
    addr: SocketAddr,
    tls_addr: SocketAddr,
    gate: GateConfig,
) -> (Shutdown, String) {
    let (tls, cert_pem) = self_signed(tls_addr);
    let mut config = GateServerConfig::default();
    config.listener.tls = Some(tls);

    let shutdown = spawn(addr, HttpServer::with_gate(config, gate)).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    (shutdown, cert_pem)
}

fn self_signed(tls_addr: SocketAddr) -> (TlsConfig, String) {
    let rcgen::CertifiedKey { cert, signing_key } =
        rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_pem = cert.pem();

    let dir = temp_dir(&format!("tls-{}", tls_addr.port()));
    let cert_path = dir.join("cert.pem");
    let key_path = dir.join("key.pem");
    std::fs::write(&cert_path, &cert_pem).unwrap();
    std::fs::write(&key_path, signing_key.serialize_pem()).unwrap();

    let tls = TlsConfig {
        bind_address: tls_addr.to_string(),
        cert_path: cert_path.to_string_lossy().into_owned(),
        key_path: key_path.to_string_lossy().into_owned(),
    };
    (tls, cert_pem)
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("https-gate-it-{}-{}", std::process::id(), name));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

async fn spawn(addr: SocketAddr, server: HttpServer) -> Shutdown {
    let listener = TcpListener::bind(addr).await.unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.clone();

    tokio::spawn(async move {
        let _ = server.run(listener, &server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Non-redirecting client that trusts `cert_pem` and resolves `localhost`
/// to `tls_addr`.
#[allow(dead_code)]
pub fn tls_client(cert_pem: &str, tls_addr: SocketAddr) -> reqwest::Client {
    let cert = reqwest::Certificate::from_pem(cert_pem.as_bytes()).unwrap();
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .add_root_certificate(cert)
        .resolve("localhost", tls_addr)
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
