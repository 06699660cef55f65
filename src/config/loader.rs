//! Loading the controller description from a file or URL.
//!
//! Sources starting with `http://` or `https://` are fetched with a single
//! GET request; everything else is read from the local filesystem.

use tracing::{debug, info};

use super::ControllerSpec;
use crate::core::{CtrlgenError, Result};

/// Whether a source string refers to a remote description.
#[must_use]
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Load and parse a controller description.
///
/// # Errors
///
/// - [`CtrlgenError::NetworkError`] when a remote fetch fails or returns a non-2xx status
/// - [`CtrlgenError::FileSystemError`] when a local file cannot be read
/// - [`CtrlgenError::ConfigParseError`] when the YAML is invalid
pub async fn load(source: &str) -> Result<ControllerSpec> {
    let content = if is_remote(source) {
        fetch(source).await?
    } else {
        info!(file = source, "read config file");
        tokio::fs::read_to_string(source).await.map_err(|e| {
            debug!("failed to read {}: {}", source, e);
            CtrlgenError::FileSystemError {
                operation: format!("read ({e})"),
                path: source.to_string(),
            }
        })?
    };

    parse(&content, source)
}

/// Parse a controller description from YAML text.
///
/// `source_name` is only used in error messages.
pub fn parse(content: &str, source_name: &str) -> Result<ControllerSpec> {
    // An empty document decodes to null; treat it as an all-defaults description
    if content.trim().is_empty() {
        return Ok(ControllerSpec::default());
    }
    serde_yaml::from_str(content).map_err(|e| CtrlgenError::ConfigParseError {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    })
}

async fn fetch(url: &str) -> Result<String> {
    info!(url, "fetching config file");

    let client = reqwest::Client::new();
    let response = client.get(url).send().await.map_err(|e| CtrlgenError::NetworkError {
        operation: format!("GET {url}"),
        reason: Some(e.to_string()),
    })?;

    if !response.status().is_success() {
        return Err(CtrlgenError::NetworkError {
            operation: format!("GET {url}"),
            reason: Some(format!("HTTP {}", response.status())),
        });
    }

    response.text().await.map_err(|e| CtrlgenError::NetworkError {
        operation: format!("read body of {url}"),
        reason: Some(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
base: ./out
name: PodWatcher
retryOnError: 5
namespace: default
go:
  module: example.com/podwatcher
  k8sAPIVersion: 0.29.0
resources:
  - kind: Pod
  - kind: Widget
    group: example.com
    package: example.com/podwatcher/api/v1
    customHandlers: [Add, Delete]
    genDeepCopy: true
"#;

    #[test]
    fn test_parse_full_description() {
        let spec = parse(SAMPLE, "sample.yaml").unwrap();
        assert_eq!(spec.base, "./out");
        assert_eq!(spec.name, "PodWatcher");
        assert_eq!(spec.retry_on_error, 5);
        assert_eq!(spec.namespace, "default");
        assert_eq!(spec.go.module, "example.com/podwatcher");
        assert_eq!(spec.go.k8s_api_version, "0.29.0");
        // not given, serde default
        assert_eq!(spec.go.version, crate::constants::DEFAULT_GO_VERSION);
        assert_eq!(spec.resources.len(), 2);
        assert_eq!(spec.resources[1].custom_handlers, vec!["Add", "Delete"]);
        assert!(spec.resources[1].gen_deep_copy);
    }

    #[test]
    fn test_parse_applies_serde_defaults() {
        let spec = parse("resources:\n  - kind: Pod\n", "inline").unwrap();
        assert_eq!(spec.base, ".");
        assert_eq!(spec.name, "Controller");
        assert_eq!(spec.retry_on_error, 3);
        assert!(spec.namespace.is_empty());
    }

    #[test]
    fn test_parse_empty_document() {
        let spec = parse("   \n", "empty.yaml").unwrap();
        assert!(spec.resources.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_yaml() {
        let err = parse("resources: [kind: Pod", "broken.yaml").unwrap_err();
        assert!(matches!(err, CtrlgenError::ConfigParseError { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/c.yaml"));
        assert!(is_remote("http://localhost:8080/c.yaml"));
        assert!(!is_remote("./c.yaml"));
        assert!(!is_remote("httpsfile.yaml"));
    }

    #[tokio::test]
    async fn test_load_local_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("controller.yaml");
        tokio::fs::write(&path, SAMPLE).await.unwrap();

        let spec = load(path.to_str().unwrap()).await.unwrap();
        assert_eq!(spec.name, "PodWatcher");
    }

    /// Serve a single HTTP response on a local port and return its URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/yaml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        format!("http://{addr}/controller.yaml")
    }

    #[tokio::test]
    async fn test_load_remote_description() {
        let url = serve_once("200 OK", "name: Foo\nresources:\n  - kind: Pod\n").await;

        let spec = load(&url).await.unwrap();
        assert_eq!(spec.name, "Foo");
        assert_eq!(spec.resources.len(), 1);
    }

    #[tokio::test]
    async fn test_load_remote_non_success_status() {
        let url = serve_once("404 Not Found", "").await;

        let err = load(&url).await.unwrap_err();
        assert!(matches!(
            err,
            CtrlgenError::NetworkError { ref reason, .. }
                if reason.as_deref().is_some_and(|r| r.contains("404"))
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load("/definitely/not/here/controller.yaml").await.unwrap_err();
        assert!(matches!(err, CtrlgenError::FileSystemError { .. }));
    }
}
