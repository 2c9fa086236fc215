//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};

use reqwest::Error as HttpError;
use wxkit_domain::WxError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub WxError);

impl From<InfraError> for WxError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<WxError> for InfraError {
    fn from(value: WxError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoWxError {
    fn into_wx(self) -> WxError;
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → WxError */
/* -------------------------------------------------------------------------- */

impl IntoWxError for IoError {
    fn into_wx(self) -> WxError {
        match self.kind() {
            ErrorKind::NotFound => WxError::Storage(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => WxError::Storage(format!("permission denied: {self}")),
            ErrorKind::InvalidData | ErrorKind::UnexpectedEof => {
                WxError::Serialization(format!("unreadable data: {self}"))
            }
            _ => WxError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_wx())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → WxError */
/* -------------------------------------------------------------------------- */

impl IntoWxError for HttpError {
    fn into_wx(self) -> WxError {
        if self.is_timeout() {
            return WxError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return WxError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return WxError::Serialization(format!("invalid HTTP response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                429 => WxError::Network(message),
                400..=499 => WxError::InvalidInput(message),
                _ => WxError::Network(message),
            };
        }

        WxError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_wx())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn missing_file_maps_to_storage_error() {
        let err = IoError::new(ErrorKind::NotFound, "gone");
        let mapped: WxError = InfraError::from(err).into();
        match mapped {
            WxError::Storage(msg) => assert!(msg.contains("not found")),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn truncated_file_maps_to_serialization_error() {
        let err = IoError::new(ErrorKind::UnexpectedEof, "short read");
        let mapped: WxError = InfraError::from(err).into();
        assert!(matches!(mapped, WxError::Serialization(_)));
    }

    #[tokio::test]
    async fn http_status_404_maps_to_invalid_input() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::NOT_FOUND))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: WxError = InfraError::from(error).into();
        match mapped {
            WxError::InvalidInput(msg) => assert!(msg.contains("404")),
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_status_503_maps_to_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::SERVICE_UNAVAILABLE))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: WxError = InfraError::from(error).into();
        assert!(matches!(mapped, WxError::Network(msg) if msg.contains("503")));
    }
}
