//! Outgoing request header assembly.
//!
//! [`update_storage_file_header`] runs the shared header-update step, adds the
//! request date and the file content type, then hands the request to the
//! signer. The signing algorithm itself lives behind [`RequestSigner`].

use azfile_model::Metadata;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderName, HeaderValue, USER_AGENT};
use http::{HeaderMap, Method};
use tracing::debug;

use crate::config::FileClientConfig;
use crate::error::{FileError, SignError};
use crate::properties::METADATA_PREFIX;

/// Content type sent with every file request.
pub const FILE_CONTENT_TYPE: &str = "application/octet-stream Charset=UTF-8";

const X_MS_DATE: &str = "x-ms-date";
const X_MS_VERSION: &str = "x-ms-version";

/// A request about to be sent to the file service.
#[derive(Debug, Clone, Default)]
pub struct StorageRequest {
    /// HTTP method. `MERGE` is used by some storage calls.
    pub method: Method,
    /// Request path, e.g. `/myshare/mydir/myfile`.
    pub path: String,
    /// Headers accumulated so far.
    pub headers: HeaderMap,
    /// User metadata to send as `x-ms-meta-*` headers.
    pub metadata: Metadata,
    /// Request body.
    pub body: Bytes,
}

impl StorageRequest {
    /// Create a request with no headers, metadata, or body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }
}

/// The header-update step shared by all storage services.
pub trait HeaderUpdater: Send + Sync {
    /// Add the common headers to `request`.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::InvalidHeader`] if a header value cannot be built.
    fn update_headers(&self, request: &mut StorageRequest) -> Result<(), FileError>;
}

/// Signs a fully assembled request, typically by adding `Authorization`.
pub trait RequestSigner: Send + Sync {
    /// Sign `request` in place.
    ///
    /// # Errors
    ///
    /// Returns [`SignError`] if the request cannot be signed.
    fn sign_request(&self, request: &mut StorageRequest) -> Result<(), SignError>;
}

/// The standard header-update step: content length for methods that carry a
/// body, service version, user agent, and request metadata.
#[derive(Debug, Clone)]
pub struct StandardHeaderUpdater {
    api_version: String,
    user_agent: String,
}

impl StandardHeaderUpdater {
    /// Create an updater that stamps the version and agent from `config`.
    #[must_use]
    pub fn new(config: &FileClientConfig) -> Self {
        Self {
            api_version: config.api_version.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl HeaderUpdater for StandardHeaderUpdater {
    fn update_headers(&self, request: &mut StorageRequest) -> Result<(), FileError> {
        if matches!(request.method.as_str(), "PUT" | "POST" | "MERGE" | "DELETE") {
            request
                .headers
                .append(CONTENT_LENGTH, HeaderValue::from(request.body.len()));
        }

        request.headers.append(
            HeaderName::from_static(X_MS_VERSION),
            header_value(X_MS_VERSION, &self.api_version)?,
        );
        request
            .headers
            .append(USER_AGENT, header_value("user-agent", &self.user_agent)?);

        for (key, value) in &request.metadata {
            let name = format!("{METADATA_PREFIX}{key}");
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FileError::invalid_header(&name, e.to_string()))?;
            let header_value = header_value(&name, value)?;
            request.headers.append(header_name, header_value);
        }

        Ok(())
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, FileError> {
    HeaderValue::from_str(value).map_err(|e| FileError::invalid_header(name, e.to_string()))
}

/// Format a timestamp as an HTTP date (RFC 1123), e.g.
/// `Wed, 01 Jul 2015 08:49:37 GMT`.
#[must_use]
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Assemble the headers of a file request and sign it.
///
/// Runs `updater`, appends `x-ms-date` with the current time and the file
/// content type, calls `signer`, and returns the final headers.
///
/// # Errors
///
/// Returns the updater's error, [`FileError::Signing`] if the signer fails.
pub fn update_storage_file_header<'a>(
    request: &'a mut StorageRequest,
    updater: &dyn HeaderUpdater,
    signer: &dyn RequestSigner,
) -> Result<&'a HeaderMap, FileError> {
    update_storage_file_header_at(request, updater, signer, Utc::now())
}

/// [`update_storage_file_header`] with an explicit request time.
///
/// # Errors
///
/// Returns the updater's error, [`FileError::Signing`] if the signer fails.
pub fn update_storage_file_header_at<'a>(
    request: &'a mut StorageRequest,
    updater: &dyn HeaderUpdater,
    signer: &dyn RequestSigner,
    now: DateTime<Utc>,
) -> Result<&'a HeaderMap, FileError> {
    updater.update_headers(request)?;

    let date = format_http_date(now);
    request.headers.append(
        HeaderName::from_static(X_MS_DATE),
        header_value(X_MS_DATE, &date)?,
    );
    request
        .headers
        .append(CONTENT_TYPE, HeaderValue::from_static(FILE_CONTENT_TYPE));

    signer.sign_request(request)?;
    debug!(
        method = %request.method,
        path = %request.path,
        headers = request.headers.len(),
        "signed file request"
    );

    Ok(&request.headers)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use http::header::AUTHORIZATION;

    use super::*;

    /// Signs by recording which headers were present when it ran.
    struct FakeSigner;

    impl RequestSigner for FakeSigner {
        fn sign_request(&self, request: &mut StorageRequest) -> Result<(), SignError> {
            let seen = [X_MS_DATE, "content-type", X_MS_VERSION]
                .iter()
                .filter(|name| request.headers.contains_key(**name))
                .count();
            let value = format!("SharedKey account:seen-{seen}");
            request.headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&value).map_err(|e| SignError(e.to_string()))?,
            );
            Ok(())
        }
    }

    struct FailingSigner;

    impl RequestSigner for FailingSigner {
        fn sign_request(&self, _request: &mut StorageRequest) -> Result<(), SignError> {
            Err(SignError("no account key".to_owned()))
        }
    }

    struct NoopUpdater;

    impl HeaderUpdater for NoopUpdater {
        fn update_headers(&self, _request: &mut StorageRequest) -> Result<(), FileError> {
            Ok(())
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 7, 1, 8, 49, 37).unwrap()
    }

    #[test]
    fn test_should_format_rfc1123_date() {
        assert_eq!(format_http_date(fixed_time()), "Wed, 01 Jul 2015 08:49:37 GMT");
    }

    #[test]
    fn test_should_add_date_and_content_type_before_signing() {
        let mut request = StorageRequest::new(Method::GET, "/share/dir/file");
        let updater = StandardHeaderUpdater::new(&FileClientConfig::default());

        let headers =
            update_storage_file_header_at(&mut request, &updater, &FakeSigner, fixed_time())
                .expect("headers");

        assert_eq!(
            headers.get("x-ms-date").map(HeaderValue::as_bytes),
            Some(&b"Wed, 01 Jul 2015 08:49:37 GMT"[..])
        );
        assert_eq!(
            headers.get(CONTENT_TYPE).map(HeaderValue::as_bytes),
            Some(FILE_CONTENT_TYPE.as_bytes())
        );
        assert_eq!(
            headers.get(AUTHORIZATION).map(HeaderValue::as_bytes),
            Some(&b"SharedKey account:seen-3"[..])
        );
        assert_eq!(
            headers.get("x-ms-version").map(HeaderValue::as_bytes),
            Some(&b"2015-04-05"[..])
        );
        assert!(headers.get(CONTENT_LENGTH).is_none());
    }

    #[test]
    fn test_should_run_custom_updater_first() {
        let mut request = StorageRequest::new(Method::GET, "/share");

        let headers =
            update_storage_file_header_at(&mut request, &NoopUpdater, &FakeSigner, fixed_time())
                .expect("headers");

        assert!(headers.get("x-ms-version").is_none());
        assert_eq!(
            headers.get(AUTHORIZATION).map(HeaderValue::as_bytes),
            Some(&b"SharedKey account:seen-2"[..])
        );
    }

    #[test]
    fn test_should_set_content_length_for_body_methods() {
        let updater = StandardHeaderUpdater::new(&FileClientConfig::default());

        let mut put = StorageRequest::new(Method::PUT, "/share/file");
        put.body = Bytes::from_static(b"hello");
        updater.update_headers(&mut put).expect("update");
        assert_eq!(
            put.headers.get(CONTENT_LENGTH).map(HeaderValue::as_bytes),
            Some(&b"5"[..])
        );

        let merge = Method::from_bytes(b"MERGE").expect("valid method");
        let mut merge = StorageRequest::new(merge, "/share/file");
        updater.update_headers(&mut merge).expect("update");
        assert_eq!(
            merge.headers.get(CONTENT_LENGTH).map(HeaderValue::as_bytes),
            Some(&b"0"[..])
        );

        let mut head = StorageRequest::new(Method::HEAD, "/share/file");
        updater.update_headers(&mut head).expect("update");
        assert!(head.headers.get(CONTENT_LENGTH).is_none());
    }

    #[test]
    fn test_should_send_metadata_and_configured_agent() {
        let config = FileClientConfig::builder()
            .user_agent("custom-agent/1.0".into())
            .build();
        let updater = StandardHeaderUpdater::new(&config);
        let mut request = StorageRequest::new(Method::PUT, "/share");
        request.metadata.insert("owner".to_owned(), "alice".to_owned());

        updater.update_headers(&mut request).expect("update");

        assert_eq!(
            request.headers.get("x-ms-meta-owner").map(HeaderValue::as_bytes),
            Some(&b"alice"[..])
        );
        assert_eq!(
            request.headers.get(USER_AGENT).map(HeaderValue::as_bytes),
            Some(&b"custom-agent/1.0"[..])
        );
    }

    #[test]
    fn test_should_reject_invalid_metadata_header() {
        let updater = StandardHeaderUpdater::new(&FileClientConfig::default());
        let mut request = StorageRequest::new(Method::PUT, "/share");
        request.metadata.insert("bad key".to_owned(), "v".to_owned());

        let err = updater.update_headers(&mut request).unwrap_err();

        assert!(matches!(err, FileError::InvalidHeader { ref name, .. } if name == "x-ms-meta-bad key"));
    }

    #[test]
    fn test_should_propagate_signer_failure() {
        let mut request = StorageRequest::new(Method::DELETE, "/share");

        let err = update_storage_file_header_at(&mut request, &NoopUpdater, &FailingSigner, fixed_time())
            .unwrap_err();

        assert!(matches!(err, FileError::Signing(_)));
    }
}
