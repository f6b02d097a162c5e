use url::Url;

use crate::error::{Result, SourceError};

/// Normalize a registry remote: parse it as a URL and make sure the path
/// ends in `/` so `https://host/x` and `https://host/x/` name one endpoint.
pub(crate) fn normalize_remote(remote: &str) -> Result<String> {
    let mut url = Url::parse(remote.trim()).map_err(|e| SourceError::InvalidRemote {
        remote: remote.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(SourceError::InvalidRemote {
            remote: remote.to_string(),
            reason: "expected a hierarchical URL such as https://host/".to_string(),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url.to_string())
}

/// The form of a remote used for comparison and display: normalized,
/// with any `user:password@` removed. Unparseable input is returned as-is.
pub(crate) fn comparable_remote(remote: &str) -> String {
    match normalize_remote(remote) {
        Ok(normalized) => remote_without_credentials(&normalized),
        Err(_) => remote.to_string(),
    }
}

fn remote_without_credentials(remote: &str) -> String {
    let Ok(mut url) = Url::parse(remote) else {
        return remote.to_string();
    };
    // Both setters only fail for URLs that cannot carry credentials.
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url.to_string()
}

/// Strip credentials from a free-form URI (git URIs need not be valid
/// URLs, e.g. `git@host:org/repo`). Only `scheme://user@host` is touched.
pub(crate) fn without_credentials(uri: &str) -> String {
    let Some(scheme_end) = uri.find("://") else {
        return uri.to_string();
    };
    let authority_start = scheme_end + 3;
    let rest = &uri[authority_start..];
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}{}", &uri[..authority_start], &rest[at + 1..]),
        None => uri.to_string(),
    }
}
