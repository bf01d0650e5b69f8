use hyper::Method;

/// Endpoints exposed by the metadata API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `meta-data/` directory listing (empty key) or a single key
    Metadata { key: String },
    /// Full user-data document
    UserData,
}

/// The dated prefix is a compatibility alias for `latest`; the two are
/// synonyms, not separate API generations.
const API_VERSIONS: [&str; 2] = ["/latest", "/2009-04-04"];

/// Matches a request path against the accepted prefixes.
///
/// Anything else, including nested metadata paths and non-GET methods,
/// is unmatched and answered with 404 by the caller.
pub fn match_path(method: &Method, path: &str) -> Option<Endpoint> {
    if method != Method::GET {
        return None;
    }

    for version in API_VERSIONS {
        let Some(rest) = path.strip_prefix(version) else {
            continue;
        };

        if rest == "/user-data" {
            return Some(Endpoint::UserData);
        }

        if let Some(key) = rest.strip_prefix("/meta-data/") {
            // The directory component must be exactly the metadata root
            if key.contains('/') {
                return None;
            }
            return Some(Endpoint::Metadata {
                key: key.to_string(),
            });
        }
    }

    None
}
