//! Static resource fallback
//!
//! Serves `static_root + request path`, or the not-found document when no such
//! file exists. Both are answered with 200 and a content type taken from the
//! request's `Accept` header.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use hyper::{StatusCode, Version};

use crate::config::ResourcesConfig;
use crate::error::ResourceReadError;
use crate::http::response::DEFAULT_CONTENT_TYPE;
use crate::http::{Request, Response};
use crate::logger;

#[derive(Debug, Clone)]
pub struct StaticResourceResolver {
    root: PathBuf,
    /// Resolved once at construction; `None` while the root cannot be resolved
    canonical_root: Option<PathBuf>,
    not_found_page: PathBuf,
}

impl StaticResourceResolver {
    /// `not_found_page` is relative to `root`
    pub fn new(root: impl Into<PathBuf>, not_found_page: impl AsRef<Path>) -> Self {
        let root = root.into();
        let not_found_page = root.join(not_found_page);
        let canonical_root = match root.canonicalize() {
            Ok(p) => Some(p),
            Err(e) => {
                logger::log_warning(&format!(
                    "Static root not found or inaccessible '{}': {e}",
                    root.display()
                ));
                None
            }
        };

        Self {
            root,
            canonical_root,
            not_found_page,
        }
    }

    pub fn from_config(config: &ResourcesConfig) -> Self {
        Self::new(&config.static_root, &config.not_found_page)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn not_found_page(&self) -> &Path {
        &self.not_found_page
    }

    /// Read the resource for `req`.
    ///
    /// Falls back to the not-found document exactly once; if that one is
    /// missing too, the read error is returned.
    pub fn resolve(&self, req: &Request) -> Result<Response, ResourceReadError> {
        let content_type = negotiate_content_type(req.header("accept"));

        let path = self.locate(req.path())?.unwrap_or_else(|| {
            logger::log_not_found(req.path());
            self.not_found_page.clone()
        });

        let body = fs::read(&path).map_err(|source| ResourceReadError {
            path: path.clone(),
            source,
        })?;

        Ok(Response::builder()
            .version(Version::HTTP_11)
            .status(StatusCode::OK)
            .content_type(content_type)
            .body(body)
            .build())
    }

    /// Regular file under the root for `request_path`, if any.
    ///
    /// Missing paths, directories and paths escaping the root are `Ok(None)`;
    /// any other filesystem failure is an error.
    fn locate(&self, request_path: &str) -> Result<Option<PathBuf>, ResourceReadError> {
        // Remove leading slash so the path joins under the root
        let relative = request_path.trim_start_matches('/');
        if relative.is_empty() {
            return Ok(None);
        }

        let resolved;
        let root_canonical: &Path = match &self.canonical_root {
            Some(root) => root,
            None => match existing_path(self.root.canonicalize(), &self.root)? {
                Some(root) => {
                    resolved = root;
                    &resolved
                }
                None => return Ok(None),
            },
        };

        let file_path = self.root.join(relative);
        let Some(file_canonical) = existing_path(file_path.canonicalize(), &file_path)? else {
            return Ok(None);
        };
        if !file_canonical.starts_with(root_canonical) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {request_path} -> {}",
                file_canonical.display()
            ));
            return Ok(None);
        }

        Ok(file_canonical.is_file().then_some(file_canonical))
    }
}

/// Map "does not exist" outcomes to `None`, keep real I/O failures
fn existing_path(
    result: io::Result<PathBuf>,
    path: &Path,
) -> Result<Option<PathBuf>, ResourceReadError> {
    match result {
        Ok(p) => Ok(Some(p)),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(None),
        Err(source) => Err(ResourceReadError {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// First comma-separated token of `Accept`, or `text/html` when absent
pub fn negotiate_content_type(accept: Option<&str>) -> String {
    accept
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Method;
    use tempfile::TempDir;

    fn site() -> (TempDir, StaticResourceResolver) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "hello").unwrap();
        fs::write(dir.path().join("404.html"), "not found").unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs").join("guide.txt"), "guide").unwrap();
        let resolver = StaticResourceResolver::new(dir.path(), "404.html");
        (dir, resolver)
    }

    fn get(path: &str) -> Request {
        Request::new(Method::GET, path)
    }

    #[test]
    fn test_negotiate_content_type() {
        assert_eq!(negotiate_content_type(None), "text/html");
        assert_eq!(negotiate_content_type(Some("text/plain,*/*")), "text/plain");
        assert_eq!(
            negotiate_content_type(Some("application/json")),
            "application/json"
        );
        assert_eq!(
            negotiate_content_type(Some("text/css, text/plain")),
            "text/css"
        );
        assert_eq!(negotiate_content_type(Some("")), "text/html");
    }

    #[test]
    fn test_existing_file_is_served() {
        let (_dir, resolver) = site();
        let resp = resolver
            .resolve(&get("/index.html").with_header("Accept", "text/plain,*/*"))
            .unwrap();

        assert_eq!(resp.version(), Version::HTTP_11);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.content_type(), "text/plain");
        assert_eq!(resp.body().as_ref(), b"hello");
    }

    #[test]
    fn test_nested_file_defaults_to_html() {
        let (_dir, resolver) = site();
        let resp = resolver.resolve(&get("/docs/guide.txt")).unwrap();
        assert_eq!(resp.content_type(), "text/html");
        assert_eq!(resp.body().as_ref(), b"guide");
    }

    #[test]
    fn test_missing_file_serves_not_found_document_with_200() {
        let (_dir, resolver) = site();
        let resp = resolver.resolve(&get("/missing.html")).unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body().as_ref(), b"not found");
    }

    #[test]
    fn test_directory_and_root_are_not_found() {
        let (_dir, resolver) = site();
        for path in ["/", "/docs", "/docs/"] {
            let resp = resolver.resolve(&get(path)).unwrap();
            assert_eq!(resp.body().as_ref(), b"not found", "path {path}");
        }
    }

    #[test]
    fn test_traversal_is_not_found() {
        let outer = tempfile::tempdir().unwrap();
        fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        let root = outer.path().join("static");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("404.html"), "not found").unwrap();

        let resolver = StaticResourceResolver::new(&root, "404.html");
        let resp = resolver.resolve(&get("/../secret.txt")).unwrap();
        assert_eq!(resp.body().as_ref(), b"not found");
    }

    #[test]
    fn test_missing_not_found_document_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = StaticResourceResolver::new(dir.path(), "404.html");

        let err = resolver.resolve(&get("/missing.html")).unwrap_err();
        assert_eq!(err.path, dir.path().join("404.html"));
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_file_below_regular_file_is_not_found() {
        let (_dir, resolver) = site();
        let resp = resolver.resolve(&get("/index.html/extra")).unwrap();
        assert_eq!(resp.body().as_ref(), b"not found");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_read_error() {
        let (dir, resolver) = site();
        std::os::unix::fs::symlink("loop", dir.path().join("loop")).unwrap();

        let err = resolver.resolve(&get("/loop")).unwrap_err();
        assert_eq!(err.path, dir.path().join("loop"));
        assert_ne!(err.source.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_missing_root_serves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = StaticResourceResolver::new(dir.path().join("absent"), "404.html");

        let err = resolver.resolve(&get("/index.html")).unwrap_err();
        assert_eq!(err.path, dir.path().join("absent").join("404.html"));
        assert_eq!(err.source.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_from_config() {
        let config = ResourcesConfig {
            static_root: "static".to_string(),
            not_found_page: "404.html".to_string(),
        };
        let resolver = StaticResourceResolver::from_config(&config);
        assert_eq!(resolver.root(), Path::new("static"));
        assert_eq!(resolver.not_found_page(), Path::new("static/404.html"));
    }
}
