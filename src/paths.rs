//! Resource path templates of the storage API.
//!
//! Segments are inserted as given. Nothing is escaped here; callers must not
//! pass segments containing `/`, `?`, `#` or control characters.

/// Prefix of every versioned API path.
pub const API_PREFIX: &str = "/api/v1";

/// Path of an object, or of the bucket's object collection when `filename`
/// is `None`.
///
/// - download/delete: `/api/v1/projects/{project}/buckets/{bucket}/objects/{filename}`
/// - upload: `/api/v1/projects/{project}/buckets/{bucket}/objects`
pub fn object_path(project_id: &str, bucket_name: &str, filename: Option<&str>) -> String {
    match filename {
        Some(name) => format!(
            "{}/projects/{}/buckets/{}/objects/{}",
            API_PREFIX, project_id, bucket_name, name
        ),
        None => format!(
            "{}/projects/{}/buckets/{}/objects",
            API_PREFIX, project_id, bucket_name
        ),
    }
}

/// Path of an object behind the unauthenticated public endpoint.
pub fn public_object_path(project_id: &str, bucket_name: &str, filename: &str) -> String {
    format!(
        "{}/public/projects/{}/buckets/{}/{}",
        API_PREFIX, project_id, bucket_name, filename
    )
}

/// Public URL of an object: base URL plus [`public_object_path`].
///
/// The URL carries no signature and never expires. Anyone holding it can read
/// the object, so it offers no confidentiality at all.
pub fn public_object_url(
    base_url: &str,
    project_id: &str,
    bucket_name: &str,
    filename: &str,
) -> String {
    format!(
        "{}{}",
        base_url,
        public_object_path(project_id, bucket_name, filename)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_path_with_filename() {
        assert_eq!(
            object_path("proj1", "images", Some("a.jpg")),
            "/api/v1/projects/proj1/buckets/images/objects/a.jpg"
        );
    }

    #[test]
    fn test_upload_path_has_no_filename() {
        assert_eq!(
            object_path("proj1", "images", None),
            "/api/v1/projects/proj1/buckets/images/objects"
        );
    }

    #[test]
    fn test_filename_is_not_escaped() {
        assert_eq!(
            object_path("p", "b", Some("my file%20.jpg")),
            "/api/v1/projects/p/buckets/b/objects/my file%20.jpg"
        );
    }

    #[test]
    fn test_public_object_url() {
        assert_eq!(
            public_object_url("https://storage.example.com", "P", "B", "f.jpg"),
            "https://storage.example.com/api/v1/public/projects/P/buckets/B/f.jpg"
        );
    }
}
