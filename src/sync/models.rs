// Run-scoped types for the sync pipeline

use std::path::Path;

/// One file as seen in the remote folder listing
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFile {
    pub name: String,
    pub remote_path: String,
}

/// Metadata sent alongside the video bytes
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category_id: String,
    pub privacy_status: String,
}

impl UploadRequest {
    /// Fixed Shorts metadata: tag "shorts", category 22 (People & Blogs),
    /// public visibility. Only title and description vary per file.
    pub fn shorts(title: String, description: String) -> Self {
        Self {
            title,
            description,
            tags: vec!["shorts".to_string()],
            category_id: "22".to_string(),
            privacy_status: "public".to_string(),
        }
    }
}

/// What the destination reports back after a successful publish
#[derive(Debug, Clone)]
pub struct PublishedVideo {
    pub video_id: String,
    pub title: String,
    pub url: String,
}

/// File name to use under the staging directory. Keeps only the final
/// path component so a listing entry can never escape the staging dir.
pub fn staging_file_name(entry_name: &str) -> String {
    Path::new(entry_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(entry_name)
        .to_string()
}

/// Video title: the file name with its extension stripped
pub fn title_from_file_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string()
}

/// Video description, always carrying the literal file name
pub fn description_for(file_name: &str) -> String {
    format!("Automated upload from Dropbox: {}", file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_strips_extension() {
        assert_eq!(title_from_file_name("riddle-042.mp4"), "riddle-042");
        assert_eq!(title_from_file_name("clip.tar.gz"), "clip.tar");
        assert_eq!(title_from_file_name("no_extension"), "no_extension");
    }

    #[test]
    fn description_contains_literal_file_name() {
        let description = description_for("riddle-042.mp4");
        assert!(description.contains("riddle-042.mp4"));
    }

    #[test]
    fn staging_name_drops_directory_components() {
        assert_eq!(staging_file_name("riddle-042.mp4"), "riddle-042.mp4");
        assert_eq!(staging_file_name("../riddle-042.mp4"), "riddle-042.mp4");
        assert_eq!(staging_file_name("a/b/riddle-042.mp4"), "riddle-042.mp4");
    }

    #[test]
    fn shorts_request_pins_fixed_metadata() {
        let request = UploadRequest::shorts("t".to_string(), "d".to_string());
        assert_eq!(request.tags, vec!["shorts".to_string()]);
        assert_eq!(request.category_id, "22");
        assert_eq!(request.privacy_status, "public");
    }
}
