//! Where a backdrop image comes from

use std::path::PathBuf;

/// Source of a backdrop image
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Path on the local filesystem
    File(PathBuf),
    /// Encoded image bytes (PNG or JPEG)
    Bytes(Vec<u8>),
    /// Plain base64 or a `data:image/...;base64,` URI
    Base64(String),
    /// Straight-alpha RGBA8 pixels
    Rgba {
        data: Vec<u8>,
        width: u32,
        height: u32,
    },
}

impl ImageSource {
    /// A string is a data URI when it starts with `data:`, otherwise a path
    pub fn parse(s: &str) -> Self {
        if s.starts_with("data:") {
            ImageSource::Base64(s.to_string())
        } else {
            ImageSource::File(PathBuf::from(s))
        }
    }

    /// Short description for log messages
    pub fn describe(&self) -> String {
        match self {
            ImageSource::File(path) => path.display().to_string(),
            ImageSource::Bytes(data) => format!("{} encoded bytes", data.len()),
            ImageSource::Base64(data) => format!("{} base64 chars", data.len()),
            ImageSource::Rgba { width, height, .. } => format!("{width}x{height} rgba"),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::File(path)
    }
}

impl From<&std::path::Path> for ImageSource {
    fn from(path: &std::path::Path) -> Self {
        ImageSource::File(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(data: Vec<u8>) -> Self {
        ImageSource::Bytes(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            ImageSource::parse("backdrops/city.png"),
            ImageSource::File(PathBuf::from("backdrops/city.png"))
        );
        assert!(matches!(
            ImageSource::parse("data:image/png;base64,AAAA"),
            ImageSource::Base64(_)
        ));
    }
}
