//! Classification of stored specification locations.

/// How a descriptor's `spec_location` string is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecLocation<'a> {
    /// Leading `/`: a path relative to the asset root.
    AssetPath(&'a str),
    /// `http://` or `https://`: fetched by the caller.
    Remote(&'a str),
    /// Anything else: a filename relative to the asset root.
    AssetFile(&'a str),
}

impl<'a> SpecLocation<'a> {
    pub fn classify(raw: &'a str) -> Self {
        if raw.starts_with('/') {
            SpecLocation::AssetPath(raw)
        } else if is_remote_url(raw) {
            SpecLocation::Remote(raw)
        } else {
            SpecLocation::AssetFile(raw)
        }
    }
}

pub fn is_remote_url(raw: &str) -> bool {
    raw.starts_with("http://") || raw.starts_with("https://")
}
