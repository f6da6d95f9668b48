//! Maven repository abstraction: location types and the standard URL layout.

use std::path::PathBuf;

use pomviz_core::coordinate::PackageCoordinate;

/// Where manifests are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryLocation {
    /// Remote repository reached over HTTP(S).
    Http(String),
    /// Repository laid out on the local filesystem.
    File(PathBuf),
}

impl RepositoryLocation {
    /// Classify a configured location.
    ///
    /// `http://` and `https://` URLs are remote, a `file://` URL or any other
    /// string is treated as a local directory.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Http(location.trim_end_matches('/').to_string())
        } else if let Some(path) = location.strip_prefix("file://") {
            Self::File(PathBuf::from(path))
        } else {
            Self::File(PathBuf::from(location))
        }
    }

    /// Standard Maven layout path for a given coordinate.
    ///
    /// `org.jetbrains.kotlinx:kotlinx-coroutines-core:1.8.0` becomes
    /// `org/jetbrains/kotlinx/kotlinx-coroutines-core/1.8.0`
    pub fn coordinate_path(coord: &PackageCoordinate) -> String {
        format!(
            "{}/{}/{}",
            coord.group().replace('.', "/"),
            coord.artifact(),
            coord.version()
        )
    }

    /// File name of the POM for a coordinate: `artifact-version.pom`.
    pub fn pom_filename(coord: &PackageCoordinate) -> String {
        format!("{}-{}.pom", coord.artifact(), coord.version())
    }

    /// Path of the POM relative to the repository root.
    pub fn pom_path(coord: &PackageCoordinate) -> String {
        format!(
            "{}/{}",
            Self::coordinate_path(coord),
            Self::pom_filename(coord)
        )
    }

    /// Human-readable location of the POM, a URL or a filesystem path.
    pub fn pom_location(&self, coord: &PackageCoordinate) -> String {
        match self {
            Self::Http(base) => format!("{base}/{}", Self::pom_path(coord)),
            Self::File(root) => root.join(Self::pom_path(coord)).display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coroutines() -> PackageCoordinate {
        PackageCoordinate::new("org.jetbrains.kotlinx", "kotlinx-coroutines-core", "1.8.0")
    }

    #[test]
    fn coordinate_path_replaces_dots() {
        let path = RepositoryLocation::coordinate_path(&coroutines());
        assert_eq!(path, "org/jetbrains/kotlinx/kotlinx-coroutines-core/1.8.0");
    }

    #[test]
    fn pom_url_format() {
        let repo = RepositoryLocation::parse("https://repo.maven.apache.org/maven2");
        let url = repo.pom_location(&coroutines());
        assert_eq!(
            url,
            "https://repo.maven.apache.org/maven2/org/jetbrains/kotlinx/kotlinx-coroutines-core/1.8.0/kotlinx-coroutines-core-1.8.0.pom"
        );
    }

    #[test]
    fn http_trailing_slash_trimmed() {
        let repo = RepositoryLocation::parse("https://repo.example.com/maven/");
        assert_eq!(
            repo,
            RepositoryLocation::Http("https://repo.example.com/maven".to_string())
        );
    }

    #[test]
    fn file_url_and_plain_path() {
        assert_eq!(
            RepositoryLocation::parse("file:///srv/m2"),
            RepositoryLocation::File(PathBuf::from("/srv/m2"))
        );
        assert_eq!(
            RepositoryLocation::parse("./local-repo"),
            RepositoryLocation::File(PathBuf::from("./local-repo"))
        );
    }

    #[test]
    fn file_pom_location() {
        let repo = RepositoryLocation::File(PathBuf::from("/srv/m2"));
        let coord = PackageCoordinate::new("com.example", "util", "2.3");
        assert_eq!(
            PathBuf::from(repo.pom_location(&coord)),
            PathBuf::from("/srv/m2/com/example/util/2.3/util-2.3.pom")
        );
    }
}
