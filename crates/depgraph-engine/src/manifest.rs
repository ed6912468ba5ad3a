//! Reading the main section of a JAR manifest.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use depgraph_util::errors::DepgraphError;

const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Main attributes of the manifest in `jar`, keys lowercased.
///
/// `None` when the archive has no manifest.
pub fn main_attributes(jar: &Path) -> Result<Option<BTreeMap<String, String>>, DepgraphError> {
    let file = std::fs::File::open(jar)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| DepgraphError::Generic {
        message: format!("Failed to open {} as a JAR: {e}", jar.display()),
    })?;
    let mut entry = match archive.by_name(MANIFEST_PATH) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(DepgraphError::Generic {
                message: format!("Failed to read {MANIFEST_PATH} in {}: {e}", jar.display()),
            })
        }
    };
    let mut buf = String::new();
    entry.read_to_string(&mut buf)?;
    Ok(Some(parse_main_section(&buf)))
}

/// Whether the main manifest section of `jar` declares `attribute` (case-insensitive).
pub fn has_main_attribute(jar: &Path, attribute: &str) -> Result<bool, DepgraphError> {
    Ok(main_attributes(jar)?
        .is_some_and(|attrs| attrs.contains_key(&attribute.to_ascii_lowercase())))
}

fn parse_main_section(content: &str) -> BTreeMap<String, String> {
    let mut attrs = BTreeMap::new();
    let mut current: Option<(String, String)> = None;
    for line in content.lines() {
        // Continuation lines start with exactly one space.
        if let Some(rest) = line.strip_prefix(' ') {
            if let Some((_, value)) = current.as_mut() {
                value.push_str(rest);
            }
            continue;
        }
        if let Some((key, value)) = current.take() {
            attrs.insert(key, value);
        }
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            current = Some((
                key.trim().to_ascii_lowercase(),
                value.strip_prefix(' ').unwrap_or(value).to_string(),
            ));
        }
    }
    if let Some((key, value)) = current {
        attrs.insert(key, value);
    }
    attrs
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn jar(dir: &Path, manifest: Option<&str>) -> std::path::PathBuf {
        let path = dir.join("test.jar");
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        if let Some(manifest) = manifest {
            zip.start_file(MANIFEST_PATH, options).unwrap();
            zip.write_all(manifest.as_bytes()).unwrap();
        }
        zip.start_file("a/B.class", options).unwrap();
        zip.write_all(b"\xca\xfe\xba\xbe").unwrap();
        zip.finish().unwrap();
        path
    }

    #[test]
    fn parses_continuations_and_stops_at_sections() {
        let attrs = parse_main_section(
            "Manifest-Version: 1.0\r\nBundle-SymbolicName: org.exa\r\n mple.lib\r\n\r\nName: a/B.class\r\nSealed: true\r\n",
        );
        assert_eq!(attrs["bundle-symbolicname"], "org.example.lib");
        assert_eq!(attrs["manifest-version"], "1.0");
        assert!(!attrs.contains_key("sealed"));
    }

    #[test]
    fn reads_attributes_from_jar() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = jar(tmp.path(), Some("Manifest-Version: 1.0\nMain-Class: a.B\n"));
        assert!(has_main_attribute(&path, "main-class").unwrap());
        assert!(!has_main_attribute(&path, "Premain-Class").unwrap());
    }

    #[test]
    fn jar_without_manifest() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = jar(tmp.path(), None);
        assert!(main_attributes(&path).unwrap().is_none());
        assert!(!has_main_attribute(&path, "Main-Class").unwrap());
    }

    #[test]
    fn not_a_jar_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("bogus.jar");
        std::fs::write(&path, b"not a zip").unwrap();
        assert!(main_attributes(&path).is_err());
    }
}
