//! Extension → mount helper dispatch.
//!
//! Every supported archive type is served by an external FUSE helper found in
//! the helpers directory. The table is plain data: the default one knows about
//! `fuse-zip` and `rar2fs`, and callers may substitute their own (for example
//! to point tests at fake helpers).

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperDescriptor {
    pub extension: String,
    #[serde(rename = "executable")]
    pub executable_name: String,
    /// Appended after all user-derived options.
    #[serde(default)]
    pub default_options: Vec<String>,
}

impl HelperDescriptor {
    pub fn new(extension: &str, executable_name: &str) -> HelperDescriptor {
        HelperDescriptor {
            extension: extension.to_lowercase(),
            executable_name: executable_name.to_string(),
            default_options: vec![],
        }
    }

    pub fn with_default_options<I, S>(mut self, options: I) -> HelperDescriptor
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn executable_path(&self, helpers_dir: &Path) -> PathBuf {
        helpers_dir.join(&self.executable_name)
    }
}

#[derive(Debug, Clone)]
pub struct HelperTable {
    helpers: BTreeMap<String, HelperDescriptor>,
}

impl Default for HelperTable {
    fn default() -> Self {
        let helpers = [
            HelperDescriptor::new("zip", "fuse-zip"),
            HelperDescriptor::new("rar", "rar2fs"),
        ];

        HelperTable {
            helpers: helpers
                .into_iter()
                .map(|h| (h.extension.clone(), h))
                .collect(),
        }
    }
}

impl HelperTable {
    /// Builds a table from descriptors. Later descriptors replace earlier ones
    /// registered for the same extension.
    pub fn from_descriptors<I>(descriptors: I) -> Result<HelperTable>
    where
        I: IntoIterator<Item = HelperDescriptor>,
    {
        let mut helpers = BTreeMap::new();

        for mut descriptor in descriptors {
            if descriptor.extension.trim().is_empty() {
                return Err(Error::InvalidHelperTable {
                    reason: "helper entry with an empty extension".into(),
                });
            }
            if descriptor.executable_name.trim().is_empty() {
                return Err(Error::InvalidHelperTable {
                    reason: format!(
                        "helper for \"{}\" has no executable name",
                        descriptor.extension
                    ),
                });
            }

            descriptor.extension = descriptor.extension.to_lowercase();
            helpers.insert(descriptor.extension.clone(), descriptor);
        }

        Ok(HelperTable { helpers })
    }

    /// Reads a JSON array of `{"extension", "executable", "default_options"}`
    /// objects.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<HelperTable> {
        let descriptors: Vec<HelperDescriptor> =
            serde_json::from_reader(reader).map_err(|e| Error::InvalidHelperTable {
                reason: e.to_string(),
            })?;
        HelperTable::from_descriptors(descriptors)
    }

    pub fn resolve(&self, extension: &str) -> Result<&HelperDescriptor> {
        self.helpers
            .get(&extension.to_lowercase())
            .ok_or_else(|| Error::UnsupportedFormat {
                extension: extension.to_string(),
            })
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HelperDescriptor> {
        self.helpers.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_resolves_known_extensions_case_insensitively() {
        let table = HelperTable::default();

        for ext in ["zip", "ZIP", "Zip"] {
            assert_eq!(table.resolve(ext).unwrap().executable_name, "fuse-zip");
        }
        for ext in ["rar", "RAR", "rAr"] {
            assert_eq!(table.resolve(ext).unwrap().executable_name, "rar2fs");
        }
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let table = HelperTable::default();

        for ext in ["7z", "tar", "", "zipx"] {
            match table.resolve(ext) {
                Err(Error::UnsupportedFormat { extension }) => assert_eq!(extension, ext),
                other => panic!("expected UnsupportedFormat, got {:?}", other),
            }
        }
    }

    #[test]
    fn default_table_has_exactly_two_entries() {
        let table = HelperTable::default();
        assert_eq!(table.extensions().collect::<Vec<_>>(), vec!["rar", "zip"]);
        assert!(table.iter().all(|h| h.default_options.is_empty()));
    }

    #[test]
    fn json_table_is_loaded_and_lowercased() {
        let json = r#"[
            {"extension": "ZIP", "executable": "fake-zip", "default_options": ["from_code=cp866"]},
            {"extension": "cbz", "executable": "fake-zip"}
        ]"#;

        let table = HelperTable::from_json_reader(json.as_bytes()).unwrap();
        let zip = table.resolve("zip").unwrap();
        assert_eq!(zip.executable_name, "fake-zip");
        assert_eq!(zip.default_options, vec!["from_code=cp866".to_string()]);
        assert!(table.resolve("CBZ").unwrap().default_options.is_empty());
        assert!(table.resolve("rar").is_err());
    }

    #[test]
    fn json_table_rejects_blank_entries() {
        let json = r#"[{"extension": "zip", "executable": "  "}]"#;
        assert!(matches!(
            HelperTable::from_json_reader(json.as_bytes()),
            Err(Error::InvalidHelperTable { .. })
        ));

        let json = r#"[{"extension": "", "executable": "fuse-zip"}]"#;
        assert!(matches!(
            HelperTable::from_json_reader(json.as_bytes()),
            Err(Error::InvalidHelperTable { .. })
        ));

        assert!(matches!(
            HelperTable::from_json_reader(&b"{not json"[..]),
            Err(Error::InvalidHelperTable { .. })
        ));
    }

    #[test]
    fn executable_path_joins_helpers_dir() {
        let helper = HelperDescriptor::new("zip", "fuse-zip");
        assert_eq!(
            helper.executable_path(Path::new("/Applications/AM.app/Contents/Executables")),
            PathBuf::from("/Applications/AM.app/Contents/Executables/fuse-zip")
        );
    }
}
