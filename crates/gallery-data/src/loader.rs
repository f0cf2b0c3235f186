//! Content pipeline: locates content files by stem, parses them in whichever
//! of RON, JSON or TOML they are written in, and turns the exhibition
//! document into the typed model.

use std::path::{Path, PathBuf};

use gallery_core::error::AssetLoadError;
use gallery_core::exhibition::Exhibition;
use serde::de::DeserializeOwned;

use crate::schema::ContentDocument;

/// Extensions tried for every content stem, in lookup order.
const EXTENSIONS: [&str; 3] = ["ron", "json", "toml"];

// ===========================================================================
// Errors
// ===========================================================================

#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// No `<stem>.{ron,json,toml}` in the content directory.
    #[error("content directory {dir} has no '{file}' file")]
    MissingRequired { file: String, dir: PathBuf },

    #[error("cannot tell the format of {file} from its extension")]
    UnsupportedFormat { file: PathBuf },

    /// The same stem exists in two formats; neither is preferred.
    #[error("{a} and {b} describe the same content")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("could not parse {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The content file lists exhibitions but none is active.
    #[error("no active exhibition in {file}")]
    NoActiveExhibition { file: PathBuf },

    #[error(transparent)]
    Scene(#[from] AssetLoadError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Formats and lookup
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Ron,
    Json,
    Toml,
}

impl ContentFormat {
    pub fn from_path(path: &Path) -> Result<Self, DataLoadError> {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => ContentFormat::Ron,
            Some("json") => ContentFormat::Json,
            Some("toml") => ContentFormat::Toml,
            _ => {
                return Err(DataLoadError::UnsupportedFormat {
                    file: path.to_path_buf(),
                });
            }
        };
        Ok(format)
    }

    /// Parse `content`. `file` only labels errors.
    pub fn parse<T: DeserializeOwned>(self, content: &str, file: &Path) -> Result<T, DataLoadError> {
        let detail = match self {
            ContentFormat::Ron => ron::from_str(content).map_err(|e| e.to_string()),
            ContentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ContentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        detail.map_err(|detail| DataLoadError::Parse {
            file: file.to_path_buf(),
            detail,
        })
    }
}

/// Find `<stem>.<ext>` in `dir`. `None` when absent; an error when more
/// than one format is present.
pub fn locate(dir: &Path, stem: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut present = EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .filter(|path| path.is_file());

    let first = present.next();
    if let (Some(a), Some(b)) = (&first, present.next()) {
        return Err(DataLoadError::ConflictingFormats {
            a: a.clone(),
            b,
        });
    }
    Ok(first)
}

/// [`locate`] for files the directory cannot do without.
pub fn locate_required(dir: &Path, stem: &str) -> Result<PathBuf, DataLoadError> {
    locate(dir, stem)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: stem.to_string(),
        dir: dir.to_path_buf(),
    })
}

/// Read and parse a content file, picking the parser by extension.
pub fn read_content<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = ContentFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    format.parse(&text, path)
}

// ===========================================================================
// Exhibition
// ===========================================================================

/// Load the exhibition from `exhibition.{ron,json,toml}` in `dir`.
///
/// The file holds either one exhibition document or a list of them; for a
/// list, the first active exhibition is used.
pub fn load_exhibition(dir: &Path) -> Result<Exhibition, DataLoadError> {
    let path = locate_required(dir, "exhibition")?;
    let document: ContentDocument = read_content(&path)?;
    let doc = document
        .into_active()
        .ok_or_else(|| DataLoadError::NoActiveExhibition { file: path.clone() })?;
    let exhibition = doc.into_exhibition();
    log::info!(
        "loaded exhibition '{}' from {} ({} artworks, {} rooms)",
        exhibition.title,
        path.display(),
        exhibition.artworks.len(),
        exhibition.rooms.len()
    );
    Ok(exhibition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gallery_loader_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[derive(Debug, serde::Deserialize)]
    struct RoomName {
        name: String,
    }

    #[derive(Debug, serde::Deserialize)]
    struct RoomList {
        rooms: Vec<RoomName>,
    }

    const SHOWS: &str = r#"[
        {"_id": "old", "title": "Old Show", "startDate": "2025-01-01", "endDate": "2025-02-01", "isActive": false},
        {"_id": "new", "title": "New Show", "startDate": "2026-01-01", "endDate": "2026-02-01", "isActive": true}
    ]"#;

    #[test]
    fn format_follows_extension() {
        let cases = [
            ("viewer.ron", Some(ContentFormat::Ron)),
            ("exhibition.json", Some(ContentFormat::Json)),
            ("images.toml", Some(ContentFormat::Toml)),
            ("exhibition.yaml", None),
            ("exhibition", None),
        ];
        for (name, expected) in cases {
            assert_eq!(ContentFormat::from_path(Path::new(name)).ok(), expected, "{name}");
        }
    }

    #[test]
    fn locate_finds_single_file_or_nothing() {
        let dir = scratch("locate");
        assert_eq!(locate(&dir, "viewer").unwrap(), None);

        fs::write(dir.join("viewer.toml"), "").unwrap();
        assert_eq!(locate(&dir, "viewer").unwrap(), Some(dir.join("viewer.toml")));
        // A directory with a matching name is not a content file.
        fs::create_dir_all(dir.join("images.ron")).unwrap();
        assert_eq!(locate(&dir, "images").unwrap(), None);
    }

    #[test]
    fn same_stem_in_two_formats_is_rejected() {
        let dir = scratch("ambiguous");
        fs::write(dir.join("viewer.ron"), "()").unwrap();
        fs::write(dir.join("viewer.json"), "{}").unwrap();
        assert!(matches!(
            locate(&dir, "viewer"),
            Err(DataLoadError::ConflictingFormats { .. })
        ));
    }

    #[test]
    fn missing_exhibition_names_the_stem() {
        let dir = scratch("no_exhibition");
        match load_exhibition(&dir) {
            Err(DataLoadError::MissingRequired { file, .. }) => assert_eq!(file, "exhibition"),
            other => panic!("expected MissingRequired, got {other:?}"),
        }
    }

    #[test]
    fn every_format_parses_the_same_content() {
        let dir = scratch("formats");
        fs::write(dir.join("a.ron"), r#"(rooms: [(name: "East"), (name: "West")])"#).unwrap();
        fs::write(dir.join("b.json"), r#"{"rooms": [{"name": "East"}, {"name": "West"}]}"#).unwrap();
        fs::write(
            dir.join("c.toml"),
            "[[rooms]]\nname = \"East\"\n\n[[rooms]]\nname = \"West\"\n",
        )
        .unwrap();

        for file in ["a.ron", "b.json", "c.toml"] {
            let list: RoomList = read_content(&dir.join(file)).unwrap();
            let names: Vec<_> = list.rooms.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, ["East", "West"], "{file}");
        }
    }

    #[test]
    fn bad_content_reports_parse_and_io_errors() {
        let dir = scratch("bad");
        fs::write(dir.join("broken.json"), "{ rooms: ").unwrap();
        let parsed: Result<RoomList, _> = read_content(&dir.join("broken.json"));
        assert!(matches!(parsed, Err(DataLoadError::Parse { .. })));

        let absent: Result<RoomList, _> = read_content(&dir.join("absent.ron"));
        assert!(matches!(absent, Err(DataLoadError::Io(_))));
    }

    #[test]
    fn list_document_uses_first_active_exhibition() {
        let dir = scratch("active");
        fs::write(dir.join("exhibition.json"), SHOWS).unwrap();
        let exhibition = load_exhibition(&dir).unwrap();
        assert_eq!(exhibition.id, "new");
        assert!(exhibition.artworks.is_empty());
        assert!(exhibition.rooms.is_empty());
    }

    #[test]
    fn list_without_active_exhibition_fails() {
        let dir = scratch("inactive");
        fs::write(
            dir.join("exhibition.json"),
            r#"[{"_id": "old", "title": "Old", "startDate": "2025-01-01", "endDate": "2025-02-01"}]"#,
        )
        .unwrap();
        assert!(matches!(
            load_exhibition(&dir),
            Err(DataLoadError::NoActiveExhibition { .. })
        ));
    }

    #[test]
    fn single_document_is_used_even_if_inactive() {
        let dir = scratch("single");
        fs::write(
            dir.join("exhibition.json"),
            r#"{"_id": "only", "title": "Only", "startDate": "2025-01-01", "endDate": "2025-02-01"}"#,
        )
        .unwrap();
        assert_eq!(load_exhibition(&dir).unwrap().id, "only");
    }
}
