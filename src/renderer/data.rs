use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};

use super::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "json" => Some(Format::Json),
        "yaml" | "yml" => Some(Format::Yaml),
        _ => None,
    }
}

/// Loads every JSON file of `dir`, then every YAML file, each group in file
/// name order, into one mapping. A top-level key defined by several files
/// takes the value from the last one loaded. Unreadable or malformed files
/// are logged and skipped.
pub fn load_data(dir: &Path) -> Map<String, Value> {
    let mut data = Map::new();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("Error reading data directory {}: {e}", dir.display());
            return data;
        }
    };

    let mut files: Vec<(Format, PathBuf)> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| format_of(&path).map(|format| (format, path)))
        .collect();
    files.sort_by(|(fa, pa), (fb, pb)| {
        (*fa == Format::Yaml)
            .cmp(&(*fb == Format::Yaml))
            .then_with(|| pa.file_name().cmp(&pb.file_name()))
    });

    for (format, path) in files {
        match load_file(&path, format) {
            Ok(values) => {
                data.extend(values);
                log::info!("Loaded data from {}", path.display());
            }
            Err(e) => log::error!("Error loading data from {}: {e}", path.display()),
        }
    }

    data
}

fn load_file(path: &Path, format: Format) -> Result<Map<String, Value>, RenderError> {
    let text = fs::read_to_string(path).map_err(RenderError::io(path))?;
    let value: Value = match format {
        Format::Json => serde_json::from_str(&text).map_err(|source| RenderError::Json {
            path: path.to_path_buf(),
            source,
        })?,
        Format::Yaml => serde_yaml::from_str(&text).map_err(|source| RenderError::Yaml {
            path: path.to_path_buf(),
            source,
        })?,
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(RenderError::NotAMapping(path.to_path_buf())),
    }
}
