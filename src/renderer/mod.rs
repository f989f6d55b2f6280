//! Static site renderer.
//!
//! Structured data from the data directory is merged into one mapping and
//! substituted into every Jinja template under the templates directory. The
//! rendered pages, verbatim `.html` files and the image directory land in the
//! output directory with the same relative layout.

pub mod data;
pub mod site;
pub mod watch;

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

pub use data::load_data;
pub use watch::{watch, Debouncer};

/// Templates whose path contains this directory are only used through includes.
pub const PARTIALS_DIR: &str = "partials";
/// Subdirectory of the templates directory mirrored as-is into the output.
pub const IMAGE_DIR: &str = "img";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("top level of {0} is not a mapping")]
    NotAMapping(PathBuf),
    #[error("failed to render {path}: {source}")]
    Template {
        path: PathBuf,
        source: minijinja::Error,
    },
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

impl RenderError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> RenderError + '_ {
        move |source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub data_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub debounce: Duration,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("site"),
            debounce: Duration::from_secs(5),
        }
    }
}

/// What a full build produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    pub rendered: usize,
    pub copied: usize,
    pub failed: usize,
}

/// Rebuilds the whole site. `trigger` names the file whose change caused the
/// rebuild, if any; it is only logged.
///
/// Failures on individual files are logged and counted in the report. Only
/// an unusable output directory aborts the build.
pub fn render_all(config: &RendererConfig, trigger: Option<&Path>) -> Result<RenderReport, RenderError> {
    if let Some(trigger) = trigger {
        log::info!(">>> Rebuild triggered by change in: {}", trigger.display());
    }

    fs::create_dir_all(&config.output_dir).map_err(RenderError::io(&config.output_dir))?;

    let data = load_data(&config.data_dir);
    let mut report = RenderReport::default();

    site::copy_html_files(&config.templates_dir, &config.output_dir, &mut report);
    site::render_templates(&config.templates_dir, &config.output_dir, &data, &mut report);
    site::mirror_images(
        &config.templates_dir.join(IMAGE_DIR),
        &config.output_dir.join(IMAGE_DIR),
    );

    log::info!(
        "build finished: {} rendered, {} copied, {} failed",
        report.rendered,
        report.copied,
        report.failed
    );
    Ok(report)
}
