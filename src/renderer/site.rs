use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use minijinja::{AutoEscape, Environment};
use serde_json::{Map, Value};
use walkdir::WalkDir;

use super::{RenderError, RenderReport, PARTIALS_DIR};

const TEMPLATE_EXTENSIONS: [&str; 2] = [".j2", ".jinja"];

pub fn is_template(path: &Path) -> bool {
    path.to_str()
        .is_some_and(|p| TEMPLATE_EXTENSIONS.iter().any(|ext| p.ends_with(ext)))
}

fn is_partial(relative: &Path) -> bool {
    relative
        .components()
        .any(|c| c == Component::Normal(PARTIALS_DIR.as_ref()))
}

/// Output path of a template: `page.html.j2` and `page.j2` both become `page.html`.
pub fn output_name(relative: &Path) -> PathBuf {
    let name = relative.to_string_lossy();
    let stem = TEMPLATE_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(&*name);
    if stem.ends_with(".html") {
        PathBuf::from(stem)
    } else {
        PathBuf::from(format!("{stem}.html"))
    }
}

/// All files below `root`, as paths relative to it, in file-name order
/// within each directory. A missing root yields none.
fn walk(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {e}", root.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect()
}

/// Templates to render, relative to `templates_dir`, partials excluded.
pub fn discover_templates(templates_dir: &Path) -> Vec<PathBuf> {
    walk(templates_dir)
        .into_iter()
        .filter(|p| is_template(p) && !is_partial(p))
        .collect()
}

fn write_file(path: &Path, contents: &str) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(RenderError::io(parent))?;
    }
    fs::write(path, contents).map_err(RenderError::io(path))
}

fn render_one(
    env: &Environment<'_>,
    relative: &Path,
    output_dir: &Path,
    data: &Map<String, Value>,
) -> Result<PathBuf, RenderError> {
    let template_error = |source| RenderError::Template {
        path: relative.to_path_buf(),
        source,
    };
    // Loader names always use forward slashes.
    let name = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    let template = env.get_template(&name).map_err(template_error)?;
    let output = template.render(data).map_err(template_error)?;

    let destination = output_dir.join(output_name(relative));
    write_file(&destination, &output)?;
    Ok(destination)
}

/// Renders every non-partial template. A template that fails is logged and
/// counted; the others are still rendered.
pub fn render_templates(
    templates_dir: &Path,
    output_dir: &Path,
    data: &Map<String, Value>,
    report: &mut RenderReport,
) {
    let mut env = Environment::new();
    env.set_loader(minijinja::path_loader(templates_dir.to_path_buf()));
    env.set_auto_escape_callback(|_| AutoEscape::None);

    for relative in discover_templates(templates_dir) {
        match render_one(&env, &relative, output_dir, data) {
            Ok(destination) => {
                report.rendered += 1;
                log::info!("Rendered {} to {}", relative.display(), destination.display());
            }
            Err(e) => {
                report.failed += 1;
                log::error!("Error rendering {}: {e}", relative.display());
                if let RenderError::Template { source, .. } = &e {
                    log::debug!("{}", source.display_debug_info());
                }
            }
        }
    }
}

/// Copies plain `.html` files from the templates directory without parsing them.
pub fn copy_html_files(templates_dir: &Path, output_dir: &Path, report: &mut RenderReport) {
    let html_files = walk(templates_dir)
        .into_iter()
        .filter(|p| p.extension().is_some_and(|ext| ext == "html"));

    for relative in html_files {
        let source = templates_dir.join(&relative);
        let destination = output_dir.join(&relative);
        match copy_file(&source, &destination) {
            Ok(()) => {
                report.copied += 1;
                log::info!("Copied {} to {}", source.display(), destination.display());
            }
            Err(e) => {
                report.failed += 1;
                log::error!("Error copying {}: {e}", source.display());
            }
        }
    }
}

fn copy_file(source: &Path, destination: &Path) -> Result<(), RenderError> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(RenderError::io(parent))?;
    }
    if destination.exists() {
        fs::remove_file(destination).map_err(RenderError::io(destination))?;
    }
    fs::copy(source, destination).map_err(RenderError::io(source))?;
    Ok(())
}

/// Replaces `destination` with a fresh copy of `source`.
pub fn mirror_images(source: &Path, destination: &Path) {
    if !source.is_dir() {
        log::warn!("No image directory at {}, skipping", source.display());
        return;
    }
    let result = remove_dir_if_present(destination).and_then(|()| copy_dir(source, destination));
    match result {
        Ok(()) => log::info!("Copied {} to {}", source.display(), destination.display()),
        Err(e) => log::error!("Error copying images: {e}"),
    }
}

fn remove_dir_if_present(dir: &Path) -> Result<(), RenderError> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(RenderError::io(dir))?;
    }
    Ok(())
}

fn copy_dir(source: &Path, destination: &Path) -> Result<(), RenderError> {
    fs::create_dir_all(destination).map_err(RenderError::io(destination))?;
    for relative in walk(source) {
        copy_file(&source.join(&relative), &destination.join(&relative))?;
    }
    Ok(())
}
