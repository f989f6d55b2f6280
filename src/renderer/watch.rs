use std::{
    fs,
    path::{Path, PathBuf},
    sync::mpsc,
    time::{Duration, Instant},
};

use notify::{Event, EventKind, RecursiveMode, Watcher};

use super::{render_all, RenderError, RendererConfig};

/// Drops repeated change notifications for the same path.
///
/// An event passes when its path differs from the last one that passed, or
/// when more than `delay` has elapsed since then. The gate only remembers one
/// path, so alternating edits to two files always pass.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    last: Option<(PathBuf, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, last: None }
    }

    pub fn should_process(&mut self, path: &Path, now: Instant) -> bool {
        let pass = match &self.last {
            None => true,
            Some((last_path, last_time)) => {
                last_path != path || now.saturating_duration_since(*last_time) > self.delay
            }
        };
        if pass {
            self.last = Some((path.to_path_buf(), now));
        }
        pass
    }
}

fn is_rebuild_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Returns the path that should trigger a rebuild for this event, if any.
fn rebuild_trigger(
    event: &Event,
    sources: &[PathBuf],
    debouncer: &mut Debouncer,
    now: Instant,
) -> Option<PathBuf> {
    if !is_rebuild_event(&event.kind) {
        return None;
    }
    event
        .paths
        .iter()
        .find(|path| {
            debouncer.should_process(path, now) && sources.iter().any(|src| path.starts_with(src))
        })
        .cloned()
}

/// Watches the templates and data directories and rebuilds the site on every
/// change that passes the debounce gate. Blocks until the watcher goes away.
pub fn watch(config: &RendererConfig) -> Result<(), RenderError> {
    let sources = [&config.templates_dir, &config.data_dir]
        .into_iter()
        .map(|dir| fs::canonicalize(dir).map_err(RenderError::io(dir)))
        .collect::<Result<Vec<_>, _>>()?;

    let (sender, receiver) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(sender)?;
    for dir in &sources {
        watcher.watch(dir, RecursiveMode::Recursive)?;
        log::info!("Watching {}", dir.display());
    }

    let mut debouncer = Debouncer::new(config.debounce);
    for result in receiver {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                log::warn!("watch error: {e}");
                continue;
            }
        };
        let Some(trigger) = rebuild_trigger(&event, &sources, &mut debouncer, Instant::now())
        else {
            continue;
        };
        if let Err(e) = render_all(config, Some(&trigger)) {
            log::error!("rebuild failed: {e}");
        }
    }

    Ok(())
}
