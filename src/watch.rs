//! `mdtext render --watch`: re-render a file each time it is saved.

use anyhow::Result;
use colored::Colorize;
use notify::{EventKind, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Watch `file` and call `render` after every change.
///
/// Debounces rapid events (editors that write in stages) with a 200ms window.
/// Ctrl+C exits.
pub fn watch_and_render<F>(file: &str, quiet: bool, mut render: F) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    let file_path = std::fs::canonicalize(file)
        .map_err(|e| anyhow::anyhow!("Cannot resolve path '{}': {}", file, e))?;

    let watch_dir = file_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Cannot determine parent directory of '{}'", file))?;

    render()?;

    if !quiet {
        eprintln!("{} {} for changes (Ctrl+C to stop)", "Watching".cyan().bold(), file);
    }

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(watch_dir, RecursiveMode::NonRecursive)?;

    let mut last_render = Instant::now();
    let debounce = Duration::from_millis(200);

    loop {
        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(event) => {
                if is_relevant(&event, &file_path) && last_render.elapsed() > debounce {
                    // Let the editor finish writing
                    std::thread::sleep(Duration::from_millis(50));

                    log::debug!("change detected in {}", file_path.display());
                    match render() {
                        Ok(()) => last_render = Instant::now(),
                        Err(e) => eprintln!("{} {:#}", "Render error:".red().bold(), e),
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

/// Only modify/create events touching the watched file trigger a render.
fn is_relevant(event: &notify::Event, file_path: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event
            .paths
            .iter()
            .any(|p| p.canonicalize().ok().as_deref() == Some(file_path))
}
