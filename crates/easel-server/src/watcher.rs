//! File watching that drives rebuilds.

use std::path::Path;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Extensions whose changes qualify for a rebuild.
pub const RELEVANT_EXTENSIONS: [&str; 4] = ["md", "html", "css", "js"];

/// Minimum spacing between accepted rebuild triggers.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Leading-edge debounce: the first qualifying event fires immediately,
/// later ones inside the window are dropped, not deferred. The timestamp
/// only advances on an accepted event, so a change made right after a
/// rebuild never waits longer than one window.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Record an event at `now`; true when it should trigger a rebuild.
    pub fn accept(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.window => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// True when the path's extension is on the rebuild allow-list.
pub fn is_relevant(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    RELEVANT_EXTENSIONS.contains(&ext)
}

/// Watches a directory tree and invokes a callback for qualifying changes.
///
/// The callback runs on the watcher's own forwarding thread, serially, at
/// most once per debounce window. A slow callback simply means events
/// arriving meanwhile fall inside the window and are dropped.
pub struct RebuildWatcher {
    watcher: RecommendedWatcher,
    thread: JoinHandle<()>,
}

impl RebuildWatcher {
    /// Start watching `root` recursively.
    pub fn spawn<F>(root: &Path, on_change: F) -> Result<Self, notify::Error>
    where
        F: FnMut(&Path) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = tx.send(event);
                }
            })?;
        watcher.watch(root, RecursiveMode::Recursive)?;

        let thread = thread::spawn(move || forward_events(rx, on_change));

        Ok(Self { watcher, thread })
    }

    /// Stop watching and wait for the forwarding thread to finish.
    pub fn stop(self) {
        // Dropping the watcher closes the event channel, which ends the
        // forwarding thread's receive loop.
        drop(self.watcher);
        let _ = self.thread.join();
    }
}

fn forward_events<F>(rx: mpsc::Receiver<notify::Event>, mut on_change: F)
where
    F: FnMut(&Path),
{
    let mut debouncer = Debouncer::new(DEBOUNCE_WINDOW);

    while let Ok(event) = rx.recv() {
        if !matches!(event.kind, EventKind::Modify(_)) {
            continue;
        }
        let Some(path) = event.paths.iter().find(|path| is_relevant(path)) else {
            continue;
        };
        if !debouncer.accept(Instant::now()) {
            continue;
        }
        on_change(path);
    }
}
