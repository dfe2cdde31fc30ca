//! Display surface the engine renders into

use bytes::Bytes;
use parking_lot::Mutex;
use std::path::PathBuf;
use tracing::{info, warn};

/// Full-screen background plus a status label overlay.
///
/// Decoding and painting belong to the implementor; the engine only hands
/// over raw image bytes and label text.
pub trait DisplaySink: Send + Sync {
    fn set_background_image(&self, image: Bytes);
    fn set_status_text(&self, text: &str);
    /// Show the placeholder background
    fn reset_to_default(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    Image(Bytes),
    Status(String),
    Reset,
}

/// Records every call; useful for hosts and tests that inspect what was shown
#[derive(Debug, Default)]
pub struct MemoryDisplay {
    events: Mutex<Vec<DisplayEvent>>,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DisplayEvent> {
        self.events.lock().clone()
    }

    pub fn images(&self) -> Vec<Bytes> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                DisplayEvent::Image(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    /// Image currently on screen (`None` after a reset)
    pub fn current_image(&self) -> Option<Bytes> {
        self.events.lock().iter().rev().find_map(|event| match event {
            DisplayEvent::Image(bytes) => Some(Some(bytes.clone())),
            DisplayEvent::Reset => Some(None),
            DisplayEvent::Status(_) => None,
        })?
    }

    pub fn current_status(&self) -> Option<String> {
        self.events.lock().iter().rev().find_map(|event| match event {
            DisplayEvent::Status(text) => Some(text.clone()),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl DisplaySink for MemoryDisplay {
    fn set_background_image(&self, image: Bytes) {
        self.events.lock().push(DisplayEvent::Image(image));
    }

    fn set_status_text(&self, text: &str) {
        self.events.lock().push(DisplayEvent::Status(text.to_string()));
    }

    fn reset_to_default(&self) {
        self.events.lock().push(DisplayEvent::Reset);
    }
}

/// Headless sink: writes the latest image to a file and logs the label
#[derive(Debug)]
pub struct FileDisplay {
    output_path: PathBuf,
}

impl FileDisplay {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }
}

impl DisplaySink for FileDisplay {
    fn set_background_image(&self, image: Bytes) {
        if let Err(e) = std::fs::write(&self.output_path, &image) {
            warn!(path = %self.output_path.display(), error = %e, "Failed to write background image");
            return;
        }
        info!(path = %self.output_path.display(), size = image.len(), "Background updated");
    }

    fn set_status_text(&self, text: &str) {
        if !text.is_empty() {
            info!(status = text, "Status");
        }
    }

    fn reset_to_default(&self) {
        match std::fs::remove_file(&self.output_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.output_path.display(), error = %e, "Failed to clear background image")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_display_tracks_current_image() {
        let display = MemoryDisplay::new();
        assert!(display.current_image().is_none());

        display.set_background_image(Bytes::from_static(b"one"));
        display.set_status_text("Wifi not connected");
        assert_eq!(display.current_image(), Some(Bytes::from_static(b"one")));
        assert_eq!(display.current_status().as_deref(), Some("Wifi not connected"));

        display.reset_to_default();
        assert!(display.current_image().is_none());
        assert_eq!(display.images().len(), 1);
    }

    #[test]
    fn test_file_display_writes_and_clears() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bg.img");
        let display = FileDisplay::new(path.clone());

        display.set_background_image(Bytes::from_static(b"pixels"));
        assert_eq!(std::fs::read(&path).unwrap(), b"pixels");

        display.reset_to_default();
        assert!(!path.exists());

        // Clearing twice is fine
        display.reset_to_default();
    }
}
