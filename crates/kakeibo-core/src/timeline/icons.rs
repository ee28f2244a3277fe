//! Marker icons and badges.
//!
//! Icons come from an [`IconSource`]. A missing icon is not an error: the
//! renderer draws a plain fallback shape instead.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::gradient::Rgb;
use crate::interval_log::EventKind;

/// Base artwork. Both fragment kinds share [`IconKind::Fragment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    Fragment,
    Core,
    Wipe,
}

impl IconKind {
    pub const ALL: [IconKind; 3] = [Self::Fragment, Self::Core, Self::Wipe];

    /// `None` for the start sentinel, which always uses the fallback shape.
    pub fn for_event(kind: EventKind) -> Option<Self> {
        match kind {
            EventKind::Start => None,
            EventKind::Frag45 | EventKind::Frag75 => Some(Self::Fragment),
            EventKind::Core => Some(Self::Core),
            EventKind::Wipe => Some(Self::Wipe),
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Fragment => "fragment.png",
            Self::Core => "core.png",
            Self::Wipe => "wipe.png",
        }
    }
}

/// Numeric badge drawn over the shared fragment icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeStyle {
    pub background: Rgb,
    pub foreground: Rgb,
    pub label: &'static str,
}

pub fn badge_for(kind: EventKind) -> Option<BadgeStyle> {
    match kind {
        EventKind::Frag45 => Some(BadgeStyle {
            background: Rgb::new(0x22, 0xd3, 0xee),
            foreground: Rgb::new(0x0b, 0x10, 0x20),
            label: "45",
        }),
        EventKind::Frag75 => Some(BadgeStyle {
            background: Rgb::new(0xa7, 0x8b, 0xfa),
            foreground: Rgb::new(0x20, 0x10, 0x2b),
            label: "75",
        }),
        _ => None,
    }
}

/// Supplies icon images as `href`-ready URIs.
pub trait IconSource {
    fn icon_uri(&self, icon: IconKind) -> Option<String>;
}

/// No artwork; every marker uses the fallback shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIcons;

impl IconSource for NoIcons {
    fn icon_uri(&self, _icon: IconKind) -> Option<String> {
        None
    }
}

impl IconSource for HashMap<IconKind, String> {
    fn icon_uri(&self, icon: IconKind) -> Option<String> {
        self.get(&icon).cloned()
    }
}

impl<T: IconSource + ?Sized> IconSource for &T {
    fn icon_uri(&self, icon: IconKind) -> Option<String> {
        (**self).icon_uri(icon)
    }
}

/// PNG files from a directory, encoded once as `data:` URIs.
#[derive(Debug, Clone, Default)]
pub struct DirectoryIcons {
    dir: PathBuf,
    uris: HashMap<IconKind, String>,
}

impl DirectoryIcons {
    /// Read whatever icons exist under `dir`. Unreadable files are skipped.
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let mut uris = HashMap::new();
        for icon in IconKind::ALL {
            let path = dir.join(icon.file_name());
            match std::fs::read(&path) {
                Ok(bytes) => {
                    uris.insert(icon, png_data_uri(&bytes));
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "could not read icon");
                }
            }
        }
        Self { dir, uris }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn loaded(&self) -> usize {
        self.uris.len()
    }
}

impl IconSource for DirectoryIcons {
    fn icon_uri(&self, icon: IconKind) -> Option<String> {
        self.uris.get(&icon).cloned()
    }
}

pub fn png_data_uri(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fragments_share_an_icon_and_differ_by_badge() {
        assert_eq!(IconKind::for_event(EventKind::Frag45), Some(IconKind::Fragment));
        assert_eq!(IconKind::for_event(EventKind::Frag75), Some(IconKind::Fragment));
        assert_eq!(badge_for(EventKind::Frag45).unwrap().label, "45");
        assert_eq!(badge_for(EventKind::Frag75).unwrap().label, "75");
        assert!(badge_for(EventKind::Core).is_none());
        assert!(badge_for(EventKind::Wipe).is_none());
        assert!(IconKind::for_event(EventKind::Start).is_none());
    }

    #[test]
    fn directory_icons_skip_missing_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("core.png"), [0x89, b'P', b'N', b'G']).unwrap();

        let icons = DirectoryIcons::load(dir.path());
        assert_eq!(icons.loaded(), 1);
        assert_eq!(
            icons.icon_uri(IconKind::Core).as_deref(),
            Some("data:image/png;base64,iVBORw==")
        );
        assert!(icons.icon_uri(IconKind::Wipe).is_none());
    }

    #[test]
    fn missing_directory_is_empty() {
        let icons = DirectoryIcons::load("/definitely/not/here");
        assert_eq!(icons.loaded(), 0);
    }
}
