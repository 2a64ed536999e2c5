//! Log entry rendering
//!
//! System entries print emphasized, chat entries plain. Optionally
//! honors the legacy `/` notice marker the broadcast peer embeds in
//! its own announcements.

use console::Style;

use sockchat_core::protocol::strip_notice_marker;
use sockchat_core::{EntryKind, LogEntry};

pub struct Renderer {
    emphasis: Style,
    legacy_notices: bool,
}

impl Renderer {
    pub fn new(legacy_notices: bool) -> Self {
        Self {
            emphasis: Style::new().bold(),
            legacy_notices,
        }
    }

    pub fn print(&self, entry: &LogEntry) {
        println!("{}", self.format(entry));
    }

    /// Styled line for one entry.
    ///
    /// Classification comes from `kind`; the marker shim only promotes
    /// peer-sent notices to emphasized display, it never reclassifies.
    pub fn format(&self, entry: &LogEntry) -> String {
        match entry.kind {
            EntryKind::System => self.emphasis.apply_to(&entry.text).to_string(),
            EntryKind::User => {
                if self.legacy_notices {
                    let (text, notice) = strip_notice_marker(&entry.text);
                    if notice {
                        return self.emphasis.apply_to(text).to_string();
                    }
                }
                entry.text.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(styled: &str) -> String {
        console::strip_ansi_codes(styled).to_string()
    }

    #[test]
    fn test_system_entry_keeps_text() {
        let renderer = Renderer::new(true);
        let line = renderer.format(&LogEntry::system("connected"));
        assert_eq!(plain(&line), "connected");
    }

    #[test]
    fn test_marker_stripped_when_legacy_enabled() {
        let renderer = Renderer::new(true);
        let line = renderer.format(&LogEntry::user("/A socket has disconnected."));
        assert_eq!(plain(&line), "A socket has disconnected.");
    }

    #[test]
    fn test_marker_kept_when_legacy_disabled() {
        let renderer = Renderer::new(false);
        let line = renderer.format(&LogEntry::user("/A socket has disconnected."));
        assert_eq!(plain(&line), "/A socket has disconnected.");
    }

    #[test]
    fn test_chat_text_untouched() {
        let renderer = Renderer::new(true);
        let line = renderer.format(&LogEntry::user("Bob: hi"));
        assert_eq!(line, "Bob: hi");
    }
}
