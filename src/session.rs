use crate::color::{self, Color, Rgb};
use crate::history::History;
use crate::palette::{self, Palette, RandomSource, SchemeKind};
use crate::store::KeyValueStore;
use log::{debug, info, warn};
use serde::Serialize;

pub const DEFAULT_HISTORY_KEY: &str = "colorHistory";

/// Everything the page needs to draw itself.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub current: Color,
    pub palette: Palette,
    pub history: Vec<String>,
    pub scheme: Option<SchemeKind>,
    pub dark_theme: bool,
}

/// The state of one running color picker: current color, active palette and history.
pub struct SessionState {
    current: Color,
    palette: Palette,
    scheme: Option<SchemeKind>,
    history: History,
    dark_theme: bool,
    store: Box<dyn KeyValueStore>,
    history_key: String,
}

impl SessionState {
    /// Starts a session on white, with whatever history the store holds.
    pub fn load(store: Box<dyn KeyValueStore>, history_key: &str) -> Self {
        let history = match store.get(history_key) {
            Ok(Some(content)) => History::from_json(&content).unwrap_or_else(|e| {
                warn!("Ignoring stored color history: {:#}", e);
                History::new()
            }),
            Ok(None) => History::new(),
            Err(e) => {
                warn!("Color history unavailable, starting empty: {:#}", e);
                History::new()
            }
        };
        info!("Loaded {} colors from history", history.len());
        Self {
            current: Color::default(),
            palette: Palette::new(),
            scheme: None,
            history,
            dark_theme: false,
            store,
            history_key: history_key.to_string(),
        }
    }

    pub fn current(&self) -> &Color {
        &self.current
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn scheme(&self) -> Option<SchemeKind> {
        self.scheme
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_dark_theme(&self) -> bool {
        self.dark_theme
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current: self.current.clone(),
            palette: self.palette.clone(),
            history: self.history.entries().to_vec(),
            scheme: self.scheme,
            dark_theme: self.dark_theme,
        }
    }

    /// Makes a typed hex the current color and records it. Malformed input changes nothing.
    pub fn set_current_color(&mut self, hex: &str) -> bool {
        match color::convert(hex) {
            Some(color) => {
                self.replace_current(color, true);
                true
            }
            None => {
                debug!("Ignoring malformed hex input {:?}", hex);
                false
            }
        }
    }

    /// Same as `set_current_color` for the channel sliders; any channel outside 0..=255 is rejected.
    pub fn set_current_rgb(&mut self, r: i64, g: i64, b: i64) -> bool {
        let channels = (u8::try_from(r), u8::try_from(g), u8::try_from(b));
        let (Ok(r), Ok(g), Ok(b)) = channels else {
            debug!("Ignoring out of range rgb input ({}, {}, {})", r, g, b);
            return false;
        };
        self.replace_current(Color::from_rgb(Rgb { r, g, b }), true);
        true
    }

    /// Picks a swatch from the history or palette. Does not touch the history.
    pub fn select_color(&mut self, hex: &str) -> bool {
        match color::convert(hex) {
            Some(color) => {
                self.replace_current(color, false);
                true
            }
            None => false,
        }
    }

    pub fn random_color<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> &Color {
        let color = color::convert(&palette::random_color(rng)).unwrap_or_default();
        self.replace_current(color, true);
        &self.current
    }

    pub fn random_palette<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> &[Color] {
        self.palette = palette::random_palette(rng);
        self.scheme = None;
        debug!("Generated random palette");
        &self.palette
    }

    /// Replaces the palette with a harmony scheme around the current color.
    pub fn apply_scheme(&mut self, kind: &str) -> &[Color] {
        self.palette = palette::color_scheme(&self.current, kind);
        self.scheme = kind.parse().ok();
        if self.scheme.is_none() {
            debug!("Unknown scheme {:?}, palette holds only the current color", kind);
        }
        &self.palette
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.save_history();
        info!("Color history cleared");
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.dark_theme = !self.dark_theme;
        self.dark_theme
    }

    fn replace_current(&mut self, color: Color, record: bool) {
        debug!("Current color is now {}", color);
        if record && self.history.push(color.hex()) {
            self.save_history();
        }
        self.current = color;
    }

    fn save_history(&self) {
        let result = self
            .history
            .to_json()
            .and_then(|json| self.store.set(&self.history_key, &json));
        if let Err(e) = result {
            warn!("Skipping color history save: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Hsl;
    use crate::palette::tests::Sequence;
    use crate::store::MemoryStore;
    use anyhow::{Result, anyhow};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("store offline"))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("store offline"))
        }
    }

    fn session() -> (SessionState, MemoryStore) {
        let store = MemoryStore::new();
        let session = SessionState::load(Box::new(store.clone()), DEFAULT_HISTORY_KEY);
        (session, store)
    }

    fn stored_history(store: &MemoryStore) -> Option<String> {
        store.get(DEFAULT_HISTORY_KEY).unwrap()
    }

    #[test]
    fn starts_white_and_empty() {
        let (session, _) = session();
        assert_eq!(session.current().hex(), "#FFFFFF");
        assert!(session.palette().is_empty());
        assert!(session.history().is_empty());
        assert!(!session.is_dark_theme());
    }

    #[test]
    fn set_current_color_updates_every_representation() {
        let (mut session, store) = session();
        assert!(session.set_current_color("#1A2B3C"));
        let current = session.current();
        assert_eq!(current.hex(), "#1A2B3C");
        assert_eq!(current.rgb(), Rgb { r: 26, g: 43, b: 60 });
        assert_eq!(current.hsl(), Hsl { h: 210, s: 40, l: 17 });
        assert_eq!(session.history().entries(), ["#1A2B3C"]);
        assert_eq!(stored_history(&store).as_deref(), Some(r##"["#1A2B3C"]"##));
    }

    #[test]
    fn lowercase_input_shares_the_history_entry() {
        let (mut session, _) = session();
        session.set_current_color("#1a2b3c");
        session.set_current_color("1A2B3C");
        assert_eq!(session.history().entries(), ["#1A2B3C"]);
    }

    #[test]
    fn malformed_hex_leaves_state_alone() {
        let (mut session, store) = session();
        session.set_current_color("#123456");
        for input in ["#12345", "#GGGGGG", "", "rgb(1,2,3)"] {
            assert!(!session.set_current_color(input));
        }
        assert_eq!(session.current().hex(), "#123456");
        assert_eq!(session.history().len(), 1);
        assert_eq!(stored_history(&store).as_deref(), Some(r##"["#123456"]"##));
    }

    #[test]
    fn rgb_input_is_range_checked() {
        let (mut session, _) = session();
        assert!(session.set_current_rgb(255, 0, 128));
        assert_eq!(session.current().hex(), "#FF0080");
        assert!(!session.set_current_rgb(256, 0, 0));
        assert!(!session.set_current_rgb(0, -1, 0));
        assert_eq!(session.current().hex(), "#FF0080");
        assert_eq!(session.history().entries(), ["#FF0080"]);
    }

    #[test]
    fn selecting_a_swatch_skips_history() {
        let (mut session, store) = session();
        assert!(session.select_color("#00ff00"));
        assert_eq!(session.current().hex(), "#00FF00");
        assert!(session.history().is_empty());
        assert_eq!(stored_history(&store), None);
        assert!(!session.select_color("green"));
    }

    #[test]
    fn random_color_is_recorded() {
        let (mut session, _) = session();
        let hex = session.random_color(&mut Sequence::new(&[0.5])).hex().to_string();
        assert_eq!(hex, "#800000");
        assert_eq!(session.history().entries(), ["#800000"]);
    }

    #[test]
    fn schemes_replace_the_palette() {
        let (mut session, _) = session();
        session.set_current_color("#ff0000");
        assert_eq!(session.apply_scheme("triadic").len(), 3);
        assert_eq!(session.scheme(), Some(SchemeKind::Triadic));

        let palette = session.apply_scheme("square");
        assert_eq!(palette.len(), 1);
        assert_eq!(palette[0].hex(), "#FF0000");
        assert_eq!(session.scheme(), None);

        let mut draws = vec![0.25];
        draws.extend([0.5; 10]);
        assert_eq!(session.random_palette(&mut Sequence::new(&draws)).len(), 5);
        assert_eq!(session.scheme(), None);
        // palette work never touches the history
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn clear_history_persists_empty_list() {
        let (mut session, store) = session();
        session.set_current_color("#010203");
        session.clear_history();
        assert!(session.history().is_empty());
        assert_eq!(stored_history(&store).as_deref(), Some("[]"));
        assert_eq!(session.current().hex(), "#010203");
    }

    #[test]
    fn history_is_reloaded_from_the_store() {
        let store = MemoryStore::new();
        store.set(DEFAULT_HISTORY_KEY, r##"["#AAAAAA","#BBBBBB"]"##).unwrap();
        let session = SessionState::load(Box::new(store), DEFAULT_HISTORY_KEY);
        assert_eq!(session.history().entries(), ["#AAAAAA", "#BBBBBB"]);
    }

    #[test]
    fn lowercase_stored_history_still_dedups() {
        let store = MemoryStore::new();
        store.set(DEFAULT_HISTORY_KEY, r##"["#1a2b3c","not a color","#ABC"]"##).unwrap();
        let mut session = SessionState::load(Box::new(store), DEFAULT_HISTORY_KEY);
        assert!(session.set_current_color("#1a2b3c"));
        assert_eq!(session.history().entries(), ["#1A2B3C"]);
    }

    #[test]
    fn corrupt_history_loads_empty() {
        let store = MemoryStore::new();
        store.set(DEFAULT_HISTORY_KEY, "{oops").unwrap();
        let session = SessionState::load(Box::new(store), DEFAULT_HISTORY_KEY);
        assert!(session.history().is_empty());
    }

    #[test]
    fn unavailable_store_is_not_fatal() {
        let mut session = SessionState::load(Box::new(BrokenStore), DEFAULT_HISTORY_KEY);
        assert!(session.history().is_empty());
        assert!(session.set_current_color("#123456"));
        assert_eq!(session.history().entries(), ["#123456"]);
        session.clear_history();
        assert!(session.history().is_empty());
    }

    #[test]
    fn theme_toggles() {
        let (mut session, _) = session();
        assert!(session.toggle_theme());
        assert!(session.snapshot().dark_theme);
        assert!(!session.toggle_theme());
    }
}
