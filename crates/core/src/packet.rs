//! Typed view of the terminal schema.
//!
//! [`Packet`] owns one [`KeyValueStore`] seeded with the defaults from
//! [`crate::schema`] and exposes each field as a typed property. All reads go
//! through the store's fail-safe projections, so a field a human mangled in
//! the external buffer reads as its zero value instead of failing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::schema::{self, DEBUG, GENERAL_KEYS, SETUP, SPECIAL_KEYS, STATES, UI};
use crate::store::{KeyValueStore, Vector2, Vector4};

// ---------------------------------------------------------------------------
// Enumerated fields
// ---------------------------------------------------------------------------

/// How the terminal collects input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmdMode {
    /// Readable on-screen text box.
    #[default]
    #[serde(rename = "CMDTerminal")]
    CmdTerminal,
    /// Hidden virtual text box, for use with displays.
    #[serde(rename = "CMDInput")]
    CmdInput,
    /// Custom UI driven through the synced text.
    Custom,
}

impl CmdMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CmdTerminal => "CMDTerminal",
            Self::CmdInput => "CMDInput",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for CmdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CmdMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CMDTerminal" => Ok(Self::CmdTerminal),
            "CMDInput" => Ok(Self::CmdInput),
            "Custom" => Ok(Self::Custom),
            other => Err(format!("unknown command mode '{other}'")),
        }
    }
}

/// Visual style of the text box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualStyle {
    Debug,
    #[default]
    Default,
    Custom,
    NoHighlight,
}

impl VisualStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Default => "Default",
            Self::Custom => "Custom",
            Self::NoHighlight => "NoHighlight",
        }
    }
}

impl fmt::Display for VisualStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Debug" => Ok(Self::Debug),
            "Default" => Ok(Self::Default),
            "Custom" => Ok(Self::Custom),
            "NoHighlight" => Ok(Self::NoHighlight),
            other => Err(format!("unknown visual style '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Packet
// ---------------------------------------------------------------------------

/// The terminal's local state: a store holding the fixed schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    store: KeyValueStore,
}

impl Default for Packet {
    fn default() -> Self {
        Self::new()
    }
}

impl Packet {
    /// A packet holding the default schema.
    pub fn new() -> Self {
        Self {
            store: schema::default_store(),
        }
    }

    pub fn store(&self) -> &KeyValueStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut KeyValueStore {
        &mut self.store
    }

    pub fn into_store(self) -> KeyValueStore {
        self.store
    }

    pub fn serialize(&self) -> String {
        self.store.serialize()
    }

    /// Restore every schema field to its default.
    ///
    /// Extra keys (such as pressed-key flags) are kept.
    pub fn reset(&mut self) {
        schema::seed_defaults(&mut self.store);
    }

    /// Remove every section and key.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Record a fault in the diagnostic fields so it travels with the synced
    /// text: bumps `ErrorCount` and overwrites `Last Error`.
    pub fn flag_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        let count = self.error_count().saturating_add(1);
        self.store.set_int(DEBUG, schema::ERROR_COUNT, count);
        self.store.set(DEBUG, schema::LAST_ERROR, message.as_str());
        info!(error_count = count, message = %message, "error flagged");
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    /// Unknown stored values read as [`CmdMode::CmdTerminal`].
    pub fn cmd_mode(&self) -> CmdMode {
        self.string(SETUP, schema::CMD_MODE)
            .parse()
            .unwrap_or_default()
    }

    pub fn set_cmd_mode(&mut self, mode: CmdMode) {
        self.store.set(SETUP, schema::CMD_MODE, mode.as_str());
    }

    /// Changes every time the player opens the terminal.
    pub fn session_id(&self) -> &str {
        self.string(SETUP, schema::SESSION_ID)
    }

    pub fn set_session_id(&mut self, id: impl Into<String>) {
        self.store.set(SETUP, schema::SESSION_ID, id);
    }

    // -----------------------------------------------------------------------
    // States
    // -----------------------------------------------------------------------

    pub fn first_run(&self) -> bool {
        self.store.get_as_bool(STATES, schema::FIRST_RUN)
    }

    pub fn set_first_run(&mut self, value: bool) {
        self.store.set_bool(STATES, schema::FIRST_RUN, value);
    }

    /// Text held in the player's text box.
    pub fn text(&self) -> &str {
        self.string(STATES, schema::TEXT)
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.store.set(STATES, schema::TEXT, text);
    }

    /// Player identifier, unique per player.
    pub fn user(&self) -> &str {
        self.string(STATES, schema::USER)
    }

    pub fn set_user(&mut self, user: impl Into<String>) {
        self.store.set(STATES, schema::USER, user);
    }

    pub fn carriage_index(&self) -> i64 {
        self.store.get_as_int(STATES, schema::CARRIAGE_INDEX)
    }

    pub fn set_carriage_index(&mut self, index: i64) {
        self.store.set_int(STATES, schema::CARRIAGE_INDEX, index);
    }

    // -----------------------------------------------------------------------
    // Pressed-key sets
    // -----------------------------------------------------------------------

    /// Names of the special keys (modifiers, arrows, ...) currently pressed.
    pub fn special_keys(&self) -> Vec<&str> {
        self.store.keys_in(SPECIAL_KEYS)
    }

    pub fn set_special_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.replace_key_set(SPECIAL_KEYS, keys);
    }

    /// Names of the general keys (letters, WASD, ...) currently pressed.
    pub fn general_keys(&self) -> Vec<&str> {
        self.store.keys_in(GENERAL_KEYS)
    }

    pub fn set_general_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.replace_key_set(GENERAL_KEYS, keys);
    }

    // -----------------------------------------------------------------------
    // UI
    // -----------------------------------------------------------------------

    pub fn alpha(&self) -> f64 {
        self.store.get_as_float(UI, schema::ALPHA)
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.store.set_float(UI, schema::ALPHA, alpha);
    }

    pub fn can_play_sound_on_mouse_over(&self) -> bool {
        self.store.get_as_bool(UI, schema::CAN_PLAY_SOUND_ON_MOUSE_OVER)
    }

    pub fn set_can_play_sound_on_mouse_over(&mut self, value: bool) {
        self.store
            .set_bool(UI, schema::CAN_PLAY_SOUND_ON_MOUSE_OVER, value);
    }

    pub fn text_scale(&self) -> f64 {
        self.store.get_as_float(UI, schema::TEXT_SCALE)
    }

    pub fn set_text_scale(&mut self, scale: f64) {
        self.store.set_float(UI, schema::TEXT_SCALE, scale);
    }

    /// Unknown stored values read as [`VisualStyle::Default`].
    pub fn visual_style(&self) -> VisualStyle {
        self.string(UI, schema::VISUAL_STYLE)
            .parse()
            .unwrap_or_default()
    }

    pub fn set_visual_style(&mut self, style: VisualStyle) {
        self.store.set(UI, schema::VISUAL_STYLE, style.as_str());
    }

    pub fn position_x(&self) -> f64 {
        self.store.get_as_float(UI, schema::POSITION_X)
    }

    pub fn set_position_x(&mut self, x: f64) {
        self.store.set_float(UI, schema::POSITION_X, x);
    }

    pub fn position_y(&self) -> f64 {
        self.store.get_as_float(UI, schema::POSITION_Y)
    }

    pub fn set_position_y(&mut self, y: f64) {
        self.store.set_float(UI, schema::POSITION_Y, y);
    }

    pub fn size(&self) -> Vector2 {
        self.store.get_as_vector2(UI, schema::SIZE)
    }

    pub fn set_size(&mut self, size: Vector2) {
        self.store.set_vector2(UI, schema::SIZE, size);
    }

    pub fn color_mask(&self) -> Vector4 {
        self.store.get_as_vector4(UI, schema::COLOR_MASK)
    }

    pub fn set_color_mask(&mut self, color: Vector4) {
        self.store.set_vector4(UI, schema::COLOR_MASK, color);
    }

    pub fn border_color(&self) -> Vector4 {
        self.store.get_as_vector4(UI, schema::BORDER_COLOR)
    }

    pub fn set_border_color(&mut self, color: Vector4) {
        self.store.set_vector4(UI, schema::BORDER_COLOR, color);
    }

    // -----------------------------------------------------------------------
    // Debug
    // -----------------------------------------------------------------------

    pub fn error_count(&self) -> i64 {
        self.store.get_as_int(DEBUG, schema::ERROR_COUNT)
    }

    pub fn last_error(&self) -> &str {
        self.string(DEBUG, schema::LAST_ERROR)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Raw string field; empty if a caller cleared it out of the store.
    fn string(&self, section: &str, key: &str) -> &str {
        self.store.get(section, key).unwrap_or_default()
    }

    fn replace_key_set<I, S>(&mut self, section: &str, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.store.clear_section(section);
        self.store.add_section(section);
        for key in keys {
            self.store.set(section, key.as_ref(), "");
        }
    }
}

impl From<KeyValueStore> for Packet {
    fn from(store: KeyValueStore) -> Self {
        Self { store }
    }
}
