//! The fixed terminal schema: section/key names and their default values.
//!
//! The schema is closed. Reconciliation only ever merges keys that exist in
//! this layout; anything else an external editor adds is left out of the
//! local store.

use crate::store::KeyValueStore;

pub const SETUP: &str = "Setup";
pub const STATES: &str = "States";
pub const SPECIAL_KEYS: &str = "SpecialKeys";
pub const UI: &str = "UI";
pub const GENERAL_KEYS: &str = "GeneralKeys";
pub const DEBUG: &str = "Debug";

pub const CMD_MODE: &str = "CMDMode";
pub const SESSION_ID: &str = "SessionID";
pub const FIRST_RUN: &str = "FirstRun";
pub const TEXT: &str = "Text";
pub const USER: &str = "User";
pub const CARRIAGE_INDEX: &str = "CarriageIndex";
pub const ALPHA: &str = "Alpha";
pub const CAN_PLAY_SOUND_ON_MOUSE_OVER: &str = "CanPlaySoundOnMouseOver";
pub const TEXT_SCALE: &str = "TextScale";
pub const VISUAL_STYLE: &str = "VisualStyle";
pub const POSITION_X: &str = "PositionX";
pub const POSITION_Y: &str = "PositionY";
pub const SIZE: &str = "Size";
pub const COLOR_MASK: &str = "ColorMask";
pub const BORDER_COLOR: &str = "BorderColor";
pub const ERROR_COUNT: &str = "ErrorCount";
pub const LAST_ERROR: &str = "Last Error";

/// One section of the default layout. Free-form sections have no defaults.
pub struct SchemaSection {
    pub name: &'static str,
    pub defaults: &'static [(&'static str, &'static str)],
}

/// Default layout in canonical order.
pub const LAYOUT: &[SchemaSection] = &[
    SchemaSection {
        name: SETUP,
        defaults: &[(CMD_MODE, "CMDTerminal"), (SESSION_ID, "NA")],
    },
    SchemaSection {
        name: STATES,
        defaults: &[
            (FIRST_RUN, "True"),
            (TEXT, ""),
            (USER, "PLACEHOLDERUSER"),
            (CARRIAGE_INDEX, "0"),
        ],
    },
    SchemaSection {
        name: SPECIAL_KEYS,
        defaults: &[],
    },
    SchemaSection {
        name: UI,
        defaults: &[
            (ALPHA, "1"),
            (CAN_PLAY_SOUND_ON_MOUSE_OVER, "False"),
            (TEXT_SCALE, "0.8"),
            (VISUAL_STYLE, "Debug"),
            (POSITION_X, "0.15"),
            (POSITION_Y, "0"),
            (SIZE, "( 0.15 , 0.15 )"),
            (COLOR_MASK, "( 1 , 1 , 1 , 1 )"),
            (BORDER_COLOR, "( 0 , 0 , 0 , 1 )"),
        ],
    },
    SchemaSection {
        name: GENERAL_KEYS,
        defaults: &[],
    },
    SchemaSection {
        name: DEBUG,
        defaults: &[(ERROR_COUNT, "0"), (LAST_ERROR, "None")],
    },
];

/// Write every default into `store`, overwriting existing values.
pub fn seed_defaults(store: &mut KeyValueStore) {
    for section in LAYOUT {
        store.add_section(section.name);
        for (key, value) in section.defaults {
            store.set(section.name, key, *value);
        }
    }
}

/// A fresh store holding exactly the default layout.
pub fn default_store() -> KeyValueStore {
    let mut store = KeyValueStore::new();
    seed_defaults(&mut store);
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_store_layout() {
        let store = default_store();
        assert_eq!(
            store.sections(),
            vec![SETUP, STATES, SPECIAL_KEYS, UI, GENERAL_KEYS, DEBUG]
        );
        assert_eq!(store.len(), 17);
        assert_eq!(store.get(DEBUG, LAST_ERROR), Ok("None"));
        assert_eq!(store.get(STATES, TEXT), Ok(""));
    }

    #[test]
    fn test_default_document() {
        let expected = "\
[Setup]
CMDMode=CMDTerminal
SessionID=NA

[States]
FirstRun=True
Text=
User=PLACEHOLDERUSER
CarriageIndex=0

[SpecialKeys]

[UI]
Alpha=1
CanPlaySoundOnMouseOver=False
TextScale=0.8
VisualStyle=Debug
PositionX=0.15
PositionY=0
Size=( 0.15 , 0.15 )
ColorMask=( 1 , 1 , 1 , 1 )
BorderColor=( 0 , 0 , 0 , 1 )

[GeneralKeys]

[Debug]
ErrorCount=0
Last Error=None
";
        assert_eq!(default_store().serialize(), expected);
    }
}
