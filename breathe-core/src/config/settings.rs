//! Settings store
//!
//! Owns the preset table, the active preset selection, the session
//! duration and the theme. Only the personal preset, the last selected
//! preset and the theme are persisted; everything else resets on restart.

use core::fmt;

use breathe_hal::{KeyValueStore, StorageError, StorageKey};
use serde::{Deserialize, Serialize};

use super::preset::PresetName;
use super::theme::Theme;
use super::types::{
    Field, PhaseConfig, SessionConfig, DEFAULT_DURATION_MIN, MAX_DURATION_MIN, MAX_PHASE_S,
    MIN_DURATION_MIN,
};

/// Magic number to identify a personal preset record
pub const PERSONAL_MAGIC: u32 = 0x4252_5448; // "BRTH"

/// Current personal preset record version
pub const PERSONAL_VERSION: u8 = 1;

/// Maximum serialized personal preset size
const MAX_RECORD_SIZE: usize = 32;

/// Maximum stored name size (preset or theme)
const MAX_NAME_SIZE: usize = 16;

/// Settings persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Storage operation failed
    Storage(StorageError),
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Stored record has a bad magic, version, or unusable timings
    InvalidRecord,
    /// Stored name is not a known preset or theme
    UnknownName,
}

impl From<StorageError> for SettingsError {
    fn from(e: StorageError) -> Self {
        SettingsError::Storage(e)
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Storage(e) => write!(f, "storage error: {}", e),
            SettingsError::Serialize => f.write_str("failed to serialize record"),
            SettingsError::Deserialize => f.write_str("failed to deserialize record"),
            SettingsError::InvalidRecord => f.write_str("invalid stored record"),
            SettingsError::UnknownName => f.write_str("unknown stored name"),
        }
    }
}

/// Personal preset as written to storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct PersonalRecord {
    magic: u32,
    version: u8,
    phases: PhaseConfig,
}

impl PersonalRecord {
    fn new(phases: PhaseConfig) -> Self {
        Self {
            magic: PERSONAL_MAGIC,
            version: PERSONAL_VERSION,
            phases,
        }
    }

    fn is_valid(&self) -> bool {
        self.magic == PERSONAL_MAGIC && self.version == PERSONAL_VERSION && self.phases.is_usable()
    }
}

/// Snapshot of the settings for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingsView {
    /// Active preset
    pub preset: PresetName,
    /// Phase timings shown for the active preset
    pub phases: PhaseConfig,
    /// Session length (minutes)
    pub duration_min: u8,
    /// Active theme
    pub theme: Theme,
    /// Which phase fields accept adjustments, in [`Field::PHASES`] order
    pub adjustable: [bool; 4],
}

impl SettingsView {
    /// Check if a field accepts adjustments
    pub fn is_adjustable(&self, field: Field) -> bool {
        match field {
            Field::Inhale => self.adjustable[0],
            Field::Hold1 => self.adjustable[1],
            Field::Exhale => self.adjustable[2],
            Field::Hold2 => self.adjustable[3],
            Field::Duration => true,
        }
    }
}

/// Settings store with per-preset adjustment rules
pub struct Settings<S: KeyValueStore> {
    /// Persistence backend
    store: S,
    /// Stored timings per preset, indexed by [`PresetName::index`]
    presets: [PhaseConfig; PresetName::COUNT],
    /// Active preset
    active: PresetName,
    /// Timings shown and used for the next session
    current: PhaseConfig,
    /// Session length (minutes)
    duration_min: u8,
    /// Active theme
    theme: Theme,
    /// Problems found while loading (missing keys are not problems)
    load_issues: heapless::Vec<(StorageKey, SettingsError), { StorageKey::COUNT }>,
}

impl<S: KeyValueStore> Settings<S> {
    /// Create settings with factory defaults, without reading storage
    pub fn new(store: S) -> Self {
        let presets = PresetName::ALL.map(PresetName::defaults);
        let active = PresetName::default();
        Self {
            store,
            presets,
            active,
            current: presets[active.index()],
            duration_min: DEFAULT_DURATION_MIN,
            theme: Theme::default(),
            load_issues: heapless::Vec::new(),
        }
    }

    /// Load settings from storage
    ///
    /// Missing keys fall back to defaults silently. Unreadable or invalid
    /// values also fall back, and are reported by [`Self::take_load_issues`].
    pub fn load(store: S) -> Self {
        let mut settings = Self::new(store);

        match settings.read_personal() {
            Ok(phases) => settings.presets[PresetName::Personal.index()] = phases,
            Err(SettingsError::Storage(StorageError::NotFound)) => {}
            Err(e) => settings.note_issue(StorageKey::PersonalPreset, e),
        }

        match settings.read_name(StorageKey::LastPreset, PresetName::from_name) {
            Ok(preset) => settings.active = preset,
            Err(SettingsError::Storage(StorageError::NotFound)) => {}
            Err(e) => settings.note_issue(StorageKey::LastPreset, e),
        }

        match settings.read_name(StorageKey::Theme, Theme::from_name) {
            Ok(theme) => settings.theme = theme,
            Err(SettingsError::Storage(StorageError::NotFound)) => {}
            Err(e) => settings.note_issue(StorageKey::Theme, e),
        }

        settings.current = settings.presets[settings.active.index()];
        settings
    }

    /// Take the problems found while loading
    pub fn take_load_issues(
        &mut self,
    ) -> heapless::Vec<(StorageKey, SettingsError), { StorageKey::COUNT }> {
        core::mem::take(&mut self.load_issues)
    }

    /// Active preset
    pub fn active_preset(&self) -> PresetName {
        self.active
    }

    /// Timings for the next session
    pub fn phases(&self) -> PhaseConfig {
        self.current
    }

    /// Session length (minutes)
    pub fn duration_min(&self) -> u8 {
        self.duration_min
    }

    /// Active theme
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Stored timings of a preset
    pub fn preset_phases(&self, preset: PresetName) -> PhaseConfig {
        self.presets[preset.index()]
    }

    /// Configuration for the next session
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.current, self.duration_min)
    }

    /// Snapshot for display
    pub fn view(&self) -> SettingsView {
        let rule = self.active.rule();
        SettingsView {
            preset: self.active,
            phases: self.current,
            duration_min: self.duration_min,
            theme: self.theme,
            adjustable: Field::PHASES.map(|field| rule.is_adjustable(field)),
        }
    }

    /// Switch the active preset
    ///
    /// The visible timings are reloaded from the preset's stored values;
    /// no other preset is touched. The selection is applied even if it
    /// cannot be persisted.
    pub fn select_preset(&mut self, preset: PresetName) -> Result<(), SettingsError> {
        self.active = preset;
        self.current = self.presets[preset.index()];
        self.store
            .write(StorageKey::LastPreset, preset.as_str().as_bytes())?;
        Ok(())
    }

    /// Adjust a field by `delta` under the active preset's rule
    ///
    /// Out-of-range values are clamped. Returns `Ok(false)` if the active
    /// preset does not allow adjusting the field. Personal preset edits are
    /// written to storage immediately; the in-memory change stands even if
    /// the write fails.
    pub fn adjust(&mut self, field: Field, delta: i16) -> Result<bool, SettingsError> {
        if field == Field::Duration {
            let next = self.duration_min as i32 + delta as i32;
            self.duration_min = next.clamp(MIN_DURATION_MIN as i32, MAX_DURATION_MIN as i32) as u8;
            return Ok(true);
        }

        let rule = self.active.rule();
        if !rule.adjust(&mut self.current, field, delta) {
            return Ok(false);
        }

        if rule.persists() {
            self.presets[self.active.index()] = self.current;
            self.write_personal()?;
        }
        Ok(true)
    }

    /// Set the session length, clamped to the allowed range
    pub fn set_duration(&mut self, minutes: u8) {
        self.duration_min = minutes.clamp(MIN_DURATION_MIN, MAX_DURATION_MIN);
    }

    /// Advance to the next theme and persist it
    pub fn cycle_theme(&mut self) -> Result<Theme, SettingsError> {
        let next = self.theme.next();
        self.set_theme(next)?;
        Ok(next)
    }

    /// Set the theme and persist it
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), SettingsError> {
        self.theme = theme;
        self.store.write(StorageKey::Theme, theme.as_str().as_bytes())?;
        Ok(())
    }

    /// Borrow the storage backend
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the settings and return the storage backend
    pub fn into_store(self) -> S {
        self.store
    }

    fn note_issue(&mut self, key: StorageKey, error: SettingsError) {
        let _ = self.load_issues.push((key, error));
    }

    fn read_personal(&mut self) -> Result<PhaseConfig, SettingsError> {
        let mut buffer = [0u8; MAX_RECORD_SIZE];
        let len = self.store.read(StorageKey::PersonalPreset, &mut buffer)?;

        let record: PersonalRecord =
            postcard::from_bytes(&buffer[..len]).map_err(|_| SettingsError::Deserialize)?;
        if !record.is_valid() {
            return Err(SettingsError::InvalidRecord);
        }

        let mut phases = record.phases;
        for field in Field::PHASES {
            if let Some(value) = phases.get(field) {
                phases.set(field, value.min(MAX_PHASE_S));
            }
        }
        Ok(phases)
    }

    fn write_personal(&mut self) -> Result<(), SettingsError> {
        let record = PersonalRecord::new(self.presets[PresetName::Personal.index()]);
        let mut buffer = [0u8; MAX_RECORD_SIZE];
        let bytes =
            postcard::to_slice(&record, &mut buffer).map_err(|_| SettingsError::Serialize)?;
        self.store.write(StorageKey::PersonalPreset, bytes)?;
        Ok(())
    }

    fn read_name<T>(
        &mut self,
        key: StorageKey,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, SettingsError> {
        let mut buffer = [0u8; MAX_NAME_SIZE];
        let len = self.store.read(key, &mut buffer)?;
        let name = core::str::from_utf8(&buffer[..len]).map_err(|_| SettingsError::Deserialize)?;
        parse(name).ok_or(SettingsError::UnknownName)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::preset::{BOX_MAX_S, BOX_MIN_S};
    use breathe_hal::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_defaults_without_storage() {
        let settings = Settings::load(MemoryStore::new());
        assert_eq!(settings.active_preset(), PresetName::Personal);
        assert_eq!(settings.phases(), PhaseConfig::new(5, 0, 5, 0));
        assert_eq!(settings.duration_min(), DEFAULT_DURATION_MIN);
        assert_eq!(settings.theme(), Theme::Blue);
    }

    #[test]
    fn test_box_adjust_and_clamp() {
        let mut settings = Settings::new(MemoryStore::new());
        settings.select_preset(PresetName::Box).unwrap();
        assert_eq!(settings.phases(), PhaseConfig::uniform(4));

        assert_eq!(settings.adjust(Field::Inhale, 1), Ok(true));
        assert_eq!(settings.phases(), PhaseConfig::uniform(5));

        for _ in 0..6 {
            settings.adjust(Field::Inhale, 1).unwrap();
        }
        assert_eq!(settings.phases(), PhaseConfig::uniform(BOX_MAX_S));

        for _ in 0..20 {
            settings.adjust(Field::Inhale, -1).unwrap();
        }
        assert_eq!(settings.phases(), PhaseConfig::uniform(BOX_MIN_S));
    }

    #[test]
    fn test_box_rejects_other_fields() {
        let mut settings = Settings::new(MemoryStore::new());
        settings.select_preset(PresetName::Box).unwrap();
        assert_eq!(settings.adjust(Field::Exhale, 1), Ok(false));
        assert_eq!(settings.phases(), PhaseConfig::uniform(4));
    }

    #[test]
    fn test_478_hold2_noop() {
        let mut settings = Settings::new(MemoryStore::new());
        settings.select_preset(PresetName::FourSevenEight).unwrap();
        let before = settings.phases();

        assert_eq!(settings.adjust(Field::Hold2, 1), Ok(false));
        assert_eq!(settings.phases(), before);
    }

    #[test]
    fn test_duration_clamps_in_every_preset() {
        let mut settings = Settings::new(MemoryStore::new());
        for preset in PresetName::ALL {
            settings.select_preset(preset).unwrap();
            settings.adjust(Field::Duration, 100).unwrap();
            assert_eq!(settings.duration_min(), MAX_DURATION_MIN);
            settings.adjust(Field::Duration, -100).unwrap();
            assert_eq!(settings.duration_min(), MIN_DURATION_MIN);
        }
    }

    #[test]
    fn test_box_edits_do_not_survive_switch() {
        let mut settings = Settings::new(MemoryStore::new());
        settings.select_preset(PresetName::Box).unwrap();
        settings.adjust(Field::Inhale, 3).unwrap();

        settings.select_preset(PresetName::Personal).unwrap();
        settings.select_preset(PresetName::Box).unwrap();
        assert_eq!(settings.phases(), PhaseConfig::uniform(4));
        assert_eq!(
            settings.preset_phases(PresetName::Personal),
            PresetName::Personal.defaults()
        );
    }

    #[test]
    fn test_personal_roundtrip_through_storage() {
        let mut settings = Settings::new(MemoryStore::new());
        settings.select_preset(PresetName::Personal).unwrap();
        settings.adjust(Field::Hold1, 3).unwrap();
        settings.adjust(Field::Exhale, 2).unwrap();
        let edited = settings.phases();
        assert_eq!(edited, PhaseConfig::new(5, 3, 7, 0));

        let reloaded = Settings::load(settings.into_store());
        assert_eq!(reloaded.active_preset(), PresetName::Personal);
        assert_eq!(reloaded.preset_phases(PresetName::Personal), edited);
        assert_eq!(reloaded.phases(), edited);
    }

    #[test]
    fn test_non_personal_edits_not_written() {
        let mut settings = Settings::new(MemoryStore::new());
        settings.select_preset(PresetName::Box).unwrap();
        let writes = settings.store().write_count();

        settings.adjust(Field::Inhale, 1).unwrap();
        assert_eq!(settings.store().write_count(), writes);
        assert!(settings.store().get(StorageKey::PersonalPreset).is_none());
    }

    #[test]
    fn test_preset_and_theme_persist() {
        let mut settings = Settings::new(MemoryStore::new());
        settings.select_preset(PresetName::FourSevenEight).unwrap();
        assert_eq!(settings.cycle_theme(), Ok(Theme::Forest));

        let reloaded = Settings::load(settings.into_store());
        assert_eq!(reloaded.active_preset(), PresetName::FourSevenEight);
        assert_eq!(reloaded.phases(), PhaseConfig::new(4, 7, 8, 0));
        assert_eq!(reloaded.theme(), Theme::Forest);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let mut store = MemoryStore::new();
        store.write(StorageKey::Theme, b"neon").unwrap();

        let mut settings = Settings::load(store);
        assert_eq!(settings.theme(), Theme::Blue);
        let issues = settings.take_load_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0], (StorageKey::Theme, SettingsError::UnknownName));
    }

    #[test]
    fn test_corrupt_personal_falls_back() {
        let mut store = MemoryStore::new();
        store.write(StorageKey::PersonalPreset, &[0xFF, 0x01]).unwrap();

        let mut settings = Settings::load(store);
        assert_eq!(
            settings.preset_phases(PresetName::Personal),
            PresetName::Personal.defaults()
        );
        assert_eq!(settings.take_load_issues().len(), 1);
    }

    #[test]
    fn test_unusable_personal_record_rejected() {
        let mut store = MemoryStore::new();
        let record = PersonalRecord::new(PhaseConfig::new(0, 4, 0, 4));
        let mut buffer = [0u8; MAX_RECORD_SIZE];
        let bytes = postcard::to_slice(&record, &mut buffer).unwrap();
        store.write(StorageKey::PersonalPreset, bytes).unwrap();

        let mut settings = Settings::load(store);
        assert_eq!(
            settings.preset_phases(PresetName::Personal),
            PresetName::Personal.defaults()
        );
        let issues = settings.take_load_issues();
        assert_eq!(
            issues[0],
            (StorageKey::PersonalPreset, SettingsError::InvalidRecord)
        );
    }

    #[test]
    fn test_write_failure_keeps_edit() {
        let mut settings = Settings::new(MemoryStore::read_only());
        let result = settings.adjust(Field::Inhale, 1);
        assert_eq!(
            result,
            Err(SettingsError::Storage(StorageError::Backend))
        );
        assert_eq!(settings.phases().inhale_s, 6);
    }

    #[test]
    fn test_view_marks_adjustable_fields() {
        let mut settings = Settings::new(MemoryStore::new());
        settings.select_preset(PresetName::Box).unwrap();
        assert_eq!(settings.view().adjustable, [true, false, false, false]);

        settings.select_preset(PresetName::FourSevenEight).unwrap();
        assert_eq!(settings.view().adjustable, [true, true, true, false]);

        settings.select_preset(PresetName::Personal).unwrap();
        assert_eq!(settings.view().adjustable, [true; 4]);
        assert!(settings.view().is_adjustable(Field::Duration));
    }

    fn field_strategy() -> impl Strategy<Value = Field> {
        prop_oneof![
            Just(Field::Inhale),
            Just(Field::Hold1),
            Just(Field::Exhale),
            Just(Field::Hold2),
            Just(Field::Duration),
        ]
    }

    fn preset_strategy() -> impl Strategy<Value = PresetName> {
        prop_oneof![
            Just(PresetName::Box),
            Just(PresetName::FourSevenEight),
            Just(PresetName::Personal),
        ]
    }

    proptest! {
        #[test]
        fn prop_adjustments_keep_config_usable(
            preset in preset_strategy(),
            edits in proptest::collection::vec((field_strategy(), -40i16..40), 0..40),
        ) {
            let mut settings = Settings::new(MemoryStore::new());
            settings.select_preset(preset).unwrap();
            for (field, delta) in edits {
                let _ = settings.adjust(field, delta);
            }

            let phases = settings.phases();
            prop_assert!(phases.is_usable());
            for field in Field::PHASES {
                prop_assert!(phases.get(field).unwrap() <= MAX_PHASE_S);
            }
            prop_assert!((MIN_DURATION_MIN..=MAX_DURATION_MIN).contains(&settings.duration_min()));
            if preset == PresetName::Box {
                prop_assert_eq!(phases, PhaseConfig::uniform(phases.inhale_s));
            }
            if preset == PresetName::FourSevenEight {
                prop_assert_eq!(phases.hold2_s, 0);
            }
        }

        #[test]
        fn prop_personal_survives_reload(
            edits in proptest::collection::vec((field_strategy(), -10i16..10), 1..20),
        ) {
            let mut settings = Settings::new(MemoryStore::new());
            for (field, delta) in edits {
                settings.adjust(field, delta).unwrap();
            }
            let edited = settings.preset_phases(PresetName::Personal);

            let reloaded = Settings::load(settings.into_store());
            prop_assert_eq!(reloaded.preset_phases(PresetName::Personal), edited);
        }
    }
}
