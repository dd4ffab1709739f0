//! Factory drawbar registrations.
//!
//! Each entry sets the nine drawbars of a tonewheel organ, in the order they
//! sit on the instrument: 16', 5 1/3', 8', 4', 2 2/3', 2', 1 3/5', 1 1/3', 1'.
//! Levels run 0 (pushed in) to 8 (pulled all the way out). `(U)` and `(L)`
//! mark the upper and lower manual of a two-manual registration.

/// One named registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub drawbars: [u8; 9],
}

impl Preset {
    const fn new(name: &'static str, drawbars: [u8; 9]) -> Self {
        Self { name, drawbars }
    }

    pub fn levels(&self) -> [f64; 9] {
        self.drawbars.map(f64::from)
    }
}

/// Read-only view over the built-in registrations.
#[derive(Debug, Clone, Copy)]
pub struct PresetTable {
    presets: &'static [Preset],
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::factory()
    }
}

impl PresetTable {
    pub const fn factory() -> Self {
        Self { presets: &FACTORY }
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'static Preset> {
        self.presets.get(index)
    }

    /// Preset for a control value: truncated and clamped into the table.
    /// NaN selects the first entry.
    pub fn select(&self, value: f64) -> Option<&'static Preset> {
        let last = self.presets.len().checked_sub(1)?;
        let index = if value.is_nan() { 0 } else { value.clamp(0.0, last as f64) as usize };
        self.presets.get(index)
    }

    /// Case-insensitive lookup by name.
    pub fn find(&self, name: &str) -> Option<(usize, &'static Preset)> {
        self.presets
            .iter()
            .enumerate()
            .find(|(_, preset)| preset.name.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.presets.iter().map(|preset| preset.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Preset> {
        self.presets.iter()
    }
}

static FACTORY: [Preset; 98] = [
    Preset::new("Alone in the City", [0, 0, 7, 7, 4, 0, 0, 3, 4]),
    Preset::new("America (Gospel) (U)", [8, 8, 7, 7, 2, 4, 1, 1, 0]),
    Preset::new("America (Gospel) (L)", [0, 0, 6, 6, 0, 6, 0, 0, 0]),
    Preset::new("Blues", [8, 8, 5, 3, 2, 4, 5, 8, 8]),
    Preset::new("Booker T. Jones 1", [8, 8, 8, 8, 0, 0, 0, 0, 0]),
    Preset::new("Booker T. Jones 2", [8, 8, 8, 6, 3, 0, 0, 0, 0]),
    Preset::new("Born to B3 (Gospel) (U)", [8, 8, 8, 8, 0, 8, 0, 0, 8]),
    Preset::new("Born to B3 (Gospel) (L)", [0, 0, 7, 7, 2, 5, 4, 0, 0]),
    Preset::new("Brian Auger 1", [8, 8, 8, 1, 1, 0, 0, 0, 0]),
    Preset::new("Brian Auger 2", [8, 8, 8, 8, 0, 5, 0, 0, 0]),
    Preset::new("Bright Comping", [8, 7, 8, 0, 0, 0, 4, 5, 6]),
    Preset::new("Brother Jack", [8, 0, 0, 0, 0, 0, 8, 8, 8]),
    Preset::new("Dark Comping", [8, 4, 3, 0, 0, 0, 0, 0, 0]),
    Preset::new("Dark Solo A (U)", [8, 8, 8, 8, 8, 8, 8, 8, 8]),
    Preset::new("Dark Solo A (L)", [6, 6, 2, 0, 0, 0, 0, 0, 0]),
    Preset::new("Dark Solo B (U)", [8, 2, 8, 2, 0, 0, 0, 0, 2]),
    Preset::new("Dark Solo B (L)", [6, 0, 6, 0, 0, 0, 0, 0, 0]),
    Preset::new("Fat", [8, 8, 8, 0, 0, 0, 8, 8, 8]),
    Preset::new("Fifth Organ (Gospel) (U)", [0, 8, 0, 0, 8, 0, 8, 8, 3]),
    Preset::new("Fifth Organ (Gospel) (L)", [0, 0, 8, 8, 0, 6, 0, 0, 0]),
    Preset::new("Flutes", [0, 0, 6, 8, 0, 2, 0, 0, 0]),
    Preset::new("Full and High", [8, 8, 8, 6, 6, 6, 8, 8, 8]),
    Preset::new("Full and Sweet", [8, 6, 8, 8, 6, 8, 0, 6, 8]),
    Preset::new("Full Organ", [8, 8, 8, 8, 8, 8, 8, 8, 8]),
    Preset::new("Funky Comping", [6, 8, 8, 6, 0, 0, 0, 0, 4]),
    Preset::new("Gimme Some Loving", [8, 8, 8, 8, 0, 0, 0, 0, 0]),
    Preset::new("Gospel 1", [8, 0, 8, 8, 0, 8, 0, 0, 8]),
    Preset::new("Gospel 2", [8, 8, 8, 0, 0, 0, 0, 0, 8]),
    Preset::new("Greg Allman 1", [8, 6, 8, 6, 6, 6, 5, 6, 8]),
    Preset::new("Greg Allman 2", [8, 8, 8, 6, 0, 0, 0, 0, 0]),
    Preset::new("Greg Allman 3", [8, 8, 6, 0, 0, 0, 0, 4, 0]),
    Preset::new("Greg Rolie 1", [8, 8, 8, 8, 0, 0, 0, 8, 8]),
    Preset::new("Greg Rolie 2", [8, 8, 6, 4, 0, 0, 0, 0, 0]),
    Preset::new("Greg Rolie 4", [8, 8, 8, 8, 8, 6, 6, 6, 6]),
    Preset::new("Groove Holmes (Gospel) (U)", [8, 8, 8, 4, 2, 0, 0, 8, 0]),
    Preset::new("Groove Holmes (Gospel) (L)", [0, 0, 0, 5, 0, 5, 0, 0, 0]),
    Preset::new("House Bass (Gospel) (U)", [8, 8, 0, 0, 0, 0, 0, 0, 0]),
    Preset::new("House Bass (Gospel) (L)", [0, 0, 8, 0, 8, 0, 0, 0, 0]),
    Preset::new("Jimmy McGriff 1", [8, 6, 8, 6, 0, 0, 0, 0, 6]),
    Preset::new("Jimmy McGriff 2 (Gospel) (U)", [8, 8, 3, 2, 0, 0, 1, 2, 5]),
    Preset::new("Jimmy McGriff 2 (Gospel) (L)", [4, 4, 8, 6, 5, 0, 0, 0, 0]),
    Preset::new("Jimmy Smith 1 (U)", [8, 8, 8, 8, 8, 8, 8, 8, 8]),
    Preset::new("Jimmy Smith 1 (L)", [0, 0, 7, 5, 0, 0, 0, 0, 0]),
    Preset::new("Jimmy Smith 2 (U)", [8, 8, 8, 0, 0, 0, 0, 0, 0]),
    Preset::new("Jimmy Smith 2 (L)", [8, 3, 8, 0, 0, 0, 0, 0, 0]),
    Preset::new("Jimmy Smith 3 (U)", [8, 8, 8, 0, 0, 0, 0, 0, 0]),
    Preset::new("Jimmy Smith 3 (L)", [8, 0, 8, 0, 0, 0, 0, 0, 0]),
    Preset::new("Joey DeFrancesco", [8, 8, 8, 4, 0, 0, 0, 8, 0]),
    Preset::new("Jon Lord", [8, 8, 4, 4, 0, 0, 0, 0, 0]),
    Preset::new("Latin (Gospel) (U)", [8, 8, 0, 0, 6, 0, 0, 0, 0]),
    Preset::new("Latin (Gospel) (L)", [0, 0, 6, 6, 7, 6, 0, 0, 0]),
    Preset::new("Matthew Fisher", [8, 0, 0, 8, 0, 8, 0, 0, 0]),
    Preset::new("Melvin Crispel", [8, 6, 8, 8, 0, 0, 0, 0, 4]),
    Preset::new("Mellow", [8, 0, 3, 6, 0, 0, 0, 0, 0]),
    Preset::new("Meditation Time (Gospel) (U)", [0, 0, 7, 8, 0, 0, 4, 5, 3]),
    Preset::new("Meditation Time (Gospel) (L)", [0, 0, 6, 7, 0, 0, 5, 4, 0]),
    Preset::new("Paul Shaffer 1", [8, 8, 6, 8, 0, 0, 3, 0, 0]),
    Preset::new("Paul Shaffer 2", [8, 8, 8, 7, 6, 8, 8, 8, 8]),
    Preset::new("Paul Shaffer 3", [8, 8, 8, 8, 7, 8, 6, 7, 8]),
    Preset::new("Pink Floyd", [8, 5, 0, 0, 0, 5, 0, 0, 0]),
    Preset::new("Power Chords", [8, 8, 8, 8, 0, 0, 0, 0, 0]),
    Preset::new("Progressive (Gospel) (U)", [8, 8, 8, 8, 0, 0, 0, 0, 0]),
    Preset::new("Progressive (Gospel) (L)", [0, 0, 8, 8, 8, 4, 0, 0, 0]),
    Preset::new("Ray Charles", [0, 0, 6, 8, 7, 6, 4, 0, 0]),
    Preset::new("Reggae", [8, 0, 8, 0, 0, 0, 0, 0, 8]),
    Preset::new("Rock R&B (U)", [8, 8, 8, 8, 0, 0, 0, 0, 0]),
    Preset::new("Rock R&B (L)", [8, 4, 8, 0, 0, 0, 0, 0, 0]),
    Preset::new("Screaming (Gospel) (U)", [8, 0, 0, 3, 8, 8, 8, 8, 8]),
    Preset::new("Screaming (Gospel) (L)", [0, 0, 7, 0, 3, 3, 3, 3, 3]),
    Preset::new("Shirley Scott", [0, 0, 8, 8, 8, 8, 8, 0, 0]),
    Preset::new("Simmering", [8, 3, 0, 0, 0, 0, 3, 7, 8]),
    Preset::new("Shouting 1", [8, 7, 6, 5, 5, 6, 7, 8, 8]),
    Preset::new("Shouting 2", [6, 6, 8, 8, 4, 8, 5, 8, 8]),
    Preset::new("Shouting 3 (Gospel) (U)", [8, 7, 8, 6, 4, 5, 4, 6, 6]),
    Preset::new("Shouting 3 (Gospel) (L)", [8, 8, 8, 8, 0, 0, 0, 0, 0]),
    Preset::new("Slow Ballad", [0, 0, 8, 4, 0, 0, 0, 0, 0]),
    Preset::new("Slowly", [0, 6, 8, 8, 4, 0, 0, 0, 3]),
    Preset::new("Soft Backing (Gospel) (U)", [8, 8, 8, 7, 0, 0, 0, 0, 0]),
    Preset::new("Soft Backing (Gospel) (L)", [5, 5, 5, 4, 0, 0, 0, 0, 0]),
    Preset::new("Soft Chords", [8, 0, 8, 4, 0, 0, 0, 0, 8]),
    Preset::new("Speaker Talking (Gospel) (U)", [6, 7, 8, 4, 0, 4, 2, 3, 1]),
    Preset::new("Speaker Talking (Gospel) (L)", [0, 0, 6, 6, 0, 2, 0, 2, 4]),
    Preset::new("Steppenwolf", [8, 8, 8, 6, 4, 3, 2, 0, 0]),
    Preset::new("Steve Winwood", [8, 8, 8, 8, 7, 6, 7, 8, 8]),
    Preset::new("Strings", [8, 7, 6, 5, 4, 3, 2, 1, 1]),
    Preset::new("Sweet", [0, 0, 8, 0, 0, 0, 0, 0, 0]),
    Preset::new("Testimony Service (Gospel) (U)", [7, 8, 7, 7, 4, 6, 0, 4, 6]),
    Preset::new("Testimony Service (Gospel) (L)", [0, 0, 8, 8, 0, 0, 6, 7, 3]),
    Preset::new("Theatre Organ (Gospel) (U)", [8, 7, 8, 6, 5, 6, 4, 6, 7]),
    Preset::new("Theatre Organ (Gospel) (L)", [0, 0, 8, 8, 4, 4, 0, 0, 0]),
    Preset::new("Tom Coster", [8, 8, 8, 8, 0, 0, 0, 0, 0]),
    Preset::new("Whistle 1", [8, 0, 0, 0, 0, 0, 0, 0, 8]),
    Preset::new("Whistle 2", [8, 8, 8, 0, 0, 0, 0, 0, 8]),
    Preset::new("Whiter Shade Of Pale 1 (U)", [6, 8, 8, 6, 0, 0, 0, 0, 0]),
    Preset::new("Whiter Shade Of Pale 1 (L)", [8, 8, 0, 0, 7, 0, 7, 7, 0]),
    Preset::new("Whiter Shade Of Pale 2 (U)", [8, 8, 8, 8, 0, 8, 0, 0, 6]),
    Preset::new("Whiter Shade Of Pale 2 (L)", [0, 0, 4, 4, 4, 0, 0, 0, 0]),
    Preset::new("Wide Leslie", [8, 6, 6, 8, 0, 0, 0, 0, 0]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_table_is_complete() {
        let table = PresetTable::factory();
        assert_eq!(table.len(), 98);
        assert!(table.iter().all(|preset| preset.drawbars.iter().all(|&level| level <= 8)));
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = PresetTable::factory().names().collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 98);
    }

    #[test]
    fn lookup_by_index_and_name() {
        let table = PresetTable::factory();
        let first = table.get(0).expect("non-empty");
        assert_eq!(first.name, "Alone in the City");
        assert_eq!(first.drawbars, [0, 0, 7, 7, 4, 0, 0, 3, 4]);

        let (index, preset) = table.find("booker t. jones 1").expect("known preset");
        assert_eq!(index, 4);
        assert_eq!(preset.drawbars, [8, 8, 8, 8, 0, 0, 0, 0, 0]);
        assert!(table.find("Nope").is_none());
    }

    #[test]
    fn selector_values_are_clamped() {
        let table = PresetTable::factory();
        assert_eq!(table.select(-3.0), table.get(0));
        assert_eq!(table.select(4.9), table.get(4));
        assert_eq!(table.select(1e9), table.get(97));
        assert_eq!(table.select(f64::NAN), table.get(0));
    }
}
