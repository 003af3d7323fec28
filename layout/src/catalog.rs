use crate::error::LayoutError;

/// One control kind and the label class it is annotated with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassEntry {
    pub name: &'static str,
    pub class_index: u32,
}

impl ClassEntry {
    pub const fn new(name: &'static str, class_index: u32) -> Self {
        Self { name, class_index }
    }
}

// Several toggle-like controls collapse onto one trained class.
const DEFAULT_ENTRIES: [ClassEntry; 12] = [
    ClassEntry::new("Button", 0),
    ClassEntry::new("CheckBox", 1),
    ClassEntry::new("ComboBox", 2),
    ClassEntry::new("icon", 3),
    ClassEntry::new("input", 4),
    ClassEntry::new("label", 5),
    ClassEntry::new("menu", 6),
    ClassEntry::new("menuItem", 7),
    ClassEntry::new("radio", 8),
    ClassEntry::new("switch", 8),
    ClassEntry::new("tabControl", 8),
    ClassEntry::new("upDown", 8),
];

/// Ordered name -> class index table.
///
/// Iteration order is the definition order; placement runs in this order, so
/// it decides which control wins when the canvas gets crowded.
#[derive(Clone, Debug)]
pub struct ClassCatalog {
    entries: Vec<ClassEntry>,
}

impl ClassCatalog {
    pub fn new(entries: Vec<ClassEntry>) -> Result<Self, LayoutError> {
        for (i, e) in entries.iter().enumerate() {
            if entries[..i].iter().any(|prev| prev.name == e.name) {
                return Err(LayoutError::DuplicateClass(e.name.to_string()));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ClassEntry] {
        &self.entries
    }

    pub fn class_index_of(&self, name: &str) -> Result<u32, LayoutError> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.class_index)
            .ok_or_else(|| LayoutError::UnknownClass(name.to_string()))
    }

    pub fn class_count(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.class_index as usize + 1)
            .max()
            .unwrap_or(0)
    }

    /// Display name per class index: the first catalog name mapped to it.
    /// Indices nothing maps to come back as `class<N>`.
    pub fn class_names(&self) -> Vec<String> {
        (0..self.class_count())
            .map(|idx| {
                self.entries
                    .iter()
                    .find(|e| e.class_index as usize == idx)
                    .map(|e| e.name.to_string())
                    .unwrap_or_else(|| format!("class{idx}"))
            })
            .collect()
    }
}

impl Default for ClassCatalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ENTRIES.to_vec(),
        }
    }
}
