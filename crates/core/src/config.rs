use crate::complexity::ComplexityRules;
use crate::language::{Language, extension_of};
use alloc::string::String;
use hashbrown::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    pub rules: ComplexityRules,
    /// Extension remapping applied before language detection (`jsx` → `js`).
    pub map_ext: HashMap<String, String>,
    /// Parse every `.h` header as C instead of C++.
    pub parse_all_h_as_c: bool,
    /// Directory or file names whose `.h` headers are parsed as C.
    pub parse_some_h_as_c: HashSet<String>,
}

impl AnalysisConfig {
    #[must_use]
    pub fn with_rules(rules: ComplexityRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Detects the language of `id`, honouring `map_ext` and the `.h` options.
    ///
    /// An explicit `map_ext` entry wins over the header options.
    #[must_use]
    pub fn language_of(&self, id: &str) -> Language {
        let Some(ext) = extension_of(id) else {
            return Language::Generic;
        };
        let key = ext.to_lowercase();
        if let Some(mapped) = self.map_ext.get(&key) {
            return Language::from_extension(mapped);
        }
        if key == "h" && self.header_is_c(id) {
            return Language::C;
        }
        Language::from_extension(&key)
    }

    /// `.h` ヘッダを C として読むか (全体指定、またはパス要素の一致)
    fn header_is_c(&self, id: &str) -> bool {
        self.parse_all_h_as_c
            || (!self.parse_some_h_as_c.is_empty()
                && id
                    .split(['/', '\\'])
                    .any(|part| self.parse_some_h_as_c.contains(part)))
    }
}
