//! Declarative flattening schema
//!
//! Every nested group the flattener understands is listed here as a set of
//! `(group, path, output)` triples. A group named in this table never reaches
//! the flat record; only its listed scalar sub-fields do.

/// The group that carries the classification target.
pub const STYLE_GROUP: &str = "style";

/// Raw ingredients group, passed through to the trimmer untouched.
pub const INGREDIENTS_KEY: &str = "ingredients";

/// One scalar extracted from a nested group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath {
    /// Top-level group key (e.g. `style`)
    pub group: &'static str,
    /// Path inside the group (e.g. `["category", "name"]`)
    pub path: &'static [&'static str],
    /// Attribute name in the flat record (e.g. `style_category_name`)
    pub output: &'static str,
}

impl FieldPath {
    const fn new(
        group: &'static str,
        path: &'static [&'static str],
        output: &'static str,
    ) -> Self {
        Self {
            group,
            path,
            output,
        }
    }
}

/// Groups consumed by the flattener.
pub const KNOWN_GROUPS: &[&str] = &[STYLE_GROUP, "available", "glass", "srm"];

/// The flattening table.
pub const FLATTEN_SCHEMA: &[FieldPath] = &[
    FieldPath::new(STYLE_GROUP, &["abvMax"], "style_abvMax"),
    FieldPath::new(STYLE_GROUP, &["abvMin"], "style_abvMin"),
    FieldPath::new(STYLE_GROUP, &["category", "name"], "style_category_name"),
    FieldPath::new(STYLE_GROUP, &["description"], "style_description"),
    FieldPath::new(STYLE_GROUP, &["fgMax"], "style_fgMax"),
    FieldPath::new(STYLE_GROUP, &["fgMin"], "style_fgMin"),
    FieldPath::new(STYLE_GROUP, &["ibuMax"], "style_ibuMax"),
    FieldPath::new(STYLE_GROUP, &["ibuMin"], "style_ibuMin"),
    FieldPath::new(STYLE_GROUP, &["name"], "style_name"),
    FieldPath::new(STYLE_GROUP, &["ogMin"], "style_ogMin"),
    FieldPath::new(STYLE_GROUP, &["shortName"], "style_shortName"),
    FieldPath::new(STYLE_GROUP, &["srmMax"], "style_srmMax"),
    FieldPath::new(STYLE_GROUP, &["srmMin"], "style_srmMin"),
    FieldPath::new("available", &["name"], "available_name"),
    FieldPath::new("available", &["description"], "available_description"),
    FieldPath::new("glass", &["name"], "glass_name"),
    FieldPath::new("srm", &["name"], "srm_name"),
    FieldPath::new("srm", &["hex"], "srm_hex"),
];
