//! Record flattener: one generic fold over [`FLATTEN_SCHEMA`].

use super::schema::{FLATTEN_SCHEMA, INGREDIENTS_KEY, KNOWN_GROUPS, STYLE_GROUP};
use super::{FlatRecord, RawRecord, Scalar};
use serde_json::Value;

/// Flatten one raw record.
///
/// Returns `None` when the record has no `style` object: without a style
/// there is no classification target, and the caller skips the record.
///
/// # Examples
///
/// ```rust
/// use beer_styles::record::{flatten, Scalar};
/// use serde_json::json;
///
/// let raw = json!({"style": {"name": "IPA", "abvMax": 7.5}});
/// let flat = flatten(raw.as_object().unwrap()).unwrap();
/// assert_eq!(flat.get("style_name"), Some(&Scalar::from("IPA")));
/// assert!(flatten(json!({}).as_object().unwrap()).is_none());
/// ```
#[must_use]
pub fn flatten(raw: &RawRecord) -> Option<FlatRecord> {
    raw.get(STYLE_GROUP).and_then(Value::as_object)?;

    let mut flat = FlatRecord::new();

    for (key, value) in raw {
        if KNOWN_GROUPS.contains(&key.as_str()) {
            continue;
        }
        if key == INGREDIENTS_KEY {
            if let Value::Object(ingredients) = value {
                flat = flat.with_ingredients(ingredients.clone());
            }
            continue;
        }
        // Nulls and unknown nested values (labels, breweries, ...) are dropped
        if let Some(scalar) = Scalar::from_json(value) {
            flat.insert(key.clone(), scalar);
        }
    }

    for field in FLATTEN_SCHEMA {
        let Some(group) = raw.get(field.group) else {
            continue;
        };
        if let Some(scalar) = lookup(group, field.path).and_then(Scalar::from_json) {
            flat.insert(field.output, scalar);
        }
    }

    Some(flat)
}

/// Flatten a batch of records, keeping corpus order.
///
/// Rejected records come back as `None` in their original position.
#[must_use]
pub fn flatten_all(records: &[RawRecord]) -> Vec<Option<FlatRecord>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        records.par_iter().map(flatten).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        records.iter().map(flatten).collect()
    }
}

fn lookup<'a>(group: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(group, |node, segment| node.as_object()?.get(*segment))
}
