//! Find-by-id, merge, else append.
//!
//! Merging happens on the JSON representation so a patch may name any subset
//! of an entity's fields; the result is decoded again, which rejects patches
//! that would leave the entity malformed.

use crate::model::Keyed;
use crate::prelude::{CacheError, CacheResult};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Result of a single upsert, with the element as it now stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Updated(usize),
    Inserted(usize),
}

impl UpsertOutcome {
    pub fn index(&self) -> usize {
        match *self {
            UpsertOutcome::Updated(index) | UpsertOutcome::Inserted(index) => index,
        }
    }
}

/// Shallow-merges `patch` into the first element whose id is `id`, or appends
/// `{id, ...patch}` when there is none.
pub fn upsert<T>(list: &mut Vec<T>, id: &str, patch: &Map<String, Value>) -> CacheResult<UpsertOutcome>
where
    T: Keyed + Serialize + DeserializeOwned,
{
    if let Some(Value::String(patch_id)) = patch.get("id") {
        if patch_id != id {
            return Err(CacheError::Validation(format!(
                "patch id {patch_id:?} does not match target id {id:?}"
            )));
        }
    }

    match list.iter().position(|item| item.id() == id) {
        Some(index) => {
            let mut merged = match serde_json::to_value(&list[index]) {
                Ok(Value::Object(fields)) => fields,
                Ok(_) => return Err(CacheError::Validation("entity is not an object".into())),
                Err(err) => return Err(CacheError::Validation(err.to_string())),
            };
            merge(&mut merged, patch);
            list[index] = decode(merged)?;
            Ok(UpsertOutcome::Updated(index))
        }
        None => {
            let mut fields = Map::new();
            fields.insert("id".into(), Value::String(id.to_string()));
            merge(&mut fields, patch);
            list.push(decode(fields)?);
            Ok(UpsertOutcome::Inserted(list.len() - 1))
        }
    }
}

fn merge(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        target.insert(key.clone(), value.clone());
    }
}

fn decode<T: DeserializeOwned>(fields: Map<String, Value>) -> CacheResult<T> {
    serde_json::from_value(Value::Object(fields)).map_err(|err| CacheError::Validation(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Roi;
    use serde_json::json;

    fn patch(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn peak() -> Map<String, Value> {
        patch(json!({
            "name": "Peak A", "low": 10.0, "high": 20.0,
            "integral": 0.0, "color": "#ff0000", "enabled": true
        }))
    }

    #[test]
    fn missing_id_appends_patch_plus_id() {
        let mut rois: Vec<Roi> = Vec::new();
        let outcome = upsert(&mut rois, "r1", &peak()).unwrap();

        assert_eq!(outcome, UpsertOutcome::Inserted(0));
        assert_eq!(
            serde_json::to_value(&rois[0]).unwrap(),
            json!({
                "id": "r1", "name": "Peak A", "low": 10, "high": 20,
                "integral": 0, "color": "#ff0000", "enabled": true
            })
        );
    }

    #[test]
    fn existing_id_keeps_unpatched_fields() {
        let mut rois: Vec<Roi> = Vec::new();
        upsert(&mut rois, "r1", &peak()).unwrap();
        upsert(&mut rois, "r2", &peak()).unwrap();

        let outcome = upsert(&mut rois, "r1", &patch(json!({"high": 42.5}))).unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated(0));
        assert_eq!(rois.len(), 2);
        assert_eq!(rois[0].high, 42.5);
        assert_eq!(rois[0].low, 10.0);
        assert_eq!(rois[0].name, "Peak A");
    }

    #[test]
    fn repeating_an_upsert_changes_nothing() {
        let mut once: Vec<Roi> = Vec::new();
        upsert(&mut once, "r1", &peak()).unwrap();

        let mut twice = once.clone();
        upsert(&mut twice, "r1", &peak()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn incomplete_insert_is_rejected() {
        let mut rois: Vec<Roi> = Vec::new();
        let err = upsert(&mut rois, "r1", &patch(json!({"name": "half"}))).unwrap_err();
        assert!(matches!(err, CacheError::Validation(_)));
        assert!(rois.is_empty());
    }

    #[test]
    fn conflicting_patch_id_is_rejected() {
        let mut rois: Vec<Roi> = Vec::new();
        let mut body = peak();
        body.insert("id".into(), json!("other"));
        assert!(upsert(&mut rois, "r1", &body).is_err());
    }
}
