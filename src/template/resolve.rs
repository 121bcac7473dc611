// ABOUTME: Dot-path lookup and assignment into a context mapping
// ABOUTME: Missing paths resolve to Null and binding through them is a no-op

use super::ast::Reference;
use super::context::{Mapping, Value};

static NULL: Value = Value::Null;

/// Walk `reference` from `root`. Stops with `Null` as soon as a step is not a
/// mapping or the key is absent.
pub fn resolve<'a>(reference: &Reference, root: &'a Mapping) -> &'a Value {
    let (parents, last) = reference.split_last();
    parent_mapping(parents, root)
        .and_then(|map| map.get(last))
        .unwrap_or(&NULL)
}

/// Set the last component of `reference` to `value` when every parent step
/// lands on a mapping; otherwise leave `root` untouched.
pub fn bind(reference: &Reference, value: Value, root: &mut Mapping) {
    let (parents, last) = reference.split_last();
    if let Some(map) = parent_mapping_mut(parents, root) {
        map.insert(last.to_string(), value);
    }
}

fn parent_mapping<'a>(parents: &[String], root: &'a Mapping) -> Option<&'a Mapping> {
    parents
        .iter()
        .try_fold(root, |map, key| map.get(key).and_then(Value::as_mapping))
}

fn parent_mapping_mut<'a>(parents: &[String], root: &'a mut Mapping) -> Option<&'a mut Mapping> {
    let mut current = root;
    for key in parents {
        current = current.get_mut(key)?.as_mapping_mut()?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference(path: &str) -> Reference {
        Reference::new(path.split('.')).unwrap()
    }

    fn root() -> Mapping {
        match Value::from(json!({
            "title": "Notes",
            "author": {"name": "Jo", "links": ["a", "b"]},
            "tags": ["x"]
        })) {
            Value::Mapping(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_resolve_nested() {
        let root = root();
        assert_eq!(resolve(&reference("title"), &root), &Value::from("Notes"));
        assert_eq!(resolve(&reference("author.name"), &root), &Value::from("Jo"));
    }

    #[test]
    fn test_resolve_missing_is_null() {
        let root = root();
        assert!(resolve(&reference("missing"), &root).is_null());
        assert!(resolve(&reference("author.missing"), &root).is_null());
        // stepping into a scalar or a sequence stops resolution
        assert!(resolve(&reference("title.length"), &root).is_null());
        assert!(resolve(&reference("tags.0"), &root).is_null());
    }

    #[test]
    fn test_bind_replaces_and_inserts() {
        let mut root = root();
        bind(&reference("author.name"), Value::from("Sam"), &mut root);
        assert_eq!(resolve(&reference("author.name"), &root), &Value::from("Sam"));

        bind(&reference("author.email"), Value::from("sam@example.com"), &mut root);
        assert_eq!(
            resolve(&reference("author.email"), &root),
            &Value::from("sam@example.com")
        );
    }

    #[test]
    fn test_bind_through_missing_path_is_noop() {
        let mut root = root();
        let before = root.clone();

        bind(&reference("nope.name"), Value::from("x"), &mut root);
        bind(&reference("title.inner"), Value::from("x"), &mut root);
        assert_eq!(root, before);
    }
}
