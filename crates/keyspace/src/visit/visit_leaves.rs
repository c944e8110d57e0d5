use super::Visit;
use crate::value::Value;

/// Depth-first walk over nested objects, yielding `(dotted key, value)` per leaf
///
/// Anything that is not an object is a leaf, arrays included. Empty objects
/// yield nothing.
pub trait VisitLeaves {
    fn visit_leaves(self, prefix: &str, visitor: &mut dyn Visit<(String, Value)>);
}

impl VisitLeaves for Value {
    fn visit_leaves(self, prefix: &str, visitor: &mut dyn Visit<(String, Value)>) {
        match self {
            Value::Object(object) => {
                for (name, value) in object {
                    let key = if prefix.is_empty() {
                        name
                    } else {
                        format!("{prefix}.{name}")
                    };
                    value.visit_leaves(&key, visitor);
                }
            }
            leaf => visitor.visit((prefix.to_string(), leaf)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_objects_become_dotted_keys() {
        let value: Value = serde_json::json!({
            "a": { "b": 1, "c": { "d": [true] } },
            "e": "x",
            "empty": {}
        })
        .into();

        let mut leaves = vec![];
        value.visit_leaves("", &mut |leaf: (String, Value)| leaves.push(leaf));

        let keys: Vec<_> = leaves.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["a.b", "a.c.d", "e"]);
        assert_eq!(leaves[2].1, Value::from("x"));
    }

    #[test]
    fn non_object_root_is_a_leaf_at_prefix() {
        let mut leaves = vec![];
        Value::from("x").visit_leaves("root", &mut |leaf: (String, Value)| leaves.push(leaf));
        assert_eq!(leaves, vec![("root".to_string(), Value::from("x"))]);
    }
}
