//! The structural walker: recursive traversal with pluggable leaf handling.
//!
//! [`transform`] rebuilds a value tree, delegating every leaf and every
//! mapping key to a [`LeafCodec`]. The walker knows nothing about the tag
//! grammar; the encode and decode sides are just two implementations of the
//! trait. Arrays and objects are the only containers the walker recurses
//! into; tuples and buffers are leaves here because their encodings are
//! not element-wise.
//!
//! The traversal is purely functional (the input is never mutated) and
//! recursion depth is bounded only by the host stack.

use crate::{Result, TagMap, Value};

/// Leaf and key transformation, supplied per direction by the encoder and
/// decoder.
pub trait LeafCodec {
    /// Transforms a non-container value.
    fn leaf(&mut self, value: &Value) -> Result<Value>;

    /// Transforms a mapping key. Defaults to [`leaf`](LeafCodec::leaf);
    /// the encode side overrides this because the wire format demands
    /// string keys.
    fn key(&mut self, key: &Value) -> Result<Value> {
        self.leaf(key)
    }
}

/// Recursively rebuilds `value`, passing leaves and keys through `codec`.
///
/// - Arrays map elementwise, preserving order and length.
/// - Objects map `codec.key` over keys and recurse into values, preserving
///   entry order. If two distinct keys transform to the same key, the later
///   entry silently wins (a documented limitation of the format).
/// - Everything else goes to `codec.leaf`.
pub fn transform(value: &Value, codec: &mut dyn LeafCodec) -> Result<Value> {
    match value {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(transform(item, codec)?);
            }
            Ok(Value::Array(out))
        }
        Value::Object(entries) => {
            let mut out = TagMap::with_capacity(entries.len());
            for (k, v) in entries.iter() {
                out.insert(codec.key(k)?, transform(v, codec)?);
            }
            Ok(Value::Object(out))
        }
        leaf => codec.leaf(leaf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Doubles every native integer; used to observe traversal order.
    struct Doubler {
        keys_seen: usize,
    }

    impl LeafCodec for Doubler {
        fn leaf(&mut self, value: &Value) -> Result<Value> {
            match value {
                Value::Number(crate::Number::Int(i)) => Ok(Value::from(i * 2)),
                other => Ok(other.clone()),
            }
        }

        fn key(&mut self, key: &Value) -> Result<Value> {
            self.keys_seen += 1;
            Ok(key.clone())
        }
    }

    #[test]
    fn test_array_maps_elementwise() {
        let input = Value::Array(vec![Value::from(1), Value::from(2), Value::from("x")]);
        let mut codec = Doubler { keys_seen: 0 };
        let out = transform(&input, &mut codec).unwrap();
        assert_eq!(
            out,
            Value::Array(vec![Value::from(2), Value::from(4), Value::from("x")])
        );
    }

    #[test]
    fn test_object_keys_go_through_key_fn() {
        let mut map = TagMap::new();
        map.insert(Value::from("a"), Value::from(1));
        map.insert(Value::from("b"), Value::from(2));

        let mut codec = Doubler { keys_seen: 0 };
        let out = transform(&Value::Object(map), &mut codec).unwrap();

        assert_eq!(codec.keys_seen, 2);
        let obj = out.as_object().unwrap();
        assert_eq!(obj.get(&Value::from("a")), Some(&Value::from(2)));
    }

    #[test]
    fn test_nested_structures() {
        let mut inner = TagMap::new();
        inner.insert(Value::from("n"), Value::from(3));
        let input = Value::Array(vec![Value::Object(inner), Value::Array(vec![Value::from(4)])]);

        let mut codec = Doubler { keys_seen: 0 };
        let out = transform(&input, &mut codec).unwrap();

        let items = out.as_array().unwrap();
        assert_eq!(
            items[0].as_object().unwrap().get(&Value::from("n")),
            Some(&Value::from(6))
        );
        assert_eq!(items[1], Value::Array(vec![Value::from(8)]));
    }

    #[test]
    fn test_input_not_mutated() {
        let input = Value::Array(vec![Value::from(1)]);
        let snapshot = input.clone();
        let mut codec = Doubler { keys_seen: 0 };
        let _ = transform(&input, &mut codec).unwrap();
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_tuple_is_a_leaf() {
        // tuples must reach leaf() whole, not be recursed into
        struct TupleSpy {
            saw_tuple: bool,
        }
        impl LeafCodec for TupleSpy {
            fn leaf(&mut self, value: &Value) -> Result<Value> {
                if value.is_tuple() {
                    self.saw_tuple = true;
                }
                Ok(value.clone())
            }
        }

        let input = Value::Array(vec![Value::Tuple(vec![Value::from(1), Value::from(2)])]);
        let mut codec = TupleSpy { saw_tuple: false };
        transform(&input, &mut codec).unwrap();
        assert!(codec.saw_tuple);
    }
}
