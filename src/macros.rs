/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Object keys may be any literal (strings, integers, floats); they become
/// full `Value` keys, which is what the codec's key-tagging exists for.
///
/// ```rust
/// use tagson::tagson;
///
/// let record = tagson!({
///     "name": "Alice",
///     5: "numeric key",
///     "tags": ["rust", "codec"]
/// });
/// assert!(record.is_object());
/// ```
#[macro_export]
macro_rules! tagson {
    // Handle null
    (null) => {
        $crate::Value::Null
    };

    // Handle true
    (true) => {
        $crate::Value::Bool(true)
    };

    // Handle false
    (false) => {
        $crate::Value::Bool(false)
    };

    // Handle empty array
    ([]) => {
        $crate::Value::Array(vec![])
    };

    // Handle non-empty array
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::tagson!($elem)),*])
    };

    // Handle empty object
    ({}) => {
        $crate::Value::Object($crate::TagMap::new())
    };

    // Handle non-empty object
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::TagMap::new();
        $(
            object.insert($crate::Value::from($key), $crate::tagson!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Fallback for any other expression
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Number, TagMap, Value};

    #[test]
    fn test_tagson_macro_primitives() {
        assert_eq!(tagson!(null), Value::Null);
        assert_eq!(tagson!(true), Value::Bool(true));
        assert_eq!(tagson!(false), Value::Bool(false));
        assert_eq!(tagson!(42), Value::Number(Number::Int(42)));
        assert_eq!(tagson!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(tagson!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_tagson_macro_arrays() {
        assert_eq!(tagson!([]), Value::Array(vec![]));

        let arr = tagson!([1, 2, 3]);
        match arr {
            Value::Array(vec) => {
                assert_eq!(vec.len(), 3);
                assert_eq!(vec[0], Value::Number(Number::Int(1)));
                assert_eq!(vec[2], Value::Number(Number::Int(3)));
            }
            _ => panic!("Expected array"),
        }
    }

    #[test]
    fn test_tagson_macro_objects() {
        assert_eq!(tagson!({}), Value::Object(TagMap::new()));

        let obj = tagson!({
            "name": "Alice",
            "age": 30
        });

        match obj {
            Value::Object(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(
                    map.get(&Value::from("name")),
                    Some(&Value::String("Alice".to_string()))
                );
                assert_eq!(
                    map.get(&Value::from("age")),
                    Some(&Value::Number(Number::Int(30)))
                );
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_tagson_macro_numeric_keys() {
        let obj = tagson!({
            5: "int key",
            2.5: "float key"
        });

        let map = obj.as_object().unwrap();
        assert_eq!(
            map.get(&Value::from(5)).and_then(|v| v.as_str()),
            Some("int key")
        );
        assert_eq!(
            map.get(&Value::from(2.5)).and_then(|v| v.as_str()),
            Some("float key")
        );
    }

    #[test]
    fn test_tagson_macro_nested() {
        let value = tagson!({
            "outer": {
                "inner": [1, [2, 3], null]
            }
        });

        let inner = value
            .as_object()
            .unwrap()
            .get(&Value::from("outer"))
            .unwrap()
            .as_object()
            .unwrap()
            .get(&Value::from("inner"))
            .unwrap();
        assert_eq!(
            inner,
            &Value::Array(vec![
                Value::from(1),
                Value::Array(vec![Value::from(2), Value::from(3)]),
                Value::Null,
            ])
        );
    }
}
