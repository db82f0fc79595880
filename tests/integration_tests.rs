use tagson::{
    from_str, from_str_with_resolver, tagson, to_string, to_string_pretty,
    to_string_with_options, Buffer, Decoder, DiagnosticKind, EncodeOptions, Encoder, Scalar,
    SymbolRef, SymbolTable, TagMap, Value,
};

fn object(entries: Vec<(Value, Value)>) -> Value {
    Value::Object(entries.into_iter().collect::<TagMap>())
}

#[test]
fn test_native_json_round_trip() {
    let value = tagson!({
        "name": "run-4",
        "seed": 17,
        "lr": 0.001,
        "active": true,
        "notes": null,
        "layers": [64, 64, 10]
    });

    let text = to_string(&value).unwrap();
    assert_eq!(from_str(&text).unwrap(), value);
    // nothing native gets tagged
    assert!(!text.contains("__"));
}

#[test]
fn test_scalar_leaves_round_trip_as_scalars() {
    let value = object(vec![
        (Value::from("epochs"), Value::Scalar(Scalar::I32(100))),
        (Value::from("momentum"), Value::Scalar(Scalar::F32(0.5))),
    ]);

    let text = to_string(&value).unwrap();
    assert!(text.contains("__int__(100)"));
    assert!(text.contains("__float__(0.5)"));

    let back = from_str(&text).unwrap();
    let obj = back.as_object().unwrap();
    assert!(obj
        .get(&Value::from("epochs"))
        .is_some_and(Value::is_scalar));
    // cross-width equality: I32 on the way in, I64 on the way out
    assert_eq!(
        obj.get(&Value::from("epochs")),
        Some(&Value::Scalar(Scalar::I32(100)))
    );
}

#[test]
fn test_tuple_round_trip_nested_in_structure() {
    let shape = Value::Tuple(vec![Value::from(3), Value::from(224), Value::from(224)]);
    let value = object(vec![(Value::from("shape"), shape.clone())]);

    let back = from_str(&to_string(&value).unwrap()).unwrap();
    let decoded = back
        .as_object()
        .unwrap()
        .get(&Value::from("shape"))
        .unwrap();
    assert!(decoded.is_tuple());
    assert_eq!(decoded, &shape);
}

#[test]
fn test_numeric_keys_round_trip() {
    let value = tagson!({
        "per_class": {
            0: "cat",
            1: "dog",
            2.5: "threshold"
        }
    });

    let text = to_string(&value).unwrap();
    let back = from_str(&text).unwrap();
    let per_class = back
        .as_object()
        .unwrap()
        .get(&Value::from("per_class"))
        .unwrap()
        .as_object()
        .unwrap();
    assert_eq!(
        per_class.get(&Value::from(0)).and_then(|v| v.as_str()),
        Some("cat")
    );
    assert_eq!(
        per_class.get(&Value::from(2.5)).and_then(|v| v.as_str()),
        Some("threshold")
    );
}

#[test]
fn test_tuple_key_round_trip() {
    let key = Value::Tuple(vec![Value::from(1), Value::from(2)]);
    let value = object(vec![(key.clone(), Value::from("cell"))]);

    let text = to_string(&value).unwrap();
    assert!(text.contains(r#"__tuple__((1, 2))"#));

    let back = from_str(&text).unwrap();
    assert_eq!(
        back.as_object().unwrap().get(&key).and_then(|v| v.as_str()),
        Some("cell")
    );
}

#[test]
fn test_references_round_trip_with_registry() {
    let mut table = SymbolTable::new();
    table.register_type("torch.optim.Adam");
    table.register_function("torch.nn.functional.relu");
    table.register_module("numpy.linalg");

    let value = object(vec![
        (
            Value::from("optimizer"),
            Value::Type(SymbolRef::new("torch.optim", "Adam")),
        ),
        (
            Value::from("activation"),
            Value::Function(SymbolRef::new("torch.nn.functional", "relu")),
        ),
        (
            Value::from("backend"),
            Value::Module("numpy.linalg".to_string()),
        ),
    ]);

    let text = to_string(&value).unwrap();
    assert_eq!(from_str_with_resolver(&text, &table).unwrap(), value);
}

#[test]
fn test_unregistered_references_degrade_with_diagnostics() {
    let value = object(vec![
        (
            Value::from("optimizer"),
            Value::Type(SymbolRef::new("torch.optim", "Adam")),
        ),
        (Value::from("seed"), Value::from(17)),
    ]);
    let text = to_string(&value).unwrap();

    let table = SymbolTable::new();
    let mut decoder = Decoder::new(&table);
    let back = decoder.decode_str(&text).unwrap();

    // the bad leaf degrades, the rest of the structure survives
    let obj = back.as_object().unwrap();
    assert_eq!(
        obj.get(&Value::from("optimizer")).and_then(|v| v.as_str()),
        Some("torch.optim.Adam")
    );
    assert_eq!(obj.get(&Value::from("seed")), Some(&Value::from(17)));
    assert!(decoder
        .diagnostics()
        .contains(DiagnosticKind::UnresolvedReference));
}

#[test]
fn test_colliding_user_string_survives() {
    let value = tagson!({"note": "__tuple__((1, 2))"});
    let text = to_string(&value).unwrap();
    assert!(text.contains("__str__("));

    let back = from_str(&text).unwrap();
    assert_eq!(
        back.as_object()
            .unwrap()
            .get(&Value::from("note"))
            .and_then(|v| v.as_str()),
        Some("__tuple__((1, 2))")
    );
}

#[test]
fn test_buffer_flattens_to_nested_arrays() {
    let buf = Buffer::from_floats(vec![2, 2], vec![0.1, 0.2, 0.3, 0.4]).unwrap();
    let value = object(vec![(Value::from("weights"), Value::Buffer(buf))]);

    let back = from_str(&to_string(&value).unwrap()).unwrap();
    let weights = back
        .as_object()
        .unwrap()
        .get(&Value::from("weights"))
        .unwrap();
    // plain arrays now, the buffer identity is gone
    assert!(weights.is_array());
    assert_eq!(
        weights.as_array().unwrap()[0],
        Value::Array(vec![Value::from(0.1), Value::from(0.2)])
    );
}

#[test]
fn test_pretty_and_compact_agree() {
    let value = object(vec![
        (Value::from("a"), Value::Scalar(Scalar::I8(1))),
        (Value::from("b"), tagson!([1, 2])),
    ]);
    let compact = to_string(&value).unwrap();
    let pretty = to_string_pretty(&value).unwrap();
    assert_ne!(compact, pretty);
    assert_eq!(from_str(&compact).unwrap(), from_str(&pretty).unwrap());
}

#[test]
fn test_nonfinite_floats_rejected() {
    let value = object(vec![(Value::from("x"), Value::from(f64::NAN))]);
    assert!(to_string(&value).is_err());
    assert!(to_string_with_options(&value, EncodeOptions::new().with_strict(true)).is_err());
}

#[test]
fn test_encoder_accumulates_diagnostics_across_calls() {
    use std::sync::Arc;

    #[derive(Debug)]
    struct Handle;
    impl tagson::Opaque for Handle {}

    let mut encoder = Encoder::new(EncodeOptions::new());
    encoder.encode(&Value::Opaque(Arc::new(Handle))).unwrap();
    encoder.encode(&Value::Opaque(Arc::new(Handle))).unwrap();
    assert_eq!(encoder.diagnostics().len(), 2);

    let drained = encoder.take_diagnostics();
    assert_eq!(drained.len(), 2);
    assert!(encoder.diagnostics().is_empty());
}

#[test]
fn test_deeply_nested_mixed_structure() {
    let grid = object(vec![
        (
            Value::Tuple(vec![Value::from(0), Value::from(0)]),
            Value::from(0.25),
        ),
        (
            Value::Tuple(vec![Value::from(0), Value::from(1)]),
            Value::from(0.75),
        ),
    ]);
    let run = object(vec![
        (Value::from("id"), Value::Scalar(Scalar::U32(7))),
        (Value::from("grid"), grid),
    ]);
    let value = object(vec![(Value::from("runs"), Value::Array(vec![run]))]);

    let back = from_str(&to_string(&value).unwrap()).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_decode_is_inverse_on_already_plain_text() {
    // text with no tags decodes to exactly what the JSON layer parses
    let text = r#"{"a": [1, 2.5, "x", false, null]}"#;
    let value = from_str(text).unwrap();
    assert_eq!(
        value
            .as_object()
            .unwrap()
            .get(&Value::from("a"))
            .unwrap()
            .as_array()
            .unwrap()
            .len(),
        5
    );
}
