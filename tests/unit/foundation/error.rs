use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DraweeError::out_of_range("x")
            .to_string()
            .contains("index out of range:")
    );
    assert!(
        DraweeError::precondition("x")
            .to_string()
            .contains("precondition violated:")
    );
    assert!(
        DraweeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        DraweeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DraweeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde_variant() {
    let err: DraweeError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, DraweeError::Serde(_)));
    assert!(!err.is_out_of_range());
}
