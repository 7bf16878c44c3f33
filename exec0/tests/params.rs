use exec0::error::ConfigError;
use exec0::{ParamValue, PoolParams};
use serde_json::json;

// --- Normalization ---

#[test]
fn digit_only_text_becomes_int() {
    let params = PoolParams::new().with("n_workers", "16").normalize();
    assert_eq!(params.get("n_workers"), Some(&ParamValue::Int(16)));
}

#[test]
fn signed_text_becomes_int() {
    let params = PoolParams::new().with("offset", "-3").normalize();
    assert_eq!(params.int("offset").unwrap(), Some(-3));
}

#[test]
fn oversized_integer_falls_back_to_float() {
    let params = PoolParams::new()
        .with("memory", "99999999999999999999")
        .normalize();
    match params.get("memory") {
        Some(ParamValue::Float(v)) => assert!((*v - 1e20).abs() < 1e6),
        other => panic!("expected float, got {other:?}"),
    }
}

#[test]
fn decimal_text_becomes_float() {
    let params = PoolParams::new()
        .with("memory_target_fraction", "0.6")
        .with("timeout", "1e3")
        .normalize();
    assert_eq!(params.float("memory_target_fraction").unwrap(), Some(0.6));
    assert_eq!(params.get("timeout"), Some(&ParamValue::Float(1000.0)));
}

#[test]
fn non_numeric_text_is_kept_verbatim() {
    let params = PoolParams::new()
        .with("scheduler", "tcp://10.0.0.1:8786")
        .with("interface", "ib0")
        .with("dashboard", "inf")
        .with("empty", "")
        .normalize();
    assert_eq!(
        params.get("scheduler"),
        Some(&ParamValue::Text("tcp://10.0.0.1:8786".into()))
    );
    assert_eq!(params.get("interface"), Some(&ParamValue::Text("ib0".into())));
    assert_eq!(params.get("dashboard"), Some(&ParamValue::Text("inf".into())));
    assert_eq!(params.get("empty"), Some(&ParamValue::Text(String::new())));
}

#[test]
fn typed_values_pass_through() {
    let params = PoolParams::new()
        .with("processes", false)
        .with("threads", 4_i64)
        .with("fraction", 0.25)
        .normalize();
    assert_eq!(params.get("processes"), Some(&ParamValue::Bool(false)));
    assert_eq!(params.int("threads").unwrap(), Some(4));
    assert_eq!(params.float("fraction").unwrap(), Some(0.25));
}

// --- Typed accessors ---

#[test]
fn requesting_int_from_text_is_config_error() {
    let params = PoolParams::new().with("n_workers", "many").normalize();
    let err = params.int("n_workers").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::NotNumeric { ref key, ref value } if key == "n_workers" && value == "many"
    ));
    assert!(err.to_string().contains("must be numeric"));
}

#[test]
fn whole_float_reads_as_int_but_fraction_does_not() {
    let params = PoolParams::new()
        .with("whole", "2.0")
        .with("half", "2.5")
        .normalize();
    assert_eq!(params.int("whole").unwrap(), Some(2));
    assert!(params.int("half").is_err());
}

#[test]
fn missing_key_is_none() {
    let params = PoolParams::new().normalize();
    assert_eq!(params.int("n_workers").unwrap(), None);
    assert_eq!(params.float("n_workers").unwrap(), None);
    assert_eq!(params.text("n_workers"), None);
}

#[test]
fn flags_accept_common_spellings() {
    let params = PoolParams::new()
        .with("adaptive", true)
        .with("processes", "0")
        .with("verbose", "Yes")
        .with("dashboard", "sometimes")
        .normalize();
    assert_eq!(params.flag("adaptive").unwrap(), Some(true));
    assert_eq!(params.flag("processes").unwrap(), Some(false));
    assert_eq!(params.flag("verbose").unwrap(), Some(true));
    assert_eq!(params.flag("missing").unwrap(), None);
    let err = params.flag("dashboard").unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { ref key, .. } if key == "dashboard"));
}

// --- key=value parsing ---

#[test]
fn parse_pairs_splits_on_first_equals() {
    let params = PoolParams::parse_pairs(["env=A=1", "n_workers=2"]).unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(params.get("env"), Some(&ParamValue::Text("A=1".into())));
}

#[test]
fn parse_pairs_later_keys_win() {
    let params = PoolParams::parse_pairs(["n_workers=2", "n_workers=8"]).unwrap();
    assert_eq!(params.normalize().int("n_workers").unwrap(), Some(8));
}

#[test]
fn parse_pairs_rejects_missing_separator_and_empty_key() {
    assert!(matches!(
        PoolParams::parse_pairs(["n_workers"]),
        Err(ConfigError::MalformedPair(p)) if p == "n_workers"
    ));
    assert!(matches!(
        PoolParams::parse_pairs(["=3"]),
        Err(ConfigError::MalformedPair(_))
    ));
}

// --- Serde ---

#[test]
fn params_deserialize_typed_and_text_values() {
    let params: PoolParams = serde_json::from_value(json!({
        "n_workers": 4,
        "threads_per_worker": "2",
        "processes": true,
        "memory_limit": "4GB"
    }))
    .unwrap();
    assert_eq!(params.get("n_workers"), Some(&ParamValue::Int(4)));
    assert_eq!(params.get("threads_per_worker"), Some(&ParamValue::Text("2".into())));

    let normalized = params.normalize();
    assert_eq!(normalized.int("threads_per_worker").unwrap(), Some(2));
    assert_eq!(
        serde_json::to_value(&normalized).unwrap(),
        json!({
            "memory_limit": "4GB",
            "n_workers": 4,
            "processes": true,
            "threads_per_worker": 2
        })
    );
}
