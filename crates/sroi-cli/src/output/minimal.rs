use serde_json::Value;

use super::{flatten_scalars, format_scalar};

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, then falls back to
/// the first scalar in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

pub(crate) fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "metrics.sroi",
        "base_case_value",
        "valid",
        "sroi",
    ];

    let Value::Object(map) = result_obj else {
        return format_scalar(result_obj);
    };

    let flat = flatten_scalars(map);
    for key in &priority_keys {
        if let Some((_, val)) = flat.iter().find(|(k, v)| k == key && !v.is_null()) {
            return format_scalar(val);
        }
    }

    match flat.first() {
        Some((key, val)) => format!("{}: {}", key, format_scalar(val)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefers_sroi() {
        let value = json!({
            "result": { "metrics": { "net_benefit": 44769.67, "sroi": 89.5 } },
            "warnings": []
        });
        assert_eq!(minimal_line(&value), "89.5");
    }

    #[test]
    fn test_validation_flag() {
        let value = json!({ "valid": false, "errors": { "timeframe": "Must be greater than 0" } });
        assert_eq!(minimal_line(&value), "false");
    }

    #[test]
    fn test_falls_back_to_first_scalar() {
        let value = json!({ "result": { "payback_period": 2.0 } });
        assert_eq!(minimal_line(&value), "payback_period: 2.0");
    }
}
