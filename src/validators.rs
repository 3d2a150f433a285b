//! Per-parameter validation rules for PVWatts v5 requests.
//!
//! Every validator is a plain function: `None` passes through untouched, an
//! accepted value comes back unchanged and anything else is a
//! [`ValidationError`]. [`crate::PvWatts::request`] runs the same functions
//! while assembling the query, so calling them up front gives identical
//! results.

use serde_json::Value;

use crate::error::ValidationError;

pub const DATASETS: [&str; 3] = ["tmy2", "tmy3", "intl"];
pub const TIMEFRAMES: [&str; 2] = ["hourly", "monthly"];

pub type Checked<T> = Result<Option<T>, ValidationError>;

fn in_range(field: &str, value: f64, lo: f64, hi: f64) -> Result<f64, ValidationError> {
    // NaN never satisfies the bounds
    if (lo..=hi).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::new(
            field,
            format!("must be >= {lo} and <= {hi}"),
        ))
    }
}

fn one_of<T>(field: &str, value: T, allowed: &[T]) -> Result<T, ValidationError>
where
    T: PartialEq + std::fmt::Display,
{
    if allowed.contains(&value) {
        return Ok(value);
    }
    let listed = allowed
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(ValidationError::new(field, format!("must be one of {listed}")))
}

/// DC system size in kW.
pub fn validate_system_capacity(value: Option<f64>) -> Checked<f64> {
    value
        .map(|v| in_range("system_capacity", v, 0.05, 500_000.0))
        .transpose()
}

/// 0 = standard, 1 = premium, 2 = thin film.
pub fn validate_module_type(value: Option<i64>) -> Checked<i64> {
    value
        .map(|v| one_of("module_type", v, &[0, 1, 2]))
        .transpose()
}

/// System losses in percent.
pub fn validate_losses(value: Option<f64>) -> Checked<f64> {
    value.map(|v| in_range("losses", v, -5.0, 99.0)).transpose()
}

/// 0 = fixed open rack, 1 = fixed roof mount, 2 = 1-axis,
/// 3 = 1-axis backtracking, 4 = 2-axis.
pub fn validate_array_type(value: Option<i64>) -> Checked<i64> {
    value
        .map(|v| one_of("array_type", v, &[0, 1, 2, 3, 4]))
        .transpose()
}

pub fn validate_tilt(value: Option<f64>) -> Checked<f64> {
    value.map(|v| in_range("tilt", v, 0.0, 90.0)).transpose()
}

pub fn validate_azimuth(value: Option<f64>) -> Checked<f64> {
    value.map(|v| in_range("azimuth", v, 0.0, 360.0)).transpose()
}

pub fn validate_lat(value: Option<f64>) -> Checked<f64> {
    value.map(|v| in_range("lat", v, -90.0, 90.0)).transpose()
}

pub fn validate_lon(value: Option<f64>) -> Checked<f64> {
    value.map(|v| in_range("lon", v, -180.0, 180.0)).transpose()
}

/// Climate dataset used by the service.
pub fn validate_dataset(value: Option<String>) -> Checked<String> {
    match value {
        Some(v) if DATASETS.contains(&v.as_str()) => Ok(Some(v)),
        Some(_) => Err(ValidationError::new(
            "dataset",
            format!("must be one of {}", DATASETS.join(", ")),
        )),
        None => Ok(None),
    }
}

/// Search radius for the closest climate data station, in miles.
pub fn validate_radius(value: Option<f64>) -> Checked<f64> {
    match value {
        Some(v) if v >= 0.0 => Ok(Some(v)),
        Some(_) => Err(ValidationError::new("radius", "must be >= 0")),
        None => Ok(None),
    }
}

pub fn validate_timeframe(value: Option<String>) -> Checked<String> {
    match value {
        Some(v) if TIMEFRAMES.contains(&v.as_str()) => Ok(Some(v)),
        Some(_) => Err(ValidationError::new(
            "timeframe",
            format!("must be one of {}", TIMEFRAMES.join(", ")),
        )),
        None => Ok(None),
    }
}

pub fn validate_dc_ac_ratio(value: Option<f64>) -> Checked<f64> {
    match value {
        Some(v) if v > 0.0 => Ok(Some(v)),
        Some(_) => Err(ValidationError::new("dc_ac_ratio", "must be positive")),
        None => Ok(None),
    }
}

/// Ground coverage ratio.
pub fn validate_gcr(value: Option<f64>) -> Checked<f64> {
    value.map(|v| in_range("gcr", v, 0.0, 3.0)).transpose()
}

/// Nominal inverter efficiency in percent.
pub fn validate_inv_eff(value: Option<f64>) -> Checked<f64> {
    value.map(|v| in_range("inv_eff", v, 90.0, 99.5)).transpose()
}

fn number(field: &str, value: &Value) -> Checked<f64> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        _ => Err(ValidationError::new(field, "must be a number")),
    }
}

fn integer(field: &str, value: &Value) -> Checked<i64> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) if n.as_i64().is_some() => Ok(n.as_i64()),
        _ => Err(ValidationError::new(field, "must be an integer")),
    }
}

fn text(field: &str, value: &Value) -> Checked<String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(ValidationError::new(field, "must be a string")),
    }
}

/// Validate a dynamically typed value for the parameter named `field`.
///
/// This is the entry point for parameters that did not come through Rust's
/// type system (JSON files, CLI passthrough). The JSON type is checked first,
/// then the field's range or enumeration. `null` means absent. Unknown names
/// and `api_key` are rejected: the key belongs to the client configuration.
pub fn validate_value(field: &str, value: &Value) -> Result<Option<Value>, ValidationError> {
    let accepted = match field {
        "system_capacity" => validate_system_capacity(number(field, value)?)?.map(Value::from),
        "module_type" => validate_module_type(integer(field, value)?)?.map(Value::from),
        "losses" => validate_losses(number(field, value)?)?.map(Value::from),
        "array_type" => validate_array_type(integer(field, value)?)?.map(Value::from),
        "tilt" => validate_tilt(number(field, value)?)?.map(Value::from),
        "azimuth" => validate_azimuth(number(field, value)?)?.map(Value::from),
        "lat" => validate_lat(number(field, value)?)?.map(Value::from),
        "lon" => validate_lon(number(field, value)?)?.map(Value::from),
        "dataset" => validate_dataset(text(field, value)?)?.map(Value::from),
        "radius" => validate_radius(number(field, value)?)?.map(Value::from),
        "timeframe" => validate_timeframe(text(field, value)?)?.map(Value::from),
        "dc_ac_ratio" => validate_dc_ac_ratio(number(field, value)?)?.map(Value::from),
        "gcr" => validate_gcr(number(field, value)?)?.map(Value::from),
        "inv_eff" => validate_inv_eff(number(field, value)?)?.map(Value::from),
        "format" | "address" | "file_id" | "callback" => text(field, value)?.map(Value::from),
        "api_key" => {
            return Err(ValidationError::new(
                field,
                "is taken from the client configuration",
            ));
        }
        _ => return Err(ValidationError::new(field, "is not a PVWatts parameter")),
    };
    // Hand back the caller's value rather than the re-encoded number so
    // integers stay integers.
    Ok(accepted.map(|_| value.clone()))
}
