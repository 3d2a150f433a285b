use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{PvWattsError, ValidationError};
use crate::validators;

/// Flat query map sent to the service, keyed by parameter name.
pub type QueryParams = BTreeMap<String, String>;

/// Parameters of a single PVWatts v5 estimation request.
///
/// Every field is optional. `Default` carries the service defaults for
/// `module_type`, `losses`, `array_type`, `dataset`, `radius` and
/// `timeframe`; [`ParameterSet::empty`] has nothing set at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    /// Response format, `json` or `xml`. Free-form.
    pub format: Option<String>,
    /// DC system size (kW)
    pub system_capacity: Option<f64>,
    pub module_type: Option<i64>,
    /// System losses (%)
    pub losses: Option<f64>,
    pub array_type: Option<i64>,
    /// Tilt angle (deg)
    pub tilt: Option<f64>,
    /// Azimuth angle (deg)
    pub azimuth: Option<f64>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Reference to a climate data file uploaded to the service.
    pub file_id: Option<String>,
    pub dataset: Option<String>,
    /// Station search radius (miles), 0 means closest station regardless of distance.
    pub radius: Option<f64>,
    pub timeframe: Option<String>,
    pub dc_ac_ratio: Option<f64>,
    pub gcr: Option<f64>,
    /// Inverter efficiency (%)
    pub inv_eff: Option<f64>,
    /// JSONP callback name.
    pub callback: Option<String>,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            module_type: Some(0),
            losses: Some(12.0),
            array_type: Some(1),
            dataset: Some("tmy3".to_string()),
            radius: Some(0.0),
            timeframe: Some("monthly".to_string()),
            ..Self::empty()
        }
    }
}

impl ParameterSet {
    pub fn empty() -> Self {
        Self {
            format: None,
            system_capacity: None,
            module_type: None,
            losses: None,
            array_type: None,
            tilt: None,
            azimuth: None,
            address: None,
            lat: None,
            lon: None,
            file_id: None,
            dataset: None,
            radius: None,
            timeframe: None,
            dc_ac_ratio: None,
            gcr: None,
            inv_eff: None,
            callback: None,
        }
    }

    /// Build a parameter set from a JSON object, starting from the defaults.
    ///
    /// Each entry goes through [`validators::validate_value`], so a wrong JSON
    /// type is reported as a [`ValidationError`] rather than a decode error.
    /// An explicit `null` clears the field, defaults included.
    pub fn from_json(value: &Value) -> Result<Self, PvWattsError> {
        let Value::Object(entries) = value else {
            return Err(PvWattsError::Config(
                "parameters must be a JSON object".to_string(),
            ));
        };

        let mut params = Self::default();
        for (name, raw) in entries {
            let checked = validators::validate_value(name, raw)?;
            let number = checked.as_ref().and_then(Value::as_f64);
            let integer = checked.as_ref().and_then(Value::as_i64);
            let text = checked.as_ref().and_then(Value::as_str).map(str::to_owned);

            match name.as_str() {
                "format" => params.format = text,
                "system_capacity" => params.system_capacity = number,
                "module_type" => params.module_type = integer,
                "losses" => params.losses = number,
                "array_type" => params.array_type = integer,
                "tilt" => params.tilt = number,
                "azimuth" => params.azimuth = number,
                "address" => params.address = text,
                "lat" => params.lat = number,
                "lon" => params.lon = number,
                "file_id" => params.file_id = text,
                "dataset" => params.dataset = text,
                "radius" => params.radius = number,
                "timeframe" => params.timeframe = text,
                "dc_ac_ratio" => params.dc_ac_ratio = number,
                "gcr" => params.gcr = number,
                "inv_eff" => params.inv_eff = number,
                "callback" => params.callback = text,
                // validate_value already refused anything else
                _ => {}
            }
        }
        Ok(params)
    }

    pub fn load(path: &str) -> Result<Self, PvWattsError> {
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        Self::from_json(&value)
    }

    /// Run every field through its validator and flatten the result into
    /// query pairs. Absent fields are left out of the map.
    pub fn to_query(&self) -> Result<QueryParams, ValidationError> {
        let mut query = QueryParams::new();
        let mut put = |name: &str, value: Option<String>| {
            if let Some(v) = value {
                query.insert(name.to_string(), v);
            }
        };
        // -0.0 is sent as 0
        let num = |v: Option<f64>| v.map(|v| (if v == 0.0 { 0.0 } else { v }).to_string());
        let int = |v: Option<i64>| v.map(|v| v.to_string());

        put("format", self.format.clone());
        put(
            "system_capacity",
            num(validators::validate_system_capacity(self.system_capacity)?),
        );
        put(
            "module_type",
            int(validators::validate_module_type(self.module_type)?),
        );
        put("losses", num(validators::validate_losses(self.losses)?));
        put(
            "array_type",
            int(validators::validate_array_type(self.array_type)?),
        );
        put("tilt", num(validators::validate_tilt(self.tilt)?));
        put("azimuth", num(validators::validate_azimuth(self.azimuth)?));
        put("address", self.address.clone());
        put("lat", num(validators::validate_lat(self.lat)?));
        put("lon", num(validators::validate_lon(self.lon)?));
        put("file_id", self.file_id.clone());
        put("dataset", validators::validate_dataset(self.dataset.clone())?);
        put("radius", num(validators::validate_radius(self.radius)?));
        put(
            "timeframe",
            validators::validate_timeframe(self.timeframe.clone())?,
        );
        put(
            "dc_ac_ratio",
            num(validators::validate_dc_ac_ratio(self.dc_ac_ratio)?),
        );
        put("gcr", num(validators::validate_gcr(self.gcr)?));
        put("inv_eff", num(validators::validate_inv_eff(self.inv_eff)?));
        put("callback", self.callback.clone());

        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_fill_the_query() {
        let query = ParameterSet::default().to_query().unwrap();

        let expected: QueryParams = [
            ("module_type", "0"),
            ("losses", "12"),
            ("array_type", "1"),
            ("dataset", "tmy3"),
            ("radius", "0"),
            ("timeframe", "monthly"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(query, expected);
    }

    #[test]
    fn empty_set_sends_nothing() {
        assert!(ParameterSet::empty().to_query().unwrap().is_empty());
    }

    #[test]
    fn full_set_is_flattened() {
        let params = ParameterSet {
            format: Some("json".into()),
            system_capacity: Some(4.0),
            tilt: Some(40.0),
            azimuth: Some(180.0),
            lat: Some(40.0),
            lon: Some(-105.25),
            dc_ac_ratio: Some(1.1),
            gcr: Some(0.4),
            inv_eff: Some(96.0),
            address: Some("boulder, co".into()),
            ..ParameterSet::default()
        };
        let query = params.to_query().unwrap();

        assert_eq!(query["system_capacity"], "4");
        assert_eq!(query["lon"], "-105.25");
        assert_eq!(query["dc_ac_ratio"], "1.1");
        assert_eq!(query["address"], "boulder, co");
        assert_eq!(query["format"], "json");
        assert!(!query.contains_key("file_id"));
        assert!(!query.contains_key("callback"));
        assert!(!query.contains_key("api_key"));
    }

    #[test]
    fn negative_zero_is_sent_as_zero() {
        let params = ParameterSet {
            tilt: Some(-0.0),
            azimuth: Some(-0.0),
            ..ParameterSet::default()
        };
        let query = params.to_query().unwrap();
        assert_eq!(query["tilt"], "0");
        assert_eq!(query["azimuth"], "0");
    }

    #[test]
    fn first_invalid_field_stops_assembly() {
        let params = ParameterSet {
            dataset: Some("tmy4".into()),
            ..ParameterSet::default()
        };
        let err = params.to_query().unwrap_err();
        assert_eq!(err.field, "dataset");

        let params = ParameterSet {
            system_capacity: Some(0.04),
            ..ParameterSet::default()
        };
        assert_eq!(params.to_query().unwrap_err().field, "system_capacity");
    }

    #[test]
    fn from_json_overrides_defaults() {
        let params = ParameterSet::from_json(&json!({
            "system_capacity": 4,
            "lat": 40,
            "lon": -105,
            "dataset": "tmy2",
            "losses": null
        }))
        .unwrap();

        assert_eq!(params.system_capacity, Some(4.0));
        assert_eq!(params.lon, Some(-105.0));
        assert_eq!(params.dataset.as_deref(), Some("tmy2"));
        assert_eq!(params.losses, None);
        assert_eq!(params.module_type, Some(0));
    }

    #[test]
    fn from_json_reports_wrong_types_as_validation() {
        let err = ParameterSet::from_json(&json!({ "tilt": "steep" })).unwrap_err();
        match err {
            PvWattsError::Validation(e) => assert_eq!(e.field, "tilt"),
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            ParameterSet::from_json(&json!({ "module_type": 1.5 })),
            Err(PvWattsError::Validation(_))
        ));
        assert!(matches!(
            ParameterSet::from_json(&json!(["tilt", 20])),
            Err(PvWattsError::Config(_))
        ));
    }
}
