use serde_json::Value;

use crate::error::PvWattsError;

/// Decoded PVWatts response.
///
/// The body is kept exactly as the service sent it. Accessors look fields up
/// on demand and report a [`PvWattsError::Lookup`] when something the caller
/// asked for is not there.
#[derive(Debug, Clone, PartialEq)]
pub struct PvWattsResult {
    body: Value,
}

impl PvWattsResult {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    pub fn raw(&self) -> &Value {
        &self.body
    }

    pub fn into_inner(self) -> Value {
        self.body
    }

    /// Dotted-path lookup, e.g. `"outputs.ac_annual"` or `"outputs.ac_monthly.0"`.
    pub fn get(&self, path: &str) -> Result<&Value, PvWattsError> {
        path.split('.').try_fold(&self.body, |node, key| {
            let next = match node {
                Value::Object(map) => map.get(key),
                Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            next.ok_or_else(|| PvWattsError::Lookup(format!("no field '{path}' in response")))
        })
    }

    pub fn get_f64(&self, path: &str) -> Result<f64, PvWattsError> {
        self.get(path)?
            .as_f64()
            .ok_or_else(|| PvWattsError::Lookup(format!("'{path}' is not a number")))
    }

    pub fn get_series(&self, path: &str) -> Result<Vec<f64>, PvWattsError> {
        let not_series = || PvWattsError::Lookup(format!("'{path}' is not a numeric array"));
        self.get(path)?
            .as_array()
            .ok_or_else(not_series)?
            .iter()
            .map(|v| v.as_f64().ok_or_else(not_series))
            .collect()
    }

    // ── Response sections ────────────────────────────────────────────────────

    /// Echo of the request parameters as the service understood them.
    pub fn inputs(&self) -> Result<&Value, PvWattsError> {
        self.get("inputs")
    }

    pub fn outputs(&self) -> Result<&Value, PvWattsError> {
        self.get("outputs")
    }

    /// Climate data station metadata (lat, lon, elev, tz, city, state, ...).
    pub fn station_info(&self) -> Result<&Value, PvWattsError> {
        self.get("station_info")
    }

    pub fn errors(&self) -> Result<&Value, PvWattsError> {
        self.get("errors")
    }

    pub fn warnings(&self) -> Result<&Value, PvWattsError> {
        self.get("warnings")
    }

    /// Version of the remote API that produced the response.
    pub fn version(&self) -> Result<&Value, PvWattsError> {
        self.get("version")
    }

    pub fn ssc_info(&self) -> Result<&Value, PvWattsError> {
        self.get("ssc_info")
    }

    // ── Outputs ──────────────────────────────────────────────────────────────

    /// Annual AC system output (kWh).
    pub fn ac_annual(&self) -> Result<f64, PvWattsError> {
        self.get_f64("outputs.ac_annual")
    }

    /// Annual solar radiation (kWh/m²/day).
    pub fn solrad_annual(&self) -> Result<f64, PvWattsError> {
        self.get_f64("outputs.solrad_annual")
    }

    /// AC to nameplate DC ratio (%).
    pub fn capacity_factor(&self) -> Result<f64, PvWattsError> {
        self.get_f64("outputs.capacity_factor")
    }

    pub fn ac_monthly(&self) -> Result<Vec<f64>, PvWattsError> {
        self.get_series("outputs.ac_monthly")
    }

    pub fn dc_monthly(&self) -> Result<Vec<f64>, PvWattsError> {
        self.get_series("outputs.dc_monthly")
    }

    pub fn poa_monthly(&self) -> Result<Vec<f64>, PvWattsError> {
        self.get_series("outputs.poa_monthly")
    }

    pub fn solrad_monthly(&self) -> Result<Vec<f64>, PvWattsError> {
        self.get_series("outputs.solrad_monthly")
    }

    /// Hourly AC output (W); only present for `timeframe=hourly`.
    pub fn ac_hourly(&self) -> Result<Vec<f64>, PvWattsError> {
        self.get_series("outputs.ac")
    }
}

impl From<Value> for PvWattsResult {
    fn from(body: Value) -> Self {
        Self::new(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> PvWattsResult {
        PvWattsResult::new(json!({
            "inputs": { "system_capacity": "4", "lat": "40", "lon": "-105" },
            "errors": [],
            "warnings": [],
            "version": "1.0.2",
            "ssc_info": { "version": 34, "build": "Linux 64 bit GNU/C++ Nov 21 2014" },
            "station_info": {
                "lat": 40.016666412353516,
                "lon": -105.25,
                "elev": 1634.0,
                "tz": -7.0,
                "city": "BOULDER",
                "state": "CO",
                "solar_resource_file": "94018.tm2",
                "distance": 21026
            },
            "outputs": {
                "ac_monthly": [474.3, 485.6, 631.1],
                "poa_monthly": [135.3, 136.7, 176.4],
                "solrad_monthly": [4.4, 4.9, 5.7],
                "ac_annual": 6474.5,
                "solrad_annual": 5.5,
                "capacity_factor": 18.4,
                "ac": [0, 0, 412.7]
            }
        }))
    }

    #[test]
    fn reads_nested_values() {
        let result = sample();
        assert_eq!(result.ac_annual().unwrap(), 6474.5);
        assert_eq!(result.capacity_factor().unwrap(), 18.4);
        assert_eq!(result.get("station_info.city").unwrap(), "BOULDER");
        assert_eq!(result.get_f64("outputs.ac_monthly.1").unwrap(), 485.6);
        assert_eq!(result.ac_monthly().unwrap(), vec![474.3, 485.6, 631.1]);
        assert_eq!(result.ac_hourly().unwrap(), vec![0.0, 0.0, 412.7]);
        assert_eq!(result.version().unwrap(), "1.0.2");
        assert!(result.errors().unwrap().as_array().unwrap().is_empty());
        assert!(result.warnings().unwrap().as_array().unwrap().is_empty());
        assert_eq!(result.inputs().unwrap()["lat"], "40");
        assert_eq!(result.station_info().unwrap()["state"], "CO");
        assert_eq!(result.ssc_info().unwrap()["version"], 34);
        assert_eq!(result.poa_monthly().unwrap(), vec![135.3, 136.7, 176.4]);
        assert_eq!(result.solrad_monthly().unwrap(), vec![4.4, 4.9, 5.7]);
        assert_eq!(result.solrad_annual().unwrap(), 5.5);
        assert!(result.outputs().unwrap().is_object());
    }

    #[test]
    fn missing_fields_fail_on_access() {
        let result = sample();
        assert!(matches!(
            result.dc_monthly(),
            Err(PvWattsError::Lookup(_))
        ));
        assert!(result.get("outputs.ac_monthly.12").is_err());
        assert!(result.get("station_info.city.name").is_err());

        let empty = PvWattsResult::new(json!({}));
        let err = empty.outputs().unwrap_err();
        assert_eq!(err.to_string(), "Lookup error: no field 'outputs' in response");
    }

    #[test]
    fn wrong_types_fail_on_access() {
        let result = sample();
        assert!(result.get_f64("station_info.city").is_err());
        assert!(result.get_series("outputs.ac_annual").is_err());
    }

    #[test]
    fn raw_body_is_untouched() {
        let body = json!({ "outputs": { "ac_annual": 1234.5 } });
        let result = PvWattsResult::from(body.clone());
        assert_eq!(result.raw(), &body);
        assert_eq!(result.into_inner(), body);
    }
}
