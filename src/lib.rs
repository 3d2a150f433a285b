//! Client for the NREL PVWatts v5 solar energy estimation API.
//!
//! ```no_run
//! use pvwatts::{ClientConfig, ParameterSet, PvWatts};
//!
//! let client = PvWatts::new(ClientConfig::new("DEMO_KEY"))?;
//! let result = client.request(&ParameterSet {
//!     system_capacity: Some(4.0),
//!     lat: Some(40.0),
//!     lon: Some(-105.0),
//!     tilt: Some(40.0),
//!     azimuth: Some(180.0),
//!     ..ParameterSet::default()
//! })?;
//! println!("{} kWh/year", result.ac_annual()?);
//! # Ok::<(), pvwatts::PvWattsError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod validators;

pub use client::{PvWatts, VERSION};
pub use config::{ClientConfig, DEMO_KEY, PVWATTS_QUERY_URL};
pub use error::{PvWattsError, Result, ValidationError};
pub use models::params::{ParameterSet, QueryParams};
pub use models::result::PvWattsResult;
