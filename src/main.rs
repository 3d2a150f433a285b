use std::process::ExitCode;

use clap::Parser;
use pvwatts::{ClientConfig, ParameterSet, PvWatts, PvWattsError, logging};

/// Query the NREL PVWatts v5 API and print the JSON response.
#[derive(Debug, Parser)]
#[command(name = "pvwatts", version, allow_negative_numbers = true)]
struct Cli {
    /// JSON client configuration (api_key, proxies, timeout_secs, endpoint)
    #[arg(long)]
    config: Option<String>,

    #[arg(long, env = "PVWATTS_API_KEY")]
    api_key: Option<String>,

    /// JSON object with request parameters; flags below override it
    #[arg(long)]
    params: Option<String>,

    #[arg(long, default_value = "warn")]
    log_level: String,

    #[arg(long)]
    format: Option<String>,
    #[arg(long)]
    system_capacity: Option<f64>,
    #[arg(long)]
    module_type: Option<i64>,
    #[arg(long)]
    losses: Option<f64>,
    #[arg(long)]
    array_type: Option<i64>,
    #[arg(long)]
    tilt: Option<f64>,
    #[arg(long)]
    azimuth: Option<f64>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    lat: Option<f64>,
    #[arg(long)]
    lon: Option<f64>,
    #[arg(long)]
    file_id: Option<String>,
    #[arg(long)]
    dataset: Option<String>,
    #[arg(long)]
    radius: Option<f64>,
    #[arg(long)]
    timeframe: Option<String>,
    #[arg(long)]
    dc_ac_ratio: Option<f64>,
    #[arg(long)]
    gcr: Option<f64>,
    #[arg(long)]
    inv_eff: Option<f64>,
    #[arg(long)]
    callback: Option<String>,
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig, PvWattsError> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        if let Some(key) = &self.api_key {
            config.api_key = key.clone();
        }
        Ok(config)
    }

    fn parameters(&self) -> Result<ParameterSet, PvWattsError> {
        let mut p = match &self.params {
            Some(path) => ParameterSet::load(path)?,
            None => ParameterSet::default(),
        };

        macro_rules! flag {
            ($($field:ident),* $(,)?) => {
                $( if self.$field.is_some() { p.$field = self.$field.clone(); } )*
            };
        }
        flag!(
            format, system_capacity, module_type, losses, array_type, tilt, azimuth, address,
            lat, lon, file_id, dataset, radius, timeframe, dc_ac_ratio, gcr, inv_eff, callback,
        );
        Ok(p)
    }
}

fn run(cli: &Cli) -> Result<(), PvWattsError> {
    let config = cli.client_config()?;
    let params = cli.parameters()?;

    let client = PvWatts::new(config)?;
    let result = client.request(&params)?;

    println!("{}", serde_json::to_string_pretty(result.raw())?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_level) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pvwatts: {}", e);
            ExitCode::FAILURE
        }
    }
}
