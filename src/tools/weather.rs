use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::tool_registry::Tool;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

#[derive(Deserialize, Debug)]
pub struct WeatherArgs {
    pub location: String,
    #[serde(default)]
    pub unit: Option<TemperatureUnit>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct WeatherReport {
    pub location: String,
    pub temperature: String,
    pub unit: Option<TemperatureUnit>,
    pub forecast: String,
}

/// Canned weather lookup: always thirty degrees and sunny.
pub struct CurrentWeather;

impl Tool for CurrentWeather {
    const NAME: &'static str = "get_current_weather";
    const DESCRIPTION: &'static str = "Get the current weather in a given location";

    type Args = WeatherArgs;
    type Output = WeatherReport;

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city and state, e.g. San Francisco, CA"
                },
                "unit": {
                    "type": "string",
                    "enum": ["celsius", "fahrenheit"]
                }
            },
            "required": ["location"]
        })
    }

    fn call(&self, args: WeatherArgs) -> anyhow::Result<WeatherReport> {
        info!(location = %args.location, unit = ?args.unit, "get_current_weather called");
        Ok(WeatherReport {
            location: args.location,
            temperature: "30".to_string(),
            unit: args.unit,
            forecast: "sunny".to_string(),
        })
    }
}
