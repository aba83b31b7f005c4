use std::fmt::{self, Display};

use relaybot_core::tool::{Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;

const API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const MISSING_KEY_TEXT: &str = "Weather lookups are not configured on this \
bot (no OpenWeather API key). Let the user know the weather service is \
unavailable.";

#[derive(Deserialize, JsonSchema)]
pub struct WeatherToolParameters {
    #[schemars(description = "The city or location to get the weather for.")]
    location: String,
}

/// A tool for fetching current weather conditions from OpenWeather.
///
/// The API key is optional at construction time. Without one the tool
/// still registers, and tells the model the service is unavailable
/// instead of failing the call.
pub struct WeatherTool {
    api_key: Option<String>,
    client: reqwest::Client,
    parameter_schema: Value,
}

impl WeatherTool {
    /// Creates a new weather tool with an optional OpenWeather API key.
    pub fn new(api_key: Option<String>) -> Self {
        WeatherTool {
            api_key,
            client: reqwest::Client::new(),
            parameter_schema: schema_for!(WeatherToolParameters).to_value(),
        }
    }
}

impl Tool for WeatherTool {
    type Input = WeatherToolParameters;

    fn name(&self) -> &str {
        "getWeather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a location."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: WeatherToolParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let api_key = self.api_key.clone();
        let client = self.client.clone();
        let location = input.location;
        async move {
            let Some(api_key) = api_key else {
                return Ok(MISSING_KEY_TEXT.to_owned());
            };
            let text = match fetch_weather(&client, &api_key, &location).await {
                Ok(report) => report,
                Err(err) => {
                    warn!("weather lookup for `{location}` failed: {err}");
                    format!(
                        "Sorry, I couldn't get the weather for {location}. {err}"
                    )
                }
            };
            Ok(text)
        }
    }
}

async fn fetch_weather(
    client: &reqwest::Client,
    api_key: &str,
    location: &str,
) -> Result<String, LookupError> {
    let resp = client
        .get(API_URL)
        .query(&[
            ("q", location),
            ("units", "metric"),
            ("appid", api_key),
        ])
        .send()
        .await?;
    if !resp.status().is_success() {
        return Err(LookupError {
            message: format!(
                "The weather service returned status {}.",
                resp.status().as_u16()
            ),
        });
    }
    let weather: WeatherResponse = resp.json().await?;
    Ok(format_report(&weather))
}

fn format_report(weather: &WeatherResponse) -> String {
    let description = weather
        .weather
        .first()
        .map(|condition| condition.description.as_str())
        .unwrap_or("unknown");
    format!(
        "Weather in {}, {}:\n\
         Temperature: {}°C (feels like {}°C)\n\
         Conditions: {}\n\
         Humidity: {}%\n\
         Wind: {} m/s",
        weather.name,
        weather.sys.country,
        weather.main.temp,
        weather.main.feels_like,
        description,
        weather.main.humidity,
        weather.wind.speed
    )
}

#[derive(Deserialize)]
struct WeatherResponse {
    name: String,
    sys: Sys,
    main: MainReadings,
    weather: Vec<Condition>,
    wind: Wind,
}

#[derive(Deserialize)]
struct Sys {
    country: String,
}

#[derive(Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Deserialize)]
struct Condition {
    description: String,
}

#[derive(Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug)]
struct LookupError {
    message: String,
}

impl Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError {
            message: format!("The weather service could not be reached ({err})."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key() {
        let tool = WeatherTool::new(None);
        let result = tool
            .execute(WeatherToolParameters {
                location: "London".to_owned(),
            })
            .await
            .unwrap();
        assert_eq!(result, MISSING_KEY_TEXT);
    }

    #[test]
    fn test_request_query_encoding() {
        let req = reqwest::Client::new()
            .get(API_URL)
            .query(&[("q", "New York"), ("units", "metric"), ("appid", "k")])
            .build()
            .unwrap();
        assert_eq!(
            req.url().as_str(),
            "https://api.openweathermap.org/data/2.5/weather\
             ?q=New+York&units=metric&appid=k"
        );
    }

    #[test]
    fn test_format_report() {
        let weather: WeatherResponse = serde_json::from_value(serde_json::json!({
            "name": "London",
            "sys": { "country": "GB" },
            "main": { "temp": 14.2, "feels_like": 13.6, "humidity": 82.0 },
            "weather": [{ "description": "light rain" }],
            "wind": { "speed": 4.1 }
        }))
        .unwrap();
        assert_eq!(
            format_report(&weather),
            "Weather in London, GB:\n\
             Temperature: 14.2°C (feels like 13.6°C)\n\
             Conditions: light rain\n\
             Humidity: 82%\n\
             Wind: 4.1 m/s"
        );
    }
}
