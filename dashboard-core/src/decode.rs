//! Typed views of the provider's JSON responses.
//!
//! Field names are matched case-insensitively: object keys are folded to
//! lowercase before deserializing, so every struct here uses lowercase names.

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// A response shape with checks beyond what serde enforces.
pub trait Payload: DeserializeOwned {
    fn validate(&self) -> Result<(), DecodeError> {
        Ok(())
    }
}

/// Decode `body` as `T`, rejecting missing, mistyped or empty required data.
pub fn decode<T: Payload>(body: &str) -> Result<T, DecodeError> {
    let value: Value = serde_json::from_str(body)?;
    let payload: T = serde_json::from_value(fold_keys(value))?;
    payload.validate()?;
    Ok(payload)
}

fn fold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), fold_keys(v)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(fold_keys).collect()),
        other => other,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReading {
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeatherPayload {
    pub name: String,
    pub main: MainReading,
    pub weather: Vec<Condition>,
}

impl CurrentWeatherPayload {
    /// First condition; presence is guaranteed once the payload is validated.
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

impl Payload for CurrentWeatherPayload {
    fn validate(&self) -> Result<(), DecodeError> {
        if self.weather.is_empty() {
            return Err(DecodeError::Invalid("weather array is empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastCity {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: MainReading,
    pub weather: Vec<Condition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub city: ForecastCity,
    pub list: Vec<ForecastEntry>,
}

impl Payload for ForecastPayload {
    fn validate(&self) -> Result<(), DecodeError> {
        if self.list.iter().any(|e| e.weather.is_empty()) {
            return Err(DecodeError::Invalid("forecast entry has an empty weather array"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeMatch {
    pub lat: f64,
    pub lon: f64,
}

/// Geocoding returns a bare array; an empty one is valid here and treated
/// as "no match" by the normalizer.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct GeocodePayload(pub Vec<GeocodeMatch>);

impl Payload for GeocodePayload {}

#[derive(Debug, Clone, Deserialize)]
pub struct AqiMain {
    pub aqi: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Components {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub pm2_5: f64,
    pub pm10: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollutionSample {
    pub main: AqiMain,
    pub components: Components,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirPollutionPayload {
    pub list: Vec<PollutionSample>,
}

impl Payload for AirPollutionPayload {
    fn validate(&self) -> Result<(), DecodeError> {
        if self.list.is_empty() {
            return Err(DecodeError::Invalid("air pollution list is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn current_weather_decodes() {
        let body = json!({
            "name": "Paris",
            "dt": 1700000000,
            "main": { "temp": 15.34, "humidity": 80 },
            "weather": [{ "id": 804, "main": "Clouds", "description": "overcast clouds", "icon": "04d" }]
        })
        .to_string();

        let parsed: CurrentWeatherPayload = decode(&body).expect("valid payload");
        assert_eq!(parsed.name, "Paris");
        assert_eq!(parsed.main.temp, 15.34);
        assert_eq!(parsed.weather[0].icon, "04d");
    }

    #[test]
    fn field_names_are_case_insensitive() {
        let body = json!({
            "Name": "Oslo",
            "MAIN": { "Temp": -3.0 },
            "Weather": [{ "Main": "Snow", "DESCRIPTION": "light snow", "icon": "13d" }]
        })
        .to_string();

        let parsed: CurrentWeatherPayload = decode(&body).expect("keys should fold");
        assert_eq!(parsed.name, "Oslo");
        assert_eq!(parsed.weather[0].description, "light snow");
    }

    #[test]
    fn missing_weather_array_is_malformed() {
        let body = json!({ "name": "Paris", "main": { "temp": 1.0 } }).to_string();
        let err = decode::<CurrentWeatherPayload>(&body).unwrap_err();

        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn empty_weather_array_is_invalid() {
        let body = json!({ "name": "Paris", "main": { "temp": 1.0 }, "weather": [] }).to_string();
        let err = decode::<CurrentWeatherPayload>(&body).unwrap_err();

        assert!(matches!(err, DecodeError::Invalid(_)));
    }

    #[test]
    fn wrong_type_is_malformed() {
        let body = json!({
            "name": "Paris",
            "main": { "temp": "warm" },
            "weather": [{ "main": "Clear", "description": "clear sky", "icon": "01d" }]
        })
        .to_string();

        assert!(matches!(
            decode::<CurrentWeatherPayload>(&body),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn not_json_is_malformed() {
        assert!(matches!(
            decode::<ForecastPayload>("<html>oops</html>"),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn forecast_entry_without_weather_is_invalid() {
        let body = json!({
            "city": { "name": "Rome" },
            "list": [
                { "dt": 1, "main": { "temp": 20.0 }, "weather": [{ "main": "Clear", "description": "clear sky", "icon": "01d" }] },
                { "dt": 2, "main": { "temp": 21.0 }, "weather": [] }
            ]
        })
        .to_string();

        assert!(matches!(decode::<ForecastPayload>(&body), Err(DecodeError::Invalid(_))));
    }

    #[test]
    fn empty_forecast_list_is_accepted() {
        let body = json!({ "city": { "name": "Rome" }, "list": [] }).to_string();
        let parsed: ForecastPayload = decode(&body).unwrap();

        assert!(parsed.list.is_empty());
    }

    #[test]
    fn geocode_array_decodes_including_empty() {
        let parsed: GeocodePayload =
            decode(r#"[{"name":"London","lat":51.5073,"lon":-0.1276,"country":"GB"}]"#).unwrap();
        assert_eq!(parsed.0.len(), 1);
        assert_eq!(parsed.0[0].lon, -0.1276);

        let empty: GeocodePayload = decode("[]").unwrap();
        assert!(empty.0.is_empty());
    }

    #[test]
    fn geocode_object_is_malformed() {
        assert!(matches!(
            decode::<GeocodePayload>(r#"{"cod":401}"#),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn air_pollution_requires_a_sample() {
        let empty = json!({ "coord": { "lat": 1.0, "lon": 2.0 }, "list": [] }).to_string();
        assert!(matches!(
            decode::<AirPollutionPayload>(&empty),
            Err(DecodeError::Invalid(_))
        ));

        let body = json!({
            "list": [{
                "main": { "aqi": 2 },
                "components": { "co": 201.94, "no": 0.02, "no2": 0.77, "o3": 68.66, "so2": 0.64, "PM2_5": 0.5, "pm10": 0.54, "nh3": 0.12 },
                "dt": 1605182400
            }]
        })
        .to_string();
        let parsed: AirPollutionPayload = decode(&body).unwrap();
        assert_eq!(parsed.list[0].main.aqi, 2);
        assert_eq!(parsed.list[0].components.pm2_5, 0.5);
    }
}
