//! Mock historical weather. There is no upstream data behind this: values are
//! drawn from a [`RandomSource`] within fixed plausible ranges.

use std::ops::Range;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::{
    model::{HistoricalDay, HistoricalWeather},
    normalize::round_one_decimal,
};

pub const DEFAULT_DAYS: u32 = 5;
pub const MAX_DAYS: u32 = 30;

pub const TEMPERATURE_RANGE: Range<f64> = 5.0..35.0;
pub const HUMIDITY_RANGE: Range<u8> = 30..90;
pub const PRESSURE_RANGE: Range<u16> = 980..1030;

/// Source of the synthetic values.
pub trait RandomSource: Send + Sync {
    /// Uniform in `[0, 1)`.
    fn next_unit(&self) -> f64;
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().r#gen::<f64>()
    }
}

fn scale(unit: f64, range: &Range<f64>) -> f64 {
    // Clamp keeps a misbehaving source inside the half-open range.
    let unit = unit.clamp(0.0, 1.0 - f64::EPSILON);
    range.start + unit * (range.end - range.start)
}

fn pick_u16(rng: &dyn RandomSource, range: Range<u16>) -> u16 {
    let span = f64::from(range.end - range.start);
    let offset = scale(rng.next_unit(), &(0.0..span)).floor() as u16;
    range.start + offset
}

pub fn clamp_days(days: Option<u32>) -> u32 {
    days.unwrap_or(DEFAULT_DAYS).clamp(1, MAX_DAYS)
}

/// One entry per day, starting yesterday and going back `days` days.
pub fn generate(
    city: &str,
    days: u32,
    now: DateTime<Utc>,
    rng: &dyn RandomSource,
) -> HistoricalWeather {
    let historical_data = (1..=days)
        .map(|i| HistoricalDay {
            date: now - Duration::days(i64::from(i)),
            temperature: round_one_decimal(scale(rng.next_unit(), &TEMPERATURE_RANGE)),
            humidity: pick_u16(rng, u16::from(HUMIDITY_RANGE.start)..u16::from(HUMIDITY_RANGE.end))
                as u8,
            pressure: pick_u16(rng, PRESSURE_RANGE),
        })
        .collect();

    HistoricalWeather { city: city.to_string(), historical_data }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays a fixed sequence, cycling when exhausted.
    struct Sequence {
        values: Vec<f64>,
        pos: Mutex<usize>,
    }

    impl Sequence {
        fn new(values: &[f64]) -> Self {
            Self { values: values.to_vec(), pos: Mutex::new(0) }
        }
    }

    impl RandomSource for Sequence {
        fn next_unit(&self) -> f64 {
            let mut pos = self.pos.lock().unwrap();
            let v = self.values[*pos % self.values.len()];
            *pos += 1;
            v
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn lower_bounds_at_zero() {
        let h = generate("Lima", 1, fixed_now(), &Sequence::new(&[0.0]));
        let day = &h.historical_data[0];

        assert_eq!(day.temperature, 5.0);
        assert_eq!(day.humidity, 30);
        assert_eq!(day.pressure, 980);
    }

    #[test]
    fn upper_bounds_stay_exclusive() {
        let h = generate("Lima", 1, fixed_now(), &Sequence::new(&[1.0]));
        let day = &h.historical_data[0];

        assert!(day.temperature <= 35.0);
        assert_eq!(day.humidity, 89);
        assert_eq!(day.pressure, 1029);
    }

    #[test]
    fn midpoint_values() {
        let h = generate("Lima", 1, fixed_now(), &Sequence::new(&[0.5]));
        let day = &h.historical_data[0];

        assert_eq!(day.temperature, 20.0);
        assert_eq!(day.humidity, 60);
        assert_eq!(day.pressure, 1005);
    }

    #[test]
    fn dates_walk_backwards_from_yesterday() {
        let now = fixed_now();
        let h = generate("Lima", 3, now, &Sequence::new(&[0.3]));

        let dates: Vec<_> = h.historical_data.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            [now - Duration::days(1), now - Duration::days(2), now - Duration::days(3)]
        );
        assert_eq!(h.city, "Lima");
    }

    #[test]
    fn thread_random_stays_in_range() {
        let h = generate("Lima", MAX_DAYS, Utc::now(), &ThreadRandom);

        assert_eq!(h.historical_data.len(), MAX_DAYS as usize);
        for day in &h.historical_data {
            assert!((5.0..=35.0).contains(&day.temperature));
            assert!(HUMIDITY_RANGE.contains(&day.humidity));
            assert!(PRESSURE_RANGE.contains(&day.pressure));
        }
    }

    #[test]
    fn days_are_clamped() {
        assert_eq!(clamp_days(None), 5);
        assert_eq!(clamp_days(Some(0)), 1);
        assert_eq!(clamp_days(Some(7)), 7);
        assert_eq!(clamp_days(Some(10_000)), MAX_DAYS);
    }
}
