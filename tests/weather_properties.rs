use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use savanna_core::config::WeatherConfig;
use savanna_core::environment::{Clock, HourWindow, Weather};

prop_compose! {
    fn arb_weather_config()(
        min_temp in -10i32..30,
        temp_span in 0i32..15,
        min_visibility in -3i32..1,
        vis_span in 0i32..4,
        rain_probability in 0.0f64..=1.0,
    ) -> WeatherConfig {
        WeatherConfig {
            min_temp,
            max_temp: min_temp + temp_span,
            min_visibility,
            max_visibility: min_visibility + vis_span,
            rain_probability,
            ..WeatherConfig::default()
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_weather_walk_stays_in_bounds(
        config in arb_weather_config(),
        seed in any::<u64>(),
        changes in 1usize..200,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut weather = Weather::new(config.clone(), &mut rng);
        for _ in 0..changes {
            let before = weather.temperature;
            weather.change(&mut rng);
            prop_assert!((config.min_temp..=config.max_temp).contains(&weather.temperature));
            prop_assert!((config.min_visibility..=config.max_visibility).contains(&weather.visibility));
            prop_assert!((weather.temperature - before).abs() <= 1);
        }
    }

    #[test]
    fn test_hot_ceiling_only_steps_down(seed in any::<u64>()) {
        let config = WeatherConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut weather = Weather::fixed(config.clone(), config.max_temp, 0, false);
        weather.change(&mut rng);
        prop_assert!(
            weather.temperature == config.max_temp || weather.temperature == config.max_temp - 1
        );
    }

    #[test]
    fn test_window_matches_hour_arithmetic(start in 0u8..24, end in 0u8..24, hour in 0u8..24) {
        let window = HourWindow::new(start, end);
        let length = (i32::from(end) - i32::from(start)).rem_euclid(24);
        let offset = (i32::from(hour) - i32::from(start)).rem_euclid(24);
        prop_assert_eq!(window.contains(hour), offset < length);
    }

    #[test]
    fn test_clock_wraps(start in 0u8..24, ticks in 0usize..100) {
        let mut clock = Clock::at(start);
        for _ in 0..ticks {
            clock.tick();
        }
        prop_assert_eq!(usize::from(clock.hour()), (usize::from(start) + ticks) % 24);
    }
}
