#[cfg(test)]
mod tests {
    use super::super::indicators::*;
    use analysis_core::{Bar, PriceSeries};
    use chrono::{Duration, TimeZone, Utc};

    // Helper function to create sample price data
    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    fn sample_series(len: usize) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let bars = (0..len)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1;
                Bar {
                    timestamp: start + Duration::days(i as i64),
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1_000_000.0,
                }
            })
            .collect();
        PriceSeries::new("SLCE3.SA", bars).unwrap()
    }

    fn defined(series: &[Option<f64>]) -> Vec<f64> {
        series.iter().flatten().copied().collect()
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3);

        assert_eq!(result.len(), data.len());
        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert!((result[2].unwrap() - 2.0).abs() < 0.001); // (1+2+3)/3 = 2
        assert!((result[3].unwrap() - 3.0).abs() < 0.001); // (2+3+4)/3 = 3
        assert!((result[4].unwrap() - 4.0).abs() < 0.001); // (3+4+5)/3 = 4
    }

    #[test]
    fn test_sma_insufficient_data() {
        let data = vec![1.0, 2.0];
        let result = sma(&data, 5);

        assert_eq!(result, vec![None, None]);
    }

    #[test]
    fn test_sma_real_prices() {
        let prices = sample_prices();
        let result = sma(&prices, 5);

        // First SMA(5) should be average of first 5 prices
        let expected_first = (44.34 + 44.09 + 44.15 + 43.61 + 44.33) / 5.0;
        assert!((result[4].unwrap() - expected_first).abs() < 0.01);
        assert_eq!(defined(&result).len(), prices.len() - 4);
    }

    #[test]
    fn test_ema_seeded_with_first_value() {
        // alpha = 2 / (3 + 1) = 0.5: 1.0, 1.5, 2.25
        let result = ema(&[1.0, 2.0, 3.0], 3);
        assert_eq!(result, vec![None, None, Some(2.25)]);
    }

    #[test]
    fn test_ema_empty_data() {
        let data: Vec<f64> = vec![];
        assert!(ema(&data, 5).is_empty());
    }

    #[test]
    fn test_ema_increases_with_uptrend() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let result = defined(&ema(&data, 3));

        for i in 1..result.len() {
            assert!(result[i] > result[i - 1]);
        }
    }

    #[test]
    fn test_rsi_wilder_small_example() {
        // gains [0, 1, 0], losses [0, 0, 1], alpha = 0.5
        // avg gain: 0, 0.5, 0.25; avg loss: 0, 0, 0.5
        let result = rsi(&[1.0, 2.0, 1.0], 2);
        assert_eq!(result[0], None);
        assert_eq!(result[1], Some(100.0));
        assert!((result[2].unwrap() - (100.0 - 100.0 / 1.5)).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_bounds_and_warmup() {
        let prices = sample_prices();
        let result = rsi(&prices, 14);

        assert_eq!(result.len(), prices.len());
        assert!(result[..13].iter().all(|v| v.is_none()));
        for value in defined(&result) {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_rsi_monotonic_series() {
        let up: Vec<f64> = (0..30).map(|i| i as f64).collect();
        assert_eq!(latest(&rsi(&up, 14)), Some(100.0));

        let down: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        assert_eq!(latest(&rsi(&down, 14)), Some(0.0));
    }

    #[test]
    fn test_macd_line_warmup_and_sign() {
        let up: Vec<f64> = (0..60).map(|i| 10.0 + i as f64).collect();
        let result = macd_line(&up, 12, 26);

        assert_eq!(result.len(), up.len());
        assert!(result[..25].iter().all(|v| v.is_none()));
        assert!(result[25..].iter().all(|v| v.unwrap() > 0.0));
    }

    #[test]
    fn test_macd_invalid_periods() {
        let data = vec![1.0; 40];
        assert!(macd_line(&data, 26, 12).iter().all(|v| v.is_none()));
        assert!(macd_line(&data, 0, 26).iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_rolling_extremes() {
        let data = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0];
        assert_eq!(
            rolling_max(&data, 3),
            vec![None, None, Some(4.0), Some(4.0), Some(5.0), Some(9.0), Some(9.0)]
        );
        assert_eq!(
            rolling_min(&data, 3),
            vec![None, None, Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(2.0)]
        );
    }

    #[test]
    fn test_indicator_set_unavailable_below_min_bars() {
        assert!(IndicatorSet::compute(&sample_series(MIN_BARS - 1)).is_none());
    }

    #[test]
    fn test_indicator_set_aligned_with_bars() {
        let series = sample_series(120);
        let set = IndicatorSet::compute(&series).unwrap();

        assert_eq!(set.len(), series.len());
        assert_eq!(set.rsi_14.len(), series.len());
        assert_eq!(set.macd.len(), series.len());
        assert_eq!(set.sma_20.iter().position(|v| v.is_some()), Some(SMA_WINDOW - 1));
        assert_eq!(set.rsi_14.iter().position(|v| v.is_some()), Some(RSI_WINDOW - 1));
        assert_eq!(set.macd.iter().position(|v| v.is_some()), Some(MACD_SLOW - 1));
        assert!(set.latest_sma().is_some());
        assert!(set.latest_rsi().is_some());
        assert!(set.latest_macd().is_some());
    }
}
