//! Exponential Moving Average, used by MACD for its three smoothed lines.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = EMA[i-1] + k*(C[i] - EMA[i-1]).
//! Warmup: first (n-1) values are undefined.

/// EMA over an arbitrary value sequence; `None` during warmup.
///
/// Returns an empty vector for `period == 0`.
pub(crate) fn ema_of(input: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(input.len());
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, &x) in input.iter().enumerate() {
        if i + 1 < period {
            sum += x;
            out.push(None);
        } else if i + 1 == period {
            sum += x;
            ema = sum / period as f64;
            out.push(Some(ema));
        } else {
            ema += k * (x - ema);
            out.push(Some(ema));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_warmup() {
        let out = ema_of(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        assert_eq!(out.len(), 5);
        assert!(out[0].is_none());
        assert!(out[1].is_none());
        assert!(out[2..].iter().all(Option::is_some));
    }

    #[test]
    fn ema_period_1() {
        let out = ema_of(&[10.0, 20.0, 30.0], 1);
        assert_eq!(out, vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn ema_seed_is_sma() {
        let v = ema_of(&[10.0, 20.0, 30.0], 3)[2].unwrap();
        assert!((v - 20.0).abs() < 1e-12);
    }

    #[test]
    fn ema_recursive_calculation() {
        let out = ema_of(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        let k = 2.0 / 4.0;
        let sma = 20.0;
        let ema_3 = 40.0 * k + sma * (1.0 - k);
        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);

        assert!((out[3].unwrap() - ema_3).abs() < 1e-9);
        assert!((out[4].unwrap() - ema_4).abs() < 1e-9);
    }

    #[test]
    fn ema_equal_prices_stay_exact() {
        let out = ema_of(&[100.0; 12], 5);
        for v in &out[4..] {
            assert_eq!(*v, Some(100.0));
        }
    }

    #[test]
    fn ema_short_input_never_warms_up() {
        let out = ema_of(&[10.0, 20.0, 30.0], 5);
        assert_eq!(out, vec![None, None, None]);
    }

    #[test]
    fn ema_empty_input() {
        assert!(ema_of(&[], 3).is_empty());
    }

    #[test]
    fn ema_of_zero_period_is_empty() {
        assert!(ema_of(&[1.0, 2.0], 0).is_empty());
    }
}
