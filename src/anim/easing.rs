// ============================================================================
// EASING CURVES - the named eases the page uses, parsed from config strings
// ============================================================================

use std::f32::consts::TAU;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EaseParseError {
    #[error("unknown ease {0:?}")]
    Unknown(String),
    #[error("bad ease parameters in {0:?}")]
    Parameters(String),
}

/// An easing curve mapping linear progress `t` in [0, 1] to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum Ease {
    /// No easing, constant speed
    Linear,
    /// `powerN.in`: t^(N+1)
    PowerIn(u8),
    /// `powerN.out`: fast start, decelerates at the end
    PowerOut(u8),
    /// `powerN.inOut`: S-curve
    PowerInOut(u8),
    /// `elastic.out(amplitude, period)`: overshoots and settles with a wobble
    ElasticOut { amplitude: f32, period: f32 },
    /// `expo.out`
    ExpoOut,
    /// Smooth-scroll curve: `min(1, 1.001 - 2^(-10t))`
    SmoothScroll,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::PowerIn(n) => t.powi(n as i32 + 1),
            Ease::PowerOut(n) => 1.0 - (1.0 - t).powi(n as i32 + 1),
            Ease::PowerInOut(n) => {
                let exponent = n as i32 + 1;
                if t < 0.5 {
                    (2.0 * t).powi(exponent) / 2.0
                } else {
                    1.0 - (2.0 * (1.0 - t)).powi(exponent) / 2.0
                }
            }
            Ease::ElasticOut { amplitude, period } => elastic_out(t, amplitude, period),
            Ease::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            Ease::SmoothScroll => (1.001 - 2f32.powf(-10.0 * t)).min(1.0),
        }
    }
}

/// Elastic ease-out with the amplitude/period parameterisation used by the
/// page's animation configs: `elastic.out(1, 0.3)` settles in ~3 wobbles.
fn elastic_out(t: f32, amplitude: f32, period: f32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }
    let amp = amplitude.max(1.0);
    let period = period / amplitude.min(1.0);
    let phase = period / TAU * (1.0 / amp).asin();
    amp * 2f32.powf(-10.0 * t) * ((t - phase) * TAU / period).sin() + 1.0
}

impl FromStr for Ease {
    type Err = EaseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, args) = match s.find('(') {
            Some(open) => {
                let close = s
                    .rfind(')')
                    .filter(|&close| close > open)
                    .ok_or_else(|| EaseParseError::Parameters(s.to_string()))?;
                (&s[..open], Some(&s[open + 1..close]))
            }
            None => (s, None),
        };

        let (family, variant) = name.split_once('.').unwrap_or((name, "out"));

        if let Some(power) = family.strip_prefix("power") {
            let n: u8 = power
                .parse()
                .map_err(|_| EaseParseError::Unknown(s.to_string()))?;
            if n == 0 {
                return Ok(Ease::Linear);
            }
            return match variant {
                "in" => Ok(Ease::PowerIn(n)),
                "out" => Ok(Ease::PowerOut(n)),
                "inOut" => Ok(Ease::PowerInOut(n)),
                _ => Err(EaseParseError::Unknown(s.to_string())),
            };
        }

        match (family, variant) {
            ("none" | "linear", _) => Ok(Ease::Linear),
            ("expo", "out") => Ok(Ease::ExpoOut),
            ("smoothScroll", _) => Ok(Ease::SmoothScroll),
            ("elastic", "out") => {
                let (amplitude, period) = match args {
                    None => (1.0, 0.3),
                    Some(args) => parse_elastic_args(args)
                        .ok_or_else(|| EaseParseError::Parameters(s.to_string()))?,
                };
                Ok(Ease::ElasticOut { amplitude, period })
            }
            _ => Err(EaseParseError::Unknown(s.to_string())),
        }
    }
}

fn parse_elastic_args(args: &str) -> Option<(f32, f32)> {
    let mut parts = args.split(',').map(|part| part.trim().parse::<f32>());
    let amplitude = parts.next()?.ok()?;
    let period = match parts.next() {
        Some(period) => period.ok()?,
        None => 0.3,
    };
    if parts.next().is_some() || period <= 0.0 || amplitude <= 0.0 {
        return None;
    }
    Some((amplitude, period))
}

impl TryFrom<String> for Ease {
    type Error = EaseParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_all_eases_hit_endpoints() {
        let eases = [
            Ease::Linear,
            Ease::PowerIn(2),
            Ease::PowerOut(3),
            Ease::PowerInOut(4),
            Ease::ElasticOut { amplitude: 1.0, period: 0.3 },
            Ease::ExpoOut,
        ];
        for ease in eases {
            assert!(ease.apply(0.0).abs() < EPS, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < EPS, "{ease:?} at 1");
        }
    }

    #[test]
    fn test_power_out_matches_polynomial() {
        // power2.out is a cubic ease-out
        let t = 0.4;
        let expected = 1.0 - (1.0f32 - t).powi(3);
        assert!((Ease::PowerOut(2).apply(t) - expected).abs() < EPS);
    }

    #[test]
    fn test_elastic_out_overshoots() {
        let ease = Ease::ElasticOut { amplitude: 1.0, period: 0.3 };
        let peak = (1..100)
            .map(|i| ease.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0, "elastic should overshoot, peak = {peak}");
    }

    #[test]
    fn test_smooth_scroll_curve_saturates() {
        assert!((Ease::SmoothScroll.apply(1.0) - 1.0).abs() < EPS);
        assert!(Ease::SmoothScroll.apply(0.5) > 0.96);
        assert!(Ease::SmoothScroll.apply(0.5) <= 1.0);
    }

    #[test]
    fn test_parse_gsap_names() {
        assert_eq!("power3.out".parse::<Ease>(), Ok(Ease::PowerOut(3)));
        assert_eq!("power2".parse::<Ease>(), Ok(Ease::PowerOut(2)));
        assert_eq!("power1.inOut".parse::<Ease>(), Ok(Ease::PowerInOut(1)));
        assert_eq!("none".parse::<Ease>(), Ok(Ease::Linear));
        assert_eq!(
            "elastic.out(1, 0.3)".parse::<Ease>(),
            Ok(Ease::ElasticOut { amplitude: 1.0, period: 0.3 })
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("bounce.sideways".parse::<Ease>().is_err());
        assert!("elastic.out(1, x)".parse::<Ease>().is_err());
        assert!("elastic.out(1".parse::<Ease>().is_err());
    }
}
