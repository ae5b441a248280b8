//! Easing functions for animations

use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Easing function type
///
/// Parses from the camel-case names used in markup and configuration
/// (`linear`, `easeInOutQuad`, `cubicBezier(0.4, 0, 0.2, 1)`, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    CubicBezier(f32, f32, f32, f32),
}

/// Unknown or malformed easing name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown easing: {0}")]
pub struct EasingParseError(pub String);

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::EaseInSine => 1.0 - (t * std::f32::consts::FRAC_PI_2).cos(),
            Easing::EaseOutSine => (t * std::f32::consts::FRAC_PI_2).sin(),
            Easing::EaseInOutSine => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
        }
    }
}

impl FromStr for Easing {
    type Err = EasingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let easing = match name {
            "linear" => Easing::Linear,
            "easeInQuad" => Easing::EaseInQuad,
            "easeOutQuad" => Easing::EaseOutQuad,
            "easeInOutQuad" => Easing::EaseInOutQuad,
            "easeInCubic" => Easing::EaseInCubic,
            "easeOutCubic" => Easing::EaseOutCubic,
            "easeInOutCubic" => Easing::EaseInOutCubic,
            "easeInQuart" => Easing::EaseInQuart,
            "easeOutQuart" => Easing::EaseOutQuart,
            "easeInOutQuart" => Easing::EaseInOutQuart,
            "easeInSine" => Easing::EaseInSine,
            "easeOutSine" => Easing::EaseOutSine,
            "easeInOutSine" => Easing::EaseInOutSine,
            _ => return parse_cubic_bezier(name).ok_or_else(|| EasingParseError(s.to_string())),
        };
        Ok(easing)
    }
}

impl TryFrom<String> for Easing {
    type Error = EasingParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// `cubicBezier(x1, y1, x2, y2)`
fn parse_cubic_bezier(name: &str) -> Option<Easing> {
    let args = name.strip_prefix("cubicBezier(")?.strip_suffix(')')?;
    let values: Vec<f32> = args
        .split(',')
        .map(|v| v.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .ok()?;
    match values.as_slice() {
        [x1, y1, x2, y2] => Some(Easing::CubicBezier(*x1, *y1, *x2, *y2)),
        _ => None,
    }
}

/// Cubic bezier easing calculation (as browsers evaluate CSS `cubic-bezier`).
///
/// Uses Newton-Raphson with binary-search fallback for robustness.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x = t as f64;
    let x1 = x1 as f64;
    let y1 = y1 as f64;
    let x2 = x2 as f64;
    let y2 = y2 as f64;

    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³ in Horner form
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseInOutQuad,
            Easing::EaseOutCubic,
            Easing::EaseInOutSine,
            Easing::CubicBezier(0.4, 0.0, 0.2, 1.0),
        ] {
            assert!(easing.apply(0.0).abs() < 1e-5, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-5, "{:?} at 1", easing);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("linear".parse::<Easing>(), Ok(Easing::Linear));
        assert_eq!("easeInOutQuad".parse::<Easing>(), Ok(Easing::EaseInOutQuad));
        assert_eq!(
            "cubicBezier(0.4, 0, 0.2, 1)".parse::<Easing>(),
            Ok(Easing::CubicBezier(0.4, 0.0, 0.2, 1.0))
        );
        assert_eq!(
            "bounce".parse::<Easing>(),
            Err(EasingParseError("bounce".to_string()))
        );
        assert!("cubicBezier(1, 2)".parse::<Easing>().is_err());
    }

    #[test]
    fn test_deserialize_from_string() {
        let easing: Easing = serde_json::from_str("\"easeOutQuart\"").unwrap();
        assert_eq!(easing, Easing::EaseOutQuart);
        assert!(serde_json::from_str::<Easing>("\"nope\"").is_err());
    }
}
