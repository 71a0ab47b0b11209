//! Easing curves over `t` in `[0, 1]`.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const BACK: f64 = 1.70158;
const ELASTIC_PERIOD: f64 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCube,
    OutCube,
    InOutCube,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InBack,
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
    InElastic,
    OutElastic,
    InOutElastic,
}

impl Easing {
    pub fn apply(self, n: f64) -> f64 {
        match self {
            Easing::Linear => n,
            Easing::InQuad => n * n,
            Easing::OutQuad => n * (2.0 - n),
            Easing::InOutQuad => {
                let n = n * 2.0;
                if n < 1.0 {
                    0.5 * n * n
                } else {
                    let n = n - 1.0;
                    -0.5 * (n * (n - 2.0) - 1.0)
                }
            }
            Easing::InCube => n * n * n,
            Easing::OutCube => {
                let n = n - 1.0;
                n * n * n + 1.0
            }
            Easing::InOutCube => {
                let n = n * 2.0;
                if n < 1.0 {
                    0.5 * n * n * n
                } else {
                    let n = n - 2.0;
                    0.5 * (n * n * n + 2.0)
                }
            }
            Easing::InQuart => n.powi(4),
            Easing::OutQuart => 1.0 - (n - 1.0).powi(4),
            Easing::InOutQuart => {
                let n = n * 2.0;
                if n < 1.0 {
                    0.5 * n.powi(4)
                } else {
                    -0.5 * ((n - 2.0).powi(4) - 2.0)
                }
            }
            Easing::InQuint => n.powi(5),
            Easing::OutQuint => (n - 1.0).powi(5) + 1.0,
            Easing::InOutQuint => {
                let n = n * 2.0;
                if n < 1.0 {
                    0.5 * n.powi(5)
                } else {
                    0.5 * ((n - 2.0).powi(5) + 2.0)
                }
            }
            Easing::InSine => 1.0 - (n * PI / 2.0).cos(),
            Easing::OutSine => (n * PI / 2.0).sin(),
            Easing::InOutSine => 0.5 * (1.0 - (PI * n).cos()),
            Easing::InExpo => {
                if n == 0.0 {
                    0.0
                } else {
                    1024f64.powf(n - 1.0)
                }
            }
            Easing::OutExpo => {
                if n == 1.0 {
                    n
                } else {
                    1.0 - 2f64.powf(-10.0 * n)
                }
            }
            Easing::InOutExpo => {
                if n == 0.0 || n == 1.0 {
                    return n;
                }
                let n = n * 2.0;
                if n < 1.0 {
                    0.5 * 1024f64.powf(n - 1.0)
                } else {
                    0.5 * (-(2f64.powf(-10.0 * (n - 1.0))) + 2.0)
                }
            }
            Easing::InCirc => 1.0 - (1.0 - n * n).sqrt(),
            Easing::OutCirc => {
                let n = n - 1.0;
                (1.0 - n * n).sqrt()
            }
            Easing::InOutCirc => {
                let n = n * 2.0;
                if n < 1.0 {
                    -0.5 * ((1.0 - n * n).sqrt() - 1.0)
                } else {
                    let n = n - 2.0;
                    0.5 * ((1.0 - n * n).sqrt() + 1.0)
                }
            }
            Easing::InBack => n * n * ((BACK + 1.0) * n - BACK),
            Easing::OutBack => {
                let n = n - 1.0;
                n * n * ((BACK + 1.0) * n + BACK) + 1.0
            }
            Easing::InOutBack => {
                let s = BACK * 1.525;
                let n = n * 2.0;
                if n < 1.0 {
                    0.5 * (n * n * ((s + 1.0) * n - s))
                } else {
                    let n = n - 2.0;
                    0.5 * (n * n * ((s + 1.0) * n + s) + 2.0)
                }
            }
            Easing::InBounce => 1.0 - out_bounce(1.0 - n),
            Easing::OutBounce => out_bounce(n),
            Easing::InOutBounce => {
                if n < 0.5 {
                    (1.0 - out_bounce(1.0 - n * 2.0)) * 0.5
                } else {
                    out_bounce(n * 2.0 - 1.0) * 0.5 + 0.5
                }
            }
            Easing::InElastic => {
                if n == 0.0 || n == 1.0 {
                    return n;
                }
                let s = ELASTIC_PERIOD / 4.0;
                let n = n - 1.0;
                -(2f64.powf(10.0 * n) * ((n - s) * (2.0 * PI) / ELASTIC_PERIOD).sin())
            }
            Easing::OutElastic => {
                if n == 0.0 || n == 1.0 {
                    return n;
                }
                let s = ELASTIC_PERIOD / 4.0;
                2f64.powf(-10.0 * n) * ((n - s) * (2.0 * PI) / ELASTIC_PERIOD).sin() + 1.0
            }
            Easing::InOutElastic => {
                if n == 0.0 || n == 1.0 {
                    return n;
                }
                let s = ELASTIC_PERIOD / 4.0;
                let n = n * 2.0 - 1.0;
                let wave = ((n - s) * (2.0 * PI) / ELASTIC_PERIOD).sin();
                if n < 0.0 {
                    -0.5 * 2f64.powf(10.0 * n) * wave
                } else {
                    2f64.powf(-10.0 * n) * wave * 0.5 + 1.0
                }
            }
        }
    }
}

fn out_bounce(n: f64) -> f64 {
    if n < 1.0 / 2.75 {
        7.5625 * n * n
    } else if n < 2.0 / 2.75 {
        let n = n - 1.5 / 2.75;
        7.5625 * n * n + 0.75
    } else if n < 2.5 / 2.75 {
        let n = n - 2.25 / 2.75;
        7.5625 * n * n + 0.9375
    } else {
        let n = n - 2.625 / 2.75;
        7.5625 * n * n + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::InOutQuad,
        Easing::InCube,
        Easing::OutCube,
        Easing::InOutCube,
        Easing::InQuart,
        Easing::OutQuart,
        Easing::InOutQuart,
        Easing::InQuint,
        Easing::OutQuint,
        Easing::InOutQuint,
        Easing::InSine,
        Easing::OutSine,
        Easing::InOutSine,
        Easing::InExpo,
        Easing::OutExpo,
        Easing::InOutExpo,
        Easing::InCirc,
        Easing::OutCirc,
        Easing::InOutCirc,
        Easing::InBack,
        Easing::OutBack,
        Easing::InOutBack,
        Easing::InBounce,
        Easing::OutBounce,
        Easing::InOutBounce,
        Easing::InElastic,
        Easing::OutElastic,
        Easing::InOutElastic,
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-3, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-3, "{:?} at 1", easing);
        }
    }

    #[test]
    fn test_symmetric_curves_pass_midpoint() {
        for easing in [Easing::InOutQuad, Easing::InOutCube, Easing::InOutSine, Easing::InOutBounce] {
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-9, "{:?}", easing);
        }
    }
}
