//! Fixed-size float tuples stored as `( v0 , v1 , ... )` text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A two-component vector (e.g. a text box size).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Decode tuple text, or `None` if it is not exactly two finite numbers.
    pub fn decode(text: &str) -> Option<Self> {
        let [x, y] = decode_tuple::<2>(text)?;
        Some(Self { x, y })
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( {} , {} )", self.x, self.y)
    }
}

/// A four-component vector (e.g. an RGBA color).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vector4 {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Decode tuple text, or `None` if it is not exactly four finite numbers.
    pub fn decode(text: &str) -> Option<Self> {
        let [x, y, z, w] = decode_tuple::<4>(text)?;
        Some(Self { x, y, z, w })
    }
}

impl fmt::Display for Vector4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( {} , {} , {} , {} )", self.x, self.y, self.z, self.w)
    }
}

/// Parse a finite float, tolerating surrounding whitespace.
pub(crate) fn decode_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse `( a , b , ... )` into exactly `N` finite components.
fn decode_tuple<const N: usize>(text: &str) -> Option<[f64; N]> {
    let inner = text
        .trim()
        .strip_prefix('(')?
        .strip_suffix(')')?;

    let mut out = [0.0; N];
    let mut count = 0;
    for part in inner.split(',') {
        if count == N {
            return None;
        }
        out[count] = decode_float(part)?;
        count += 1;
    }

    (count == N).then_some(out)
}
