//! Random sources for cosmetic star placement (not crypto-relevant even when
//! backed by the crypto RNG).

/// Uniform sample in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// `Math.random()` from the host page.
#[derive(Clone, Copy, Debug, Default)]
pub struct MathRandom;

impl RandomSource for MathRandom {
    fn next_unit(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

/// `crypto.getRandomValues` via getrandom's `js` backend. Falls back to
/// `Math.random()` if the browser refuses.
#[cfg(feature = "rng")]
#[derive(Clone, Copy, Debug, Default)]
pub struct CryptoRandom;

#[cfg(feature = "rng")]
impl RandomSource for CryptoRandom {
    fn next_unit(&mut self) -> f64 {
        let mut buf = [0u8; 8];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => unit_from_bits(u64::from_le_bytes(buf)),
            Err(err) => {
                log::warn!("getrandom failed ({err}), using Math.random");
                js_sys::Math::random()
            }
        }
    }
}

/// Top 53 bits of `bits` as a float in `[0, 1)`.
#[cfg_attr(not(feature = "rng"), allow(dead_code))]
fn unit_from_bits(bits: u64) -> f64 {
    (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Source used by the page.
#[cfg(feature = "rng")]
pub fn page_source() -> Box<dyn RandomSource> {
    Box::new(CryptoRandom)
}

/// Source used by the page.
#[cfg(not(feature = "rng"))]
pub fn page_source() -> Box<dyn RandomSource> {
    Box::new(MathRandom)
}

/// Replays a fixed list of samples, cycling. Test helper.
#[cfg(test)]
pub(crate) struct Sequence {
    values: Vec<f64>,
    pos: usize,
}

#[cfg(test)]
impl Sequence {
    pub(crate) fn new(values: &[f64]) -> Self {
        Self { values: values.to_vec(), pos: 0 }
    }
}

#[cfg(test)]
impl RandomSource for Sequence {
    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}
