#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Deterministic per-texel hash used for noise synthesis.
pub(crate) fn hash_u32(seed: u64, x: u32, y: u32) -> u32 {
    let mut h = Fnv1a64::new(seed ^ Fnv1a64::OFFSET_BASIS);
    h.write_u64(u64::from(x));
    h.write_u64(u64::from(y));
    (h.finish() & 0xFFFF_FFFF) as u32
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Convert an opacity in `[0, 1]` into an 8-bit coverage value.
pub(crate) fn opacity_to_u8(opacity: f32) -> u16 {
    ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = (((*c as u32) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
