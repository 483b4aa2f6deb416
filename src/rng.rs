/// Source of the uniform draws used by the flee target.
pub trait RandomSource {
    /// Uniform integer in `min..=max`; returns `min` when the range is empty.
    fn int(&mut self, min: i32, max: i32) -> i32;
}

#[derive(Clone, Debug)]
pub struct Rng {
    seed: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn next_f32(&mut self) -> f32 {
        self.seed = self.seed.wrapping_add(0x6d2b79f5);
        let mut t = self.seed;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        let out = t ^ (t >> 14);
        (out as f64 / 4_294_967_296.0) as f32
    }

    pub fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_f32() * len as f32).floor().min((len - 1) as f32) as usize
    }
}

impl RandomSource for Rng {
    fn int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f32;
        (min + (self.next_f32() * span).floor() as i32).min(max)
    }
}

/// Replays a fixed list of draws, clamped into the requested range.
#[cfg(test)]
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    values: Vec<i32>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(values: Vec<i32>) -> Self {
        Self { values, cursor: 0 }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn int(&mut self, min: i32, max: i32) -> i32 {
        let value = self.values.get(self.cursor).copied().unwrap_or(min);
        self.cursor = (self.cursor + 1) % self.values.len().max(1);
        value.clamp(min, max.max(min))
    }
}
