use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;

use super::{UniformSink, UniformValue};

/// CPU-side mirror of a shader's uniform state, keyed by uniform name.
#[derive(Debug, Default, Clone)]
pub struct UniformTable {
    values: FxHashMap<String, UniformValue>,
    /// Number of writes since creation, including overwrites.
    writes: usize,
}

impl UniformTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    #[must_use]
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Float(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_vec3(&self, name: &str) -> Option<Vec3> {
        match self.get(name)? {
            UniformValue::Vec3(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_mat4(&self, name: &str) -> Option<Mat4> {
        match self.get(name)? {
            UniformValue::Mat4(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl UniformSink for UniformTable {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.writes += 1;
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
        } else {
            self.values.insert(name.to_string(), value);
        }
    }
}
