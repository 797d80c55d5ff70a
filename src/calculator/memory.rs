//! The single-slot memory register (M+, M-, MR, MC).

/// A single numeric memory slot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MemoryRegister {
    value: f64,
}

impl MemoryRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// M+
    pub fn add(&mut self, value: f64) {
        self.value += value;
    }

    /// M-
    pub fn subtract(&mut self, value: f64) {
        self.value -= value;
    }

    /// MR
    pub fn recall(&self) -> f64 {
        self.value
    }

    /// MC
    pub fn clear(&mut self) {
        self.value = 0.0;
    }

    /// Whether the register holds something other than the default, for the
    /// `M` indicator.
    pub fn is_set(&self) -> bool {
        self.value != 0.0
    }
}
