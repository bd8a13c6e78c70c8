//! Pairwise shadow classification with precomputed trigonometry.
//!
//! A shadow point shows up when the beam grazes an object edge: one of two
//! angularly close returns lies almost along the other one's beam. Projecting
//! the second return into the frame of the first gives a tangent; when that
//! tangent falls inside the discrimination cone `(max_angle_tan, min_angle_tan)`
//! the pair is a shadow.
//!
//! The per-offset `sin`/`cos` values only depend on the window and the scan's
//! angular increment, so they are tabulated once and reused until the
//! increment changes.

/// Geometry model for shadow detection.
///
/// Tables are indexed by the signed angular offset `k ∈ [-window, window]`,
/// stored at `k + window`.
#[derive(Debug, Clone)]
pub struct ShadowDetector {
    min_angle_tan: f32,
    max_angle_tan: f32,
    window: usize,
    /// Increment the tables were built for. `None` forces a rebuild.
    angle_increment: Option<f32>,
    sin_table: Vec<f32>,
    cos_table: Vec<f32>,
}

impl ShadowDetector {
    /// Create a detector for the given cone (radians) and window.
    pub fn new(min_angle: f32, max_angle: f32, window: usize) -> Self {
        let mut detector = Self {
            min_angle_tan: 0.0,
            max_angle_tan: 0.0,
            window: 0,
            angle_increment: None,
            sin_table: Vec::new(),
            cos_table: Vec::new(),
        };
        detector.configure(min_angle, max_angle, window);
        detector
    }

    /// Set the cone thresholds and window.
    ///
    /// Angles are in radians. Tables are reallocated for the new window and
    /// marked stale until the next [`prepare_for_input`](Self::prepare_for_input).
    pub fn configure(&mut self, min_angle: f32, max_angle: f32, window: usize) {
        self.min_angle_tan = min_angle.tan();
        self.max_angle_tan = max_angle.tan();

        // tan flips sign across 90°; keep min on the positive side and
        // max on the negative side of the cone.
        if self.min_angle_tan < 0.0 {
            self.min_angle_tan = -self.min_angle_tan;
        }
        if self.max_angle_tan > 0.0 {
            self.max_angle_tan = -self.max_angle_tan;
        }

        self.window = window;
        self.angle_increment = None;
        self.sin_table = vec![0.0; 2 * window + 1];
        self.cos_table = vec![0.0; 2 * window + 1];
    }

    /// Make the lookup tables match the scan's angular increment.
    ///
    /// Does nothing when the increment equals the cached one.
    pub fn prepare_for_input(&mut self, angle_increment: f32) {
        if self.angle_increment == Some(angle_increment) {
            return;
        }

        log::debug!(
            "Rebuilding shadow tables: window={}, angle_increment={}",
            self.window,
            angle_increment
        );

        let window = self.window as isize;
        for (slot, offset) in (-window..=window).enumerate() {
            let included_angle = offset as f32 * angle_increment;
            self.sin_table[slot] = included_angle.sin().abs();
            self.cos_table[slot] = included_angle.cos();
        }
        self.angle_increment = Some(angle_increment);
    }

    /// Classify the pair `(r1, r2)` where `r2` lies `offset` steps from `r1`.
    ///
    /// Non-finite tangents (`x == 0`, NaN ranges) compare false against both
    /// thresholds and therefore never classify as shadow. Offsets outside the
    /// window have no table entry and are not shadows either.
    #[inline]
    pub fn is_shadow(&self, r1: f32, r2: f32, offset: isize) -> bool {
        let Some(slot) = self.slot(offset) else {
            return false;
        };

        let perpendicular_y = r2 * self.sin_table[slot];
        let perpendicular_x = r1 - r2 * self.cos_table[slot];
        let perpendicular_tan = perpendicular_y / perpendicular_x;

        perpendicular_tan < self.min_angle_tan && perpendicular_tan > self.max_angle_tan
    }

    /// Half-width of the comparison window.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Upper bound of the cone (always ≥ 0).
    pub fn min_angle_tan(&self) -> f32 {
        self.min_angle_tan
    }

    /// Lower bound of the cone (always ≤ 0).
    pub fn max_angle_tan(&self) -> f32 {
        self.max_angle_tan
    }

    /// Increment the tables are currently valid for.
    pub fn angle_increment(&self) -> Option<f32> {
        self.angle_increment
    }

    /// Tabulated `|sin(offset * increment)|`.
    pub fn sin_at(&self, offset: isize) -> Option<f32> {
        self.slot(offset).map(|slot| self.sin_table[slot])
    }

    /// Tabulated `cos(offset * increment)`.
    pub fn cos_at(&self, offset: isize) -> Option<f32> {
        self.slot(offset).map(|slot| self.cos_table[slot])
    }

    #[inline]
    fn slot(&self, offset: isize) -> Option<usize> {
        if offset.unsigned_abs() > self.window {
            return None;
        }
        Some((offset + self.window as isize) as usize)
    }
}
