/// Translation along X that bounces between `-bound` and `bound`.
///
/// The value is stepped first and the bound checked afterwards, so it may
/// overshoot by up to one step before the direction flips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BouncingOffset {
    pub value: f32,
    pub step: f32,
    pub bound: f32,
    pub forward: bool,
}

impl BouncingOffset {
    pub fn advance(&mut self) {
        if self.forward {
            self.value += self.step;
        } else {
            self.value -= self.step;
        }

        if self.value.abs() > self.bound {
            self.forward = !self.forward;
        }
    }
}

impl Default for BouncingOffset {
    fn default() -> Self {
        Self {
            value: 0.0,
            step: 0.025,
            bound: 0.95,
            forward: true,
        }
    }
}

/// Rotation angle in degrees, increasing forever.
///
/// One full turn is subtracted when the angle is above 360 *before* the step
/// is added, so the angle can sit at up to `360 + step` for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrappingAngle {
    pub degrees: f32,
    pub step: f32,
}

impl WrappingAngle {
    pub const FULL_TURN: f32 = 360.0;

    pub fn advance(&mut self) {
        if self.degrees > Self::FULL_TURN {
            self.degrees -= Self::FULL_TURN;
        }
        self.degrees += self.step;
    }

    pub fn radians(&self) -> f32 {
        self.degrees.to_radians()
    }
}

impl Default for WrappingAngle {
    fn default() -> Self {
        Self { degrees: 0.0, step: 3.75 }
    }
}

/// Uniform scale factor bouncing between `min` and `max`.
///
/// The direction is checked against the current value before stepping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BouncingScale {
    pub value: f32,
    pub step: f32,
    pub min: f32,
    pub max: f32,
    pub increasing: bool,
}

impl BouncingScale {
    pub fn advance(&mut self) {
        if (self.value > self.max && self.increasing) || (self.value < self.min && !self.increasing) {
            self.increasing = !self.increasing;
        }

        if self.increasing {
            self.value += self.step;
        } else {
            self.value -= self.step;
        }
    }
}

impl Default for BouncingScale {
    fn default() -> Self {
        Self {
            value: 0.1,
            step: 0.01,
            min: 0.1,
            max: 1.0,
            increasing: true,
        }
    }
}

/// Per-frame animation: offset, rotation and scale, stepped together.
///
/// The scale oscillator is kept running but the frame transform does not
/// read it; the pyramid is always drawn at half size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationState {
    pub offset: BouncingOffset,
    pub angle: WrappingAngle,
    pub scale: BouncingScale,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps offset, then angle, then scale. Call once per rendered frame.
    pub fn advance(&mut self) {
        self.offset.advance();
        self.angle.advance();
        self.scale.advance();
    }

    pub fn offset(&self) -> f32 {
        self.offset.value
    }

    pub fn angle_degrees(&self) -> f32 {
        self.angle.degrees
    }

    pub fn scale(&self) -> f32 {
        self.scale.value
    }
}
