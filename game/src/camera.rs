use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use cgmath::{Matrix4, Point3, Vector3};

use crate::grid::Direction;

pub const DEFAULT_POLAR: f32 = FRAC_PI_2;
pub const DEFAULT_AZIMUTH: f32 = FRAC_PI_4;
pub const DEFAULT_RADIUS: f32 = 15.0;

pub const MIN_RADIUS: f32 = 0.1;
pub const MAX_RADIUS: f32 = 50.0;
const POLAR_MARGIN: f32 = 0.01;

pub const DEFAULT_DRAG_SENSITIVITY: f32 = 0.01;
pub const DEFAULT_ZOOM_SENSITIVITY: f32 = 0.1;

fn wrap_angle(a: f32) -> f32 {
    let wrapped = a.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

fn clamp_polar(p: f32) -> f32 {
    p.clamp(POLAR_MARGIN, PI - POLAR_MARGIN)
}

fn clamp_radius(r: f32) -> f32 {
    r.clamp(MIN_RADIUS, MAX_RADIUS)
}

/// Eye position on a sphere around the origin, `y` being the polar axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOrbit {
    polar: f32,
    azimuth: f32,
    radius: f32,
}

impl Default for CameraOrbit {
    fn default() -> Self {
        Self::new(DEFAULT_POLAR, DEFAULT_AZIMUTH, DEFAULT_RADIUS)
    }
}

impl CameraOrbit {
    /// Out-of-range values are wrapped (azimuth) or clamped (polar, radius).
    pub fn new(polar: f32, azimuth: f32, radius: f32) -> Self {
        Self {
            polar: clamp_polar(polar),
            azimuth: wrap_angle(azimuth),
            radius: clamp_radius(radius),
        }
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_azimuth(&mut self, azimuth: f32) {
        self.azimuth = wrap_angle(azimuth);
    }

    pub fn rotate(&mut self, d_azimuth: f32, d_polar: f32) {
        self.azimuth = wrap_angle(self.azimuth + d_azimuth);
        self.polar = clamp_polar(self.polar + d_polar);
    }

    /// `dx`/`dy` are the previous cursor position minus the current one.
    pub fn drag(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.rotate(-dx * sensitivity, dy * sensitivity);
    }

    /// Positive scroll moves closer, proportionally to the current distance.
    pub fn zoom(&mut self, scroll: f32, sensitivity: f32) {
        self.radius = clamp_radius(self.radius - self.radius * scroll * sensitivity);
    }

    pub fn eye(&self) -> Point3<f32> {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        Point3::new(
            self.radius * sin_p * cos_a,
            self.radius * cos_p,
            self.radius * sin_p * sin_a,
        )
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye(), Point3::new(0.0, 0.0, 0.0), Vector3::unit_y())
    }

    pub fn quadrant(&self) -> ViewQuadrant {
        ViewQuadrant::from_azimuth(self.azimuth)
    }
}

/// Screen-relative movement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveIntent {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Which side of the grid the camera looks from, by azimuth quarter.
///
/// Quarters are centred on the cardinal views, so boundaries sit at odd multiples of pi/4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewQuadrant {
    /// Azimuth in `(pi/4, 3pi/4]`.
    FromPosZ,
    /// Azimuth in `(3pi/4, 5pi/4]`.
    FromNegX,
    /// Azimuth in `(5pi/4, 7pi/4]`.
    FromNegZ,
    /// Everything else.
    FromPosX,
}

impl ViewQuadrant {
    pub fn from_azimuth(azimuth: f32) -> Self {
        let a = azimuth;
        if a > FRAC_PI_4 && a <= 3.0 * FRAC_PI_4 {
            ViewQuadrant::FromPosZ
        } else if a > 3.0 * FRAC_PI_4 && a <= 5.0 * FRAC_PI_4 {
            ViewQuadrant::FromNegX
        } else if a > 5.0 * FRAC_PI_4 && a <= 7.0 * FRAC_PI_4 {
            ViewQuadrant::FromNegZ
        } else {
            ViewQuadrant::FromPosX
        }
    }

    /// World heading for `intent`: forward always points away from the camera.
    /// Up and down ignore the view.
    pub fn remap(self, intent: MoveIntent) -> Direction {
        use Direction::*;
        use MoveIntent::*;

        match (intent, self) {
            (Up, _) => PosY,
            (Down, _) => NegY,

            (Forward, ViewQuadrant::FromPosZ) => NegZ,
            (Backward, ViewQuadrant::FromPosZ) => PosZ,
            (Left, ViewQuadrant::FromPosZ) => NegX,
            (Right, ViewQuadrant::FromPosZ) => PosX,

            (Forward, ViewQuadrant::FromNegX) => PosX,
            (Backward, ViewQuadrant::FromNegX) => NegX,
            (Left, ViewQuadrant::FromNegX) => NegZ,
            (Right, ViewQuadrant::FromNegX) => PosZ,

            (Forward, ViewQuadrant::FromNegZ) => PosZ,
            (Backward, ViewQuadrant::FromNegZ) => NegZ,
            (Left, ViewQuadrant::FromNegZ) => PosX,
            (Right, ViewQuadrant::FromNegZ) => NegX,

            (Forward, ViewQuadrant::FromPosX) => NegX,
            (Backward, ViewQuadrant::FromPosX) => PosX,
            (Left, ViewQuadrant::FromPosX) => PosZ,
            (Right, ViewQuadrant::FromPosX) => NegZ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx_eq(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "expected {b}, got {a}");
    }

    #[test]
    fn default_eye_sits_between_pos_x_and_pos_z() {
        let eye = CameraOrbit::default().eye();
        let expected = 15.0 * FRAC_PI_4.cos();
        assert_approx_eq(eye.x, expected);
        assert_approx_eq(eye.y, 0.0);
        assert_approx_eq(eye.z, expected);
    }

    #[test]
    fn polar_is_clamped_away_from_poles() {
        let mut orbit = CameraOrbit::default();
        orbit.rotate(0.0, 10.0);
        assert_approx_eq(orbit.polar(), PI - 0.01);
        orbit.rotate(0.0, -10.0);
        assert_approx_eq(orbit.polar(), 0.01);
    }

    #[test]
    fn negative_azimuth_wraps_below_tau() {
        let mut orbit = CameraOrbit::default();
        orbit.set_azimuth(-1e-9);
        assert!(orbit.azimuth() >= 0.0 && orbit.azimuth() < TAU);
    }
}
