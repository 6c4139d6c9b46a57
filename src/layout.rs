//! Responsive layout helpers: pure viewport arithmetic, no state, no I/O.

/// Design frame everything scales against.
pub const BASE_WIDTH: f32 = 375.0;
pub const BASE_HEIGHT: f32 = 812.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
}

impl Breakpoint {
    pub fn from_width(width: f32) -> Self {
        if width >= 1200.0 {
            Breakpoint::Xl
        } else if width >= 992.0 {
            Breakpoint::Lg
        } else if width >= 768.0 {
            Breakpoint::Md
        } else if width >= 576.0 {
            Breakpoint::Sm
        } else {
            Breakpoint::Xs
        }
    }

    pub fn min_width(self) -> f32 {
        match self {
            Breakpoint::Xs => 0.0,
            Breakpoint::Sm => 576.0,
            Breakpoint::Md => 768.0,
            Breakpoint::Lg => 992.0,
            Breakpoint::Xl => 1200.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeviceType {
    Phone,
    Tablet,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Viewport { width, height }
    }

    pub fn breakpoint(&self) -> Breakpoint {
        Breakpoint::from_width(self.width)
    }

    pub fn width_scale(&self) -> f32 {
        self.width / BASE_WIDTH
    }

    pub fn height_scale(&self) -> f32 {
        self.height / BASE_HEIGHT
    }

    /// Font size scaled by screen width, rounded to whole pixels.
    pub fn normalize(&self, size: f32) -> i32 {
        (size * self.width_scale()).round() as i32
    }

    /// Padding and margins scale the same way fonts do.
    pub fn spacing(&self, size: f32) -> i32 {
        (size * self.width_scale()).round() as i32
    }

    pub fn width_pct(&self, percentage: f32) -> f32 {
        percentage / 100.0 * self.width
    }

    pub fn height_pct(&self, percentage: f32) -> f32 {
        percentage / 100.0 * self.height
    }

    /// Tablet from the `md` breakpoint up, phone below.
    pub fn device_type(&self) -> DeviceType {
        if self.width >= Breakpoint::Md.min_width() {
            DeviceType::Tablet
        } else {
            DeviceType::Phone
        }
    }

    pub fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Font size keyed to the longer screen edge, for headings that should
    /// track overall screen real estate rather than width alone.
    pub fn dynamic_font_size(&self, size: f32) -> i32 {
        let standard = self.width.max(self.height);
        (size * standard / BASE_HEIGHT).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints_switch_at_their_lower_bound() {
        assert_eq!(Breakpoint::from_width(0.0), Breakpoint::Xs);
        assert_eq!(Breakpoint::from_width(575.0), Breakpoint::Xs);
        assert_eq!(Breakpoint::from_width(576.0), Breakpoint::Sm);
        assert_eq!(Breakpoint::from_width(768.0), Breakpoint::Md);
        assert_eq!(Breakpoint::from_width(991.0), Breakpoint::Md);
        assert_eq!(Breakpoint::from_width(992.0), Breakpoint::Lg);
        assert_eq!(Breakpoint::from_width(1200.0), Breakpoint::Xl);
        assert_eq!(Breakpoint::from_width(2560.0), Breakpoint::Xl);
    }

    #[test]
    fn base_frame_scales_to_identity() {
        let viewport = Viewport::new(BASE_WIDTH, BASE_HEIGHT);
        assert_eq!(viewport.normalize(16.0), 16);
        assert_eq!(viewport.spacing(8.0), 8);
        assert_eq!(viewport.width_pct(50.0), 187.5);
    }

    #[test]
    fn wider_screens_scale_up() {
        let viewport = Viewport::new(750.0, 1334.0);
        assert_eq!(viewport.normalize(16.0), 32);
        assert_eq!(viewport.device_type(), DeviceType::Phone);
        let tablet = Viewport::new(800.0, 1280.0);
        assert_eq!(tablet.device_type(), DeviceType::Tablet);
    }

    #[test]
    fn orientation_follows_the_longer_edge() {
        assert_eq!(Viewport::new(812.0, 375.0).orientation(), Orientation::Landscape);
        assert_eq!(Viewport::new(375.0, 812.0).orientation(), Orientation::Portrait);
        assert_eq!(
            Viewport::new(812.0, 375.0).dynamic_font_size(20.0),
            Viewport::new(375.0, 812.0).dynamic_font_size(20.0)
        );
    }
}
