use super::Viewport;

/// Uniform scale plus centering offsets, in physical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ScaleOffsets {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Mapping between the logical (offscreen) surface and the physical screen.
///
/// The logical surface is scaled uniformly to fit the screen and centered,
/// leaving letterbox or pillarbox bars instead of stretching.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ScreenGeometry {
    /// Physical pixels (outside size × device scale factor).
    pub screen: Viewport,
    /// Logical pixels as returned by layout.
    pub offscreen: Viewport,
}

impl ScreenGeometry {
    #[inline]
    pub const fn new(screen: Viewport, offscreen: Viewport) -> Self {
        Self { screen, offscreen }
    }

    /// False until a layout with positive sizes has been applied.
    #[inline]
    pub fn is_established(&self) -> bool {
        self.screen.is_valid() && self.offscreen.is_valid()
    }

    pub fn scale_and_offsets(&self) -> ScaleOffsets {
        if !self.is_established() {
            return ScaleOffsets::default();
        }

        let scale_x = self.screen.width / self.offscreen.width;
        let scale_y = self.screen.height / self.offscreen.height;
        let scale = scale_x.min(scale_y);

        let width = self.offscreen.width * scale;
        let height = self.offscreen.height * scale;

        ScaleOffsets {
            scale,
            offset_x: (self.screen.width - width) / 2.0,
            offset_y: (self.screen.height - height) / 2.0,
        }
    }

    /// Maps a device-independent position (e.g. a cursor) into logical space.
    ///
    /// Returns `(NaN, NaN)` while the geometry is not established; callers must
    /// treat that as "no mapping yet".
    pub fn adjust_position(&self, x: f64, y: f64, device_scale_factor: f64) -> (f64, f64) {
        let s = self.scale_and_offsets();
        if s.scale == 0.0 {
            return (f64::NAN, f64::NAN);
        }
        (
            (x * device_scale_factor - s.offset_x) / s.scale,
            (y * device_scale_factor - s.offset_y) / s.scale,
        )
    }

    /// Maps a logical position to device-independent coordinates.
    ///
    /// Inverse of [`adjust_position`](Self::adjust_position).
    pub fn project(&self, x: f64, y: f64, device_scale_factor: f64) -> (f64, f64) {
        let s = self.scale_and_offsets();
        (
            (x * s.scale + s.offset_x) / device_scale_factor,
            (y * s.scale + s.offset_y) / device_scale_factor,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn geo(sw: f64, sh: f64, ow: f64, oh: f64) -> ScreenGeometry {
        ScreenGeometry::new(Viewport::new(sw, sh), Viewport::new(ow, oh))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn same_aspect_fills_screen() {
        let s = geo(640.0, 480.0, 320.0, 240.0).scale_and_offsets();
        assert_eq!(s, ScaleOffsets { scale: 2.0, offset_x: 0.0, offset_y: 0.0 });
    }

    #[test]
    fn wider_screen_pillarboxes() {
        let s = geo(1000.0, 500.0, 100.0, 100.0).scale_and_offsets();
        assert!(close(s.scale, 5.0));
        assert!(close(s.offset_x, 250.0));
        assert!(close(s.offset_y, 0.0));
    }

    #[test]
    fn taller_screen_letterboxes() {
        let s = geo(300.0, 900.0, 200.0, 100.0).scale_and_offsets();
        assert!(close(s.scale, 1.5));
        assert!(close(s.offset_x, 0.0));
        assert!(close(s.offset_y, 375.0));
    }

    #[test]
    fn content_is_centered_for_many_sizes() {
        let screens = [(1920.0, 1080.0), (800.0, 600.0), (333.0, 777.0), (1.0, 1.0)];
        let logicals = [(320.0, 240.0), (256.0, 254.0), (1.0, 1000.0), (1000.0, 1.0)];

        for (sw, sh) in screens {
            for (ow, oh) in logicals {
                let g = geo(sw, sh, ow, oh);
                let s = g.scale_and_offsets();
                assert!(close(s.scale, (sw / ow).min(sh / oh)));
                assert!((s.offset_x + ow * s.scale / 2.0 - sw / 2.0).abs() < 1e-6);
                assert!((s.offset_y + oh * s.scale / 2.0 - sh / 2.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn adjust_position_inverts_projection() {
        let g = geo(1280.0 * 2.0, 720.0 * 2.0, 320.0, 240.0);
        let dsf = 2.0;

        for (lx, ly) in [(0.0, 0.0), (160.0, 120.0), (319.5, 1.25), (12.0, 239.0)] {
            let (dx, dy) = g.project(lx, ly, dsf);
            let (rx, ry) = g.adjust_position(dx, dy, dsf);
            assert!((rx - lx).abs() < 1e-9, "{lx} -> {rx}");
            assert!((ry - ly).abs() < 1e-9, "{ly} -> {ry}");
        }
    }

    #[test]
    fn adjust_position_accounts_for_bars() {
        // Screen 200x100 physical, logical 100x100 → scale 1, 50px pillarbox.
        let g = geo(200.0, 100.0, 100.0, 100.0);
        assert_eq!(g.adjust_position(50.0, 10.0, 1.0), (0.0, 10.0));
        assert_eq!(g.adjust_position(25.0, 50.0, 2.0), (0.0, 100.0));
    }

    #[test]
    fn unestablished_geometry_maps_to_nan() {
        let g = ScreenGeometry::default();
        assert_eq!(g.scale_and_offsets().scale, 0.0);

        let (x, y) = g.adjust_position(10.0, 10.0, 1.0);
        assert!(x.is_nan() && y.is_nan());
    }

    #[test]
    fn ceil_pixels_rounds_up_fractions() {
        assert_eq!(Viewport::new(100.2, 99.0).ceil_pixels(), (101, 99));
    }
}
