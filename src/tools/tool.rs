use super::{
    BrushType, GestureEvent, GestureMachine, GradientType, SettingKey, SettingOutcome,
    SettingValue, SettingsResult, ToolKind, ToolSettings,
};
use crate::canvas::PixelBuffer;
use crate::geometry::Point;
use crate::raster::{
    draw_text, fill_ellipse, fill_linear_gradient, fill_radial_gradient, fill_rect, flood_region,
    stroke_bezier, stroke_square, stroke_thick_circle, stroke_thick_line, stroke_thick_rect,
    FillRegion, Ink,
};

/// Control points kept when a bezier gesture is rasterized.
pub const MAX_BEZIER_POINTS: usize = 32;

#[derive(Debug, Clone, Default)]
enum FillTarget {
    #[default]
    Unresolved,
    Region(FillRegion),
    Nothing,
}

/// A drawing tool: its kind, the settings it was configured with and the
/// gesture currently being captured.
#[derive(Debug, Clone)]
pub struct Tool {
    kind: ToolKind,
    settings: ToolSettings,
    gesture: GestureMachine,
    points: Vec<Point>,
    fill_target: FillTarget,
    text_pending: bool,
}

impl Tool {
    pub fn new(kind: ToolKind) -> Self {
        Self {
            kind,
            settings: ToolSettings::for_tool(kind),
            gesture: GestureMachine::new(),
            points: Vec::new(),
            fill_target: FillTarget::Unresolved,
            text_pending: false,
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn cursor(&self) -> &'static str {
        self.kind.cursor()
    }

    pub fn requires_redraw(&self) -> bool {
        self.kind.requires_redraw()
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn is_drawing(&self) -> bool {
        self.gesture.is_active()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Applies one setting if this tool consumes it.
    pub fn configure(
        &mut self,
        key: SettingKey,
        value: &SettingValue,
    ) -> SettingsResult<SettingOutcome> {
        if !self.kind.option_visibility().consumes(key) {
            return Ok(SettingOutcome::NotApplicable);
        }
        self.settings.set(key, value)?;
        Ok(SettingOutcome::Applied)
    }

    pub fn start_drawing(&mut self, at: Point) {
        let _ = self.gesture.transition(GestureEvent::Press);
        self.points.clear();
        self.points.push(at);
        self.fill_target = FillTarget::Unresolved;
        self.text_pending = false;
    }

    /// Returns `false` when the event was ignored.
    pub fn continue_drawing(&mut self, at: Point) -> bool {
        if matches!(self.kind, ToolKind::Fill | ToolKind::Text) {
            return false;
        }
        if self.gesture.transition(GestureEvent::Drag).is_err() {
            return false;
        }
        self.track(at);
        true
    }

    /// Finishes the gesture; the result says whether rendering it now
    /// produces something worth committing.
    pub fn end_drawing(&mut self, at: Point) -> bool {
        if self.gesture.transition(GestureEvent::Release).is_err() {
            return false;
        }
        match self.kind {
            // A fill already rendered onto matching or off-canvas texels has
            // nothing to commit.
            ToolKind::Fill => !matches!(self.fill_target, FillTarget::Nothing),
            ToolKind::Text => {
                self.text_pending = !self.settings.text.is_empty();
                self.text_pending
            }
            ToolKind::Bezier => {
                self.track(at);
                self.points.len() >= 3
            }
            _ => {
                self.track(at);
                true
            }
        }
    }

    fn track(&mut self, at: Point) {
        let is_two_point = matches!(
            self.kind,
            ToolKind::Line | ToolKind::Rectangle | ToolKind::Circle | ToolKind::Gradient
        );
        if is_two_point && self.points.len() >= 2 {
            self.points[1] = at;
        } else {
            self.points.push(at);
        }
    }

    fn shape_endpoints(&self) -> Option<(Point, Point)> {
        let start = *self.points.first()?;
        let end = *self.points.last()?;
        Some((start, end))
    }

    /// Rasterizes the captured gesture onto `buffer`.
    ///
    /// Stroke tools drop every point but the last one afterwards, so calling
    /// this once per frame only paints the new segments. Shape tools keep
    /// their geometry until the next press.
    pub fn render(&mut self, buffer: &mut PixelBuffer) {
        let settings = &self.settings;
        match self.kind {
            ToolKind::Pencil | ToolKind::Brush | ToolKind::Eraser => {
                if self.points.len() < 2 {
                    return;
                }
                let ink = if self.kind == ToolKind::Eraser {
                    Ink::clear()
                } else {
                    Ink::over(settings.outline_color())
                };
                let square =
                    self.kind == ToolKind::Brush && settings.brush_type == BrushType::Square;
                for segment in self.points.windows(2) {
                    if square {
                        stroke_square(buffer, segment[0], segment[1], ink, settings.size);
                    } else {
                        stroke_thick_line(buffer, segment[0], segment[1], ink, settings.size);
                    }
                }
                let keep_from = self.points.len() - 1;
                self.points.drain(..keep_from);
            }
            ToolKind::Line => {
                if let Some((start, end)) = self.shape_endpoints() {
                    let ink = Ink::over(settings.outline_color());
                    stroke_thick_line(buffer, start, end, ink, settings.size);
                }
            }
            ToolKind::Rectangle => {
                if let Some((start, end)) = self.shape_endpoints() {
                    let (x1, y1) = start.rounded();
                    let (x2, y2) = end.rounded();
                    if settings.is_filled {
                        fill_rect(buffer, x1, y1, x2, y2, Ink::over(settings.interior_color()));
                    }
                    let ink = Ink::over(settings.outline_color());
                    stroke_thick_rect(buffer, x1, y1, x2, y2, ink, settings.size);
                }
            }
            ToolKind::Circle => {
                if let Some((start, end)) = self.shape_endpoints() {
                    let (cx, cy) = start.rounded();
                    let radius = radius_between(start, end);
                    if settings.is_filled {
                        let ink = Ink::over(settings.interior_color());
                        fill_ellipse(buffer, cx, cy, radius, radius, ink);
                    }
                    let ink = Ink::over(settings.outline_color());
                    stroke_thick_circle(buffer, cx, cy, radius, ink, settings.size);
                }
            }
            ToolKind::Gradient => {
                if let Some((start, end)) = self.shape_endpoints() {
                    let (x1, y1) = start.rounded();
                    match settings.gradient_type {
                        GradientType::Linear => {
                            let (x2, y2) = end.rounded();
                            fill_linear_gradient(
                                buffer,
                                x1,
                                y1,
                                x2,
                                y2,
                                settings.gradient_start,
                                settings.gradient_end,
                                settings.opacity,
                            );
                        }
                        GradientType::Radial => fill_radial_gradient(
                            buffer,
                            x1,
                            y1,
                            radius_between(start, end),
                            settings.gradient_start,
                            settings.gradient_end,
                            settings.opacity,
                        ),
                    }
                }
            }
            ToolKind::Bezier => {
                if self.points.len() < 3 {
                    return;
                }
                let control = decimate(&self.points, MAX_BEZIER_POINTS);
                let ink = Ink::over(settings.outline_color());
                stroke_bezier(buffer, &control, ink, settings.size);
            }
            ToolKind::Fill => self.render_fill(buffer),
            ToolKind::Text => {
                if !self.text_pending {
                    return;
                }
                if let Some(anchor) = self.points.first() {
                    let (x, y) = anchor.rounded();
                    let ink = Ink::over(settings.outline_color());
                    draw_text(buffer, x, y, &settings.text, ink, settings.font_size);
                }
                self.text_pending = false;
            }
        }
    }

    // The region is resolved against the first buffer rendered after the
    // press and reused for every later frame.
    fn render_fill(&mut self, buffer: &mut PixelBuffer) {
        let color = self.settings.outline_color();
        if matches!(self.fill_target, FillTarget::Unresolved) {
            let Some((x, y)) = self.points.first().map(|seed| seed.rounded()) else {
                return;
            };
            self.fill_target = match buffer.get(x, y) {
                Some(target) if color.within_tolerance(target, self.settings.tolerance) => {
                    tracing::debug!(x, y, "fill color already matches the seed");
                    FillTarget::Nothing
                }
                Some(_) => flood_region(buffer, x, y, self.settings.tolerance)
                    .map_or(FillTarget::Nothing, FillTarget::Region),
                None => FillTarget::Nothing,
            };
        }
        if let FillTarget::Region(region) = &self.fill_target {
            let pixels = region.apply(buffer, color);
            tracing::trace!(pixels, "flood fill applied");
        }
    }
}

fn radius_between(center: Point, rim: Point) -> i32 {
    let distance = center.distance_to(rim);
    if distance.is_finite() && distance < f64::from(i32::MAX) {
        distance as i32
    } else {
        0
    }
}

/// Evenly spaced subset of at most `max` points, first and last included.
fn decimate(points: &[Point], max: usize) -> Vec<Point> {
    if points.len() <= max || max < 2 {
        return points.to_vec();
    }
    let last = points.len() - 1;
    let steps = max - 1;
    (0..max)
        .map(|i| points[(i * last + steps / 2) / steps])
        .collect()
}
