//! Creative Mode canvas for `PortfolioApp`.
//!
//! One frame: raw input → `SceneEvent`s → `SceneSession::frame` → painting,
//! run behind `isolate` so a failing frame swaps in the fallback view.
//! Everything is drawn with the egui painter through the session's orbit
//! camera, back to front.

use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke};

use portfolio_scene::math::{self, Vec3};
use portfolio_scene::mobile::touch::{Gesture, GestureRecognizer};
use portfolio_scene::mobile::PointerSource;
use portfolio_scene::render::capability::{isolate, FallbackView};
use portfolio_scene::render::palette::{self, Rgba};
use portfolio_scene::scene::ambient::CenterpieceKind;
use portfolio_scene::scene::layout::SUN_RADIUS;
use portfolio_scene::scene::{EntityKind, LayoutVariant, Motion, SceneEvent, SceneSession};

use super::PortfolioApp;

/// Distance change per scroll pixel.
const SCROLL_ZOOM: f32 = 0.003;
const CIRCLE_SEGMENTS: usize = 72;

#[inline]
pub fn color(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

impl PortfolioApp {
    /// Render the 3D scene into the remaining space.
    pub fn draw_scene(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        if self.session.is_none() {
            self.mount_scene(rect.width());
        }

        let now = ui.input(|i| i.time);
        let dt = self.last_frame_time.map_or(0.0, |t| (now - t) as f32);
        self.last_frame_time = Some(now);

        let events = collect_input(ui, &response, &mut self.gestures, &mut self.pointer_source);

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let painter = ui.painter_at(rect);
        let frame = isolate(|| {
            let size = [rect.width(), rect.height()];
            let resize = (session.viewport() != size)
                .then(|| SceneEvent::Resize { width: size[0], height: size[1] });
            session.frame(resize.into_iter().chain(events), dt);
            paint(&painter, rect, session);
            session.hovered().is_some()
        });

        match frame {
            Ok(hovering) => {
                if hovering {
                    ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                ctx.request_repaint();
            }
            Err(e) => {
                self.fallback = Some(FallbackView::from_error(&e));
                self.unmount_scene();
            }
        }
    }
}

// ─── Input ───────────────────────────────────────────────────────────────────

fn gesture_event(gesture: Gesture) -> Option<SceneEvent> {
    match gesture {
        Gesture::Tap { x, y } => Some(SceneEvent::Click { pos: [x, y] }),
        Gesture::DoubleTap { .. } => Some(SceneEvent::ResetCamera),
        Gesture::Drag { dx, dy } => Some(SceneEvent::Drag { dx, dy }),
        Gesture::Pinch { scale, .. } if scale > 0.0 => Some(SceneEvent::Zoom { factor: 1.0 / scale }),
        _ => None,
    }
}

/// Translate this frame's pointer, scroll and touch input into scene events.
/// Positions are relative to the canvas' top-left corner.
fn collect_input(
    ui: &egui::Ui,
    response: &egui::Response,
    gestures: &mut GestureRecognizer,
    source: &mut PointerSource,
) -> Vec<SceneEvent> {
    let origin = response.rect.min;
    let local = |p: Pos2| [p.x - origin.x, p.y - origin.y];
    let mut out = Vec::new();

    ui.input(|i| {
        let mut saw_touch = false;
        let mut saw_pointer = false;
        for event in &i.events {
            if matches!(
                event,
                egui::Event::PointerMoved(_)
                    | egui::Event::PointerButton { .. }
                    | egui::Event::MouseWheel { .. }
            ) {
                saw_pointer = true;
            }
            if let egui::Event::Touch { id, phase, pos, .. } = event {
                saw_touch = true;
                let [x, y] = local(*pos);
                let gesture = match phase {
                    egui::TouchPhase::Start => {
                        gestures.touch_start(x, y, id.0, i.time);
                        Gesture::None
                    }
                    egui::TouchPhase::Move => gestures.touch_move(x, y, id.0),
                    egui::TouchPhase::End => gestures.touch_end(x, y, id.0, i.time),
                    egui::TouchPhase::Cancel => {
                        gestures.cancel();
                        Gesture::None
                    }
                };
                out.extend(gesture_event(gesture));
            }
        }
        *source = source.observe(saw_touch, saw_pointer);
    });

    // Touch screens also get emulated mouse events; the recognizer owns those.
    if source.is_touch() {
        return out;
    }

    match response.hover_pos() {
        Some(p) => out.push(SceneEvent::PointerMoved { pos: local(p) }),
        None => out.push(SceneEvent::PointerLeft),
    }
    if response.clicked() {
        if let Some(p) = response.interact_pointer_pos() {
            out.push(SceneEvent::Click { pos: local(p) });
        }
    }
    if response.dragged() {
        let delta = response.drag_delta();
        out.push(SceneEvent::Drag { dx: delta.x, dy: delta.y });
    }
    if response.hovered() {
        let (scroll, pinch) = ui.input(|i| (i.raw_scroll_delta.y, i.zoom_delta()));
        if scroll.abs() > 0.1 {
            out.push(SceneEvent::Zoom { factor: (1.0 - scroll * SCROLL_ZOOM).clamp(0.5, 2.0) });
        }
        if (pinch - 1.0).abs() > 1e-3 {
            out.push(SceneEvent::Zoom { factor: 1.0 / pinch });
        }
    }
    out
}

// ─── Painting ────────────────────────────────────────────────────────────────

struct View<'a> {
    session: &'a SceneSession,
    rect: Rect,
}

impl View<'_> {
    /// Screen position and pixels per world unit of `p`, if in front of the camera.
    fn project(&self, p: Vec3) -> Option<(Pos2, f32, f32)> {
        let viewport = [self.rect.width(), self.rect.height()];
        self.session.camera().project(p, viewport).map(|pr| {
            (
                self.rect.min + egui::vec2(pr.screen[0], pr.screen[1]),
                pr.pixels_per_unit,
                pr.depth,
            )
        })
    }

    fn circle(&self, painter: &egui::Painter, center: Vec3, radius: f32, stroke: Stroke) {
        let points: Option<Vec<Pos2>> = (0..=CIRCLE_SEGMENTS)
            .map(|i| {
                let a = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
                self.project(math::add(center, [radius * a.cos(), 0.0, radius * a.sin()]))
                    .map(|(p, _, _)| p)
            })
            .collect();
        if let Some(points) = points {
            painter.add(Shape::line(points, stroke));
        }
    }

    fn disc(&self, painter: &egui::Painter, radius: f32, fill: Color32) {
        let points: Option<Vec<Pos2>> = (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let a = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
                self.project([radius * a.cos(), 0.0, radius * a.sin()]).map(|(p, _, _)| p)
            })
            .collect();
        if let Some(points) = points {
            painter.add(Shape::convex_polygon(points, fill, Stroke::NONE));
        }
    }
}

fn paint(painter: &egui::Painter, rect: Rect, session: &SceneSession) {
    let view = View { session, rect };
    let theme = session.theme();
    let env = palette::environment(theme.is_night);
    let ambient = session.ambient();
    let variant = session.variant();

    let sky = if variant == LayoutVariant::Orbital { palette::SPACE } else { env.sky };
    painter.rect_filled(rect, 0.0, color(sky));

    // Sky
    if ambient.sky_visible(theme) {
        let field = &ambient.starfield;
        for star in &field.stars {
            if let Some((p, _, _)) = view.project(field.world_position(star)) {
                painter.circle_filled(p, star.size * 0.35, Color32::from_white_alpha(210));
            }
        }
        let c = &ambient.constellation;
        let stroke = Stroke::new(1.0, color(palette::CONSTELLATION.with_opacity(c.opacity)));
        for &(a, b) in &c.links {
            let pa = view.project(math::rotate_y(c.points[a], c.rotation));
            let pb = view.project(math::rotate_y(c.points[b], c.rotation));
            if let (Some((pa, _, _)), Some((pb, _, _))) = (pa, pb) {
                painter.line_segment([pa, pb], stroke);
            }
        }
    }

    // Ground and paths
    let extent = session
        .layout()
        .slots
        .iter()
        .map(|s| math::length([s.position[0], 0.0, s.position[2]]))
        .fold(0.0f32, f32::max);
    match variant {
        LayoutVariant::Orbital => {
            let stroke = Stroke::new(1.0, color(palette::ORBIT_RING.with_opacity(0.6)));
            for r in session.layout().orbit_radii() {
                view.circle(painter, math::ORIGIN, r, stroke);
            }
        }
        LayoutVariant::Ring => {
            view.disc(painter, extent + 6.0, color(env.ground));
            let mut radii: Vec<f32> = session
                .layout()
                .slots
                .iter()
                .map(|s| (math::length([s.position[0], 0.0, s.position[2]]) * 10.0).round() / 10.0)
                .collect();
            radii.sort_by(f32::total_cmp);
            radii.dedup();
            let stroke = Stroke::new(6.0, color(env.path));
            for r in radii {
                view.circle(painter, math::ORIGIN, r, stroke);
            }
        }
        LayoutVariant::Grid => {
            view.disc(painter, extent + 8.0, color(env.ground));
            if let Some(traffic) = &ambient.traffic {
                let stroke = Stroke::new(4.0, color(env.path));
                let streets = traffic
                    .cars
                    .iter()
                    .map(|c| c.street)
                    .chain(traffic.pedestrians.iter().map(|p| p.street));
                for street in streets {
                    let (a, b) = street.endpoints();
                    if let (Some((a, _, _)), Some((b, _, _))) = (view.project(a), view.project(b)) {
                        painter.line_segment([a, b], stroke);
                    }
                }
            }
        }
    }

    if let Some(belt) = &ambient.belt {
        let fill = color(palette::ASTEROID);
        for rock in &belt.rocks {
            if let Some((p, ppu, _)) = view.project(belt.world_position(rock)) {
                painter.circle_filled(p, (rock.size * ppu).max(1.0), fill);
            }
        }
    }

    // Centrepiece
    let cp = &ambient.centerpiece;
    if let Some((p, ppu, _)) = view.project(math::ORIGIN) {
        let (radius, halo, halo_color) = match cp.kind {
            CenterpieceKind::Sun => (SUN_RADIUS, 1.4, palette::SUN_GLOW),
            CenterpieceKind::Campfire => (0.6, 2.5, cp.color),
            CenterpieceKind::Plaza => (1.0, 1.8, cp.color),
        };
        let r = radius * cp.glow_scale * ppu;
        let glow = (cp.light_intensity / 10.0).clamp(0.1, 0.5);
        painter.circle_filled(p, r * halo, color(halo_color.with_opacity(glow)));
        painter.circle_filled(p, r, color(cp.color));
    }

    paint_entities(painter, &view);

    // Traffic and fireflies above the ground
    if let Some(traffic) = &ambient.traffic {
        for car in &traffic.cars {
            if let Some((p, ppu, _)) = view.project(traffic.car_position(car)) {
                painter.circle_filled(p, (0.35 * ppu).max(2.0), color(car.color));
                if theme.is_night {
                    painter.circle_filled(p, (0.12 * ppu).max(1.0), color(palette::CAR_LIGHT));
                }
            }
        }
        for ped in &traffic.pedestrians {
            if let Some((p, ppu, _)) = view.project(traffic.pedestrian_position(ped)) {
                painter.circle_filled(p, (0.15 * ppu).max(1.5), color(palette::PEDESTRIAN));
            }
        }
    }
    if let Some(flies) = ambient.fireflies.as_ref().filter(|f| f.visible) {
        for fly in &flies.flies {
            if let Some((p, ppu, _)) = view.project(fly.position) {
                painter.circle_filled(p, (fly.scale * ppu).max(1.0), color(fly.color));
            }
        }
    }
}

fn paint_entities(painter: &egui::Painter, view: &View<'_>) {
    let session = view.session;
    let theme = session.theme();
    let env = palette::environment(theme.is_night);

    // Back to front
    let mut order: Vec<(usize, f32)> = session
        .entities()
        .iter()
        .enumerate()
        .filter_map(|(i, e)| view.project(e.state.position).map(|(_, _, depth)| (i, depth)))
        .collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (i, _) in order {
        let entity = &session.entities()[i];
        let pres = entity.presentation(theme, session.filter(), session.elapsed());
        let mat = pres.material;
        let base_color = if entity.state.hovered { mat.base.brighten(0.15) } else { mat.base };
        let fill = color(base_color.with_opacity(pres.opacity));
        let Some((base, ppu, _)) = view.project(pres.position) else {
            continue;
        };

        let label_at = match entity.kind {
            EntityKind::Planet | EntityKind::Moon => {
                let r = pres.size * pres.scale * ppu;
                if let Motion::Orbit { ringed: true, size, .. } = entity.slot.motion {
                    let stroke =
                        Stroke::new((0.15 * ppu).max(1.0), color(mat.accent.with_opacity(0.7 * pres.opacity)));
                    view.circle(painter, pres.position, size * 1.8 * pres.scale, stroke);
                }
                if mat.emissive_intensity > 0.0 {
                    let a = (mat.emissive_intensity * 0.3).clamp(0.05, 0.6) * pres.opacity;
                    painter.circle_filled(base, r * 1.35, color(mat.emissive.with_opacity(a)));
                }
                painter.circle_filled(base, r, fill);
                base - egui::vec2(0.0, r + 4.0)
            }
            _ => {
                let top_world = math::add(pres.position, [0.0, pres.height * pres.scale, 0.0]);
                let top = view.project(top_world).map_or(base, |(p, _, _)| p);
                let half_w = pres.size * pres.scale * ppu;
                let body = Rect::from_two_pos(
                    egui::pos2(base.x - half_w, top.y),
                    egui::pos2(base.x + half_w, base.y),
                );
                painter.rect_filled(body, 2.0, fill);
                if mat.emissive_intensity > 0.0 {
                    let a = (mat.emissive_intensity * 0.5).clamp(0.05, 0.8) * pres.opacity;
                    let band = Rect::from_center_size(body.center(), body.size() * egui::vec2(0.6, 0.25));
                    painter.rect_filled(band, 1.0, color(mat.emissive.with_opacity(a)));
                }
                painter.rect_stroke(body, 2.0, Stroke::new(1.0, color(mat.accent.with_opacity(pres.opacity))));
                egui::pos2(base.x, body.top() - 4.0)
            }
        };

        if let Some(light) = mat.light {
            if let Some((p, ppu, _)) = view.project(math::add(pres.position, light.offset)) {
                let a = (light.intensity / 10.0).clamp(0.05, 0.4);
                painter.circle_filled(p, 0.5 * ppu, color(light.color.with_opacity(a)));
            }
        }

        if pres.show_label {
            painter.text(
                label_at,
                Align2::CENTER_BOTTOM,
                &entity.label,
                FontId::proportional(14.0),
                color(env.text),
            );
        }
    }
}
