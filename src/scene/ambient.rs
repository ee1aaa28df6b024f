//! Decorative/ambient systems.
//!
//! Everything here is seeded once per mount and then driven by elapsed time;
//! none of it is clickable and none of it changes which entries are shown.
//!
//! | System        | Variant        | Visible            |
//! |---------------|----------------|--------------------|
//! | Starfield     | all            | space, or at night |
//! | Constellation | all            | space, or at night |
//! | Fireflies     | Ring           | night              |
//! | Asteroid belt | Orbital (N>4)  | always             |
//! | Centrepiece   | all            | always             |
//! | Traffic       | Grid           | always             |

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::f32::consts::{PI, TAU};

use crate::config::AmbientConfig;
use crate::math::{self, Vec3};
use crate::mobile::DeviceTier;
use crate::render::animator;
use crate::render::palette::{self, Rgba};

use super::layout::{AsteroidBand, Layout};
use super::{LayoutVariant, ThemeContext};

// Per-system seed salts so regenerating one system never reshuffles another.
const SALT_STARS: u64 = 0x5354_4152;
const SALT_CONSTELLATION: u64 = 0x434f_4e53;
const SALT_FIREFLIES: u64 = 0x4649_5245;
const SALT_BELT: u64 = 0x4245_4c54;
const SALT_TRAFFIC: u64 = 0x5452_4146;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Starfield
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec3,
    /// Per-star random in [0, 1) driving the twinkle rhythm
    pub seed: f32,
    pub size: f32,
}

/// Twinkle size: `2 + sin(t·(1 + 2r) + 10r)·1.5`, always in [0.5, 3.5].
#[inline]
pub fn twinkle(t: f32, r: f32) -> f32 {
    2.0 + (t * (1.0 + 2.0 * r) + 10.0 * r).sin() * 1.5
}

#[derive(Debug, Clone)]
pub struct Starfield {
    pub stars: Vec<Star>,
    /// Slow rotation of the whole shell around Y
    pub rotation: f32,
}

impl Starfield {
    pub fn generate(count: usize, radius: f32, rng: &mut impl Rng) -> Self {
        let stars = (0..count)
            .map(|_| {
                let position = math::sphere_point(radius, rng.gen(), rng.gen());
                let seed: f32 = rng.gen();
                Star { position, seed, size: twinkle(0.0, seed) }
            })
            .collect();
        Self { stars, rotation: 0.0 }
    }

    /// Data-parallel twinkle; thousands of stars per frame.
    pub fn update(&mut self, t: f32) {
        self.rotation = t * 0.01;
        self.stars.par_iter_mut().for_each(|s| s.size = twinkle(t, s.seed));
    }

    pub fn world_position(&self, star: &Star) -> Vec3 {
        math::rotate_y(star.position, self.rotation)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Constellation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Upper bound on constellation points (the link pass is O(n²)).
pub const MAX_CONSTELLATION_POINTS: usize = 100;

#[derive(Debug, Clone)]
pub struct Constellation {
    pub points: Vec<Vec3>,
    /// Index pairs of every two points closer than the link distance
    pub links: Vec<(usize, usize)>,
    pub opacity: f32,
    pub rotation: f32,
}

impl Constellation {
    pub fn generate(count: usize, radius: f32, link_distance: f32, rng: &mut impl Rng) -> Self {
        let count = count.min(MAX_CONSTELLATION_POINTS);
        let points: Vec<Vec3> =
            (0..count).map(|_| math::sphere_point(radius, rng.gen(), rng.gen())).collect();
        let limit = link_distance * link_distance;
        let mut links = Vec::new();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                if math::distance_squared(points[i], points[j]) < limit {
                    links.push((i, j));
                }
            }
        }
        Self { points, links, opacity: pulse_opacity(0.0), rotation: 0.0 }
    }

    pub fn update(&mut self, t: f32) {
        self.rotation = t * 0.01;
        self.opacity = pulse_opacity(t);
    }
}

/// `0.1 + (sin(0.5t)·0.5 + 0.5)·0.2`, in [0.1, 0.3].
#[inline]
pub fn pulse_opacity(t: f32) -> f32 {
    0.1 + ((t * 0.5).sin() * 0.5 + 0.5) * 0.2
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Fireflies
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Firefly {
    base_x: f32,
    base_z: f32,
    y_offset: f32,
    speed: f32,
    phase: f32,
    pub position: Vec3,
    pub scale: f32,
    pub color: Rgba,
}

impl Firefly {
    fn at(&self, t: f32) -> (Vec3, f32) {
        let position = [
            self.base_x + (t * self.speed + self.phase).sin() * 2.0,
            1.5 + (t * 1.5 + self.phase).sin() + self.y_offset,
            self.base_z + (t * self.speed * 0.8 + self.phase).cos() * 2.0,
        ];
        (position, 0.1 + (t * 5.0 + self.phase).sin() * 0.05)
    }
}

#[derive(Debug, Clone)]
pub struct Fireflies {
    pub flies: Vec<Firefly>,
    pub visible: bool,
}

impl Fireflies {
    pub fn generate(count: usize, rng: &mut impl Rng) -> Self {
        let flies = (0..count)
            .map(|i| {
                let mut f = Firefly {
                    speed: 0.5 + rng.gen::<f32>(),
                    base_x: (rng.gen::<f32>() - 0.5) * 20.0,
                    base_z: (rng.gen::<f32>() - 0.5) * 20.0,
                    y_offset: rng.gen::<f32>() * 3.0,
                    phase: rng.gen::<f32>() * PI,
                    position: math::ORIGIN,
                    scale: 0.0,
                    color: if i % 2 == 0 { palette::FIREFLY_A } else { palette::FIREFLY_B },
                };
                (f.position, f.scale) = f.at(0.0);
                f
            })
            .collect();
        Self { flies, visible: false }
    }

    /// Lissajous drift; skipped entirely by day.
    pub fn update(&mut self, t: f32, is_night: bool) {
        self.visible = is_night;
        if !is_night {
            return;
        }
        for f in &mut self.flies {
            (f.position, f.scale) = f.at(t);
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Asteroid belt
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Asteroid {
    /// Position in the belt's rest frame
    pub position: Vec3,
    pub size: f32,
}

#[derive(Debug, Clone)]
pub struct AsteroidBelt {
    pub band: AsteroidBand,
    pub rocks: Vec<Asteroid>,
    pub rotation: f32,
}

impl AsteroidBelt {
    pub fn generate(band: AsteroidBand, count: usize, rng: &mut impl Rng) -> Self {
        let width = (band.outer - band.inner).max(0.0);
        let rocks = (0..count)
            .map(|i| {
                let angle = i as f32 / count as f32 * TAU + rng.gen::<f32>() * 0.5;
                let radius = band.inner + rng.gen::<f32>() * width;
                Asteroid {
                    position: [
                        angle.cos() * radius,
                        (rng.gen::<f32>() - 0.5) * 0.5,
                        angle.sin() * radius,
                    ],
                    size: 0.03 + rng.gen::<f32>() * 0.05,
                }
            })
            .collect();
        Self { band, rocks, rotation: 0.0 }
    }

    pub fn update(&mut self, t: f32) {
        self.rotation = t * 0.02;
    }

    pub fn world_position(&self, rock: &Asteroid) -> Vec3 {
        math::rotate_y(rock.position, self.rotation)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Centrepiece
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterpieceKind {
    Sun,
    Campfire,
    Plaza,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centerpiece {
    pub kind: CenterpieceKind,
    pub glow_scale: f32,
    pub light_intensity: f32,
    pub color: Rgba,
}

/// Deterministic flicker noise in [0, 1).
#[inline]
fn flicker_noise(t: f32) -> f32 {
    let x = ((t * 60.0).floor() * 12.9898).sin() * 43758.547;
    x - x.floor()
}

impl Centerpiece {
    pub fn for_variant(variant: LayoutVariant) -> Self {
        let (kind, color) = match variant {
            LayoutVariant::Orbital => (CenterpieceKind::Sun, palette::SUN),
            LayoutVariant::Ring => (CenterpieceKind::Campfire, palette::FLAME),
            LayoutVariant::Grid => (CenterpieceKind::Plaza, palette::CRYSTAL_LIGHT),
        };
        let mut c = Self { kind, glow_scale: 1.0, light_intensity: 0.0, color };
        c.update(0.0, false);
        c
    }

    pub fn update(&mut self, t: f32, is_night: bool) {
        match self.kind {
            CenterpieceKind::Sun => {
                self.glow_scale = 1.0 + (t * 2.0).sin() * 0.05;
                self.light_intensity = 2.0;
            }
            CenterpieceKind::Campfire => {
                self.glow_scale = 1.0 + (t * 2.0).sin() * 0.2;
                self.light_intensity = 8.0 + flicker_noise(t) * 2.0 + (t * 10.0).sin() * 0.5;
            }
            CenterpieceKind::Plaza => {
                self.glow_scale = 1.0 + (t * 0.8).sin() * 0.03;
                self.light_intensity = if is_night { 2.5 } else { 0.0 };
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Traffic
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Shared two-phase traffic light. Cars move on `Go`; pedestrians on `Stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightPhase {
    Go,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficLight {
    /// Seconds per phase
    pub interval: f32,
}

impl TrafficLight {
    pub fn phase(&self, t: f32) -> LightPhase {
        let n = (t.max(0.0) / self.interval).floor() as u64;
        if n % 2 == 0 {
            LightPhase::Go
        } else {
            LightPhase::Stop
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
}

/// Streets run between lattice cells at (i + 0.5)·spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Street {
    pub axis: Axis,
    /// Fixed coordinate of the street centre line
    pub offset: f32,
    /// Loop half length along the travel axis
    pub half_length: f32,
}

impl Street {
    fn world(&self, u: f32, side: f32, y: f32) -> Vec3 {
        match self.axis {
            Axis::X => [u, y, self.offset + side],
            Axis::Z => [self.offset + side, y, u],
        }
    }

    /// Both ends of the centre line, at ground level.
    pub fn endpoints(&self) -> (Vec3, Vec3) {
        (self.world(-self.half_length, 0.0, 0.0), self.world(self.half_length, 0.0, 0.0))
    }

    fn wrap(&self, u: f32) -> f32 {
        let len = 2.0 * self.half_length;
        if u > self.half_length {
            u - len
        } else if u < -self.half_length {
            u + len
        } else {
            u
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Car {
    pub street: Street,
    /// Position along the street
    pub u: f32,
    /// +1 or -1
    pub dir: f32,
    pub speed: f32,
    pub cruise: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pedestrian {
    pub street: Street,
    pub u: f32,
    pub dir: f32,
    pub speed: f32,
    /// Which sidewalk (+1 / -1)
    pub side: f32,
}

const CAR_COLORS: [Rgba; 4] = [
    palette::CAR_BODY,
    palette::hex("#3b82f6"),
    palette::hex("#eab308"),
    palette::hex("#e5e7eb"),
];

#[derive(Debug, Clone)]
pub struct Traffic {
    pub light: TrafficLight,
    pub cars: Vec<Car>,
    pub pedestrians: Vec<Pedestrian>,
    pub phase: LightPhase,
    /// Lattice spacing (distance between parallel streets)
    pub spacing: f32,
}

impl Traffic {
    pub fn generate(
        half_extent: i32,
        spacing: f32,
        cars: usize,
        pedestrians: usize,
        cfg: &AmbientConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let k = half_extent.max(1);
        // A collapsed lattice still needs a non-empty street to sample from
        let spacing = if spacing > 0.0 { spacing } else { 1.0 };
        let half_length = (k as f32 + 1.0) * spacing;
        let pick_street = |rng: &mut dyn rand::RngCore| {
            let i = rng.gen_range(-k - 1..=k);
            Street {
                axis: if rng.gen::<bool>() { Axis::X } else { Axis::Z },
                offset: (i as f32 + 0.5) * spacing,
                half_length,
            }
        };
        let cars = (0..cars)
            .map(|i| {
                let street = pick_street(rng);
                let cruise = cfg.car_speed * (0.8 + rng.gen::<f32>() * 0.4);
                Car {
                    street,
                    u: rng.gen_range(-half_length..half_length),
                    dir: if rng.gen::<bool>() { 1.0 } else { -1.0 },
                    speed: cruise,
                    cruise,
                    color: CAR_COLORS[i % CAR_COLORS.len()],
                }
            })
            .collect();
        let pedestrians = (0..pedestrians)
            .map(|_| Pedestrian {
                street: pick_street(rng),
                u: rng.gen_range(-half_length..half_length),
                dir: if rng.gen::<bool>() { 1.0 } else { -1.0 },
                speed: cfg.pedestrian_speed * (0.7 + rng.gen::<f32>() * 0.6),
                side: if rng.gen::<bool>() { 1.0 } else { -1.0 },
            })
            .collect();
        Self {
            light: TrafficLight { interval: cfg.light_interval },
            cars,
            pedestrians,
            phase: LightPhase::Go,
            spacing,
        }
    }

    /// Gap between a stopped car's nose and the intersection centre.
    fn stop_gap(&self) -> f32 {
        self.spacing * 0.25
    }

    /// Distance ahead to the next stop line, measured in travel direction.
    pub fn distance_to_stop_line(&self, car: &Car) -> f32 {
        let s = self.spacing;
        let gap = self.stop_gap();
        let v = car.dir * car.u;
        // Stop lines in travel coordinates sit at (j + 0.5)·s - gap for all j.
        let mut j = ((v + gap) / s - 0.5).ceil();
        let mut line = (j + 0.5) * s - gap;
        if line < v - 1e-4 {
            j += 1.0;
            line = (j + 0.5) * s - gap;
        }
        (line - v).max(0.0)
    }

    pub fn update(&mut self, t: f32, dt: f32) {
        self.phase = self.light.phase(t);
        let dt = dt.max(0.0);
        let stop_zone = self.spacing * 0.5;
        let k = 1.0 - (-dt * 3.0).exp();

        for i in 0..self.cars.len() {
            let d = self.distance_to_stop_line(&self.cars[i]);
            let car = &mut self.cars[i];
            let braking = self.phase == LightPhase::Stop && d < stop_zone;
            let target = if braking { car.cruise * (d / stop_zone) } else { car.cruise };
            car.speed = if braking {
                // Never faster than what still fits before the line.
                animator::approach(car.speed, target, k.max(0.5)).min(target)
            } else {
                animator::approach(car.speed, target, k)
            };
            let step = if braking { (car.speed * dt).min(d) } else { car.speed * dt };
            car.u = car.street.wrap(car.u + car.dir * step);
        }

        let walking = self.phase == LightPhase::Stop;
        for p in &mut self.pedestrians {
            if walking {
                p.u = p.street.wrap(p.u + p.dir * p.speed * dt);
            }
        }
    }

    pub fn car_position(&self, car: &Car) -> Vec3 {
        car.street.world(car.u, car.dir * self.spacing * 0.1, 0.15)
    }

    pub fn pedestrian_position(&self, p: &Pedestrian) -> Vec3 {
        p.street.world(p.u, p.side * self.spacing * 0.3, 0.3)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AmbientSystem
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// All decoration of one mounted scene.
#[derive(Debug, Clone)]
pub struct AmbientSystem {
    pub variant: LayoutVariant,
    pub starfield: Starfield,
    pub constellation: Constellation,
    pub fireflies: Option<Fireflies>,
    pub belt: Option<AsteroidBelt>,
    pub centerpiece: Centerpiece,
    pub traffic: Option<Traffic>,
    device: DeviceTier,
    seed: u64,
    grid: Option<(i32, f32)>,
    cfg: AmbientConfig,
}

impl AmbientSystem {
    pub fn build(
        layout: &Layout,
        grid_spacing: f32,
        device: DeviceTier,
        cfg: &AmbientConfig,
        seed: u64,
    ) -> Self {
        let rng = |salt: u64| StdRng::seed_from_u64(seed ^ salt);
        let belt = layout
            .belt
            .map(|band| AsteroidBelt::generate(band, cfg.asteroids, &mut rng(SALT_BELT)));
        let constellation = Constellation::generate(
            cfg.constellation_points,
            cfg.constellation_radius,
            cfg.constellation_link,
            &mut rng(SALT_CONSTELLATION),
        );
        let mut system = Self {
            variant: layout.variant,
            starfield: Starfield { stars: Vec::new(), rotation: 0.0 },
            constellation,
            fireflies: None,
            belt,
            centerpiece: Centerpiece::for_variant(layout.variant),
            traffic: None,
            device,
            seed,
            grid: layout.grid_half_extent.map(|k| (k, grid_spacing)),
            cfg: cfg.clone(),
        };
        system.regenerate_density();
        system
    }

    /// Rebuild the density-dependent systems for the current device tier.
    fn regenerate_density(&mut self) {
        let seed = self.seed;
        let rng = |salt: u64| StdRng::seed_from_u64(seed ^ salt);
        let cfg = &self.cfg;
        let d = self.device;
        self.starfield = Starfield::generate(
            d.pick(cfg.stars_mobile, cfg.stars_desktop),
            cfg.star_radius,
            &mut rng(SALT_STARS),
        );
        self.fireflies = (self.variant == LayoutVariant::Ring).then(|| {
            Fireflies::generate(
                d.pick(cfg.fireflies_mobile, cfg.fireflies_desktop),
                &mut rng(SALT_FIREFLIES),
            )
        });
        self.traffic = self.grid.map(|(k, spacing)| {
            Traffic::generate(
                k,
                spacing,
                d.pick(cfg.cars_mobile, cfg.cars_desktop),
                d.pick(cfg.pedestrians_mobile, cfg.pedestrians_desktop),
                cfg,
                &mut rng(SALT_TRAFFIC),
            )
        });
    }

    pub fn device(&self) -> DeviceTier {
        self.device
    }

    /// Density follows the device tier; layout never does.
    pub fn set_device(&mut self, device: DeviceTier) {
        if device != self.device {
            self.device = device;
            self.regenerate_density();
            log::info!(
                "ambient density → {:?}: {} stars",
                device,
                self.starfield.stars.len()
            );
        }
    }

    /// Stars show in space always, elsewhere only at night.
    pub fn sky_visible(&self, theme: ThemeContext) -> bool {
        self.variant == LayoutVariant::Orbital || theme.is_night
    }

    pub fn update(&mut self, t: f32, dt: f32, theme: ThemeContext) {
        if self.sky_visible(theme) {
            self.starfield.update(t);
            self.constellation.update(t);
        }
        if let Some(f) = &mut self.fireflies {
            f.update(t, theme.is_night);
        }
        if let Some(b) = &mut self.belt {
            b.update(t);
        }
        self.centerpiece.update(t, theme.is_night);
        if let Some(tr) = &mut self.traffic {
            tr.update(t, dt);
        }
    }
}
