//! Layout engine: catalogue entries → placement slots.
//!
//! One engine, three variants:
//! - Orbital: planet i at radius base + i·step, moons round-robin on the
//!   first min(N, cap) planets
//! - Ring:    projects on an inner ring, certificates on an outer ring
//! - Grid:    a shuffled square lattice, growing until every entry fits
//!
//! Every project and certificate gets exactly one slot. Device tier only
//! changes how much decorative filler the grid receives.

use rand::seq::SliceRandom;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use crate::catalogue::{CatalogueEntry, Certificate, CertificateId, ProjectId};
use crate::config::SceneConfig;
use crate::math::Vec3;
use crate::mobile::DeviceTier;
use crate::render::animator;

use super::LayoutVariant;

/// Radius of the central sun; certificates orbit it when there are no planets.
pub const SUN_RADIUS: f32 = 2.0;

/// What a slot stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotBinding {
    Project(ProjectId),
    Certificate(CertificateId),
    /// Decorative building, not clickable
    Filler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingStyle {
    Plain,
    Glass,
    Brick,
    Concrete,
}

const FILLER_STYLES: [BuildingStyle; 3] =
    [BuildingStyle::Glass, BuildingStyle::Brick, BuildingStyle::Concrete];

/// Variant-specific animation parameters of a slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Planet around the origin
    Orbit {
        radius: f32,
        speed: f32,
        phase: f32,
        bob: f32,
        size: f32,
        /// Index into the planet palette
        palette: usize,
        ringed: bool,
    },
    /// Moon around a host slot (or the sun when `host` is None)
    Moon {
        host: Option<usize>,
        radius: f32,
        speed: f32,
        phase: f32,
        bob: f32,
    },
    /// Fixed building
    Static {
        /// Lattice cell (grid variant only)
        cell: Option<(i32, i32)>,
        style: BuildingStyle,
        height: f32,
        /// Y rotation so the front faces the centre
        facing: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSlot {
    pub binding: SlotBinding,
    /// Position at elapsed time 0 (static slots never move)
    pub position: Vec3,
    pub motion: Motion,
}

/// Decorative asteroid band between two orbits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidBand {
    pub inner: f32,
    pub outer: f32,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub variant: LayoutVariant,
    pub slots: Vec<PlacementSlot>,
    /// Orbital variant with enough planets
    pub belt: Option<AsteroidBand>,
    /// Final lattice half extent (grid variant)
    pub grid_half_extent: Option<i32>,
}

impl Layout {
    pub fn slot_of(&self, binding: SlotBinding) -> Option<usize> {
        self.slots.iter().position(|s| s.binding == binding)
    }

    /// Orbit radii of all planets, innermost first.
    pub fn orbit_radii(&self) -> Vec<f32> {
        self.slots
            .iter()
            .filter_map(|s| match s.motion {
                Motion::Orbit { radius, .. } => Some(radius),
                _ => None,
            })
            .collect()
    }
}

/// Lay out `projects` and `certificates` for `variant`.
pub fn layout(
    projects: &[CatalogueEntry],
    certificates: &[Certificate],
    variant: LayoutVariant,
    device: DeviceTier,
    cfg: &SceneConfig,
    rng: &mut impl Rng,
) -> Layout {
    let (p, c) = (projects.len(), certificates.len());
    let out = match variant {
        LayoutVariant::Orbital => orbital(p, c, cfg, rng),
        LayoutVariant::Ring => ring(p, c, cfg),
        LayoutVariant::Grid => grid(p, c, device, cfg, rng),
    };
    log::debug!(
        "layout {:?}: {} projects, {} certificates → {} slots",
        variant,
        p,
        c,
        out.slots.len()
    );
    out
}

// ── Orbital ──

fn orbital(p: usize, c: usize, cfg: &SceneConfig, rng: &mut impl Rng) -> Layout {
    let o = &cfg.orbital;
    let ring_every = o.ring_every.max(1);
    let mut slots = Vec::with_capacity(p + c);
    let mut sizes = Vec::with_capacity(p);

    for i in 0..p {
        let radius = o.base_radius + i as f32 * o.radius_step;
        let speed = animator::kepler_speed(o.kepler_k, radius);
        let phase = TAU * i as f32 / p as f32;
        let size = o.size_min + rng.gen::<f32>() * o.size_jitter;
        sizes.push(size);
        slots.push(PlacementSlot {
            binding: SlotBinding::Project(ProjectId(i)),
            position: animator::orbit_offset(radius, speed, phase, o.bob, 0.0),
            motion: Motion::Orbit {
                radius,
                speed,
                phase,
                bob: o.bob,
                size,
                palette: i,
                ringed: i % ring_every == 0,
            },
        });
    }

    let hosts = p.min(o.moon_host_cap);
    for i in 0..c {
        let (host, k, host_size) = if hosts > 0 {
            let h = i % hosts;
            (Some(h), i / hosts, sizes[h])
        } else {
            (None, i, SUN_RADIUS)
        };
        let radius = host_size + o.moon_gap + k as f32 * o.moon_step;
        let speed = o.moon_speed + k as f32 * o.moon_speed_step;
        let phase = k as f32 * 0.7 * PI;
        let offset = animator::moon_offset(radius, speed, phase, o.moon_bob, 0.0);
        let base = host.map(|h| slots[h].position).unwrap_or([0.0; 3]);
        slots.push(PlacementSlot {
            binding: SlotBinding::Certificate(CertificateId(i)),
            position: crate::math::add(base, offset),
            motion: Motion::Moon { host, radius, speed, phase, bob: o.moon_bob },
        });
    }

    let belt = (p > o.belt_min_planets && p >= 4).then(|| AsteroidBand {
        inner: o.base_radius + 2.0 * o.radius_step + o.belt_margin,
        outer: o.base_radius + 3.0 * o.radius_step - o.belt_margin,
    });

    Layout { variant: LayoutVariant::Orbital, slots, belt, grid_half_extent: None }
}

// ── Ring ──

fn ring(p: usize, c: usize, cfg: &SceneConfig) -> Layout {
    let r = &cfg.ring;
    let mut slots = Vec::with_capacity(p + c);
    let mut place = |binding, radius: f32, angle: f32, height: f32| {
        let (s, co) = angle.sin_cos();
        let position = [radius * co, 0.0, radius * s];
        slots.push(PlacementSlot {
            binding,
            position,
            motion: Motion::Static {
                cell: None,
                style: BuildingStyle::Plain,
                height,
                facing: (-position[0]).atan2(-position[2]),
            },
        });
    };
    for i in 0..p {
        let angle = TAU * i as f32 / p as f32;
        place(SlotBinding::Project(ProjectId(i)), r.project_radius, angle, 1.0);
    }
    for i in 0..c {
        let angle = TAU * i as f32 / c as f32 + r.certificate_phase;
        place(SlotBinding::Certificate(CertificateId(i)), r.certificate_radius, angle, 2.2);
    }
    Layout { variant: LayoutVariant::Ring, slots, belt: None, grid_half_extent: None }
}

// ── Grid ──

/// Number of lattice cells in [-k, k]² minus the central plaza.
#[inline]
pub fn grid_capacity(k: i32) -> usize {
    let side = (2 * k + 1) as usize;
    side * side - 1
}

fn grid(p: usize, c: usize, device: DeviceTier, cfg: &SceneConfig, rng: &mut impl Rng) -> Layout {
    let g = &cfg.grid;
    let mut k = g.half_extent.max(1);
    while grid_capacity(k) < p + c {
        k += 1;
    }

    let mut cells: Vec<(i32, i32)> = (-k..=k)
        .flat_map(|x| (-k..=k).map(move |z| (x, z)))
        .filter(|&cell| cell != (0, 0))
        .collect();
    cells.shuffle(rng);

    let filler_cap = device.pick(g.filler_mobile, g.filler_desktop);
    let filler = filler_cap.min(cells.len() - (p + c));

    let bindings = (0..p)
        .map(|i| SlotBinding::Project(ProjectId(i)))
        .chain((0..c).map(|i| SlotBinding::Certificate(CertificateId(i))))
        .chain(std::iter::repeat(SlotBinding::Filler).take(filler));

    let slots = bindings
        .zip(cells)
        .map(|(binding, (x, z))| {
            let (lo, hi, style) = match binding {
                SlotBinding::Filler => (
                    g.filler_height_min,
                    g.filler_height_max,
                    FILLER_STYLES[rng.gen_range(0..FILLER_STYLES.len())],
                ),
                _ => (g.entry_height_min, g.entry_height_max, BuildingStyle::Glass),
            };
            let position = [x as f32 * g.spacing, 0.0, z as f32 * g.spacing];
            PlacementSlot {
                binding,
                position,
                motion: Motion::Static {
                    cell: Some((x, z)),
                    style,
                    height: lo + rng.gen::<f32>() * (hi - lo),
                    facing: 0.0,
                },
            }
        })
        .collect();

    Layout { variant: LayoutVariant::Grid, slots, belt: None, grid_half_extent: Some(k) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn entries(p: usize, c: usize) -> (Vec<CatalogueEntry>, Vec<Certificate>) {
        (
            (0..p).map(|i| CatalogueEntry::new(format!("P{}", i), &["Rust"])).collect(),
            (0..c).map(|i| Certificate::new(format!("C{}", i))).collect(),
        )
    }

    fn run(p: usize, c: usize, variant: LayoutVariant, seed: u64) -> Layout {
        let (ps, cs) = entries(p, c);
        let mut rng = StdRng::seed_from_u64(seed);
        layout(&ps, &cs, variant, DeviceTier::Desktop, &SceneConfig::default(), &mut rng)
    }

    fn assert_bijection(l: &Layout, p: usize, c: usize) {
        let real: Vec<SlotBinding> =
            l.slots.iter().map(|s| s.binding).filter(|b| *b != SlotBinding::Filler).collect();
        assert_eq!(real.len(), p + c);
        let unique: HashSet<_> = real.iter().copied().collect();
        assert_eq!(unique.len(), p + c);
        for i in 0..p {
            assert!(unique.contains(&SlotBinding::Project(ProjectId(i))));
        }
        for i in 0..c {
            assert!(unique.contains(&SlotBinding::Certificate(CertificateId(i))));
        }
    }

    #[test]
    fn test_bijection_all_variants() {
        for variant in LayoutVariant::ALL {
            for &(p, c) in &[(0, 0), (1, 0), (0, 3), (5, 3), (9, 8), (30, 40)] {
                let l = run(p, c, variant, 11);
                assert_bijection(&l, p, c);
            }
        }
    }

    #[test]
    fn test_empty_catalogue_empty_slots() {
        for variant in [LayoutVariant::Orbital, LayoutVariant::Ring] {
            assert!(run(0, 0, variant, 1).slots.is_empty());
        }
    }

    #[test]
    fn test_orbit_radii_strictly_increasing() {
        let radii = run(12, 0, LayoutVariant::Orbital, 3).orbit_radii();
        assert_eq!(radii.len(), 12);
        assert!((radii[0] - 5.0).abs() < 1e-6);
        for w in radii.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn test_outer_planets_slower_and_ringed_every_fourth() {
        let l = run(8, 0, LayoutVariant::Orbital, 3);
        let mut last_speed = f32::MAX;
        for (i, s) in l.slots.iter().enumerate() {
            let Motion::Orbit { speed, ringed, size, .. } = s.motion else {
                panic!("expected orbit");
            };
            assert!(speed < last_speed);
            last_speed = speed;
            assert_eq!(ringed, i % 4 == 0);
            assert!((0.4..=0.7).contains(&size));
        }
    }

    #[test]
    fn test_zero_ring_interval_rings_every_planet() {
        let (ps, cs) = entries(3, 2);
        let mut cfg = SceneConfig::default();
        cfg.orbital.ring_every = 0;
        let mut rng = StdRng::seed_from_u64(2);
        let l = layout(&ps, &cs, LayoutVariant::Orbital, DeviceTier::Desktop, &cfg, &mut rng);
        assert_bijection(&l, 3, 2);
        for s in &l.slots[..3] {
            assert!(matches!(s.motion, Motion::Orbit { ringed: true, .. }));
        }
    }

    #[test]
    fn test_moons_round_robin_on_first_four() {
        let l = run(6, 9, LayoutVariant::Orbital, 5);
        let hosts: Vec<Option<usize>> = l
            .slots
            .iter()
            .filter_map(|s| match s.motion {
                Motion::Moon { host, .. } => Some(host),
                _ => None,
            })
            .collect();
        let expected: Vec<Option<usize>> = (0..9).map(|i| Some(i % 4)).collect();
        assert_eq!(hosts, expected);

        // Second moon of host 0 (certificate 4) sits further out and faster.
        let (Motion::Moon { radius: r0, speed: s0, .. }, Motion::Moon { radius: r1, speed: s1, phase, .. }) =
            (l.slots[6].motion, l.slots[10].motion)
        else {
            panic!("expected moons");
        };
        assert!((r1 - r0 - 0.3).abs() < 1e-5);
        assert!((s1 - s0 - 0.3).abs() < 1e-5);
        assert!((phase - 0.7 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_fewer_planets_than_cap() {
        let l = run(2, 5, LayoutVariant::Orbital, 5);
        for s in &l.slots[2..] {
            let Motion::Moon { host, .. } = s.motion else { panic!("expected moon") };
            assert!(matches!(host, Some(0) | Some(1)));
        }
    }

    #[test]
    fn test_moons_without_planets_orbit_sun() {
        let l = run(0, 3, LayoutVariant::Orbital, 5);
        assert_eq!(l.slots.len(), 3);
        assert!(l.slots.iter().all(|s| matches!(s.motion, Motion::Moon { host: None, .. })));
    }

    #[test]
    fn test_asteroid_band() {
        assert!(run(4, 0, LayoutVariant::Orbital, 1).belt.is_none());
        let belt = run(5, 0, LayoutVariant::Orbital, 1).belt.unwrap();
        assert!((belt.inner - 11.0).abs() < 1e-5);
        assert!((belt.outer - 11.5).abs() < 1e-5);
    }

    #[test]
    fn test_ring_radii_and_phase() {
        let l = run(4, 2, LayoutVariant::Ring, 0);
        for s in &l.slots[..4] {
            let r = (s.position[0].powi(2) + s.position[2].powi(2)).sqrt();
            assert!((r - 9.0).abs() < 1e-4);
        }
        let first_cert = l.slots[4].position;
        assert!((first_cert[2].atan2(first_cert[0]) - 0.5).abs() < 1e-4);
        let r = (first_cert[0].powi(2) + first_cert[2].powi(2)).sqrt();
        assert!((r - 14.0).abs() < 1e-4);
    }

    #[test]
    fn test_grid_grows_to_fit() {
        let l = run(30, 40, LayoutVariant::Grid, 2);
        let k = l.grid_half_extent.unwrap();
        assert!(grid_capacity(k) >= 70);
        assert!(grid_capacity(k - 1) < 70);
    }

    #[test]
    fn test_grid_filler_capped_by_device() {
        let (ps, cs) = entries(3, 2);
        let cfg = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mobile = layout(&ps, &cs, LayoutVariant::Grid, DeviceTier::Mobile, &cfg, &mut rng);
        let desktop = layout(&ps, &cs, LayoutVariant::Grid, DeviceTier::Desktop, &cfg, &mut rng);
        let filler = |l: &Layout| l.slots.iter().filter(|s| s.binding == SlotBinding::Filler).count();
        assert_eq!(filler(&mobile), cfg.grid.filler_mobile);
        assert_eq!(filler(&desktop), cfg.grid.filler_desktop);
        assert_bijection(&mobile, 3, 2);
    }

    #[test]
    fn test_grid_cells_unique_over_many_runs() {
        let (ps, _) = entries(50, 0);
        let cfg = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..1000 {
            let l = layout(&ps, &[], LayoutVariant::Grid, DeviceTier::Desktop, &cfg, &mut rng);
            let cells: Vec<(i32, i32)> = l
                .slots
                .iter()
                .filter_map(|s| match s.motion {
                    Motion::Static { cell, .. } => cell,
                    _ => None,
                })
                .collect();
            assert_eq!(cells.len(), l.slots.len());
            let unique: HashSet<_> = cells.iter().copied().collect();
            assert_eq!(unique.len(), cells.len());
            assert!(!unique.contains(&(0, 0)));
        }
    }

    #[test]
    fn test_grid_shuffle_approximately_uniform() {
        // 50 entries push k from 3 to 4: 80 cells. Chi-square over the cell
        // taken by the first project; df = 79, p ≈ 1e-6 at 140.
        let (ps, _) = entries(50, 0);
        let cfg = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(77);
        let runs = 8000;
        let mut counts = std::collections::HashMap::new();
        for _ in 0..runs {
            let l = layout(&ps, &[], LayoutVariant::Grid, DeviceTier::Desktop, &cfg, &mut rng);
            let Motion::Static { cell: Some(cell), .. } = l.slots[0].motion else {
                panic!("expected grid cell");
            };
            *counts.entry(cell).or_insert(0usize) += 1;
        }
        let cells = grid_capacity(4);
        assert_eq!(cells, 80);
        let expected = runs as f64 / cells as f64;
        let chi2: f64 = (-4..=4)
            .flat_map(|x| (-4..=4).map(move |z| (x, z)))
            .filter(|&c| c != (0, 0))
            .map(|c| {
                let o = *counts.get(&c).unwrap_or(&0) as f64;
                (o - expected).powi(2) / expected
            })
            .sum();
        assert!(chi2 < 140.0, "chi2 = {}", chi2);
    }
}
