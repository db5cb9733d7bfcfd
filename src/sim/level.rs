//! Procedural level generation
//!
//! A level is a column of platforms climbing from a fixed anchor, plus a
//! handful of independently seeded drifting platforms and the hazard floor.
//! The same tuning always yields the same level.

use glam::Vec2;

use super::rng::SeededRng;
use super::state::{HazardFloor, Motion, Platform, PlatformType};
use crate::tuning::{PlatformWeights, Tuning};

/// Generated level contents
#[derive(Debug, Clone)]
pub struct Level {
    /// Normal and ice platforms
    pub platforms: Vec<Platform>,
    /// Column moving platforms followed by drifters
    pub movers: Vec<Platform>,
    pub hazard: HazardFloor,
}

/// Weighted draw over platform types.
///
/// Draws `r` in `[1, total]` and subtracts weights in the order normal,
/// moving, ice; the first type that brings `r` to zero or below wins.
pub fn pick_platform_type(rng: &mut SeededRng, weights: &PlatformWeights) -> PlatformType {
    let total = weights.total();
    if total == 0 {
        return PlatformType::Normal;
    }
    // Totals within i32 must keep the i32 draw; layouts depend on it
    let mut roll = match i32::try_from(total) {
        Ok(total) => rng.between(1, total) as i64,
        Err(_) => rng.between_u64(1, total) as i64,
    };
    for (kind, weight) in weights.ordered() {
        roll -= weight as i64;
        if roll <= 0 {
            return kind;
        }
    }
    PlatformType::Normal
}

/// Width of a shrinking platform at generation index `index`
pub fn shrunk_width(base: f32, index: u32, tuning: &Tuning) -> f32 {
    (base - index as f32 * tuning.width_shrink_rate)
        .max(tuning.min_platform_width)
        .min(base)
}

/// Inclusive horizontal window for the next platform after `prev_x`
pub fn x_window(prev_x: i32, tuning: &Tuning) -> (i32, i32) {
    let half = (tuning.platforms.normal.width / 2.0).ceil() as i32;
    let world = tuning.game_width.floor() as i32;
    let lo = half.max(prev_x - tuning.max_distance_x);
    let hi = (world - half).min(prev_x + tuning.max_distance_x);
    (lo, hi)
}

/// Build the full level for `tuning`
pub fn generate_level(tuning: &Tuning) -> Level {
    let mut rng = SeededRng::from_seeds(&[tuning.level_seed.as_str()]);
    let mut platforms = Vec::new();
    let mut movers = Vec::new();

    let normal = &tuning.platforms.normal;
    let mut prev_x = tuning.start_x.round() as i32;
    let mut prev_y = tuning.start_y().round() as i32;

    if tuning.platform_count > 0 {
        let mut anchor = Platform::new_static(
            0,
            PlatformType::Normal,
            Vec2::new(prev_x as f32, prev_y as f32),
            Vec2::new(normal.width, normal.height),
        );
        anchor.column_index = Some(0);
        platforms.push(anchor);
    }

    for i in 1..tuning.platform_count {
        // Strictly ascend even with a degenerate spacing window
        let step = rng
            .between(tuning.min_distance_y, tuning.max_distance_y)
            .max(1);
        let y = prev_y - step;
        let (lo, hi) = x_window(prev_x, tuning);
        let x = rng.between(lo, hi);

        let kind = pick_platform_type(&mut rng, &tuning.weights);
        let pos = Vec2::new(x as f32, y as f32);
        let config = tuning.platforms.get(kind);

        let mut platform = match kind {
            PlatformType::Normal | PlatformType::Ice => {
                let width = shrunk_width(config.width, i, tuning);
                Platform::new_static(i, kind, pos, Vec2::new(width, config.height))
            }
            PlatformType::Moving => {
                let mut platform =
                    Platform::new_static(i, kind, pos, Vec2::new(config.width, config.height));
                platform.vel.x = tuning.moving_speed;
                platform.motion = Motion::Reversal {
                    origin: pos,
                    speed: tuning.moving_speed,
                    turn_delay: tuning.moving_turn_delay,
                    timer: 0.0,
                };
                platform
            }
        };
        platform.column_index = Some(i);

        if kind == PlatformType::Moving {
            movers.push(platform);
        } else {
            platforms.push(platform);
        }

        prev_x = x;
        prev_y = y;
    }

    movers.extend(generate_drifters(tuning));

    log::info!(
        "Generated level '{}' ({:#018x}): {} static, {} moving ({} drifters), top at y={}",
        tuning.level_seed,
        rng.seed(),
        platforms.len(),
        movers.len(),
        tuning.drifter_count,
        prev_y
    );

    Level {
        platforms,
        movers,
        hazard: HazardFloor::new(tuning.game_width, tuning.map_height, tuning.hazard_thickness),
    }
}

/// Moving platforms scattered over the map from their own seed
fn generate_drifters(tuning: &Tuning) -> Vec<Platform> {
    let mut rng = SeededRng::from_seeds(&[tuning.drifter_seed.as_str()]);
    let config = &tuning.platforms.moving;
    let half = (config.width / 2.0).ceil() as i32;
    let world = tuning.game_width.floor() as i32;
    let map = tuning.map_height.floor() as i32;

    (0..tuning.drifter_count)
        .map(|k| {
            let y = rng.between(100, map - 100);
            let x = rng.between(half, world - half);
            let mut platform = Platform::new_static(
                tuning.platform_count.saturating_add(k),
                PlatformType::Moving,
                Vec2::new(x as f32, y as f32),
                Vec2::new(config.width, config.height),
            );
            platform.motion = Motion::Tween {
                origin_x: x as f32,
                travel: tuning.drifter_travel,
                leg_duration: tuning.drifter_leg_duration,
                elapsed: 0.0,
            };
            if tuning.drifter_leg_duration > 0.0 {
                platform.vel.x = tuning.drifter_travel / tuning.drifter_leg_duration;
            }
            platform
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(level: &Level) -> Vec<&Platform> {
        let mut column: Vec<&Platform> = level
            .platforms
            .iter()
            .chain(level.movers.iter())
            .filter(|p| p.column_index.is_some())
            .collect();
        column.sort_by_key(|p| p.column_index);
        column
    }

    fn layout(level: &Level) -> Vec<(PlatformType, f32, f32, f32)> {
        column(level)
            .iter()
            .map(|p| (p.kind, p.pos.x, p.pos.y, p.width()))
            .collect()
    }

    #[test]
    fn test_generation_is_deterministic() {
        let tuning = Tuning::default();
        let a = generate_level(&tuning);
        let b = generate_level(&tuning);
        assert_eq!(layout(&a), layout(&b));
        let drift_a: Vec<Vec2> = a.movers.iter().map(|p| p.pos).collect();
        let drift_b: Vec<Vec2> = b.movers.iter().map(|p| p.pos).collect();
        assert_eq!(drift_a, drift_b);
    }

    #[test]
    fn test_different_seed_changes_layout() {
        let a = generate_level(&Tuning::default());
        let b = generate_level(&Tuning {
            level_seed: "another-tower".to_string(),
            ..Default::default()
        });
        assert_ne!(layout(&a), layout(&b));
    }

    #[test]
    fn test_exact_platform_count_and_anchor() {
        let tuning = Tuning::default();
        let level = generate_level(&tuning);
        let column = column(&level);
        assert_eq!(column.len(), 74);
        assert_eq!(column[0].kind, PlatformType::Normal);
        assert_eq!(column[0].pos, Vec2::new(200.0, 1150.0));
        assert_eq!(column[0].width(), 100.0);
        assert_eq!(level.movers.len() - tuning.drifter_count as usize, {
            column.iter().filter(|p| p.kind == PlatformType::Moving).count()
        });
    }

    #[test]
    fn test_bounds_and_spacing() {
        let tuning = Tuning::default();
        let level = generate_level(&tuning);
        let column = column(&level);
        for p in &column {
            let half = p.width() / 2.0;
            assert!(p.pos.x >= half && p.pos.x <= tuning.game_width - half);
            assert!(p.width() >= tuning.min_platform_width);
            assert!(p.width() <= 100.0);
        }
        for pair in column.windows(2) {
            let dy = pair[0].pos.y - pair[1].pos.y;
            assert!(dy >= tuning.min_distance_y as f32 && dy <= tuning.max_distance_y as f32);
            let dx = (pair[0].pos.x - pair[1].pos.x).abs();
            assert!(dx <= tuning.max_distance_x as f32);
        }
    }

    #[test]
    fn test_ice_platforms_carry_slip_flag_and_shrink() {
        let level = generate_level(&Tuning {
            weights: PlatformWeights {
                normal: 0,
                moving: 0,
                ice: 1,
            },
            ..Default::default()
        });
        let column = column(&level);
        assert!(column[1..].iter().all(|p| p.kind == PlatformType::Ice && p.is_ice));
        assert_eq!(column[10].width(), 95.0);
        assert_eq!(column[73].width(), 63.5);
    }

    #[test]
    fn test_width_floor() {
        let tuning = Tuning::default();
        assert_eq!(shrunk_width(100.0, 10, &tuning), 95.0);
        assert_eq!(shrunk_width(100.0, 500, &tuning), 50.0);
    }

    #[test]
    fn test_degenerate_windows_still_generate() {
        let tuning = Tuning {
            min_distance_y: 80,
            max_distance_y: 20,
            max_distance_x: -30,
            platform_count: 20,
            drifter_count: 0,
            ..Default::default()
        };
        let level = generate_level(&tuning);
        let column = column(&level);
        assert_eq!(column.len(), 20);
        for pair in column.windows(2) {
            assert_eq!(pair[0].pos.y - pair[1].pos.y, 50.0);
            assert_eq!(pair[1].pos.x, 200.0);
        }
    }

    #[test]
    fn test_zero_vertical_spacing_still_ascends() {
        let tuning = Tuning {
            min_distance_y: 0,
            max_distance_y: 0,
            platform_count: 5,
            ..Default::default()
        };
        let level = generate_level(&tuning);
        let column = column(&level);
        for pair in column.windows(2) {
            assert!(pair[1].pos.y < pair[0].pos.y);
        }
    }

    #[test]
    fn test_weighted_pick_order_and_zero_total() {
        let mut rng = SeededRng::from_u64(3);
        let only_moving = PlatformWeights {
            normal: 0,
            moving: 5,
            ice: 0,
        };
        for _ in 0..50 {
            assert_eq!(pick_platform_type(&mut rng, &only_moving), PlatformType::Moving);
        }
        let none = PlatformWeights {
            normal: 0,
            moving: 0,
            ice: 0,
        };
        assert_eq!(pick_platform_type(&mut rng, &none), PlatformType::Normal);
    }

    #[test]
    fn test_weighted_pick_converges() {
        let mut rng = SeededRng::from_seeds(&["convergence"]);
        let weights = PlatformWeights::default();
        let draws = 90_000;
        let mut counts = [0u32; 3];
        for _ in 0..draws {
            match pick_platform_type(&mut rng, &weights) {
                PlatformType::Normal => counts[0] += 1,
                PlatformType::Moving => counts[1] += 1,
                PlatformType::Ice => counts[2] += 1,
            }
        }
        let total = weights.total() as f64;
        for (count, weight) in counts.iter().zip([60.0, 100.0, 20.0]) {
            let observed = *count as f64 / draws as f64;
            assert!((observed - weight / total).abs() < 0.01);
        }
    }

    #[test]
    fn test_huge_weights_do_not_overflow() {
        let mut rng = SeededRng::from_seeds(&["wide"]);
        let lopsided = PlatformWeights {
            normal: u32::MAX,
            moving: 1,
            ice: 0,
        };
        for _ in 0..200 {
            assert_ne!(pick_platform_type(&mut rng, &lopsided), PlatformType::Ice);
        }

        let even = PlatformWeights {
            normal: 0,
            moving: u32::MAX,
            ice: u32::MAX,
        };
        let draws = 4000;
        let moving = (0..draws)
            .filter(|_| pick_platform_type(&mut rng, &even) == PlatformType::Moving)
            .count();
        let share = moving as f64 / draws as f64;
        assert!((share - 0.5).abs() < 0.05);

        let level = generate_level(&Tuning {
            weights: lopsided,
            platform_count: 5,
            ..Default::default()
        });
        assert_eq!(column(&level).len(), 5);
    }

    #[test]
    fn test_zero_and_one_platform_counts() {
        let empty = generate_level(&Tuning {
            platform_count: 0,
            drifter_count: 0,
            ..Default::default()
        });
        assert!(column(&empty).is_empty());
        assert!(empty.movers.is_empty());

        let single = generate_level(&Tuning {
            platform_count: 1,
            ..Default::default()
        });
        let column = column(&single);
        assert_eq!(column.len(), 1);
        assert_eq!(column[0].pos, Vec2::new(200.0, 1150.0));
    }

    #[test]
    fn test_drifters_use_tween_inside_world() {
        let tuning = Tuning::default();
        let level = generate_level(&tuning);
        let drifters: Vec<&Platform> = level
            .movers
            .iter()
            .filter(|p| p.column_index.is_none())
            .collect();
        assert_eq!(drifters.len(), 6);
        for d in drifters {
            assert!(matches!(d.motion, Motion::Tween { .. }));
            assert!(d.pos.x >= 35.0 && d.pos.x <= 365.0);
            assert!(d.pos.y >= 100.0 && d.pos.y <= 1100.0);
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_seed_builds_a_climbable_column(seed in "[a-z0-9-]{1,16}") {
                let tuning = Tuning {
                    level_seed: seed,
                    ..Default::default()
                };
                let level = generate_level(&tuning);
                prop_assert_eq!(layout(&level), layout(&generate_level(&tuning)));

                let column = column(&level);
                prop_assert_eq!(column.len(), tuning.platform_count as usize);
                prop_assert_eq!(column[0].pos, Vec2::new(200.0, 1150.0));
                for p in &column {
                    prop_assert!(p.pos.x >= 50.0 && p.pos.x <= 350.0);
                }
                for pair in column.windows(2) {
                    let dy = pair[0].pos.y - pair[1].pos.y;
                    prop_assert!((60.0..=100.0).contains(&dy));
                    prop_assert!((pair[0].pos.x - pair[1].pos.x).abs() <= 150.0);
                }
            }

            #[test]
            fn picks_stay_within_positive_weights(seed in any::<u64>(), moving in 0u32..50) {
                let weights = PlatformWeights {
                    normal: 10,
                    moving,
                    ice: 0,
                };
                let mut rng = SeededRng::from_u64(seed);
                for _ in 0..50 {
                    let kind = pick_platform_type(&mut rng, &weights);
                    prop_assert!(kind != PlatformType::Ice);
                    if moving == 0 {
                        prop_assert_eq!(kind, PlatformType::Normal);
                    }
                }
            }
        }
    }
}
