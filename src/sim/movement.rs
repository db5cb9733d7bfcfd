//! Player movement and surface interaction
//!
//! Input is an impulse, not a target speed: every held direction adds
//! `movement_speed` to the current velocity, which is then clamped. Surfaces
//! decide how fast an idle, grounded player stops. Ice barely slows them,
//! normal platforms stop them almost at once, and moving platforms carry them.

use super::physics::{ContactReport, PlatformGroup};
use super::state::{Platform, Player};
use super::tick::TickInput;
use crate::tuning::Tuning;

/// Vertical slack when deciding a player stands on top of a platform
const STANDING_TOLERANCE: f32 = 1.0;

/// Resolve the player's velocity for this tick.
///
/// `contact` is the report of the previous physics step. Returns true if the
/// player jumped.
pub fn resolve_movement(
    player: &mut Player,
    input: &TickInput,
    contact: &ContactReport,
    movers: &[Platform],
    tuning: &Tuning,
) -> bool {
    let steering = input.horizontal_held();
    let max_speed = tuning.max_speed;

    let mut vx = player.vel.x;
    if input.left {
        vx -= tuning.movement_speed;
    }
    if input.right {
        vx += tuning.movement_speed;
    }
    vx = vx.clamp(-max_speed, max_speed);

    if contact.grounded && !steering && !player.on_moving_platform {
        vx *= if player.on_ice_platform {
            tuning.ice_damping_factor
        } else {
            tuning.damping_factor
        };
    }

    if !steering {
        if let Some(platform) = ridden_platform(player, contact, movers) {
            vx = platform.vel.x.clamp(-max_speed, max_speed);
        }
    }

    player.vel.x = vx;
    player.walking = steering;

    if input.jump && contact.grounded {
        player.vel.y = tuning.jump_velocity;
        return true;
    }
    false
}

/// Update the surface flags from a fresh contact report.
///
/// Groups apply in fixed order, normal/ice first and moving second, so a
/// player touching both ends the tick flagged for the moving platform.
pub fn apply_surface_flags(
    player: &mut Player,
    contact: &ContactReport,
    input: &TickInput,
    movers: &[Platform],
) {
    if let Some(surface) = contact.static_contact {
        player.on_moving_platform = false;
        player.on_ice_platform = surface.is_ice;
    }
    if let Some(surface) = contact.moving_contact {
        player.on_ice_platform = false;
        let above = movers
            .get(surface.index)
            .is_some_and(|platform| player.pos.y < platform.pos.y);
        if above && !input.horizontal_held() {
            player.on_moving_platform = true;
        }
    }
}

/// The moving platform the player stands directly on top of, if any
pub fn ridden_platform<'a>(
    player: &Player,
    contact: &ContactReport,
    movers: &'a [Platform],
) -> Option<&'a Platform> {
    let surface = contact.standing_on_mover()?;
    debug_assert_eq!(surface.group, PlatformGroup::Moving);
    let platform = movers
        .get(surface.index)
        .filter(|p| p.id == surface.platform_id)?;
    let feet = player.aabb().bottom();
    let top = platform.aabb().top();
    let on_top = player.pos.y < platform.pos.y && (feet - top).abs() <= STANDING_TOLERANCE;
    on_top.then_some(platform)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::physics::SurfaceContact;
    use crate::sim::state::PlatformType;

    fn player() -> Player {
        Player::new(Vec2::new(200.0, 474.0), Vec2::new(32.0, 32.0))
    }

    fn grounded() -> ContactReport {
        ContactReport {
            grounded: true,
            ..Default::default()
        }
    }

    fn mover_under(player: &Player, vel_x: f32) -> Platform {
        let mut p = Platform::new_static(
            9,
            PlatformType::Moving,
            Vec2::new(player.pos.x, player.aabb().bottom() + 10.0),
            Vec2::new(70.0, 20.0),
        );
        p.vel.x = vel_x;
        p
    }

    fn moving_contact(platform: &Platform) -> ContactReport {
        ContactReport {
            grounded: true,
            moving_contact: Some(SurfaceContact {
                group: PlatformGroup::Moving,
                index: 0,
                platform_id: platform.id,
                kind: PlatformType::Moving,
                is_ice: false,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_input_is_an_impulse() {
        let tuning = Tuning::default();
        let mut p = player();
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        resolve_movement(&mut p, &right, &ContactReport::default(), &[], &tuning);
        assert_eq!(p.vel.x, 40.0);
        resolve_movement(&mut p, &right, &ContactReport::default(), &[], &tuning);
        assert_eq!(p.vel.x, 80.0);
        resolve_movement(&mut p, &right, &ContactReport::default(), &[], &tuning);
        assert_eq!(p.vel.x, 100.0);
        assert!(p.walking);
    }

    #[test]
    fn test_left_and_right_cancel() {
        let tuning = Tuning::default();
        let mut p = player();
        p.vel.x = 30.0;
        let both = TickInput {
            left: true,
            right: true,
            jump: false,
        };
        resolve_movement(&mut p, &both, &grounded(), &[], &tuning);
        // Still counts as steering, so no damping either
        assert_eq!(p.vel.x, 30.0);
    }

    #[test]
    fn test_idle_damping_by_surface() {
        let tuning = Tuning::default();
        let idle = TickInput::default();

        let mut normal = player();
        normal.vel.x = 100.0;
        resolve_movement(&mut normal, &idle, &grounded(), &[], &tuning);
        assert!((normal.vel.x - 10.0).abs() < 1e-4);

        let mut ice = player();
        ice.on_ice_platform = true;
        ice.vel.x = 100.0;
        resolve_movement(&mut ice, &idle, &grounded(), &[], &tuning);
        assert!((ice.vel.x - 99.0).abs() < 1e-4);
    }

    #[test]
    fn test_no_damping_in_air() {
        let tuning = Tuning::default();
        let mut p = player();
        p.vel.x = 70.0;
        resolve_movement(&mut p, &TickInput::default(), &ContactReport::default(), &[], &tuning);
        assert_eq!(p.vel.x, 70.0);
    }

    #[test]
    fn test_rider_adopts_platform_velocity() {
        let tuning = Tuning::default();
        let mut p = player();
        p.on_moving_platform = true;
        p.vel.x = 5.0;
        let movers = [mover_under(&p, -66.0)];
        let contact = moving_contact(&movers[0]);
        resolve_movement(&mut p, &TickInput::default(), &contact, &movers, &tuning);
        assert_eq!(p.vel.x, -66.0);
    }

    #[test]
    fn test_steering_overrides_ride() {
        let tuning = Tuning::default();
        let mut p = player();
        p.vel.x = 0.0;
        let movers = [mover_under(&p, -66.0)];
        let contact = moving_contact(&movers[0]);
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        resolve_movement(&mut p, &right, &contact, &movers, &tuning);
        assert_eq!(p.vel.x, 40.0);
    }

    #[test]
    fn test_no_ride_when_beside_platform() {
        let tuning = Tuning::default();
        let mut p = player();
        p.vel.x = 20.0;
        let mut platform = mover_under(&p, 90.0);
        platform.pos.y = p.pos.y - 5.0;
        let movers = [platform];
        let contact = moving_contact(&movers[0]);
        resolve_movement(&mut p, &TickInput::default(), &contact, &movers, &tuning);
        assert_ne!(p.vel.x, 90.0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let tuning = Tuning::default();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let mut p = player();
        assert!(!resolve_movement(&mut p, &jump, &ContactReport::default(), &[], &tuning));
        assert_eq!(p.vel.y, 0.0);
        assert!(resolve_movement(&mut p, &jump, &grounded(), &[], &tuning));
        assert_eq!(p.vel.y, -250.0);
    }

    #[test]
    fn test_surface_flags_are_exclusive() {
        let mut p = player();
        let movers = [mover_under(&p, 50.0)];
        let idle = TickInput::default();

        let ice = ContactReport {
            grounded: true,
            static_contact: Some(SurfaceContact {
                group: PlatformGroup::Static,
                index: 0,
                platform_id: 3,
                kind: PlatformType::Ice,
                is_ice: true,
            }),
            ..Default::default()
        };
        apply_surface_flags(&mut p, &ice, &idle, &movers);
        assert!(p.on_ice_platform);
        assert!(!p.on_moving_platform);

        apply_surface_flags(&mut p, &moving_contact(&movers[0]), &idle, &movers);
        assert!(!p.on_ice_platform);
        assert!(p.on_moving_platform);

        apply_surface_flags(&mut p, &ice, &idle, &movers);
        assert!(p.on_ice_platform);
        assert!(!p.on_moving_platform);

        // Both groups in one tick: moving applies last
        let both = ContactReport {
            moving_contact: moving_contact(&movers[0]).moving_contact,
            ..ice
        };
        apply_surface_flags(&mut p, &both, &idle, &movers);
        assert!(!p.on_ice_platform);
        assert!(p.on_moving_platform);
    }

    #[test]
    fn test_steering_onto_mover_does_not_flag_riding() {
        let mut p = player();
        let movers = [mover_under(&p, 50.0)];
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        apply_surface_flags(&mut p, &moving_contact(&movers[0]), &right, &movers);
        assert!(!p.on_moving_platform);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn horizontal_speed_is_always_clamped(
                vx in -1000.0f32..1000.0,
                left in any::<bool>(),
                right in any::<bool>(),
                jump in any::<bool>(),
                on_ground in any::<bool>(),
                on_ice in any::<bool>(),
            ) {
                let tuning = Tuning::default();
                let mut p = player();
                p.vel.x = vx;
                p.on_ice_platform = on_ice;
                let contact = ContactReport {
                    grounded: on_ground,
                    ..Default::default()
                };
                resolve_movement(&mut p, &TickInput { left, right, jump }, &contact, &[], &tuning);
                prop_assert!(p.vel.x.abs() <= tuning.max_speed);
            }

            #[test]
            fn ice_keeps_more_speed_than_normal(speed in 1.0f32..100.0, leftward in any::<bool>()) {
                let tuning = Tuning::default();
                let vx = if leftward { -speed } else { speed };
                let idle = TickInput::default();

                let mut normal = player();
                normal.vel.x = vx;
                resolve_movement(&mut normal, &idle, &grounded(), &[], &tuning);

                let mut ice = player();
                ice.vel.x = vx;
                ice.on_ice_platform = true;
                resolve_movement(&mut ice, &idle, &grounded(), &[], &tuning);

                prop_assert!(ice.vel.x.abs() > normal.vel.x.abs());
                prop_assert_eq!(ice.vel.x.signum(), vx.signum());
            }
        }
    }
}
