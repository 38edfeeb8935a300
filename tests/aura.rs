use rand::rngs::StdRng;
use rand::SeedableRng;
use scroll_aura::aura::Aura;
use scroll_aura::aura::Shape;
use scroll_aura::aura::Side;
use scroll_aura::aura::Strip;
use scroll_aura::particle::Particle;
use scroll_aura::settings::AuraSettings;
use scroll_aura::velocity::ScrollVelocity;
use scroll_aura::Error;
use scroll_aura::PARTICLES_PER_SIDE;

const HEIGHT: f32 = 800.0;

fn rng() -> StdRng {
    StdRng::seed_from_u64(5)
}

fn particle(x: f32, y: f32, drift: f32) -> Particle {
    Particle {
        x,
        y,
        radius: 1.0,
        speed: 1.0,
        opacity: 0.5,
        drift,
    }
}

fn strip_with(side: Side, particles: Vec<Particle>) -> Strip {
    let mut strip = Strip::new(side, AuraSettings::default(), HEIGHT, &mut rng()).unwrap();
    strip.particles = particles;
    strip
}

#[test]
fn velocity_settles_after_quiet_period() {
    let mut velocity = ScrollVelocity::default();
    velocity.on_scroll(500.0, 1000.0);
    assert_eq!(velocity.velocity(), 500.0);
    assert!(velocity.is_scrolling());

    assert!(velocity.poll(1150.0));
    assert_eq!(velocity.velocity(), 0.0);
    assert!(!velocity.is_scrolling());
}

#[test]
fn each_scroll_event_restarts_quiet_period() {
    let mut velocity = ScrollVelocity::default();
    velocity.on_scroll(100.0, 0.0);
    velocity.on_scroll(180.0, 100.0);

    assert!(!velocity.poll(160.0));
    assert_eq!(velocity.velocity(), 80.0);
    assert!(velocity.poll(250.0));
    assert_eq!(velocity.velocity(), 0.0);
    assert_eq!(velocity.offset(), 180.0);
}

#[test]
fn strips_start_with_a_full_pool_inside_their_lane() {
    let settings = AuraSettings::default();
    let aura = Aura::new(settings, 0.0, HEIGHT, &mut rng()).unwrap();

    for side in [Side::Left, Side::Right] {
        let strip = aura.strip(side);
        assert_eq!(strip.particles.len(), PARTICLES_PER_SIDE);
        for p in strip.particles.iter() {
            assert!(p.x >= 0.0 && p.x < settings.lane_width);
            assert!(p.y >= 0.0 && p.y < HEIGHT);
            assert!(p.radius >= settings.radius.min && p.radius <= settings.radius.max);
        }
    }
}

#[test]
fn particle_leaving_the_top_reappears_at_the_bottom() {
    let mut strip = strip_with(Side::Left, vec![particle(10.0, 0.5, 0.0)]);

    // Scrolling down 10px moves particles up 10 * 0.3 = 3px.
    strip.step(10.0);

    let y = strip.particles[0].y;
    assert!((y - 797.5).abs() < 1e-3, "{}", y);
}

#[test]
fn particle_leaving_the_bottom_reappears_at_the_top() {
    let mut strip = strip_with(Side::Left, vec![particle(10.0, HEIGHT - 0.5, 0.0)]);

    strip.step(-10.0);

    let y = strip.particles[0].y;
    assert!((y - 2.5).abs() < 1e-3, "{}", y);
}

#[test]
fn huge_velocity_never_leaves_the_strip() {
    let mut strip = strip_with(Side::Right, vec![particle(10.0, 5.0, 0.0)]);

    for velocity in [9_000.0, -25_000.0, 1e6] {
        strip.step(velocity);
        let y = strip.particles[0].y;
        assert!((0.0..=HEIGHT).contains(&y), "{}", y);
    }
}

#[test]
fn drift_wraps_across_the_lane() {
    let mut strip = strip_with(
        Side::Left,
        vec![particle(49.9, 100.0, 0.15), particle(0.05, 100.0, -0.15)],
    );

    strip.step(0.0);

    assert!((strip.particles[0].x - 0.05).abs() < 1e-3);
    assert!((strip.particles[1].x - 49.9).abs() < 1e-3);
    assert_eq!(strip.particles[0].y, 100.0);
}

#[test]
fn still_page_draws_plain_dots() {
    let strip = strip_with(Side::Left, vec![particle(10.0, 10.0, 0.0)]);

    let frame = strip.frame(0.0);

    assert!(frame.wash().is_none());
    assert_eq!(frame.halos().count(), 0);
    match frame.dots().next() {
        Some(Shape::Dot { alpha, .. }) => assert!((alpha - 0.5 * 0.6).abs() < 1e-6),
        other => panic!("expected a dot, got {:?}", other),
    };
}

#[test]
fn fast_scrolling_glows_at_full_strength() {
    let settings = AuraSettings::default();
    let strip = strip_with(Side::Left, vec![particle(10.0, 10.0, 0.0); 3]);

    let frame = strip.frame(80.0);

    assert_eq!(frame.dots().count(), 3);
    assert_eq!(frame.halos().count(), 3);
    for dot in frame.dots() {
        if let Shape::Dot { alpha, .. } = dot {
            assert!((alpha - 0.5).abs() < 1e-6);
        }
    }
    for halo in frame.halos() {
        if let Shape::Halo { radius, .. } = halo {
            assert_eq!(*radius, settings.halo_scale);
        }
    }
    assert_eq!(
        frame.wash(),
        Some(&Shape::Wash {
            opaque_x: 0.0,
            clear_x: settings.canvas_width,
            alpha: settings.wash_opacity,
        })
    );
}

#[test]
fn wash_faces_the_outer_edge() {
    let settings = AuraSettings::default();
    let strip = strip_with(Side::Right, vec![]);

    match strip.frame(-25.0).wash() {
        Some(Shape::Wash {
            opaque_x,
            clear_x,
            alpha,
        }) => {
            assert_eq!(*opaque_x, settings.canvas_width);
            assert_eq!(*clear_x, 0.0);
            assert!((alpha - settings.wash_opacity * 0.5).abs() < 1e-6);
        }
        other => panic!("expected a wash, got {:?}", other),
    }
}

#[test]
fn halos_only_above_threshold() {
    let strip = strip_with(Side::Left, vec![particle(10.0, 10.0, 0.0)]);

    // 10 / 50 is exactly the threshold, which isn't above it.
    assert_eq!(strip.frame(10.0).halos().count(), 0);
    assert_eq!(strip.frame(11.0).halos().count(), 1);
}

#[test]
fn strength_is_clamped() {
    let strip = strip_with(Side::Left, vec![]);
    assert_eq!(strip.strength(-200.0), 1.0);
    assert_eq!(strip.strength(25.0), 0.5);
    assert_eq!(strip.strength(0.0), 0.0);
}

#[test]
fn tick_stops_glowing_once_scrolling_settles() {
    let mut aura = Aura::new(AuraSettings::default(), 0.0, HEIGHT, &mut rng()).unwrap();

    aura.on_scroll(100.0, 0.0);
    let [left, right] = aura.tick(16.0);
    assert!(left.wash().is_some());
    assert!(right.wash().is_some());

    let [left, _] = aura.tick(200.0);
    assert!(left.wash().is_none());
    assert_eq!(aura.velocity.velocity(), 0.0);
}

#[test]
fn resize_pulls_particles_into_new_bounds() {
    let mut aura = Aura::new(AuraSettings::default(), 0.0, HEIGHT, &mut rng()).unwrap();

    aura.resize(300.0);

    for side in [Side::Left, Side::Right] {
        let strip = aura.strip(side);
        assert_eq!(strip.height, 300.0);
        assert!(strip.particles.iter().all(|p| p.y >= 0.0 && p.y <= 300.0));
    }
}

#[test]
fn invalid_settings_are_refused_instead_of_sampled() {
    for settings in [
        AuraSettings {
            lane_width: 0.0,
            ..AuraSettings::default()
        },
        AuraSettings {
            lane_width: f32::NAN,
            ..AuraSettings::default()
        },
        AuraSettings {
            opacity: scroll_aura::settings::Span::new(0.9, 0.1),
            ..AuraSettings::default()
        },
    ] {
        assert!(matches!(
            Aura::new(settings, 0.0, HEIGHT, &mut rng()),
            Err(Error::InvalidSetting { .. })
        ));
    }
}
