use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};

const SYMBOLS: [char; 7] = ['✨', '🎉', '⭐', '💫', '🌟', '🎁', '🎊'];
const GRAVITY: f64 = 12.0;
/// Longest step taken in one update
const MAX_DT: f64 = 0.25;

/// One piece of confetti
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl Particle {
    /// Shot upwards and outwards from `(x, y)`
    fn burst<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-6.0..6.0),
            vel_y: rng.gen_range(-8.0..-2.0),
            symbol: *SYMBOLS.choose(rng).unwrap_or(&'✨'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(1.5..3.0),
        }
    }

    /// Drifting down from above the top edge
    fn falling<R: Rng>(width: f64, rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..width.max(1.0)),
            y: rng.gen_range(-6.0..0.0),
            vel_x: rng.gen_range(-1.0..1.0),
            vel_y: rng.gen_range(1.0..4.0),
            symbol: *SYMBOLS.choose(rng).unwrap_or(&'✨'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(2.0..3.5),
        }
    }

    /// Advances by `dt` seconds; false once the particle has burned out
    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.age += dt;
        self.age < self.max_age
    }

    /// 1.0 when fresh, falling to 0.0 at end of life
    pub fn brightness(&self) -> f64 {
        (1.0 - self.age / self.max_age).clamp(0.0, 1.0)
    }
}

/// Confetti shown over the reveal screen
#[derive(Debug)]
pub struct Celebration {
    pub particles: Vec<Particle>,
    pub started_at: Option<Instant>,
    last_update: Option<Instant>,
    pub duration: Duration,
    pub width: f64,
    pub height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            started_at: None,
            last_update: None,
            duration: Duration::from_secs(3),
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn start(&mut self, width: u16, height: u16, now: Instant) {
        self.start_with(width, height, now, &mut rand::thread_rng());
    }

    pub fn start_with<R: Rng>(&mut self, width: u16, height: u16, now: Instant, rng: &mut R) {
        self.particles.clear();
        self.started_at = Some(now);
        self.last_update = Some(now);
        self.width = width as f64;
        self.height = height as f64;

        let center_x = self.width / 2.0;
        let center_y = self.height / 2.0;
        for _ in 0..30 {
            let x = center_x + rng.gen_range(-4.0..4.0);
            let y = center_y + rng.gen_range(-2.0..2.0);
            self.particles.push(Particle::burst(x, y, rng));
        }
        let falling = (width / 3).max(8);
        for _ in 0..falling {
            self.particles.push(Particle::falling(self.width, rng));
        }
    }

    pub fn stop(&mut self) {
        self.started_at = None;
        self.last_update = None;
        self.particles.clear();
    }

    /// Steps the animation by the time since the last update; ends it after `duration`
    pub fn update(&mut self, now: Instant) {
        let Some(started_at) = self.started_at else {
            return;
        };
        if now.saturating_duration_since(started_at) >= self.duration {
            self.stop();
            return;
        }

        let last = self.last_update.unwrap_or(started_at);
        let dt = now.saturating_duration_since(last).as_secs_f64().min(MAX_DT);
        self.last_update = Some(now);
        if dt == 0.0 {
            return;
        }

        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|particle| {
            let alive = particle.update(dt);
            let margin = 5.0;
            let off_screen =
                particle.y > height + margin || particle.x < -margin || particle.x > width + margin;
            alive && !off_screen
        });
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}
