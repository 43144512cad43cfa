use rand::seq::SliceRandom;
use rand::Rng;
use std::time::SystemTime;

/// Glyphs the confetti is made of
const GLYPHS: [char; 8] = ['+', '×', '÷', '=', '²', '³', '✓', '★'];

const PARTICLE_COUNT: usize = 40;
const GRAVITY: f64 = 12.0;
const DURATION_SECS: f64 = 3.0;

/// One piece of confetti
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub glyph: char,
    pub color_index: usize,
    pub age: f64,
    pub lifetime: f64,
    vel_x: f64,
    vel_y: f64,
}

impl Particle {
    fn spawn(x: f64, y: f64, rng: &mut impl Rng) -> Self {
        Self {
            x,
            y,
            glyph: *GLYPHS.choose(rng).unwrap_or(&'★'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            lifetime: rng.gen_range(2.0..4.0),
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-5.0..-1.0),
        }
    }

    /// Advance by `dt` seconds; false once the particle has burnt out
    fn step(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.age += dt;
        self.age < self.lifetime
    }

    /// How faded the particle should render, 1.0 fresh down to 0.0
    pub fn brightness(&self) -> f64 {
        (1.0 - self.age / self.lifetime).max(0.0)
    }
}

/// Confetti burst shown over the results screen after a perfect run
#[derive(Debug)]
pub struct Celebration {
    pub particles: Vec<Particle>,
    pub is_active: bool,
    started_at: SystemTime,
    bounds: (f64, f64),
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            is_active: false,
            started_at: SystemTime::now(),
            bounds: (80.0, 24.0),
        }
    }

    /// Burst from the middle of the screen
    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.started_at = SystemTime::now();
        self.is_active = true;
        self.bounds = (width as f64, height as f64);

        let center_x = width as f64 / 2.0;
        let center_y = height as f64 / 2.0;
        for _ in 0..PARTICLE_COUNT {
            let x = center_x + rng.gen_range(-12.0..12.0);
            let y = center_y + rng.gen_range(-6.0..6.0);
            self.particles.push(Particle::spawn(x, y, &mut rng));
        }
    }

    /// Advance the animation one runtime tick; deactivates after the
    /// duration or once every particle has left the screen
    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }

        let elapsed = self.started_at.elapsed().unwrap_or_default().as_secs_f64();
        if elapsed >= DURATION_SECS {
            self.is_active = false;
            self.particles.clear();
            return;
        }

        let (width, height) = self.bounds;
        let dt = 0.1;
        self.particles
            .retain_mut(|p| p.step(dt) && p.y < height + 3.0 && p.x > -3.0 && p.x < width + 3.0);

        if self.particles.is_empty() {
            self.is_active = false;
        }
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}
