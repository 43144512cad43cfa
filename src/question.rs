use rand::seq::SliceRandom;
use rand::Rng;

/// Sampled distractor attempts before falling back to a deterministic fill
const MAX_SAMPLE_ATTEMPTS: usize = 100;

/// The six operation kinds a question can be built from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    TwoStep,
}

pub const ALL_KINDS: [OpKind; 6] = [
    OpKind::Add,
    OpKind::Sub,
    OpKind::Mul,
    OpKind::Div,
    OpKind::Pow,
    OpKind::TwoStep,
];

/// One quiz question: prompt text, the correct answer, and four shuffled
/// options exactly one of which equals the answer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    pub answer: i32,
    pub options: [i32; 4],
}

impl Question {
    /// Generate a question with a random operation kind
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with(rng: &mut impl Rng) -> Self {
        let kind = *ALL_KINDS.choose(rng).unwrap_or(&OpKind::Add);
        Self::generate_kind(kind, rng)
    }

    /// Generate a question of a specific kind
    pub fn generate_kind(kind: OpKind, rng: &mut impl Rng) -> Self {
        let (prompt, answer) = match kind {
            OpKind::Add => {
                let a = rng.gen_range(50..200);
                let b = rng.gen_range(50..200);
                (format!("{} + {} = ?", a, b), a + b)
            }
            OpKind::Sub => {
                // subtrahend stays below the minuend minimum so the
                // answer is always strictly positive
                let a = rng.gen_range(100..300);
                let b = rng.gen_range(25..100);
                (format!("{} - {} = ?", a, b), a - b)
            }
            OpKind::Mul => {
                let a = rng.gen_range(5..30);
                let b = rng.gen_range(3..18);
                (format!("{} × {} = ?", a, b), a * b)
            }
            OpKind::Div => {
                // dividend is built from the quotient, so it always divides
                let quotient = rng.gen_range(5..25);
                let divisor = rng.gen_range(2..10);
                (format!("{} ÷ {} = ?", quotient * divisor, divisor), quotient)
            }
            OpKind::Pow => {
                let base: i32 = rng.gen_range(2..10);
                let exp = rng.gen_range(2..4);
                let glyph = if exp == 2 { "²" } else { "³" };
                (format!("{}{} = ?", base, glyph), base.pow(exp))
            }
            OpKind::TwoStep => {
                let a = rng.gen_range(2..12);
                let b = rng.gen_range(2..12);
                let c = rng.gen_range(1..6);
                (format!("({} + {}) × {} = ?", a, b, c), (a + b) * c)
            }
        };

        let wrong = distractors(kind, answer, rng);
        let mut options = [answer, wrong[0], wrong[1], wrong[2]];
        options.shuffle(rng);

        Self {
            prompt,
            answer,
            options,
        }
    }
}

/// Synthesize three wrong answers: strictly positive, distinct from the
/// answer and from each other. Rejection sampling with a bounded attempt
/// count; past the bound, a widening fill keeps the loop finite.
fn distractors(kind: OpKind, answer: i32, rng: &mut impl Rng) -> [i32; 3] {
    let mut wrong: Vec<i32> = Vec::with_capacity(3);
    let mut attempts = 0;

    while wrong.len() < 3 {
        let candidate = if attempts < MAX_SAMPLE_ATTEMPTS {
            attempts += 1;
            sample_candidate(kind, answer, rng)
        } else {
            fallback_candidate(answer, &wrong)
        };

        if candidate > 0 && candidate != answer && !wrong.contains(&candidate) {
            wrong.push(candidate);
        }
    }

    [wrong[0], wrong[1], wrong[2]]
}

fn sample_candidate(kind: OpKind, answer: i32, rng: &mut impl Rng) -> i32 {
    match kind {
        OpKind::Pow | OpKind::TwoStep => offset_candidate(answer, 0.3, 10, rng),
        OpKind::Div => {
            // common-mistake values: off by one, dividend misread, halved
            let mistakes = [answer + 1, answer - 1, answer * 3 / 2, answer / 2];
            *mistakes.choose(rng).unwrap_or(&(answer + 1))
        }
        OpKind::Add | OpKind::Sub | OpKind::Mul => offset_candidate(answer, 0.4, 15, rng),
    }
}

/// answer ± offset, offset magnitude at least `min_spread`
fn offset_candidate(answer: i32, variance: f64, min_spread: i32, rng: &mut impl Rng) -> i32 {
    let spread = ((answer as f64 * variance) as i32).max(min_spread);
    answer + rng.gen_range(-spread..spread)
}

/// Deterministic escape hatch once sampling has run dry: walk away from the
/// answer one step at a time until a free slot is found
fn fallback_candidate(answer: i32, taken: &[i32]) -> i32 {
    let mut step = 1;
    loop {
        let candidate = answer + step;
        if !taken.contains(&candidate) {
            return candidate;
        }
        step += 1;
    }
}
