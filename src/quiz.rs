use crate::question::Question;
use crate::runtime::TICK_RATE_MS;

pub const QUESTIONS_PER_QUIZ: usize = 10;
pub const SECS_PER_QUESTION: f64 = 15.0;
pub const REVEAL_SECS: f64 = 2.0;
pub const POINTS_CORRECT: i32 = 100;
pub const POINTS_WRONG: i32 = -25;

/// Countdown readings this close to zero are treated as expired, so tick
/// drift can never strand the timer on a sliver of a second
const TIMER_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Ended,
}

/// How a round was resolved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Wrong,
    TimedOut,
}

/// Per-question scoring record, appended at the moment the round resolves
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Round {
    pub index: usize,
    pub outcome: Outcome,
    pub delta: i32,
    pub total: i32,
}

/// The quiz session: ten rounds, a countdown per question, and a running
/// score. All transitions go through `&mut self`; the countdown and the
/// reveal delay are plain fields advanced by `on_tick`, so a superseding
/// transition cancels a stale timer by resetting the field.
#[derive(Debug)]
pub struct Quiz {
    pub questions: Vec<Question>,
    pub index: usize,
    pub score: i32,
    pub seconds_remaining: f64,
    pub revealed: bool,
    pub selected: Option<i32>,
    pub phase: Phase,
    pub history: Vec<Round>,
    reveal_remaining: f64,
}

impl Quiz {
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
            index: 0,
            score: 0,
            seconds_remaining: SECS_PER_QUESTION,
            revealed: false,
            selected: None,
            phase: Phase::NotStarted,
            history: Vec::new(),
            reveal_remaining: 0.0,
        }
    }

    /// Begin a fresh session with a newly generated question set
    pub fn start(&mut self) {
        let questions = (0..QUESTIONS_PER_QUIZ).map(|_| Question::generate()).collect();
        self.start_with(questions);
    }

    /// Begin a fresh session with the given question set
    pub fn start_with(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.index = 0;
        self.score = 0;
        self.seconds_remaining = SECS_PER_QUESTION;
        self.revealed = false;
        self.selected = None;
        self.history.clear();
        self.reveal_remaining = 0.0;
        self.phase = Phase::InProgress;
    }

    /// Always permitted from Ended; a fresh set is generated either way
    pub fn restart(&mut self) {
        self.start();
    }

    /// Advance the live timer by one runtime tick. While a reveal is
    /// showing only the reveal delay runs; otherwise only the countdown
    /// does. Returns `Some(TimedOut)` when the countdown expires.
    pub fn on_tick(&mut self) -> Option<Outcome> {
        if self.phase != Phase::InProgress {
            return None;
        }

        let dt = TICK_RATE_MS as f64 / 1000.0;

        if self.revealed {
            self.reveal_remaining -= dt;
            if self.reveal_remaining <= TIMER_EPSILON {
                self.advance();
            }
            return None;
        }

        self.seconds_remaining -= dt;
        if self.seconds_remaining <= TIMER_EPSILON {
            // time up counts as selecting no answer: flat penalty, no reveal
            self.seconds_remaining = 0.0;
            self.record(Outcome::TimedOut, POINTS_WRONG);
            self.advance();
            return Some(Outcome::TimedOut);
        }

        None
    }

    /// Record an answer for the current question. No-op once the reveal is
    /// showing or the countdown has hit zero, so each question scores
    /// exactly once.
    pub fn select_answer(&mut self, option: i32) -> Option<Outcome> {
        if self.phase != Phase::InProgress || self.revealed {
            return None;
        }
        if self.seconds_remaining <= 0.0 {
            return None;
        }
        let answer = self.current_question()?.answer;

        self.selected = Some(option);
        self.revealed = true;
        self.reveal_remaining = REVEAL_SECS;

        let (outcome, delta) = if option == answer {
            (
                Outcome::Correct,
                POINTS_CORRECT + time_bonus(self.seconds_remaining),
            )
        } else {
            (Outcome::Wrong, POINTS_WRONG)
        };
        self.record(outcome, delta);
        Some(outcome)
    }

    /// Move to the next question, or end the session after the last one.
    /// Resets both timer fields, which is what cancels a pending reveal.
    pub fn advance(&mut self) {
        if self.phase != Phase::InProgress {
            return;
        }
        self.revealed = false;
        self.selected = None;
        self.reveal_remaining = 0.0;

        if self.index + 1 < self.questions.len() {
            self.index += 1;
            self.seconds_remaining = SECS_PER_QUESTION;
        } else {
            self.phase = Phase::Ended;
        }
    }

    fn record(&mut self, outcome: Outcome, delta: i32) {
        self.score += delta;
        self.history.push(Round {
            index: self.index,
            outcome,
            delta,
            total: self.score,
        });
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == Phase::InProgress {
            self.questions.get(self.index)
        } else {
            None
        }
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::NotStarted
    }

    pub fn has_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    /// The countdown is about to expire; the ui switches to urgent styling
    pub fn is_urgent(&self) -> bool {
        self.phase == Phase::InProgress && !self.revealed && self.seconds_remaining <= 5.0
    }

    pub fn correct_count(&self) -> usize {
        self.history
            .iter()
            .filter(|r| r.outcome == Outcome::Correct)
            .count()
    }

    /// Every question of a full session answered correctly
    pub fn is_perfect(&self) -> bool {
        self.history.len() == QUESTIONS_PER_QUIZ
            && self.correct_count() == QUESTIONS_PER_QUIZ
    }

    /// Running total after each resolved round, as chart points starting
    /// from (0, 0)
    pub fn score_progression(&self) -> Vec<(f64, f64)> {
        let mut points = vec![(0.0, 0.0)];
        points.extend(
            self.history
                .iter()
                .enumerate()
                .map(|(i, r)| ((i + 1) as f64, r.total as f64)),
        );
        points
    }

    pub fn round_deltas(&self) -> Vec<f64> {
        self.history.iter().map(|r| r.delta as f64).collect()
    }
}

impl Default for Quiz {
    fn default() -> Self {
        Self::new()
    }
}

/// Extra points for a correct answer, proportional to time left
pub fn time_bonus(seconds_remaining: f64) -> i32 {
    (seconds_remaining * 2.0).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_question(answer: i32) -> Question {
        Question {
            prompt: format!("{} + 0 = ?", answer),
            answer,
            options: [answer, answer + 1, answer + 2, answer + 3],
        }
    }

    fn fixed_set() -> Vec<Question> {
        (1..=10).map(|n| fixed_question(n * 7)).collect()
    }

    fn started_quiz() -> Quiz {
        let mut quiz = Quiz::new();
        quiz.start_with(fixed_set());
        quiz
    }

    /// Tick `secs` worth of runtime ticks, stopping early if the countdown
    /// expires, and return the expiry outcome if one fired
    fn tick_secs(quiz: &mut Quiz, secs: f64) -> Option<Outcome> {
        let ticks = (secs * 1000.0 / TICK_RATE_MS as f64).round() as usize;
        for _ in 0..ticks {
            if let Some(outcome) = quiz.on_tick() {
                return Some(outcome);
            }
        }
        None
    }

    #[test]
    fn test_new_quiz_is_not_started() {
        let quiz = Quiz::new();
        assert_eq!(quiz.phase, Phase::NotStarted);
        assert!(quiz.questions.is_empty());
        assert!(!quiz.has_started());
        assert!(quiz.current_question().is_none());
    }

    #[test]
    fn test_start_builds_a_full_session() {
        let mut quiz = Quiz::new();
        quiz.start();

        assert_eq!(quiz.phase, Phase::InProgress);
        assert_eq!(quiz.questions.len(), QUESTIONS_PER_QUIZ);
        assert_eq!(quiz.index, 0);
        assert_eq!(quiz.score, 0);
        assert_eq!(quiz.seconds_remaining, SECS_PER_QUESTION);
        assert!(!quiz.revealed);
        assert_eq!(quiz.selected, None);
        assert!(quiz.history.is_empty());
    }

    #[test]
    fn test_tick_decrements_the_countdown() {
        let mut quiz = started_quiz();
        quiz.on_tick();
        let expected = SECS_PER_QUESTION - TICK_RATE_MS as f64 / 1000.0;
        assert!((quiz.seconds_remaining - expected).abs() < 1e-6);
    }

    #[test]
    fn test_countdown_expiry_penalizes_and_advances() {
        let mut quiz = started_quiz();

        let outcome = tick_secs(&mut quiz, SECS_PER_QUESTION + 0.2);
        assert_eq!(outcome, Some(Outcome::TimedOut));
        assert_eq!(quiz.score, POINTS_WRONG);
        assert_eq!(quiz.index, 1);
        assert_eq!(quiz.seconds_remaining, SECS_PER_QUESTION);
        assert!(!quiz.revealed, "time up must not enter the reveal phase");
        assert_eq!(quiz.history.len(), 1);
        assert_eq!(quiz.history[0].outcome, Outcome::TimedOut);
    }

    #[test]
    fn test_correct_answer_scores_base_plus_time_bonus() {
        let mut quiz = started_quiz();
        quiz.seconds_remaining = 10.0;

        let answer = quiz.current_question().unwrap().answer;
        let outcome = quiz.select_answer(answer);

        assert_eq!(outcome, Some(Outcome::Correct));
        assert_eq!(quiz.score, 120);
        assert!(quiz.revealed);
        assert_eq!(quiz.selected, Some(answer));
    }

    #[test]
    fn test_wrong_answer_scores_flat_penalty() {
        let mut quiz = started_quiz();
        let answer = quiz.current_question().unwrap().answer;

        let outcome = quiz.select_answer(answer + 1);

        assert_eq!(outcome, Some(Outcome::Wrong));
        assert_eq!(quiz.score, POINTS_WRONG);
        assert!(quiz.revealed);
    }

    #[test]
    fn test_reselect_during_reveal_is_ignored() {
        let mut quiz = started_quiz();
        quiz.seconds_remaining = 10.0;
        let answer = quiz.current_question().unwrap().answer;

        quiz.select_answer(answer);
        let score_after_first = quiz.score;

        assert_eq!(quiz.select_answer(answer), None);
        assert_eq!(quiz.select_answer(answer + 1), None);
        assert_eq!(quiz.score, score_after_first);
        assert_eq!(quiz.history.len(), 1);
    }

    #[test]
    fn test_countdown_is_frozen_while_revealed() {
        let mut quiz = started_quiz();
        quiz.seconds_remaining = 8.0;
        let answer = quiz.current_question().unwrap().answer;
        quiz.select_answer(answer);

        let before = quiz.seconds_remaining;
        quiz.on_tick();
        assert_eq!(quiz.seconds_remaining, before);
    }

    #[test]
    fn test_reveal_delay_advances_after_two_seconds() {
        let mut quiz = started_quiz();
        let answer = quiz.current_question().unwrap().answer;
        quiz.select_answer(answer);
        assert!(quiz.revealed);

        tick_secs(&mut quiz, REVEAL_SECS);

        assert_eq!(quiz.index, 1);
        assert!(!quiz.revealed);
        assert_eq!(quiz.selected, None);
        assert_eq!(quiz.seconds_remaining, SECS_PER_QUESTION);
    }

    #[test]
    fn test_ten_advances_reach_ended_visiting_every_index() {
        let mut quiz = started_quiz();
        let mut visited = Vec::new();

        for _ in 0..QUESTIONS_PER_QUIZ {
            visited.push(quiz.index);
            let answer = quiz.current_question().unwrap().answer;
            quiz.select_answer(answer);
            quiz.advance();
        }

        assert_eq!(quiz.phase, Phase::Ended);
        assert_eq!(visited, (0..QUESTIONS_PER_QUIZ).collect::<Vec<_>>());
        assert_eq!(quiz.history.len(), QUESTIONS_PER_QUIZ);
    }

    #[test]
    fn test_last_question_advance_ends_regardless_of_reveal_delay() {
        let mut quiz = started_quiz();
        for _ in 0..QUESTIONS_PER_QUIZ - 1 {
            let answer = quiz.current_question().unwrap().answer;
            quiz.select_answer(answer);
            quiz.advance();
        }
        assert_eq!(quiz.index, QUESTIONS_PER_QUIZ - 1);

        let answer = quiz.current_question().unwrap().answer;
        quiz.select_answer(answer);
        // the 2s reveal delay has not elapsed; an explicit advance still ends
        quiz.advance();

        assert_eq!(quiz.phase, Phase::Ended);
        assert!(quiz.current_question().is_none());
    }

    #[test]
    fn test_stale_reveal_timer_cannot_leak_into_next_round() {
        let mut quiz = started_quiz();
        let answer = quiz.current_question().unwrap().answer;
        quiz.select_answer(answer);
        quiz.advance();

        // ticks right after an early advance run the fresh countdown, not
        // the remains of the old reveal delay
        quiz.on_tick();
        assert_eq!(quiz.index, 1);
        assert!(quiz.seconds_remaining < SECS_PER_QUESTION);
        assert!(!quiz.revealed);
    }

    #[test]
    fn test_restart_from_ended_yields_a_fresh_session() {
        let mut quiz = started_quiz();
        for _ in 0..QUESTIONS_PER_QUIZ {
            let answer = quiz.current_question().unwrap().answer;
            quiz.select_answer(answer);
            quiz.advance();
        }
        assert_eq!(quiz.phase, Phase::Ended);
        assert!(quiz.score > 0);

        quiz.restart();

        assert_eq!(quiz.phase, Phase::InProgress);
        assert_eq!(quiz.score, 0);
        assert_eq!(quiz.index, 0);
        assert_eq!(quiz.questions.len(), QUESTIONS_PER_QUIZ);
        assert!(quiz.history.is_empty());
        assert_eq!(quiz.seconds_remaining, SECS_PER_QUESTION);
    }

    #[test]
    fn test_select_is_ignored_before_start_and_after_end() {
        let mut quiz = Quiz::new();
        assert_eq!(quiz.select_answer(42), None);

        quiz.start_with(fixed_set());
        for _ in 0..QUESTIONS_PER_QUIZ {
            let answer = quiz.current_question().unwrap().answer;
            quiz.select_answer(answer);
            quiz.advance();
        }
        assert_eq!(quiz.phase, Phase::Ended);
        assert_eq!(quiz.select_answer(42), None);
        assert_eq!(quiz.on_tick(), None);
    }

    #[test]
    fn test_score_can_go_negative() {
        let mut quiz = started_quiz();
        for _ in 0..3 {
            let answer = quiz.current_question().unwrap().answer;
            quiz.select_answer(answer + 1);
            quiz.advance();
        }
        assert_eq!(quiz.score, 3 * POINTS_WRONG);
    }

    #[test]
    fn test_exactly_one_scoring_event_per_question() {
        let mut quiz = started_quiz();

        // answer half, time out the rest
        for round in 0..QUESTIONS_PER_QUIZ {
            if round % 2 == 0 {
                let answer = quiz.current_question().unwrap().answer;
                quiz.select_answer(answer);
                tick_secs(&mut quiz, REVEAL_SECS + 0.2);
            } else {
                tick_secs(&mut quiz, SECS_PER_QUESTION + 0.2);
            }
        }

        assert_eq!(quiz.phase, Phase::Ended);
        assert_eq!(quiz.history.len(), QUESTIONS_PER_QUIZ);
        for (i, round) in quiz.history.iter().enumerate() {
            assert_eq!(round.index, i);
        }
    }

    #[test]
    fn test_perfect_run_detection() {
        let mut quiz = started_quiz();
        for _ in 0..QUESTIONS_PER_QUIZ {
            let answer = quiz.current_question().unwrap().answer;
            quiz.select_answer(answer);
            quiz.advance();
        }
        assert!(quiz.is_perfect());
        assert_eq!(quiz.correct_count(), QUESTIONS_PER_QUIZ);

        let mut flawed = started_quiz();
        for round in 0..QUESTIONS_PER_QUIZ {
            let answer = flawed.current_question().unwrap().answer;
            let pick = if round == 4 { answer + 1 } else { answer };
            flawed.select_answer(pick);
            flawed.advance();
        }
        assert!(!flawed.is_perfect());
        assert_eq!(flawed.correct_count(), QUESTIONS_PER_QUIZ - 1);
    }

    #[test]
    fn test_time_bonus_floors_doubled_seconds() {
        assert_eq!(time_bonus(15.0), 30);
        assert_eq!(time_bonus(10.0), 20);
        assert_eq!(time_bonus(7.9), 15);
        assert_eq!(time_bonus(0.4), 0);
    }

    #[test]
    fn test_score_progression_tracks_running_total() {
        let mut quiz = started_quiz();
        quiz.seconds_remaining = 10.0;
        let answer = quiz.current_question().unwrap().answer;
        quiz.select_answer(answer);
        quiz.advance();
        let answer = quiz.current_question().unwrap().answer;
        quiz.select_answer(answer + 1);

        let points = quiz.score_progression();
        assert_eq!(points[0], (0.0, 0.0));
        assert_eq!(points[1], (1.0, 120.0));
        assert_eq!(points[2], (2.0, 95.0));
    }

    #[test]
    fn test_urgency_threshold() {
        let mut quiz = started_quiz();
        assert!(!quiz.is_urgent());
        quiz.seconds_remaining = 5.0;
        assert!(quiz.is_urgent());
        quiz.seconds_remaining = 4.2;
        assert!(quiz.is_urgent());
    }
}
