pub mod charting;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, Gauge, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::quiz::{Outcome, Phase, Quiz, QUESTIONS_PER_QUIZ};
use crate::util;
use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.quiz.phase {
            Phase::NotStarted => render_welcome(area, buf),
            Phase::InProgress => render_question(&self.quiz, area, buf),
            Phase::Ended => render_results(self, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn render_welcome(area: Rect, buf: &mut Buffer) {
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let lines = vec![
        Line::from(Span::styled("matho", bold().fg(Color::Magenta))),
        Line::from(Span::styled("ten timed arithmetic questions", dim_style)),
        Line::from(""),
        Line::from("+  -  ×  ÷  powers  and two-step problems"),
        Line::from("15 seconds per question"),
        Line::from(Span::styled("correct: +100 and a time bonus", dim_style)),
        Line::from(Span::styled("wrong or out of time: -25", dim_style)),
        Line::from(""),
        Line::from(Span::styled("(s)tart / (esc)ape", italic_style)),
    ];

    let top_pad = (area.height.saturating_sub(lines.len() as u16)) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([Constraint::Length(top_pad), Constraint::Min(1)])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);
}

fn render_question(quiz: &Quiz, area: Rect, buf: &mut Buffer) {
    // nothing to show until the question set exists
    let Some(question) = quiz.current_question() else {
        return;
    };

    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let green_bold = bold().fg(Color::Green);
    let red_bold = bold().fg(Color::Red);

    let max_chars = area.width.saturating_sub(HORIZONTAL_MARGIN * 2) as usize;
    let question_lines = if question.prompt.width() <= max_chars {
        1
    } else {
        2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),              // score and timer
            Constraint::Length(1),              // progress gauge
            Constraint::Length(2),              // padding
            Constraint::Length(question_lines), // prompt
            Constraint::Length(2),              // reveal feedback
            Constraint::Length(4),              // options
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    Paragraph::new(Span::styled(format!("score {}", quiz.score), bold()))
        .alignment(Alignment::Left)
        .render(header_chunks[0], buf);

    let timer_style = if quiz.is_urgent() { red_bold } else { dim_style };
    Paragraph::new(Span::styled(
        format!("{:.0}s", quiz.seconds_remaining.ceil()),
        timer_style,
    ))
    .alignment(Alignment::Right)
    .render(header_chunks[1], buf);

    let progress = (quiz.index + 1) as f64 / quiz.questions.len().max(1) as f64;
    Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::DarkGray))
        .ratio(progress.clamp(0.0, 1.0))
        .label(Span::styled(
            format!("{}/{}", quiz.index + 1, quiz.questions.len()),
            bold(),
        ))
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(question.prompt.clone(), bold()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    if quiz.revealed {
        let feedback = match quiz.history.last() {
            Some(round) if round.outcome == Outcome::Correct => Line::from(Span::styled(
                format!("✓ correct  {}", util::fmt_signed(round.delta)),
                green_bold,
            )),
            Some(round) => Line::from(Span::styled(
                format!(
                    "✗ wrong, the answer was {}  {}",
                    question.answer,
                    util::fmt_signed(round.delta)
                ),
                red_bold,
            )),
            None => Line::from(""),
        };
        Paragraph::new(feedback)
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }

    let option_lines: Vec<Line> = question
        .options
        .iter()
        .enumerate()
        .map(|(slot, &option)| {
            let style = if !quiz.revealed {
                bold()
            } else if option == question.answer {
                green_bold
            } else if quiz.selected == Some(option) {
                red_bold
            } else {
                dim_style
            };
            Line::from(Span::styled(format!("({}) {}", slot + 1, option), style))
        })
        .collect();

    Paragraph::new(option_lines)
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

    Paragraph::new(Span::styled(
        "press 1-4 to answer / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[7], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let quiz = &app.quiz;
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // score progression chart
            Constraint::Length(1), // headline
            Constraint::Length(1), // per-question breakdown
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let points = quiz.score_progression();
    let ((x_min, x_max), (y_min, y_max)) = charting::score_chart_bounds(&points);

    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(magenta_style)
        .graph_type(GraphType::Line)
        .data(&points)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("question")
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::styled(charting::format_label(x_min), bold()),
                    Span::styled(charting::format_label(x_max), bold()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("score")
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(charting::format_label(y_min), bold()),
                    Span::styled(charting::format_label(y_max), bold()),
                ]),
        )
        .render(chunks[0], buf);

    let headline = if quiz.is_perfect() {
        Span::styled(
            format!("PERFECT RUN  ·  final score {}", quiz.score),
            bold().fg(Color::Magenta),
        )
    } else {
        Span::styled(
            format!(
                "final score {}  ·  {}/{} correct",
                quiz.score,
                quiz.correct_count(),
                QUESTIONS_PER_QUIZ
            ),
            bold(),
        )
    };
    Paragraph::new(headline)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let deltas = quiz.round_deltas();
    if let (Some(avg), Some(sd)) = (util::mean(&deltas), util::std_dev(&deltas)) {
        Paragraph::new(Span::styled(
            format!("{:.1} avg per question   {:.1} sd", avg, sd),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
    }

    Paragraph::new(Span::styled(
        "(r)estart / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);

    if app.celebration.is_active {
        render_celebration_particles(&app.celebration, area, buf);
    }
}

/// Paint confetti straight into the buffer on top of the results screen
fn render_celebration_particles(
    celebration: &crate::celebration::Celebration,
    area: Rect,
    buf: &mut Buffer,
) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = colors[particle.color_index % colors.len()];
        let style = match particle.brightness() {
            b if b > 0.7 => Style::default().fg(color).add_modifier(Modifier::BOLD),
            b if b > 0.3 => Style::default().fg(color),
            _ => Style::default().fg(color).add_modifier(Modifier::DIM),
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.glyph.to_string());
            cell.set_style(style);
        }
    }
}
