//! Presentational pieces: a project card for the dashboard grid and a task
//! row for the project screen. Both take their data and draw it; neither
//! knows about the views that own the data.

use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use regex::Regex;

use crate::model::{Project, Task};
use crate::tui::theme::Theme;
use crate::util::unicode;

use super::push_highlighted_spans;

/// Rows a project card occupies, borders included
pub const CARD_HEIGHT: u16 = 5;

pub const NO_DESCRIPTION: &str = "No description provided.";

/// `████░░░░` sized to `width` cells
pub fn progress_bar_spans(
    theme: &Theme,
    project: &Project,
    width: usize,
    bg: Color,
) -> Vec<Span<'static>> {
    let pct = project.progress_display() as usize;
    let filled = (pct * width + 50) / 100;
    vec![
        Span::styled(
            "\u{2588}".repeat(filled),
            Style::default()
                .fg(theme.progress_color(project.is_complete()))
                .bg(bg),
        ),
        Span::styled(
            "\u{2591}".repeat(width - filled),
            Style::default().fg(theme.dim).bg(bg),
        ),
    ]
}

/// Draw one project card: title in the border, description (or the
/// placeholder), a progress bar with its percentage, and the task counts.
pub fn render_project_card(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    project: &Project,
    selected: bool,
    search_re: Option<&Regex>,
) {
    let bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let border = if selected {
        theme.selection_border
    } else {
        theme.dim
    };
    // Inset, borders, and one space of padding
    let inner_w = area.width.saturating_sub(4) as usize;

    let mut title_spans = vec![Span::styled(" ", Style::default().bg(bg))];
    push_highlighted_spans(
        &mut title_spans,
        &unicode::truncate_to_width(&project.title, inner_w),
        Style::default()
            .fg(theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
        Style::default()
            .fg(theme.search_match_fg)
            .bg(theme.search_match_bg),
        search_re,
    );
    title_spans.push(Span::styled(" ", Style::default().bg(bg)));

    let description = match project.description_text() {
        Some(d) => Span::styled(
            unicode::truncate_to_width(d, inner_w),
            Style::default().fg(theme.text).bg(bg),
        ),
        None => Span::styled(
            NO_DESCRIPTION,
            Style::default()
                .fg(theme.dim)
                .bg(bg)
                .add_modifier(Modifier::ITALIC),
        ),
    };

    let pct_label = format!(" {:>3}%", project.progress_display());
    let bar_w = inner_w.saturating_sub(pct_label.len());
    let mut bar = progress_bar_spans(theme, project, bar_w, bg);
    bar.push(Span::styled(
        pct_label,
        Style::default().fg(theme.text_bright).bg(bg),
    ));

    let counts = format!(
        "{} / {} tasks completed",
        project.completed_tasks, project.total_tasks
    );

    let lines = vec![
        Line::from(description),
        Line::from(bar),
        Line::from(Span::styled(counts, Style::default().fg(theme.dim).bg(bg))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(bg))
        .title(Line::from(title_spans))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, inset(area));
}

/// One column of air on each side so neighbouring cards don't touch
fn inset(area: Rect) -> Rect {
    if area.width <= 2 {
        return area;
    }
    Rect::new(area.x + 1, area.y, area.width - 2, area.height)
}

/// Lines for one task: checkbox, title, due date (with an overdue marker),
/// then the description indented underneath.
pub fn task_item_lines(
    theme: &Theme,
    task: &Task,
    today: NaiveDate,
    selected: bool,
    width: usize,
    search_re: Option<&Regex>,
) -> Vec<Line<'static>> {
    let bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let bg_style = Style::default().bg(bg);

    let (check, check_color) = if task.completed {
        ("[x]", theme.green)
    } else {
        ("[ ]", theme.text)
    };
    let title_style = if task.completed {
        Style::default()
            .fg(theme.dim)
            .bg(bg)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(theme.text_bright).bg(bg)
    };

    let cursor = if selected { "\u{258E}" } else { " " };
    let mut spans = vec![
        Span::styled(cursor, Style::default().fg(theme.selection_border).bg(bg)),
        Span::styled(check, Style::default().fg(check_color).bg(bg)),
        Span::styled(" ", bg_style),
    ];

    let due_text = task.due_date.map(|d| format!("due {}", d.format("%Y-%m-%d")));
    let overdue = task.is_overdue(today);
    let tail_w = due_text.as_ref().map_or(0, |d| d.len() + 2)
        + if overdue { " (Overdue)".len() } else { 0 };
    let title_w = width.saturating_sub(5 + tail_w).max(1);

    push_highlighted_spans(
        &mut spans,
        &unicode::truncate_to_width(&task.title, title_w),
        title_style,
        Style::default()
            .fg(theme.search_match_fg)
            .bg(theme.search_match_bg),
        search_re,
    );

    if let Some(due) = due_text {
        let used: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
        let pad = width.saturating_sub(used + tail_w).max(2);
        spans.push(Span::styled(" ".repeat(pad), bg_style));
        let due_color = if overdue { theme.red } else { theme.dim };
        spans.push(Span::styled(due, Style::default().fg(due_color).bg(bg)));
        if overdue {
            spans.push(Span::styled(
                " (Overdue)",
                Style::default()
                    .fg(theme.red)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ));
        }
    }
    pad_line(&mut spans, width, bg_style);

    let mut lines = vec![Line::from(spans)];
    if !task.description.is_empty() {
        let mut desc = vec![
            Span::styled(cursor, Style::default().fg(theme.selection_border).bg(bg)),
            Span::styled("    ", bg_style),
            Span::styled(
                unicode::truncate_to_width(&task.description, width.saturating_sub(5)),
                Style::default().fg(theme.dim).bg(bg),
            ),
        ];
        pad_line(&mut desc, width, bg_style);
        lines.push(Line::from(desc));
    }
    lines
}

/// Fill the rest of a row so the selection background spans the width
fn pad_line(spans: &mut Vec<Span<'static>>, width: usize, style: Style) {
    let used: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}
