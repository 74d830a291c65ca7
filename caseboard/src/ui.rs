//! UI rendering for the board TUI.

use caseboard_core::format::{display_or_dash, format_relative_time, format_short_date, truncate};
use caseboard_core::{Attention, AttentionFilter, Bucket, ClassifiedCase};
use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, InputMode};

// ========== Bucket Colors ==========

const OVERDUE_RED: Color = Color::Rgb(230, 70, 70);
const TODAY_ORANGE: Color = Color::Rgb(255, 150, 40);
const WEEK_YELLOW: Color = Color::Rgb(230, 200, 60);
const NEXT_BLUE: Color = Color::Rgb(90, 160, 230);
const LATER_GREEN: Color = Color::Rgb(100, 180, 100);
const NODUE_GRAY: Color = Color::Rgb(128, 128, 128);

// ========== Chrome ==========

/// Border color for the board table
const BORDER_BOARD: Color = Color::Rgb(0, 150, 150);
/// Border color for the selected case panel
const BORDER_DETAIL: Color = Color::Rgb(180, 100, 180);
/// Label color for metadata attributes
const LABEL_COLOR: Color = Color::Rgb(100, 180, 180);
/// Marker color for top-priority cases
const PRIORITY_GOLD: Color = Color::Rgb(255, 215, 0);

fn bucket_color(bucket: Bucket) -> Color {
    match bucket {
        Bucket::Overdue => OVERDUE_RED,
        Bucket::Today => TODAY_ORANGE,
        Bucket::Week => WEEK_YELLOW,
        Bucket::Next => NEXT_BLUE,
        Bucket::Later => LATER_GREEN,
        Bucket::NoDue => NODUE_GRAY,
    }
}

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let detail_height = if app.state.selected().is_some() { 5 } else { 0 };

    // Layout: summary tiles, board, selected case, footer
    let chunks = Layout::vertical([
        Constraint::Length(3),             // Summary tiles
        Constraint::Min(5),                // Board
        Constraint::Length(detail_height), // Selected case
        Constraint::Length(1),             // Footer
    ])
    .split(area);

    render_summary(frame, app, chunks[0]);
    render_board(frame, app, chunks[1]);
    if let Some(selected) = app.state.selected() {
        render_detail(frame, selected, chunks[2]);
    }
    render_footer(frame, app, chunks[3]);
}

/// Render the four count tiles across the top.
fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary = app.state.summary();
    let tiles = [
        ("Overdue", summary.overdue_count, OVERDUE_RED),
        ("Due Today", summary.today_count, TODAY_ORANGE),
        ("This Week", summary.week_count, WEEK_YELLOW),
        ("Total", summary.total_count, Color::White),
    ];

    let columns = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);

    for ((title, count, color), column) in tiles.into_iter().zip(columns.iter()) {
        let tile = Paragraph::new(Line::from(vec![Span::styled(
            count.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", title)),
        );
        frame.render_widget(tile, *column);
    }
}

/// Render the current page, with a header row wherever the bucket changes.
fn render_board(frame: &mut Frame, app: &App, area: Rect) {
    let mut title = String::from(" Deadlines ");
    if app.state.filter().is_active() {
        title = format!(" Deadlines · filtered: {} ", filter_description(app));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_BOARD))
        .title(title);

    let page = app.state.current_page();
    if page.is_empty() {
        let message = if !app.state.has_loaded() && app.state.last_error().is_some() {
            "Unable to load cases"
        } else if !app.state.has_loaded() {
            "Loading…"
        } else if app.state.filter().is_active() {
            "No cases match the current filter"
        } else {
            "No cases"
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header_cells = [
        "Due", "Client", "Case", "Type", "Stage", "Para", "Focus", "",
    ]
    .into_iter()
    .map(|h| {
        Cell::from(h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells).height(1);

    let selected_id = app.state.selected_id();
    let mut rows = Vec::with_capacity(page.len() + 6);
    let mut current_bucket = None;

    for item in page {
        let bucket = item.urgency.bucket;
        if current_bucket != Some(bucket) {
            current_bucket = Some(bucket);
            rows.push(bucket_header_row(app, bucket));
        }
        let is_selected = selected_id == Some(item.case.id.as_str());
        rows.push(case_row(item, is_selected));
    }

    let widths = [
        Constraint::Length(17), // Due pill
        Constraint::Fill(2),    // Client
        Constraint::Fill(3),    // Case
        Constraint::Length(10), // Type
        Constraint::Length(12), // Stage
        Constraint::Length(5),  // Paralegal
        Constraint::Fill(3),    // Focus
        Constraint::Length(6),  // Markers
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn bucket_header_row(app: &App, bucket: Bucket) -> Row<'static> {
    // Count over the whole bucket, not just the rows on this page
    let count = app
        .state
        .groups()
        .iter()
        .find(|g| g.bucket == bucket)
        .map_or(0, |g| g.count());

    Row::new([Cell::from(Line::from(vec![
        Span::styled(
            format!("▌{}", bucket.title()),
            Style::default()
                .fg(bucket_color(bucket))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" ({})", count), Style::default().fg(NODUE_GRAY)),
    ]))])
}

fn case_row(item: &ClassifiedCase, is_selected: bool) -> Row<'static> {
    let case = &item.case;
    let color = bucket_color(item.urgency.bucket);

    let pill = Cell::from(Span::styled(
        format!(" {} ", item.urgency.label),
        Style::default().fg(Color::Black).bg(color),
    ));

    let client = display_or_dash(case.client_name.as_deref()).to_string();
    let case_name = display_or_dash(case.case_name.as_deref()).to_string();
    let focus = truncate(display_or_dash(case.current_focus.as_deref()), 60);

    let mut row = Row::new([
        pill,
        Cell::from(client).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(case_name),
        Cell::from(display_or_dash(case.case_type.as_deref()).to_string()),
        Cell::from(display_or_dash(case.stage.as_deref()).to_string()),
        Cell::from(display_or_dash(case.paralegal.as_deref()).to_string()),
        Cell::from(focus).style(Style::default().fg(Color::Gray)),
        Cell::from(markers(item)),
    ]);

    if is_selected {
        row = row.style(
            Style::default()
                .add_modifier(Modifier::REVERSED)
                .fg(Color::Cyan),
        );
    }
    row
}

/// Attention, priority and unreviewed-task markers.
fn markers(item: &ClassifiedCase) -> Line<'static> {
    let case = &item.case;
    let mut spans = Vec::new();

    match case.attention {
        Attention::NeedsAttention => {
            spans.push(Span::styled(
                "!",
                Style::default()
                    .fg(OVERDUE_RED)
                    .add_modifier(Modifier::BOLD),
            ))
        }
        Attention::Waiting => spans.push(Span::styled("…", Style::default().fg(NEXT_BLUE))),
        Attention::None => spans.push(Span::raw(" ")),
    }
    if case.top_priority {
        spans.push(Span::styled("★", Style::default().fg(PRIORITY_GOLD)));
    }
    if case.has_unreviewed_tasks() {
        spans.push(Span::styled(
            format!("✉{}", case.unreviewed_task_count),
            Style::default().fg(TODAY_ORANGE),
        ));
    }
    Line::from(spans)
}

/// Render the selected case's extra fields.
fn render_detail(frame: &mut Frame, item: &ClassifiedCase, area: Rect) {
    let case = &item.case;
    let label = |text: &'static str| Span::styled(text, Style::default().fg(LABEL_COLOR));

    let lines = vec![
        Line::from(vec![
            label("Case #: "),
            Span::raw(display_or_dash(case.case_number.as_deref()).to_string()),
            Span::raw("   "),
            label("County: "),
            Span::raw(display_or_dash(case.county.as_deref()).to_string()),
            Span::raw("   "),
            label("Status: "),
            Span::raw(display_or_dash(case.status.as_deref()).to_string()),
        ]),
        Line::from(vec![
            label("Next due: "),
            Span::raw(format_short_date(item.urgency.due_date)),
            Span::raw("   "),
            label("Attention: "),
            Span::raw(display_or_dash(Some(case.attention.display_name())).to_string()),
            Span::raw("   "),
            label("Unreviewed tasks: "),
            Span::raw(case.unreviewed_task_count.to_string()),
        ]),
        Line::from(vec![
            label("Focus: "),
            Span::raw(display_or_dash(case.current_focus.as_deref()).to_string()),
        ]),
    ];

    let title = format!(" {} ", display_or_dash(case.client_name.as_deref()));
    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_DETAIL))
            .title(title),
    );
    frame.render_widget(panel, area);
}

fn filter_description(app: &App) -> String {
    let filter = app.state.filter();
    let mut parts = Vec::new();
    if !filter.search.trim().is_empty() {
        parts.push(format!("\"{}\"", filter.search.trim()));
    }
    if filter.attention != AttentionFilter::All {
        parts.push(filter.attention.label().to_string());
    }
    parts.join(", ")
}

/// Render the footer: search prompt or key hints, page position, refresh
/// age and the last error.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    if app.input_mode == InputMode::Search {
        let prompt = Line::from(vec![
            Span::styled(" /", Style::default().fg(Color::Yellow)),
            Span::raw(app.search_input.clone()),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
            Span::styled("  Enter/Esc done", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(prompt), area);
        return;
    }

    let page_count = app.state.page_count();
    let page_number = if page_count == 0 {
        0
    } else {
        app.state.page_index() + 1
    };

    let mut spans = vec![
        Span::styled(" n/p", Style::default().fg(Color::Yellow)),
        Span::raw(" page  "),
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(" search  "),
        Span::styled("a", Style::default().fg(Color::Yellow)),
        Span::raw(format!(" {}  ", app.state.filter().attention.label())),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" reload  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit  "),
        Span::raw("│ "),
        Span::styled(
            format!("page {}/{}", page_number, page_count),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if let Some(loaded_at) = app.state.loaded_at() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("updated {}", format_relative_time(loaded_at, Utc::now())),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if app.is_paused() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("paused", Style::default().fg(Color::Yellow)));
    }

    if let Some(error) = app.state.last_error() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("⚠ {}", truncate(error, 80)),
            Style::default().fg(OVERDUE_RED),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
