use crate::ui::app::{format_last_run, App, InputMode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

pub fn render(frame: &mut Frame, app: &App) {
    // Main layout: Header + Table + Footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Table
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let header_text = vec![Line::from(vec![
        Span::styled(
            "  App Census  ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "{} apps, {} from the Start Menu",
                app.entries.len(),
                app.known_count()
            ),
            Style::default().fg(Color::Gray),
        ),
    ])];

    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(header, area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.visible_entries();

    let rows: Vec<Row> = visible
        .iter()
        .map(|entry| {
            let (source, source_style) = if entry.is_known_shortcut {
                ("Yes", Style::default().fg(Color::Green))
            } else {
                ("No", Style::default().fg(Color::DarkGray))
            };
            Row::new(vec![
                Cell::from(entry.name.as_str()),
                Cell::from(entry.count.to_string()),
                Cell::from(source).style(source_style),
                Cell::from(format_last_run(entry.last_run)),
            ])
        })
        .collect();

    let header = Row::new(vec!["App Name", "Usage Count", "From Start Menu?", "Last Run"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut title = String::from("Applications");
    if app.known_only {
        title.push_str(" [Start Menu only]");
    }
    if !app.search_query.is_empty() {
        title.push_str(&format!(" [/{}]", app.search_query));
    }

    let table = Table::new(
        rows,
        [
            Constraint::Min(30),
            Constraint::Length(12),
            Constraint::Length(17),
            Constraint::Length(17),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan)),
    )
    .row_highlight_style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    if !visible.is_empty() {
        state.select(Some(app.selected_index));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = match app.mode {
        InputMode::Search => Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(app.search_query.as_str()),
            Span::styled("_", Style::default().fg(Color::Gray)),
        ]),
        InputMode::Export => Line::from(vec![
            Span::styled(
                "Save Start Menu apps to: ",
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(app.export_path.as_str()),
            Span::styled("_  (Enter save, Esc cancel)", Style::default().fg(Color::Gray)),
        ]),
        InputMode::Normal => match &app.status {
            Some(status) => Line::from(Span::styled(
                status.as_str(),
                Style::default().fg(Color::Green),
            )),
            None => Line::from(Span::styled(
                "q quit | j/k move | / search | f Start Menu only | s save as txt",
                Style::default().fg(Color::Gray),
            )),
        },
    };

    frame.render_widget(Paragraph::new(line), area);
}
