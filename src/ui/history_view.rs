use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::session::Session;

/// Full-screen score sheet: one column per player, most recent round on
/// top, running totals pinned to the bottom row.
pub fn render(frame: &mut Frame, session: &Session, selected: usize, message: &Option<String>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Sheet
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, session, chunks[0]);
    render_sheet(frame, session, selected, chunks[1]);
    render_message(frame, message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, session: &Session, area: Rect) {
    let header = Paragraph::new(format!("{} rounds recorded", session.round_count()))
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Score Sheet"));
    frame.render_widget(header, area);
}

fn render_sheet(frame: &mut Frame, session: &Session, selected: usize, area: Rect) {
    let rounds = session.round_count();

    let header = Row::new(
        std::iter::once(Cell::from("Round"))
            .chain(session.players.iter().map(|p| Cell::from(p.name.clone())))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    // Latest round first, like flipping back through a score pad.
    let mut rows = Vec::with_capacity(rounds + 1);
    for (display_row, round_index) in (0..rounds).rev().enumerate() {
        let mut cells = vec![Cell::from(format!("#{}", round_index + 1))];
        for player in &session.players {
            let score = player.scores[round_index];
            let cell = if score == 0 {
                Cell::from(score.to_string()).style(Style::default().fg(Color::Green))
            } else {
                Cell::from(score.to_string())
            };
            cells.push(cell);
        }

        let mut row = Row::new(cells);
        if display_row == selected {
            row = row.style(Style::default().add_modifier(Modifier::REVERSED));
        }
        rows.push(row);
    }

    rows.push(
        Row::new(
            std::iter::once(Cell::from("Total"))
                .chain(
                    session
                        .players
                        .iter()
                        .map(|p| Cell::from(p.total_score.to_string())),
                )
                .collect::<Vec<_>>(),
        )
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    );

    let mut widths = vec![Constraint::Length(7)];
    widths.extend(vec![Constraint::Min(8); session.players.len()]);

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: Rect) {
    let text = message.as_deref().unwrap_or("");
    let widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let controls = Paragraph::new("↑/↓: Select round  |  D: Delete round  |  Esc: Back")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    frame.render_widget(controls, area);
}
