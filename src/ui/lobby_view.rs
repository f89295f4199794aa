use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::session::{Session, MAX_PLAYERS, MIN_PLAYERS};

pub fn render(
    frame: &mut Frame,
    session: &Session,
    name_input: &str,
    selected: usize,
    message: &Option<String>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Name input
            Constraint::Min(8),    // Roster
            Constraint::Length(3), // Message
            Constraint::Length(4), // Controls
        ])
        .split(frame.area());

    render_header(frame, session, chunks[0]);
    render_input(frame, name_input, chunks[1]);
    render_roster(frame, session, selected, chunks[2]);
    render_message(frame, message, chunks[3]);
    render_controls(frame, session, chunks[4]);
}

fn render_header(frame: &mut Frame, session: &Session, area: Rect) {
    let header = Paragraph::new(format!(
        "Gather the table — {} of {} seats taken",
        session.players.len(),
        MAX_PLAYERS
    ))
    .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Rommé Lobby"));

    frame.render_widget(header, area);
}

fn render_input(frame: &mut Frame, name_input: &str, area: Rect) {
    let input = Paragraph::new(format!("{name_input}▌"))
        .block(Block::default().borders(Borders::ALL).title("New player"));
    frame.render_widget(input, area);
}

fn render_roster(frame: &mut Frame, session: &Session, selected: usize, area: Rect) {
    let mut lines = Vec::new();

    if session.players.is_empty() {
        lines.push(Line::from(Span::styled(
            "No players yet — type a name and press Enter",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (i, player) in session.players.iter().enumerate() {
        let suit_style = if player.suit.is_red() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::White)
        };
        let row_style = if i == selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {}. ", i + 1), row_style),
            Span::styled(format!("{} ", player.suit.symbol()), suit_style.patch(row_style)),
            Span::styled(player.name.clone(), row_style),
        ]));
    }

    let roster = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Players"));
    frame.render_widget(roster, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: Rect) {
    let text = message.as_deref().unwrap_or("");
    let widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, session: &Session, area: Rect) {
    let line1 = Line::from("Type a name + Enter: Add  |  ↑/↓: Select  |  Del: Remove  |  Esc: Quit");
    let line2 = if session.players.len() < MIN_PLAYERS {
        Line::from(Span::styled(
            format!("Press Enter with an empty name to deal in (needs {MIN_PLAYERS}+ players)"),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            "Press Enter with an empty name to start the game",
            Style::default().fg(Color::Green),
        ))
    };

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    frame.render_widget(controls, area);
}
