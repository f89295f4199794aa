use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::session::{view, Player, Session};

pub fn render(frame: &mut Frame, session: &Session, message: &Option<String>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(9),    // Player cards
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, session, chunks[0]);
    render_cards(frame, session, chunks[1]);
    render_message(frame, message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, session: &Session, area: Rect) {
    let status = match view::dealer(session) {
        Some(dealer) => format!(
            "Round {}  |  {} deals",
            session.round_count() + 1,
            dealer.name
        ),
        None => format!("Round {}", session.round_count() + 1),
    };

    let header = Paragraph::new(status)
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Rommé"));
    frame.render_widget(header, area);
}

fn render_cards(frame: &mut Frame, session: &Session, area: Rect) {
    if session.players.is_empty() {
        return;
    }

    let leaders = view::leaders(session);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, session.players.len() as u32);
            session.players.len()
        ])
        .split(area);

    for (i, player) in session.players.iter().enumerate() {
        let is_dealer = i == session.dealer_index;
        let is_leader = leaders.contains(&player.id);
        render_card(frame, player, is_dealer, is_leader, columns[i]);
    }
}

fn render_card(frame: &mut Frame, player: &Player, is_dealer: bool, is_leader: bool, area: Rect) {
    let suit_style = if player.suit.is_red() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    };

    let mut title = vec![Span::raw(format!(" {} ", player.name))];
    if is_dealer {
        title.push(Span::styled(
            "[D] ",
            Style::default().fg(Color::Black).bg(Color::White),
        ));
    }
    if is_leader {
        title.push(Span::styled("♛ ", Style::default().fg(Color::Yellow)));
    }

    let border_style = if is_leader {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let last = match player.last_score() {
        Some(score) => {
            let style = if score == 0 {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Span::styled(score.to_string(), style)
        }
        None => Span::styled("-", Style::default().fg(Color::DarkGray)),
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("{} {}", player.rank(), player.suit.symbol()),
            suit_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            player.total_score.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Wins ", Style::default().fg(Color::DarkGray)),
            Span::raw(player.wins.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Last ", Style::default().fg(Color::DarkGray)),
            last,
        ]),
    ];

    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Line::from(title)),
        );
    frame.render_widget(card, area);
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
    let controls = Paragraph::new("N: Record round  |  H: Score sheet  |  R: Reset  |  Q: Quit")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    frame.render_widget(controls, area);
}
