use std::collections::HashMap;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::entry::PRESET_SCORES;
use crate::session::{Player, PlayerId};

/// Editing state for the round entry form: one text buffer per player,
/// keypad-style editing on the active one.
#[derive(Debug, Default)]
pub struct EntryForm {
    ids: Vec<PlayerId>,
    buffers: HashMap<PlayerId, String>,
    active: usize,
}

impl EntryForm {
    /// Fresh form for the given roster, every buffer starting at "0".
    pub fn open(players: &[Player]) -> Self {
        EntryForm {
            ids: players.iter().map(|p| p.id).collect(),
            buffers: players.iter().map(|p| (p.id, "0".to_string())).collect(),
            active: 0,
        }
    }

    pub fn buffers(&self) -> &HashMap<PlayerId, String> {
        &self.buffers
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn next_player(&mut self) {
        if !self.ids.is_empty() {
            self.active = (self.active + 1) % self.ids.len();
        }
    }

    pub fn prev_player(&mut self) {
        if !self.ids.is_empty() {
            self.active = (self.active + self.ids.len() - 1) % self.ids.len();
        }
    }

    fn active_buffer(&mut self) -> Option<&mut String> {
        let id = *self.ids.get(self.active)?;
        self.buffers.get_mut(&id)
    }

    /// Append a digit; a bare or negated "0" is replaced rather than
    /// extended, so typing never produces leading zeros.
    pub fn push_digit(&mut self, digit: char) {
        if !digit.is_ascii_digit() {
            return;
        }
        if let Some(buf) = self.active_buffer() {
            if buf.as_str() == "0" {
                *buf = digit.to_string();
            } else if buf.as_str() == "-0" {
                *buf = format!("-{digit}");
            } else {
                buf.push(digit);
            }
        }
    }

    pub fn toggle_sign(&mut self) {
        if let Some(buf) = self.active_buffer() {
            match buf.strip_prefix('-') {
                Some(rest) => *buf = rest.to_string(),
                None => *buf = format!("-{buf}"),
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(buf) = self.active_buffer() {
            buf.pop();
            if buf.is_empty() || buf.as_str() == "-" {
                *buf = "0".to_string();
            }
        }
    }

    pub fn clear_active(&mut self) {
        if let Some(buf) = self.active_buffer() {
            *buf = "0".to_string();
        }
    }

    pub fn set_preset(&mut self, value: i32) {
        if let Some(buf) = self.active_buffer() {
            *buf = value.to_string();
        }
    }
}

/// Render the round entry form as a centered overlay.
pub fn render(frame: &mut Frame, players: &[Player], form: &EntryForm, message: &Option<String>) {
    let area = centered_rect(frame.area(), 80, 60);
    frame.render_widget(Clear, area);

    let outer = Block::default().borders(Borders::ALL).title("Record Scores");
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Player score chips
            Constraint::Length(3), // Error banner
            Constraint::Min(4),    // Controls
        ])
        .split(inner);

    render_chips(frame, players, form, chunks[0]);
    render_banner(frame, message, chunks[1]);
    render_controls(frame, chunks[2]);
}

fn render_chips(frame: &mut Frame, players: &[Player], form: &EntryForm, area: Rect) {
    if players.is_empty() {
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, players.len() as u32); players.len()])
        .split(area);

    for (i, player) in players.iter().enumerate() {
        let is_active = i == form.active();
        let value = form
            .buffers
            .get(&player.id)
            .map(String::as_str)
            .unwrap_or("0");

        let border_style = if is_active {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let chip = Paragraph::new(vec![
            Line::from(Span::styled(
                value.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                player.name.clone(),
                Style::default().fg(Color::Gray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border_style));

        frame.render_widget(chip, columns[i]);
    }
}

fn render_banner(frame: &mut Frame, message: &Option<String>, area: Rect) {
    let text = message.as_deref().unwrap_or("");
    let banner = Paragraph::new(text)
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center);
    frame.render_widget(banner, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let presets = PRESET_SCORES
        .iter()
        .zip(["W", "J", "H"])
        .map(|((label, value), key)| format!("{key}: {label} ({value})"))
        .collect::<Vec<_>>()
        .join("  ");

    let lines = vec![
        Line::from("←/→/Tab: Player  |  0-9: Digits  |  -: Sign  |  Backspace: Erase  |  C: Clear"),
        Line::from(presets),
        Line::from("Enter: Submit round  |  Esc: Cancel"),
    ];

    let controls = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(controls, area);
}

/// Rect centered in `area`, sized as a percentage of it.
fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
