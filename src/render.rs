//! Banana Tycoon rendering: stats bar, harvest panel, producer shop and
//! the win screen. Everything is drawn from a [`Snapshot`].

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratzilla::ratatui::Frame;

use banana_tycoon::economy::logic::format_number;
use banana_tycoon::Snapshot;

use crate::click::{is_narrow_layout, producer_key, ClickState};
use crate::widgets::ClickableList;

const BANANA_ART: &[&str] = &["    _  ", "   //\\ ", "  V  \\ ", "   \\  \\_", "    \\,'.`-.", "     `-.__)"];

pub fn render(snap: &Snapshot, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    render_stats(snap, f, chunks[0]);

    if is_narrow_layout(area.width) {
        let harvest_height = BANANA_ART.len() as u16 + 5;
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(harvest_height), Constraint::Min(4)])
            .split(chunks[1]);
        render_harvest(snap, f, body[0], cs);
        render_producers(snap, f, body[1], cs);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);
        render_harvest(snap, f, body[0], cs);
        render_producers(snap, f, body[1], cs);
    }

    render_help(f, chunks[2]);

    if snap.win_pending {
        render_win(snap, f, area, cs);
    }
}

fn render_stats(snap: &Snapshot, f: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!("🍌 {}", format_number(snap.state.currency)),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{}/s", format_number(snap.production_rate)),
            Style::default().fg(Color::Green),
        ),
        Span::raw("   "),
        Span::styled(
            format!("🐒 {}", snap.total_producer_count),
            Style::default().fg(Color::White),
        ),
    ];
    if snap.state.compound_multiplier > 1.0 {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("A-I ×{:.2}", snap.state.compound_multiplier),
            Style::default().fg(Color::Magenta),
        ));
    }

    let widget = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Banana Tycoon "),
        );
    f.render_widget(widget, area);
}

fn render_harvest(snap: &Snapshot, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let mut cl = ClickableList::new();
    let art_style = Style::default().fg(Color::Yellow);
    for row in BANANA_ART {
        cl.push_clickable(Line::from(Span::styled(*row, art_style)), 'h');
    }
    if snap.state.custom_artwork_ref.is_some() {
        cl.push(Line::from(Span::styled(
            "  (custom banana)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [H] ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(format!("Harvest +{}", format_number(snap.click_value))),
        ]),
        'h',
    );

    let upgrade_style = if snap.state.currency >= snap.next_upgrade_cost {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [U] ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(
                    "Bigger hands Lv{} → {}",
                    snap.state.click_upgrade_level + 1,
                    format_number(snap.next_upgrade_cost)
                ),
                upgrade_style,
            ),
        ]),
        'u',
    );

    cl.register_targets(area, cs, 1, 1);
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Harvest "),
    );
    f.render_widget(widget, area);
}

fn render_producers(snap: &Snapshot, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let mut cl = ClickableList::new();
    for (idx, p) in snap.producers.iter().enumerate() {
        let Some(key) = producer_key(idx) else {
            continue;
        };
        let style = if p.affordable {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut spans = vec![
            Span::styled(
                format!(" [{}] ", key),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{} {} ×{}", p.emoji, p.name, p.owned), style),
            Span::styled(format!("  {}", format_number(p.next_cost)), style),
        ];
        if p.owned > 0 {
            spans.push(Span::styled(
                format!("  +{}/s", format_number(p.rate)),
                Style::default().fg(Color::Green),
            ));
        }
        cl.push_clickable(Line::from(spans), key);
    }

    cl.register_targets(area, cs, 1, 1);
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Monkeys "),
    );
    f.render_widget(widget, area);
}

fn render_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new(Line::from(Span::styled(
        "H/Space harvest · 1-6 hire · U upgrade",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    f.render_widget(help, area);
}

fn render_win(snap: &Snapshot, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let width = area.width.min(44);
    let height = 8.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        "You are a banana tycoon!",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(format!(
        "{} bananas harvested",
        format_number(snap.state.lifetime_currency)
    )));
    cl.push(Line::from(""));
    cl.push_clickable(Line::from(" [C] Keep playing"), 'c');
    cl.push_clickable(Line::from(" [R] Start over"), 'r');

    // Registered last so the popup rows shadow the panels beneath.
    cl.register_targets(popup, cs, 1, 1);
    f.render_widget(Clear, popup);
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" 🏆 "),
    );
    f.render_widget(widget, popup);
}
