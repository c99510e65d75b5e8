use crate::app::App;
use crate::types::{ActivePane, Availability, ControlBinding};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

pub fn binding_color(binding: &ControlBinding) -> Color {
    match binding.state {
        Availability::Available if binding.is_destructive() => Color::Red,
        Availability::Available => Color::Blue,
        Availability::Unavailable => Color::DarkGray,
        Availability::InProgress => Color::Yellow,
    }
}

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let mut items: Vec<ListItem> = Vec::new();
    let mut positions = Vec::with_capacity(app.bindings.len());
    let mut current_section = None;

    for binding in &app.bindings {
        if current_section != Some(binding.section) {
            if current_section.is_some() {
                items.push(ListItem::new(""));
            }
            items.push(ListItem::new(Line::from(Span::styled(
                binding.section.title(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))));
            current_section = Some(binding.section);
        }

        let color = binding_color(binding);
        let marker = match binding.state {
            Availability::Available => "● ",
            Availability::Unavailable => "○ ",
            Availability::InProgress => "◌ ",
        };
        let label_style = if binding.state == Availability::Unavailable {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        positions.push(items.len());
        items.push(ListItem::new(Line::from(vec![
            Span::raw("  "),
            Span::styled(marker, Style::default().fg(color)),
            Span::styled(binding.display_label().to_string(), label_style),
        ])));
    }

    let border_style = if app.active_pane == ActivePane::Controls {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Unreal Engine Tools [Enter: run, r: refresh, Tab: switch, h: help, q: quit]"),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    // Section headers occupy rows too; map the binding index to its row.
    let mut render_state = ListState::default();
    render_state.select(
        app.list_state
            .selected()
            .and_then(|idx| positions.get(idx).copied()),
    );

    f.render_stateful_widget(list, area, &mut render_state);
}
