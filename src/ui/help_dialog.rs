use crate::app::App;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    ))
}

fn key(keys: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<13}", keys), Style::default().fg(Color::Green)),
        Span::raw(description),
    ])
}

fn swatch(color: Color, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled("  ●            ", Style::default().fg(color)),
        Span::raw(description),
    ])
}

pub fn render(f: &mut Frame, app: &App) {
    if !app.show_help_dialog {
        return;
    }

    let area = f.area();
    let dialog_width = area.width.min(70);
    let dialog_height = area.height.min(28);
    let dialog_x = (area.width.saturating_sub(dialog_width)) / 2;
    let dialog_y = (area.height.saturating_sub(dialog_height)) / 2;

    let dialog_area = Rect {
        x: dialog_x,
        y: dialog_y,
        width: dialog_width,
        height: dialog_height,
    };

    f.render_widget(Clear, dialog_area);

    let dialog_block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(dialog_block, dialog_area);

    let dialog_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Min(1)])
        .split(dialog_area);

    let help_lines = vec![
        heading("Navigation"),
        Line::from(""),
        key("Up/Down", "Select a control or scroll the log"),
        key("Tab", "Switch between controls and log"),
        Line::from(""),
        heading("Actions"),
        Line::from(""),
        key("Enter", "Run the selected control"),
        key("r", "Re-check all paths now"),
        Line::from(""),
        heading("Controls"),
        Line::from(""),
        swatch(Color::Blue, "Available"),
        swatch(Color::Red, "Available, deletes data"),
        swatch(Color::DarkGray, "Unavailable (path missing)"),
        swatch(Color::Yellow, "In progress"),
        Line::from(""),
        heading("General"),
        Line::from(""),
        key("h, ?", "Show this help dialog"),
        key("Esc", "Close dialogs"),
        key("q", "Quit application"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc to close this dialog",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let help_paragraph = Paragraph::new(help_lines)
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Left);

    f.render_widget(help_paragraph, dialog_chunks[0]);
}
