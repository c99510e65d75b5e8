use crate::app::App;
use crate::types::{BindingTarget, DialogButton};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render(f: &mut Frame, app: &App) {
    if !app.show_confirm_dialog {
        return;
    }

    let Some(binding) = app.selected_binding() else {
        return;
    };

    let folders: Vec<String> = match &binding.target {
        BindingTarget::DeleteFolder(Some(folder)) => vec![folder.display().to_string()],
        BindingTarget::DeleteAll(folders) => folders
            .iter()
            .filter(|folder| folder.exists())
            .map(|folder| folder.display().to_string())
            .collect(),
        _ => return,
    };

    // Create centered dialog area
    let area = f.area();
    let dialog_width = area.width.min(70);
    let dialog_height = (folders.len() as u16 + 9).min(area.height.saturating_sub(4));
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
        .title(binding.label.as_str())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    f.render_widget(dialog_block, dialog_area);

    let dialog_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(dialog_area);

    let mut message = vec![
        Line::from("The following folders will be deleted:"),
        Line::from(""),
    ];
    for folder in &folders {
        message.push(Line::from(format!("  • {}", folder)));
    }
    message.push(Line::from(""));
    message.push(Line::from(Span::styled(
        "This action cannot be undone!",
        Style::default().fg(Color::Red),
    )));

    let message_paragraph = Paragraph::new(message).wrap(Wrap { trim: false });
    f.render_widget(message_paragraph, dialog_chunks[0]);

    let ok_style = if app.dialog_button == DialogButton::Ok {
        Style::default().bg(Color::Red).fg(Color::Black)
    } else {
        Style::default()
    };
    let cancel_style = if app.dialog_button == DialogButton::Cancel {
        Style::default().bg(Color::Green).fg(Color::Black)
    } else {
        Style::default()
    };

    let buttons = Paragraph::new(Line::from(vec![
        Span::raw("   "),
        Span::styled(" Delete ", ok_style),
        Span::raw("   "),
        Span::styled(" Cancel ", cancel_style),
    ]))
    .alignment(Alignment::Center);

    f.render_widget(buttons, dialog_chunks[1]);
}
