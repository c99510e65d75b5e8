use crate::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

pub mod confirm_dialog;
pub mod control_list;
pub mod help_dialog;
pub mod status_panel;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(f.area());

    control_list::render(f, app, chunks[0]);
    status_panel::render(f, app, chunks[1]);

    confirm_dialog::render(f, app);
    help_dialog::render(f, app);
}
