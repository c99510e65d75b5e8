use crate::app::App;
use crate::types::ActivePane;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
};

const TICK: &str = "✔";
const CROSS: &str = "✘";

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let table_height = u16::try_from(app.found_entries.len().max(1))
        .unwrap_or(u16::MAX)
        .saturating_add(3);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(table_height), Constraint::Min(3)])
        .split(area);

    render_found_entries(f, app, chunks[0]);
    render_log(f, app, chunks[1]);
}

fn render_found_entries(f: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<Row> = app
        .found_entries
        .iter()
        .map(|(name, found)| {
            let (mark, color) = if *found {
                (TICK, Color::Green)
            } else {
                (CROSS, Color::Red)
            };
            Row::new(vec![
                Line::from(Span::styled(mark, Style::default().fg(color))),
                Line::from(name.as_str()),
            ])
        })
        .collect();

    let running = app.running_tasks();
    let title = if running > 0 {
        format!("Found Entries [{} running]", running)
    } else {
        "Found Entries".to_string()
    };

    let table = Table::new(rows, [Constraint::Length(2), Constraint::Min(10)])
        .header(
            Row::new(vec!["", "Path"]).style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(table, area);
}

fn render_log(f: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.active_pane == ActivePane::Log {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    // Newest lines sit at the bottom; `log_scroll` counts back from there.
    let snapshot = app.log.snapshot();
    let visible = usize::from(area.height.saturating_sub(2));
    let end = snapshot.len().saturating_sub(app.log_scroll);
    let start = end.saturating_sub(visible);

    let lines: Vec<Line> = snapshot[start..end]
        .iter()
        .cloned()
        .map(|line| {
            let color = if line.contains("ERROR") {
                Color::Red
            } else if line.contains("WARN") {
                Color::Yellow
            } else {
                Color::Reset
            };
            Line::from(Span::styled(line, Style::default().fg(color)))
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Log [Tab: switch, ↑↓: scroll]"),
        );

    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::config::PanelConfig;
    use crate::dispatcher::Dispatcher;
    use crate::dispatcher::testing::RecordingLauncher;
    use crate::file_operations::RealFs;
    use crate::logging::LogBuffer;
    use crate::resolver::PathTable;
    use crate::ui;
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::Arc;

    fn app_with_log(lines: usize) -> App {
        let config = PanelConfig::from_json("{}").unwrap();
        let paths = Arc::new(PathTable::new(&config.paths));
        let dispatcher = Dispatcher::new(
            paths,
            Arc::new(RealFs),
            Arc::new(RecordingLauncher::default()),
        );
        let app = App::new(&config, dispatcher, LogBuffer::new(1000));
        for i in 0..lines {
            app.log.push_line(format!("line {:03}", i));
        }
        app.log.push_line("NEWEST Successfully deleted".to_string());
        app
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| ui::draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn log_pane_shows_newest_line_when_full() {
        let app = app_with_log(100);
        let screen = screen(&app);

        assert!(screen.contains("NEWEST"));
        assert!(!screen.contains("line 000"));
    }

    #[test]
    fn scrolling_back_reveals_older_lines() {
        let mut app = app_with_log(100);
        for _ in 0..app.log.len() {
            app.scroll_log_up();
        }
        let screen = screen(&app);

        assert!(screen.contains("line 000"));
        assert!(!screen.contains("NEWEST"));
    }

    #[test]
    fn many_found_entries_do_not_break_layout() {
        let mut app = app_with_log(0);
        app.found_entries = (0..70_000).map(|i| (format!("key {}", i), i % 2 == 0)).collect();
        let screen = screen(&app);

        assert!(screen.contains("key 0"));
    }
}
