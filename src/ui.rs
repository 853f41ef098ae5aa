use crate::controller::{Controller, Flow, InputBuffer, Mode};
use crate::error::AppError;
use crate::model::{Completion, Section, Task};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io::{stdout, Stdout};
use std::time::Duration;
use tracing::{debug, info};

const HELP: &[(&str, &str)] = &[
    ("↑ / k", "Move up the task list"),
    ("↓ / j", "Move down the task list"),
    ("← / →", "Previous / next section"),
    ("1 2 3", "Daily / Weekly / Monthly"),
    ("Space", "Toggle task completion"),
    ("a", "Add a new task"),
    ("d", "Delete selected task"),
    ("Ctrl+D", "Clear all tasks in section"),
    ("h / ?", "Show this help"),
    ("q / Ctrl+C", "Quit"),
];

pub fn run(mut app: Controller) -> Result<()> {
    let mut terminal = setup_terminal()?;
    info!("terminal ready");
    let result = event_loop(&mut app, &mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

fn event_loop(app: &mut Controller, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;
        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(key) == Flow::Quit {
                    debug!("quit requested");
                    break;
                }
            }
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, AppError> {
    enable_raw_mode().map_err(AppError::TerminalInit)?;
    let mut stdout = stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(AppError::TerminalInit(err));
    }
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(AppError::TerminalInit)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

pub fn draw(f: &mut Frame<'_>, app: &Controller) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(f.size());

    draw_header(f, layout[0], app);
    draw_sections(f, layout[1], app);
    draw_footer(f, layout[2], app);

    match app.mode() {
        Mode::List => {}
        Mode::AddTask(buffer) => draw_input(f, app.current_section(), buffer),
        Mode::ConfirmDelete { name, .. } => draw_confirm(
            f,
            "Confirm Deletion",
            &format!("Delete task \"{}\"?", name),
        ),
        Mode::ConfirmClear => draw_confirm(
            f,
            "Confirm",
            &format!("Clear all {}?", app.current_section().label()),
        ),
        Mode::Help => draw_help(f),
    }
}

fn draw_header(f: &mut Frame<'_>, area: Rect, app: &Controller) {
    let title = Line::from(vec![
        Span::styled(
            "sisyphus ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  •  "),
        Span::styled(
            app.current_section().label(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  •  "),
        Span::styled(
            format!("{}", app.manager().store().path().display()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  •  "),
        Span::styled(
            format!("mode {}", app.mode().label()),
            Style::default().fg(Color::Magenta),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let paragraph = Paragraph::new(title)
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(paragraph, area);
}

fn draw_sections(f: &mut Frame<'_>, area: Rect, app: &Controller) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(area);

    for section in Section::ALL {
        let focused = section == app.current_section();
        let tasks = app.manager().tasks(section);
        let cursor = app.cursor_for(section);
        let accent = if focused { Color::Green } else { Color::DarkGray };

        let items = if tasks.is_empty() {
            let hint = if focused {
                "Press 'a' to add a new task"
            } else {
                "No tasks"
            };
            vec![ListItem::new(Span::styled(
                hint,
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            tasks
                .iter()
                .enumerate()
                .map(|(idx, task)| ListItem::new(task_line(task, focused && idx == cursor)))
                .collect()
        };

        let completion = Completion::of(tasks);
        let block = Block::default()
            .title(Span::styled(
                format!(
                    "{} ({}/{})",
                    section.label(),
                    completion.completed,
                    completion.total
                ),
                Style::default().fg(accent).add_modifier(if focused {
                    Modifier::BOLD | Modifier::UNDERLINED
                } else {
                    Modifier::BOLD
                }),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent));

        let mut state = ListState::default();
        if focused && !tasks.is_empty() {
            state.select(Some(cursor));
        }
        let list = List::new(items).block(block);
        f.render_stateful_widget(list, chunks[section.index()], &mut state);
    }
}

/// `<indicator><checkbox> <name>`; completed names are crossed out and dimmed.
pub fn task_line(task: &Task, selected: bool) -> Line<'static> {
    let indicator = if selected { "-> " } else { "   " };
    let (checkbox, check_style, name_style) = if task.completed {
        (
            "[X] ",
            Style::default().fg(Color::Red),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::CROSSED_OUT | Modifier::DIM),
        )
    } else {
        (
            "[ ] ",
            Style::default().fg(Color::Green),
            Style::default().fg(Color::Green),
        )
    };
    let name_style = if selected {
        name_style.add_modifier(Modifier::BOLD)
    } else {
        name_style
    };
    Line::from(vec![
        Span::styled(indicator, Style::default().fg(Color::Yellow)),
        Span::styled(checkbox, check_style),
        Span::styled(task.name.clone(), name_style),
    ])
}

pub fn status_line(completion: Completion, message: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            "sisyphus",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("{}% completed", completion.percent),
            Style::default().fg(Color::Green),
        ),
        Span::raw(format!(" ({}/{})", completion.completed, completion.total)),
        Span::raw(" | "),
        Span::styled(message.to_string(), Style::default().fg(Color::Gray)),
        Span::raw(" | "),
        Span::styled("help [h]", Style::default().fg(Color::LightCyan)),
    ])
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &Controller) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let hints = Line::from(vec![
        Span::styled("←→", Style::default().fg(Color::LightCyan)),
        Span::raw(" section  "),
        Span::styled("↑↓", Style::default().fg(Color::LightCyan)),
        Span::raw(" move  "),
        Span::styled("space", Style::default().fg(Color::LightGreen)),
        Span::raw(" toggle  "),
        Span::styled("a", Style::default().fg(Color::LightMagenta)),
        Span::raw(" add  "),
        Span::styled("d", Style::default().fg(Color::LightRed)),
        Span::raw(" delete  "),
        Span::styled("^D", Style::default().fg(Color::LightRed)),
        Span::raw(" clear  "),
        Span::styled("q", Style::default().fg(Color::LightRed)),
        Span::raw(" quit"),
    ]);
    let help_bar = Paragraph::new(hints).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(help_bar, rows[0]);

    let status = Paragraph::new(status_line(app.completion(), app.status()))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(status, rows[1]);
}

fn draw_input(f: &mut Frame<'_>, section: Section, buffer: &InputBuffer) {
    let area = centered_rect(50, 20, f.size());
    let body = vec![
        Line::from(Span::styled(
            buffer.with_caret(),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            "Enter to save • Esc to cancel",
            Style::default().fg(Color::Gray),
        )),
    ];
    let dialog = Paragraph::new(body)
        .block(
            Block::default()
                .title(Span::styled(
                    format!("Add Task to {}", section.label()),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn draw_confirm(f: &mut Frame<'_>, title: &str, question: &str) {
    let area = centered_rect(50, 25, f.size());
    let body = vec![
        Line::from(Span::styled(
            question.to_string(),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press y to confirm, n or Esc to cancel"),
    ];
    let dialog = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(
                    title.to_string(),
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightRed)),
        );
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn draw_help(f: &mut Frame<'_>) {
    let area = centered_rect(60, 70, f.size());
    let mut lines = vec![Line::from(Span::styled(
        "Keybindings:",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.extend(HELP.iter().map(|(keys, desc)| {
        Line::from(vec![
            Span::styled(
                format!("  {:<12}", keys),
                Style::default().fg(Color::LightCyan),
            ),
            Span::raw(*desc),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press q or Esc to close",
        Style::default().fg(Color::Gray),
    )));
    let dialog = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(
                "Help - Keybindings",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
