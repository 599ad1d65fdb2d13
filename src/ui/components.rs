//! UI rendering components

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
};

use super::app::{App, Focus, MessageKind};
use super::input::InputMode;
use super::role_form::{RoleField, RoleForm};
use super::user_form::{FieldKind, UserField, UserForm};

const HIGHLIGHT_BG: Color = Color::Rgb(50, 50, 80);

/// Render the complete UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Tree + user list
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);
    render_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if let Some(form) = &app.user_form {
        render_user_form(frame, form);
    }
    if let Some(form) = &app.role_form {
        render_role_form(frame, form);
    }
}

/// Render the header
fn render_header(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            " Taxi Monitoring Platform ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ User management"),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Fleet Console "));

    frame.render_widget(title, area);
}

/// Render the tree panel and the user list side by side
fn render_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
        .split(area);

    render_org_tree(frame, app, chunks[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box
            Constraint::Min(0),    // Table
        ])
        .split(chunks[1]);

    render_search_box(frame, app, right[0]);
    render_user_table(frame, app, right[1]);
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

/// Render the organization tree
fn render_org_tree(frame: &mut Frame, app: &App, area: Rect) {
    let tree = &app.org_tree;
    let focused = app.focus == Focus::Tree && app.input_mode == InputMode::Normal;

    if tree.is_empty() {
        let text = if tree.loading { "Loading..." } else { "No organizations" };
        let placeholder = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(panel_block(" Organization ".to_string(), focused));
        frame.render_widget(placeholder, area);
        return;
    }

    let selected_key = tree.selected_key();
    let items: Vec<ListItem> = tree
        .rows()
        .into_iter()
        .map(|row| {
            let marker = match (row.has_children, row.expanded) {
                (true, true) => "▾ ",
                (true, false) => "▸ ",
                (false, _) => "  ",
            };
            let content = format!("{}{}{}", "  ".repeat(row.depth), marker, row.title);
            let style = if selected_key == Some(row.key.as_str()) {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(content).style(style)
        })
        .collect();

    let mut list = List::new(items).block(
        panel_block(" Organization ".to_string(), focused)
            .title_bottom(" Enter: Filter │ ←→ Fold "),
    );
    if focused {
        list = list
            .highlight_style(Style::default().bg(HIGHLIGHT_BG).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");
    }

    let mut list_state = ListState::default();
    list_state.select(Some(tree.cursor()));

    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Render the search box
fn render_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::Search;
    let style = if editing {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };

    let text = if app.search_input.is_empty() && !editing {
        Span::styled("Press / to search", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(app.search_input.as_str(), style)
    };

    let input = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(if editing {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            })
            .title(if editing {
                " Search (Enter to apply, Esc to cancel) "
            } else {
                " Search "
            }),
    );
    frame.render_widget(input, area);

    if editing {
        frame.set_cursor_position((
            area.x + app.search_input.chars().count() as u16 + 1,
            area.y + 1,
        ));
    }
}

/// Render the paged user table
fn render_user_table(frame: &mut Frame, app: &App, area: Rect) {
    let users = &app.users;
    let focused = app.focus == Focus::Users && app.input_mode == InputMode::Normal;

    let header = Row::new(vec![
        "No.", "Name", "Account", "Organization", "Role", "Type", "Start", "End",
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let rows: Vec<Row> = users
        .rows()
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let mut cells = vec![users.row_number(i).to_string()];
            cells.extend(user.cells());
            Row::new(cells)
        })
        .collect();

    let loading = if users.is_loading() { " │ Loading..." } else { "" };
    let title = format!(
        " Users ({}) │ Page {}/{}{} ",
        users.total(),
        users.filter().current_page,
        users.page_count(),
        loading
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Percentage(14),
            Constraint::Percentage(14),
            Constraint::Percentage(16),
            Constraint::Percentage(14),
            Constraint::Percentage(8),
            Constraint::Length(11),
            Constraint::Length(11),
        ],
    )
    .header(header)
    .block(panel_block(title, focused).title_bottom(
        " / Search │ r Reset │ a Add │ [ ] Page │ Tab Panel │ q Quit ",
    ))
    .row_highlight_style(Style::default().bg(HIGHLIGHT_BG).add_modifier(Modifier::BOLD))
    .highlight_symbol("▶ ");

    let mut table_state = TableState::default();
    if !users.rows().is_empty() {
        table_state.select(Some(users.selected_index()));
    }

    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let state_indicator = if app.users.is_loading() || app.org_tree.loading {
        Span::styled(" ● Loading ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" ● Ready ", Style::default().fg(Color::Green))
    };

    let filter = app.users.filter();
    let mut hints = Vec::new();
    if let Some(org) = &filter.selected_org_id {
        hints.push(format!("Org: {}", org));
    }
    if let Some(search) = filter.search_text.as_deref().filter(|s| !s.is_empty()) {
        hints.push(format!("Search: {}", search));
    }
    let filter_hint = if hints.is_empty() {
        String::new()
    } else {
        format!("│ {} ", hints.join(" │ "))
    };

    let mut spans = vec![
        state_indicator,
        Span::raw(format!("│ {} ", app.client.base_url())),
        Span::styled(filter_hint, Style::default().fg(Color::Magenta)),
    ];
    if app.focus == Focus::Users {
        if let Some(row) = app.users.selected_row() {
            spans.push(Span::raw(format!(
                "│ {} ({}) ",
                row.name.as_deref().unwrap_or("-"),
                row.account.as_deref().unwrap_or("-")
            )));
        }
    }
    if let Some(message) = &app.message {
        let color = match message.kind {
            MessageKind::Info => Color::Green,
            MessageKind::Error => Color::Red,
        };
        spans.push(Span::styled(
            format!("│ {} ", message.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn label_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn choice_text(label: Option<&str>, has_options: bool) -> String {
    match (label, has_options) {
        (Some(label), _) => format!("◂ {} ▸", label),
        (None, true) => "◂ select ▸".to_string(),
        (None, false) => "(none available)".to_string(),
    }
}

/// Value column for one user form field
fn user_field_value(form: &UserForm, field: UserField) -> Vec<Span<'static>> {
    let text = |s: &str| vec![Span::raw(s.to_string())];
    match field {
        UserField::Name => text(&form.name),
        UserField::Account => text(&form.account),
        UserField::Password => text(&"*".repeat(form.password.chars().count())),
        UserField::ConfirmPassword => text(&"*".repeat(form.confirm_password.chars().count())),
        UserField::MapLevel => text(&form.map_level),
        UserField::StartDate => text(&form.start_date),
        UserField::EndDate => text(&form.end_date),
        UserField::Org => text(&choice_text(form.orgs.label(), !form.orgs.options().is_empty())),
        UserField::Company => text(&choice_text(
            form.companies.label(),
            !form.companies.options().is_empty(),
        )),
        UserField::Province => text(&choice_text(
            form.provinces.label(),
            !form.provinces.options().is_empty(),
        )),
        UserField::City => {
            if form.provinces.value().is_none() {
                vec![Span::styled("(pick a province first)", Style::default().fg(Color::DarkGray))]
            } else if form.loading_cities {
                vec![Span::styled("Loading...", Style::default().fg(Color::Yellow))]
            } else {
                text(&choice_text(form.cities.label(), !form.cities.options().is_empty()))
            }
        }
        UserField::FreezeUponExpiration => {
            text(if form.freeze_upon_expiration { "[x] yes" } else { "[ ] no" })
        }
        UserField::Roles => {
            let focused = form.focus == UserField::Roles;
            let mut spans = Vec::new();
            for (i, option) in form.roles.options().iter().enumerate() {
                let mark = if form.roles.is_chosen(&option.value) { "[x]" } else { "[ ]" };
                let style = if focused && i == form.roles.cursor() {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                spans.push(Span::styled(format!("{} {}", mark, option.label), style));
                spans.push(Span::raw("  "));
            }
            if spans.is_empty() {
                spans.push(Span::styled("(none available)", Style::default().fg(Color::DarkGray)));
            }
            spans
        }
    }
}

/// Render the user creation modal
fn render_user_form(frame: &mut Frame, form: &UserForm) {
    let height = (UserField::ALL.len() as u16) * 2 + 4;
    let area = centered_rect(70, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    for field in UserField::ALL {
        let focused = form.focus == field;
        let mut spans = vec![Span::styled(
            format!("{:<18}", field.label()),
            label_style(focused),
        )];
        spans.extend(user_field_value(form, field));
        lines.push(Line::from(spans));

        let hint = match (form.error(field), focused, field.kind()) {
            (Some(error), _, _) => Span::styled(format!("{:<18}{}", "", error), Style::default().fg(Color::Red)),
            (None, true, FieldKind::Choice) => Span::styled(
                format!("{:<18}←→ choose │ Del clear", ""),
                Style::default().fg(Color::DarkGray),
            ),
            (None, true, FieldKind::Multi) => Span::styled(
                format!("{:<18}←→ move │ Space toggle │ n new role", ""),
                Style::default().fg(Color::DarkGray),
            ),
            (None, true, FieldKind::Switch) => Span::styled(
                format!("{:<18}Space toggle", ""),
                Style::default().fg(Color::DarkGray),
            ),
            (None, true, FieldKind::Text) if matches!(field, UserField::StartDate | UserField::EndDate) => {
                Span::styled(format!("{:<18}YYYY-MM-DD", ""), Style::default().fg(Color::DarkGray))
            }
            _ => Span::raw(""),
        };
        lines.push(Line::from(hint));
    }

    let title = if form.submitting {
        " New user (submitting...) "
    } else {
        " New user "
    };
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(" Tab/↑↓ Field │ Enter Submit │ Esc Cancel ")
                .style(Style::default().fg(Color::White)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Render the role creation modal
fn render_role_form(frame: &mut Frame, form: &RoleForm) {
    let area = centered_rect(40, 8, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    for (field, value) in [
        (RoleField::Name, &form.name),
        (RoleField::Description, &form.description),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<13}", field.label()), label_style(form.focus == field)),
            Span::raw(value.clone()),
        ]));
        lines.push(match form.error(field) {
            Some(error) => Line::from(Span::styled(
                format!("{:<13}{}", "", error),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(""),
        });
    }

    let title = if form.submitting {
        " New role (submitting...) "
    } else {
        " New role "
    };
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_bottom(" Tab Field │ Enter Submit │ Esc Cancel ")
            .style(Style::default().fg(Color::White)),
    );

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle
fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
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
