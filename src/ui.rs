//! Interactive menu front-end.
//!
//! A small ratatui application: a main action list, a one-line input prompt
//! for actions that need a name, a confirm screen for destructive or batch
//! actions, and a scrollable output pane for results. Every action renders
//! its failures as text; the menu itself never dies on a failed action.

use std::io::{self, Stdout};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as CEvent, KeyCode};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Terminal;

use crate::fetch::{english_flavor_text, PokemonSource};
use crate::models::PokemonRecord;
use crate::pipeline::{fetch_and_store, fetch_many, BatchReport, FetchOutcome, ItemStatus,
    DEFAULT_POKEMON};
use crate::store::Store;
use crate::utils::{capitalize, text_to_lines};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    FetchSingle,
    FetchMultiple,
    FetchDefault,
    ViewAll,
    ViewDetails,
    SearchByType,
    Statistics,
    Export,
    ResetDb,
    Help,
    Quit,
}

const ACTIONS: [(Action, &str); 11] = [
    (Action::FetchSingle, "Fetch Single Pokemon"),
    (Action::FetchMultiple, "Fetch Multiple Pokemon"),
    (Action::FetchDefault, "Fetch Default Pokemon List"),
    (Action::ViewAll, "View All Pokemon in Database"),
    (Action::ViewDetails, "View Specific Pokemon Details"),
    (Action::SearchByType, "Search Pokemon by Type"),
    (Action::Statistics, "Database Statistics"),
    (Action::Export, "Export Pokemon to JSON"),
    (Action::ResetDb, "Initialize/Reset Database"),
    (Action::Help, "Help & Documentation"),
    (Action::Quit, "Exit"),
];

enum Screen {
    Menu,
    Input {
        action: Action,
        prompt: String,
        buffer: String,
    },
    Confirm {
        action: Action,
        prompt: String,
    },
    Output {
        title: String,
        lines: Vec<String>,
        scroll: u16,
    },
}

pub struct MenuApp {
    selected: usize,
    screen: Screen,
}

impl MenuApp {
    fn new() -> Self {
        Self {
            selected: 0,
            screen: Screen::Menu,
        }
    }

    fn next(&mut self) {
        self.selected = (self.selected + 1) % ACTIONS.len();
    }

    fn previous(&mut self) {
        if self.selected == 0 {
            self.selected = ACTIONS.len() - 1;
        } else {
            self.selected -= 1;
        }
    }
}

/// Menu entries are numbered the way the old text menu was: 1..10, with 0
/// reserved for Exit.
fn menu_number(index: usize) -> usize {
    if ACTIONS[index].0 == Action::Quit {
        0
    } else {
        index + 1
    }
}

/// Run the interactive menu until the user quits.
pub async fn run_menu(store: Store, source: Arc<dyn PokemonSource>) -> anyhow::Result<()> {
    store.ensure_schema().await?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = menu_loop(&mut terminal, &store, source.as_ref()).await;

    // Restore terminal
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(LeaveAlternateScreen)?;
    result
}

async fn menu_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    store: &Store,
    source: &dyn PokemonSource,
) -> anyhow::Result<()> {
    let mut app = MenuApp::new();

    loop {
        draw_ui(terminal, &mut app)?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let CEvent::Key(key) = event::read()? else {
            continue;
        };

        let mut next_screen: Option<Screen> = None;
        match &mut app.screen {
            Screen::Menu => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down => app.next(),
                KeyCode::Up => app.previous(),
                KeyCode::Char(c @ '0'..='9') => {
                    let d = c as usize - '0' as usize;
                    if d == 0 {
                        break;
                    } else if d <= ACTIONS.len() - 1 {
                        app.selected = d - 1;
                    }
                }
                KeyCode::Enter => {
                    let action = ACTIONS[app.selected].0;
                    if action == Action::Quit {
                        break;
                    }
                    next_screen = Some(match begin_action(action) {
                        Some(screen) => screen,
                        None => run_action(store, source, action, "").await,
                    });
                }
                _ => {}
            },
            Screen::Input {
                action,
                buffer,
                ..
            } => match key.code {
                KeyCode::Esc => next_screen = Some(Screen::Menu),
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Enter => {
                    let action = *action;
                    let input = buffer.clone();
                    next_screen = Some(run_action(store, source, action, &input).await);
                }
                KeyCode::Char(c) => buffer.push(c),
                _ => {}
            },
            Screen::Confirm { action, .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    let action = *action;
                    next_screen = Some(run_action(store, source, action, "").await);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    next_screen = Some(Screen::Menu);
                }
                _ => {}
            },
            Screen::Output { scroll, .. } => match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => {
                    next_screen = Some(Screen::Menu);
                }
                KeyCode::Down => *scroll = scroll.saturating_add(1),
                KeyCode::Up => *scroll = scroll.saturating_sub(1),
                _ => {}
            },
        }

        if let Some(screen) = next_screen {
            app.screen = screen;
        }
    }

    Ok(())
}

/// Screen an action needs before it can run; `None` means run immediately.
fn begin_action(action: Action) -> Option<Screen> {
    let input = |prompt: &str| Screen::Input {
        action,
        prompt: prompt.to_string(),
        buffer: String::new(),
    };
    match action {
        Action::FetchSingle => Some(input("Enter Pokemon name")),
        Action::FetchMultiple => Some(input("Pokemon names, comma-separated")),
        Action::ViewDetails => Some(input("Enter Pokemon name")),
        Action::SearchByType => Some(input("Enter type name (e.g., Fire, Water, Electric)")),
        Action::Export => Some(input("Filename (default: pokemon_export.json)")),
        Action::FetchDefault => Some(Screen::Confirm {
            action,
            prompt: format!("Fetch default list: {}?", DEFAULT_POKEMON.join(", ")),
        }),
        Action::ResetDb => Some(Screen::Confirm {
            action,
            prompt: "WARNING: this will reset the database. Continue?".to_string(),
        }),
        Action::ViewAll | Action::Statistics | Action::Help | Action::Quit => None,
    }
}

fn output(title: &str, lines: Vec<String>) -> Screen {
    Screen::Output {
        title: title.to_string(),
        lines,
        scroll: 0,
    }
}

async fn run_action(
    store: &Store,
    source: &dyn PokemonSource,
    action: Action,
    input: &str,
) -> Screen {
    match action {
        Action::FetchSingle => fetch_single(store, source, input).await,
        Action::FetchMultiple => {
            let names: Vec<String> = input
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if names.is_empty() {
                return output("Fetch Multiple Pokemon", vec!["No Pokemon names provided.".into()]);
            }
            let report = fetch_many(store, source, &names).await;
            output("Fetch Multiple Pokemon", report_lines(&report))
        }
        Action::FetchDefault => {
            let names: Vec<String> = DEFAULT_POKEMON.iter().map(|s| s.to_string()).collect();
            let report = fetch_many(store, source, &names).await;
            output("Fetch Default Pokemon List", report_lines(&report))
        }
        Action::ViewAll => match store.list_all().await {
            Ok(all) if all.is_empty() => output(
                "All Pokemon in Database",
                vec![
                    "No Pokemon found in database.".into(),
                    "Use the fetch actions to add some first.".into(),
                ],
            ),
            Ok(all) => {
                let mut lines = vec![format!("Total: {} Pokemon", all.len()), String::new()];
                lines.extend(all.iter().map(roster_line));
                output("All Pokemon in Database", lines)
            }
            Err(e) => output("All Pokemon in Database", vec![format!("Error: {}", e)]),
        },
        Action::ViewDetails => view_details(store, source, input).await,
        Action::SearchByType => {
            let type_name = capitalize(input.trim());
            if type_name.is_empty() {
                return output("Search by Type", vec!["Type name cannot be empty.".into()]);
            }
            match store.find_by_type(&type_name).await {
                Ok(found) if found.is_empty() => output(
                    "Search by Type",
                    vec![format!("No {}-type Pokemon found in database.", type_name)],
                ),
                Ok(found) => {
                    let mut lines = vec![
                        format!("{}-type Pokemon ({} found):", type_name, found.len()),
                        String::new(),
                    ];
                    lines.extend(found.iter().map(roster_line));
                    output("Search by Type", lines)
                }
                Err(e) => output("Search by Type", vec![format!("Error: {}", e)]),
            }
        }
        Action::Statistics => match store.statistics().await {
            Ok(stats) if stats.total == 0 => {
                output("Database Statistics", vec!["No Pokemon found in database.".into()])
            }
            Ok(stats) => {
                let mut lines = vec![format!("Total Pokemon: {}", stats.total), String::new()];
                lines.push("Type Distribution:".into());
                for tc in &stats.type_counts {
                    lines.push(format!("  {:15}: {}", tc.type_name, tc.count));
                }
                lines.push(String::new());
                lines.push("Averages:".into());
                lines.push(format!("  Height: {:.2}m", stats.avg_height / 10.0));
                lines.push(format!("  Weight: {:.2}kg", stats.avg_weight / 10.0));
                lines.push(format!(
                    "  Base Experience: {:.1}",
                    stats.avg_base_experience
                ));
                output("Database Statistics", lines)
            }
            Err(e) => output("Database Statistics", vec![format!("Error: {}", e)]),
        },
        Action::Export => {
            let mut filename = input.trim().to_string();
            if filename.is_empty() {
                filename = "pokemon_export.json".to_string();
            }
            if !filename.ends_with(".json") {
                filename.push_str(".json");
            }
            match store.count().await {
                Ok(0) => output("Export to JSON", vec!["No Pokemon found in database.".into()]),
                Ok(_) => match store.export_to_file(Path::new(&filename)).await {
                    Ok(n) => output(
                        "Export to JSON",
                        vec![format!("Exported {} Pokemon to '{}'", n, filename)],
                    ),
                    Err(e) => output("Export to JSON", vec![format!("Error: {}", e)]),
                },
                Err(e) => output("Export to JSON", vec![format!("Error: {}", e)]),
            }
        }
        Action::ResetDb => match store.reset().await {
            Ok(()) => output(
                "Initialize/Reset Database",
                vec!["Database initialized successfully!".into()],
            ),
            Err(e) => output("Initialize/Reset Database", vec![format!("Error: {}", e)]),
        },
        Action::Help => output("Help & Documentation", help_lines()),
        Action::Quit => Screen::Menu,
    }
}

async fn fetch_single(store: &Store, source: &dyn PokemonSource, input: &str) -> Screen {
    let name = input.trim();
    if name.is_empty() {
        return output("Fetch Single Pokemon", vec!["Pokemon name cannot be empty.".into()]);
    }
    match fetch_and_store(store, source, name).await {
        Ok(FetchOutcome::AlreadyStored(p)) => output(
            "Fetch Single Pokemon",
            vec![format!("{} already exists in database", p.name)],
        ),
        Ok(FetchOutcome::Stored(p)) => {
            let types: Vec<&str> = p.types.iter().map(|t| t.type_name.as_str()).collect();
            output(
                "Fetch Single Pokemon",
                vec![
                    format!("{} stored successfully!", p.name),
                    format!("Pokedex: #{}", p.pokedex_number),
                    format!("Types: {}", types.join(", ")),
                ],
            )
        }
        Ok(FetchOutcome::NotFound) => {
            output("Fetch Single Pokemon", vec![format!("Failed to fetch {}", name)])
        }
        Err(e) => output("Fetch Single Pokemon", vec![format!("Error: {}", e)]),
    }
}

async fn view_details(store: &Store, source: &dyn PokemonSource, input: &str) -> Screen {
    let name = input.trim();
    if name.is_empty() {
        return output("Pokemon Details", vec!["Pokemon name cannot be empty.".into()]);
    }
    let display_name = capitalize(name);
    let record = match store.find_by_name(&display_name).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            return output(
                "Pokemon Details",
                vec![format!("{} not found in database.", display_name)],
            )
        }
        Err(e) => return output("Pokemon Details", vec![format!("Error: {}", e)]),
    };

    let mut lines = vec![
        format!("POKEMON DETAILS: {}", record.name.to_uppercase()),
        String::new(),
        format!("Pokedex Number: #{}", record.pokedex_number),
        format!("Height: {:.1}m", record.height as f64 / 10.0),
        format!("Weight: {:.1}kg", record.weight as f64 / 10.0),
        format!("Base Experience: {}", record.base_experience),
        String::new(),
        "Types:".into(),
    ];
    for t in &record.types {
        lines.push(format!("  - {}", t.type_name));
    }
    lines.push(String::new());
    lines.push("Abilities:".into());
    for a in &record.abilities {
        let hidden = if a.is_hidden { " (Hidden)" } else { "" };
        lines.push(format!("  - {}{}", a.ability_name, hidden));
    }
    lines.push(String::new());
    lines.push("Base Stats:".into());
    for s in &record.stats {
        let bar = "█".repeat((s.base_stat.max(0) / 5) as usize);
        lines.push(format!("  {:20}: {:3} {}", s.stat_name, s.base_stat, bar));
    }

    // description comes from the species endpoint, on demand
    let species = source.get_species(record.pokedex_number).await;
    let description = english_flavor_text(species.as_ref());
    lines.push(String::new());
    lines.push("Description:".into());
    for line in text_to_lines(&description, 70) {
        lines.push(format!("  {}", line));
    }

    if !record.sprite_url.is_empty() {
        lines.push(String::new());
        lines.push(format!("Sprite: {}", record.sprite_url));
    }

    output("Pokemon Details", lines)
}

fn roster_line(p: &PokemonRecord) -> String {
    let types: Vec<&str> = p.types.iter().map(|t| t.type_name.as_str()).collect();
    format!(
        "#{:03} - {:15} | Types: {}",
        p.pokedex_number,
        p.name,
        types.join(", ")
    )
}

fn report_lines(report: &BatchReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .items
        .iter()
        .map(|(name, status)| match status {
            ItemStatus::Stored => format!("[ok] {} - stored successfully", name),
            ItemStatus::AlreadyStored => format!("[--] {} - already exists", name),
            ItemStatus::NotFound => format!("[!!] {} - not found", name),
            ItemStatus::Failed(e) => format!("[!!] {} - error: {}", name, e),
        })
        .collect();
    lines.push(String::new());
    lines.push(format!(
        "Successfully stored: {}/{} Pokemon",
        report.stored, report.total
    ));
    lines
}

fn help_lines() -> Vec<String> {
    vec![
        "QUICK START:".into(),
        "  1. Initialize the database (option 9)".into(),
        "  2. Fetch Pokemon (options 1-3)".into(),
        "  3. View Pokemon data (options 4-7)".into(),
        "  4. Export data if needed (option 8)".into(),
        String::new(),
        "API ENDPOINTS (run `pokescout serve`):".into(),
        "  GET /                        - API information".into(),
        "  GET /api/pokemon/<name>      - Fetch and store Pokemon".into(),
        "  GET /api/pokemon             - List all Pokemon".into(),
        "  GET /api/pokemon/<name>/info - Get Pokemon details".into(),
        String::new(),
        "TIPS:".into(),
        "  - Pokemon names are case-insensitive".into(),
        "  - Use English names only".into(),
        "  - Data source: https://pokeapi.co/".into(),
    ]
}

pub fn draw_ui(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut MenuApp) -> io::Result<()> {
    terminal.draw(|f| {
        let size = f.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(size);

        let header = Paragraph::new(vec![Spans::from(Span::styled(
            "POKEMON SCOUT",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))])
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(header, chunks[0]);

        let hint = match &app.screen {
            Screen::Menu => "Up/Down or 0-9 select | Enter run | q quit",
            Screen::Input { .. } => "Type input | Enter confirm | Esc cancel",
            Screen::Confirm { .. } => "y confirm | n cancel",
            Screen::Output { .. } => "Up/Down scroll | Enter back to menu",
        };

        match &app.screen {
            Screen::Menu => {
                let items: Vec<ListItem> = ACTIONS
                    .iter()
                    .enumerate()
                    .map(|(i, (_, label))| {
                        ListItem::new(vec![Spans::from(Span::raw(format!(
                            "{:2}. {}",
                            menu_number(i),
                            label
                        )))])
                    })
                    .collect();
                let list = List::new(items)
                    .block(Block::default().borders(Borders::ALL).title("Main Menu"))
                    .highlight_style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    );
                let mut state = ListState::default();
                state.select(Some(app.selected));
                f.render_stateful_widget(list, chunks[1], &mut state);
            }
            Screen::Input { prompt, buffer, .. } => {
                let para = Paragraph::new(vec![
                    Spans::from(Span::raw(format!("{}:", prompt))),
                    Spans::from(Span::styled(
                        format!("> {}", buffer),
                        Style::default().fg(Color::Green),
                    )),
                ])
                .block(Block::default().borders(Borders::ALL).title("Input"));
                f.render_widget(para, chunks[1]);
            }
            Screen::Confirm { prompt, .. } => {
                let para = Paragraph::new(vec![Spans::from(Span::raw(prompt.clone()))])
                    .block(Block::default().borders(Borders::ALL).title("Confirm"))
                    .wrap(Wrap { trim: false });
                f.render_widget(para, chunks[1]);
            }
            Screen::Output {
                title,
                lines,
                scroll,
            } => {
                let text: Vec<Spans> = lines
                    .iter()
                    .map(|l| Spans::from(Span::raw(l.clone())))
                    .collect();
                let para = Paragraph::new(text)
                    .block(Block::default().borders(Borders::ALL).title(title.clone()))
                    .wrap(Wrap { trim: false })
                    .scroll((*scroll, 0));
                f.render_widget(para, chunks[1]);
            }
        }

        let footer = Paragraph::new(vec![Spans::from(Span::raw(hint))])
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(footer, chunks[2]);
    })?;
    Ok(())
}
