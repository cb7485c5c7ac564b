use std::io::{self, IsTerminal};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use tracing::info;

const DEFAULT_PORT: &str = "3000";
const DEFAULT_APPWRITE_ENDPOINT: &str = "https://cloud.appwrite.io/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    TmdbApiKey,
    Port,
    AppwriteEndpoint,
    AppwriteProjectId,
    AppwriteDatabaseId,
    AppwriteCollectionId,
    AppwriteApiKey,
}

const FIELDS: [Field; 7] = [
    Field::TmdbApiKey,
    Field::Port,
    Field::AppwriteEndpoint,
    Field::AppwriteProjectId,
    Field::AppwriteDatabaseId,
    Field::AppwriteCollectionId,
    Field::AppwriteApiKey,
];

impl Field {
    fn label(&self) -> &'static str {
        match self {
            Field::TmdbApiKey => "TMDB read access token (required)",
            Field::Port => "Port",
            Field::AppwriteEndpoint => "Appwrite endpoint",
            Field::AppwriteProjectId => "Appwrite project ID (blank disables trending)",
            Field::AppwriteDatabaseId => "Appwrite database ID",
            Field::AppwriteCollectionId => "Appwrite collection ID",
            Field::AppwriteApiKey => "Appwrite API key",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingConfig {
    pub tmdb_api_key: String,
    pub port: u16,
    pub appwrite: Option<AppwriteSettings>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key: String,
}

/// Asks for missing settings on first launch and writes them to `.env`.
pub fn maybe_run_onboarding() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    if std::env::var("TMDB_API_KEY").is_ok() || !io::stdin().is_terminal() {
        return Ok(());
    }

    let config = run_onboarding()?;
    std::fs::write(".env", env_file_contents(&config))?;
    info!("Wrote settings to .env");

    std::env::set_var("TMDB_API_KEY", &config.tmdb_api_key);
    std::env::set_var("PORT", config.port.to_string());
    if let Some(aw) = &config.appwrite {
        std::env::set_var("APPWRITE_ENDPOINT", &aw.endpoint);
        std::env::set_var("APPWRITE_PROJECT_ID", &aw.project_id);
        std::env::set_var("APPWRITE_DATABASE_ID", &aw.database_id);
        std::env::set_var("APPWRITE_COLLECTION_ID", &aw.collection_id);
        std::env::set_var("APPWRITE_API_KEY", &aw.api_key);
    }

    Ok(())
}

fn run_onboarding() -> anyhow::Result<OnboardingConfig> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = OnboardingState::new();
    let result = (|| -> anyhow::Result<OnboardingConfig> {
        loop {
            terminal.draw(|f| render_onboarding(f, &state))?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if handle_key_event(&mut state, key) {
                    return state.build_config();
                }

                if state.exit_requested {
                    return Err(anyhow::anyhow!("Onboarding cancelled"));
                }
            }
        }
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn env_file_contents(config: &OnboardingConfig) -> String {
    let mut contents = String::new();
    contents.push_str("# TMDB API read access token (v4 auth)\n");
    contents.push_str("# Get it from: https://www.themoviedb.org/settings/api\n");
    contents.push_str(&format!("TMDB_API_KEY={}\n\n", config.tmdb_api_key));

    contents.push_str("# Server port (optional, defaults to 3000)\n");
    contents.push_str(&format!("PORT={}\n", config.port));

    if let Some(aw) = &config.appwrite {
        contents.push_str("\n# Appwrite collection holding search counters\n");
        contents.push_str(&format!("APPWRITE_ENDPOINT={}\n", aw.endpoint));
        contents.push_str(&format!("APPWRITE_PROJECT_ID={}\n", aw.project_id));
        contents.push_str(&format!("APPWRITE_DATABASE_ID={}\n", aw.database_id));
        contents.push_str(&format!("APPWRITE_COLLECTION_ID={}\n", aw.collection_id));
        contents.push_str(&format!("APPWRITE_API_KEY={}\n", aw.api_key));
    }

    contents
}

#[derive(Debug, Clone)]
struct OnboardingState {
    step: usize,
    values: [String; 7],
    exit_requested: bool,
}

impl OnboardingState {
    fn new() -> Self {
        let mut values: [String; 7] = Default::default();
        values[1] = DEFAULT_PORT.to_string();
        values[2] = DEFAULT_APPWRITE_ENDPOINT.to_string();
        Self {
            step: 0,
            values,
            exit_requested: false,
        }
    }

    fn value(&self, field: Field) -> &str {
        self.values[field as usize].trim()
    }

    fn is_complete(&self) -> bool {
        !self.value(Field::TmdbApiKey).is_empty()
    }

    fn build_config(&self) -> anyhow::Result<OnboardingConfig> {
        if !self.is_complete() {
            return Err(anyhow::anyhow!("TMDB API key is required"));
        }

        let port_str = self.value(Field::Port);
        let port: u16 = if port_str.is_empty() {
            3000
        } else {
            port_str
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid port"))?
        };

        let appwrite = if self.value(Field::AppwriteProjectId).is_empty() {
            None
        } else {
            let required = [
                Field::AppwriteEndpoint,
                Field::AppwriteDatabaseId,
                Field::AppwriteCollectionId,
                Field::AppwriteApiKey,
            ];
            if let Some(missing) = required.iter().find(|f| self.value(**f).is_empty()) {
                return Err(anyhow::anyhow!("{} is required", missing.label()));
            }
            Some(AppwriteSettings {
                endpoint: self.value(Field::AppwriteEndpoint).to_string(),
                project_id: self.value(Field::AppwriteProjectId).to_string(),
                database_id: self.value(Field::AppwriteDatabaseId).to_string(),
                collection_id: self.value(Field::AppwriteCollectionId).to_string(),
                api_key: self.value(Field::AppwriteApiKey).to_string(),
            })
        };

        Ok(OnboardingConfig {
            tmdb_api_key: self.value(Field::TmdbApiKey).to_string(),
            port,
            appwrite,
        })
    }
}

fn handle_key_event(state: &mut OnboardingState, key: KeyEvent) -> bool {
    let last = FIELDS.len() - 1;
    match key.code {
        KeyCode::Esc => {
            state.exit_requested = true;
            false
        }
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.is_complete()
        }
        KeyCode::Enter => {
            if state.step < last {
                state.step += 1;
                false
            } else {
                state.is_complete()
            }
        }
        KeyCode::Tab | KeyCode::Down => {
            if state.step < last {
                state.step += 1;
            }
            false
        }
        KeyCode::Up | KeyCode::BackTab => {
            if state.step > 0 {
                state.step -= 1;
            }
            false
        }
        KeyCode::Backspace => {
            state.values[state.step].pop();
            false
        }
        KeyCode::Char(c) => {
            if FIELDS[state.step] == Field::Port {
                if c.is_ascii_digit() {
                    state.values[state.step].push(c);
                }
            } else {
                state.values[state.step].push(c);
            }
            false
        }
        _ => false,
    }
}

fn render_onboarding(f: &mut ratatui::Frame, state: &OnboardingState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(3 * FIELDS.len() as u16),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new(Line::from(vec![Span::styled(
        "ReelFinder Setup",
        Style::default().add_modifier(Modifier::BOLD),
    )]))
    .block(Block::default().borders(Borders::BOTTOM));

    f.render_widget(title, layout[0]);

    let intro = Paragraph::new(vec![
        Line::from("This setup runs once and writes a .env file."),
        Line::from("Leave the Appwrite project blank to run without trending searches."),
        Line::from(""),
        Line::from("Controls: Enter/Tab next, Up/Shift+Tab previous, Ctrl+S save, Esc quit."),
    ])
    .block(Block::default().borders(Borders::NONE));

    f.render_widget(intro, layout[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(FIELDS.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[2]);

    for (index, field) in FIELDS.iter().enumerate() {
        render_field(
            f,
            rows[index],
            field.label(),
            &state.values[index],
            state.step == index,
        );
    }

    let (message, status_style) = if state.is_complete() {
        ("Ready to save", Style::default().fg(Color::Green))
    } else {
        ("TMDB token required", Style::default().fg(Color::Red))
    };

    let status = Paragraph::new(Line::from(vec![Span::styled(message, status_style)]))
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, layout[3]);
}

fn render_field(
    f: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    label: &str,
    value: &str,
    active: bool,
) {
    let title = if active {
        format!("{} (editing)", label)
    } else {
        label.to_string()
    };

    let style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let block = Block::default().title(title).borders(Borders::ALL).border_style(style);
    let paragraph = Paragraph::new(value).block(block).style(style);
    f.render_widget(paragraph, area);
}
