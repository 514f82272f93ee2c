//! Main application logic and TUI event loop.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::cli::AppConfig;
use crate::data::{ChartKind, ChartRecord, ChartStore};
use crate::editor::{EditField, EditorState};
use crate::ui::{
    chart::{BarPreview, PiePreview},
    editor::{InputPrompt, RowPanel},
    saved::{RecordDetails, SavedList},
    widgets::{ScreenTabs, StatusBar, StatusMessage},
    HelpOverlay, Theme,
};

/// Which screen is currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    BarEditor,
    PieEditor,
    SavedBar,
    SavedPie,
}

const SCREEN_TITLES: [&str; 4] = ["Bar Chart", "Pie Chart", "Saved Bar", "Saved Pie"];

impl Screen {
    fn next(self) -> Self {
        match self {
            Screen::BarEditor => Screen::PieEditor,
            Screen::PieEditor => Screen::SavedBar,
            Screen::SavedBar => Screen::SavedPie,
            Screen::SavedPie => Screen::BarEditor,
        }
    }

    fn prev(self) -> Self {
        match self {
            Screen::BarEditor => Screen::SavedPie,
            Screen::PieEditor => Screen::BarEditor,
            Screen::SavedBar => Screen::PieEditor,
            Screen::SavedPie => Screen::SavedBar,
        }
    }

    fn index(self) -> usize {
        match self {
            Screen::BarEditor => 0,
            Screen::PieEditor => 1,
            Screen::SavedBar => 2,
            Screen::SavedPie => 3,
        }
    }

    fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Screen::BarEditor),
            1 => Some(Screen::PieEditor),
            2 => Some(Screen::SavedBar),
            3 => Some(Screen::SavedPie),
            _ => None,
        }
    }
}

/// Browser state for one saved-chart collection
struct SavedState {
    kind: ChartKind,
    records: Vec<ChartRecord>,
    selected: usize,
}

impl SavedState {
    fn new(kind: ChartKind) -> Self {
        SavedState {
            kind,
            records: Vec::new(),
            selected: 0,
        }
    }

    fn refresh(&mut self, store: &ChartStore) {
        self.records = store.load(self.kind);
        if self.selected >= self.records.len() {
            self.selected = self.records.len().saturating_sub(1);
        }
    }

    fn select_next(&mut self) {
        if !self.records.is_empty() {
            self.selected = (self.selected + 1) % self.records.len();
        }
    }

    fn select_prev(&mut self) {
        if !self.records.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.records.len() - 1);
        }
    }

    fn selected_record(&self) -> Option<&ChartRecord> {
        self.records.get(self.selected)
    }
}

/// Application state
pub struct App {
    theme: Theme,
    store: ChartStore,

    bar_editor: EditorState,
    pie_editor: EditorState,
    saved_bar: SavedState,
    saved_pie: SavedState,

    screen: Screen,
    show_help: bool,
    message: Option<StatusMessage>,
    should_quit: bool,
}

impl App {
    /// Create a new App instance
    pub fn new(config: AppConfig) -> Self {
        let store = ChartStore::new(config.data_dir.clone());
        let screen = match config.start_chart {
            ChartKind::Bar => Screen::BarEditor,
            ChartKind::Pie => Screen::PieEditor,
        };

        App {
            theme: Theme::default(),
            store,
            bar_editor: EditorState::new(ChartKind::Bar, config.color_palette.clone()),
            pie_editor: EditorState::new(ChartKind::Pie, config.color_palette),
            saved_bar: SavedState::new(ChartKind::Bar),
            saved_pie: SavedState::new(ChartKind::Pie),
            screen,
            show_help: false,
            message: None,
            should_quit: false,
        }
    }

    fn current_editor_mut(&mut self) -> Option<&mut EditorState> {
        match self.screen {
            Screen::BarEditor => Some(&mut self.bar_editor),
            Screen::PieEditor => Some(&mut self.pie_editor),
            _ => None,
        }
    }

    fn current_saved_mut(&mut self) -> Option<&mut SavedState> {
        match self.screen {
            Screen::SavedBar => Some(&mut self.saved_bar),
            Screen::SavedPie => Some(&mut self.saved_pie),
            _ => None,
        }
    }

    fn set_info(&mut self, message: String) {
        self.message = Some(StatusMessage::Info(message));
    }

    fn set_error(&mut self, message: String) {
        self.message = Some(StatusMessage::Error(message));
    }

    /// Switch screens, reloading the record list when entering a browser
    fn switch_to(&mut self, screen: Screen) {
        self.screen = screen;
        if let Some(saved) = self.current_saved_mut() {
            let kind = saved.kind;
            self.refresh_saved(kind);
        }
    }

    fn refresh_saved(&mut self, kind: ChartKind) {
        let saved = match kind {
            ChartKind::Bar => &mut self.saved_bar,
            ChartKind::Pie => &mut self.saved_pie,
        };
        saved.refresh(&self.store);
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: KeyCode) {
        // A text edit captures everything except its own finish keys
        if self
            .current_editor_mut()
            .is_some_and(|ed| ed.is_editing())
        {
            self.handle_edit_input(key);
            return;
        }

        self.message = None;

        // Global shortcuts
        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => {
                self.show_help = !self.show_help;
                return;
            }
            KeyCode::Esc if self.show_help => {
                self.show_help = false;
                return;
            }
            KeyCode::Tab => {
                self.switch_to(self.screen.next());
                return;
            }
            KeyCode::BackTab => {
                self.switch_to(self.screen.prev());
                return;
            }
            _ => {}
        }

        // If help is shown, don't process other keys
        if self.show_help {
            return;
        }

        // Screen selection with number keys
        if let KeyCode::Char(c) = key {
            if let Some(n) = c.to_digit(10) {
                if let Some(screen) = (n as usize)
                    .checked_sub(1)
                    .and_then(Screen::from_index)
                {
                    self.switch_to(screen);
                    return;
                }
            }
        }

        match self.screen {
            Screen::BarEditor | Screen::PieEditor => self.handle_editor_keys(key),
            Screen::SavedBar | Screen::SavedPie => self.handle_saved_keys(key),
        }
    }

    /// Keys while a row field edit is in progress
    fn handle_edit_input(&mut self, key: KeyCode) {
        let Some(editor) = self.current_editor_mut() else {
            return;
        };
        match key {
            KeyCode::Enter => match editor.commit_edit() {
                Ok(()) => self.message = None,
                Err(msg) => self.set_error(msg),
            },
            KeyCode::Esc => editor.cancel_edit(),
            KeyCode::Backspace => editor.pop_char(),
            KeyCode::Char(c) => editor.push_char(c),
            _ => {}
        }
    }

    fn handle_editor_keys(&mut self, key: KeyCode) {
        let Some(editor) = self.current_editor_mut() else {
            return;
        };
        match key {
            KeyCode::Down | KeyCode::Char('j') => editor.select_next(),
            KeyCode::Up | KeyCode::Char('k') => editor.select_prev(),
            KeyCode::Char('a') => editor.add_row(),
            KeyCode::Char('d') => {
                if !editor.remove_selected() {
                    self.set_info("A chart needs at least one data row".to_string());
                }
            }
            KeyCode::Char('l') => editor.begin_edit(EditField::Label),
            KeyCode::Char('v') => editor.begin_edit(EditField::Value),
            KeyCode::Char('c') => editor.begin_edit(EditField::Color),
            KeyCode::Char('s') => {
                editor.load_sample();
                self.set_info("Sample data loaded".to_string());
            }
            KeyCode::Char('n') => {
                editor.randomize();
                let count = editor.rows.len();
                self.set_info(format!("Generated {count} data points"));
            }
            KeyCode::Char('w') => self.save_current_chart(),
            _ => {}
        }
    }

    fn save_current_chart(&mut self) {
        let Some(editor) = self.current_editor_mut() else {
            return;
        };
        let draft = editor.draft();
        let kind = draft.kind;
        match self.store.save(draft) {
            Ok(_) => {
                self.set_info(format!("{} chart saved", capitalize(kind.display_name())));
                self.refresh_saved(kind);
            }
            Err(e) => self.set_error(format!("could not save chart: {e}")),
        }
    }

    fn handle_saved_keys(&mut self, key: KeyCode) {
        let Some(saved) = self.current_saved_mut() else {
            return;
        };
        let kind = saved.kind;
        match key {
            KeyCode::Down | KeyCode::Char('j') => saved.select_next(),
            KeyCode::Up | KeyCode::Char('k') => saved.select_prev(),
            KeyCode::Char('r') => {
                self.refresh_saved(kind);
                self.set_info("Saved charts reloaded".to_string());
            }
            KeyCode::Char('x') => {
                let Some(id) = saved.selected_record().map(|r| r.id.clone()) else {
                    return;
                };
                match self.store.delete(&id, kind) {
                    Ok(()) => {
                        self.refresh_saved(kind);
                        self.set_info("Chart deleted".to_string());
                    }
                    Err(e) => self.set_error(format!("could not delete chart: {e}")),
                }
            }
            _ => {}
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let size = frame.area();

        let editing_input = match self.screen {
            Screen::BarEditor => self.bar_editor.input.as_ref(),
            Screen::PieEditor => self.pie_editor.input.as_ref(),
            _ => None,
        };

        let mut constraints = vec![
            Constraint::Length(2), // Tabs
            Constraint::Min(5),    // Body
        ];
        if editing_input.is_some() {
            constraints.push(Constraint::Length(2)); // Input prompt
        }
        constraints.push(Constraint::Length(2)); // Status bar

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(size);

        let tabs = ScreenTabs::new(&SCREEN_TITLES, self.screen.index(), &self.theme);
        tabs.render(frame, chunks[0]);

        match self.screen {
            Screen::BarEditor => self.render_editor(frame, chunks[1], &self.bar_editor),
            Screen::PieEditor => self.render_editor(frame, chunks[1], &self.pie_editor),
            Screen::SavedBar => self.render_saved(frame, chunks[1], &self.saved_bar),
            Screen::SavedPie => self.render_saved(frame, chunks[1], &self.saved_pie),
        }

        if let Some(input) = editing_input {
            let prompt = InputPrompt::new(input, &self.theme);
            prompt.render(frame, chunks[2]);
        }

        let hints = match self.screen {
            Screen::BarEditor | Screen::PieEditor => {
                " [a]dd [d]elete [l]abel [v]alue [c]olor [s]ample [n]random [w]save | Tab: screens [h] Help [q] Quit "
            }
            Screen::SavedBar | Screen::SavedPie => {
                " [j/k] select [x] delete [r] refresh | Tab: screens [h] Help [q] Quit "
            }
        };
        let status = StatusBar::new(hints, self.message.as_ref(), &self.theme);
        status.render(frame, chunks[chunks.len() - 1]);

        // Render help overlay if active
        if self.show_help {
            let help = HelpOverlay::new(&self.theme);
            help.render(frame, size);
        }
    }

    fn render_editor(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect, editor: &EditorState) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(44), // Data rows
                Constraint::Min(30),    // Preview
            ])
            .split(area);

        let rows = RowPanel::new(editor, &self.theme);
        rows.render(frame, chunks[0], true);

        self.render_preview(frame, chunks[1], editor.kind, &editor.rows, "Preview");
    }

    fn render_saved(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect, saved: &SavedState) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(34), // Record list
                Constraint::Min(30),    // Preview + details
            ])
            .split(area);

        let list = SavedList::new(
            &saved.records,
            saved.selected,
            saved.kind.display_name(),
            &self.theme,
        );
        list.render(frame, chunks[0], true);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),    // Preview
                Constraint::Length(5), // Details
            ])
            .split(chunks[1]);

        if let Some(record) = saved.selected_record() {
            self.render_preview(frame, right[0], record.kind, &record.data, "Saved chart");
        } else {
            self.render_preview(frame, right[0], saved.kind, &[], "Saved chart");
        }

        let details = RecordDetails::new(saved.selected_record(), &self.theme);
        details.render(frame, right[1]);
    }

    fn render_preview(
        &self,
        frame: &mut ratatui::Frame,
        area: ratatui::layout::Rect,
        kind: ChartKind,
        points: &[crate::data::DataPoint],
        title: &str,
    ) {
        match kind {
            ChartKind::Bar => {
                let preview = BarPreview::new(points, title, &self.theme);
                preview.render(frame, area, false);
            }
            ChartKind::Pie => {
                let preview = PiePreview::new(points, title, &self.theme);
                preview.render(frame, area, false);
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Restore terminal to normal state
fn restore_terminal() {
    // Best effort cleanup - ignore errors since we may be in a panic
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Run the TUI application
pub fn run(config: AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        restore_terminal();
        return Err(e).context("Failed to setup terminal");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to create terminal");
        }
    };

    let mut app = App::new(config);

    // Main loop - always restore the terminal afterwards
    let result = run_main_loop(&mut terminal, &mut app);

    restore_terminal();
    terminal.show_cursor().ok();

    result
}

/// Main application loop
fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                // Ignore key release events on platforms that report them
                if key.kind == KeyEventKind::Press {
                    app.handle_input(key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::default_palette;
    use tempfile::TempDir;

    fn app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            start_chart: ChartKind::Bar,
            color_palette: default_palette(),
            data_dir: dir.path().to_path_buf(),
        };
        (dir, App::new(config))
    }

    #[test]
    fn test_screens_cycle() {
        let mut screen = Screen::BarEditor;
        for _ in 0..4 {
            screen = screen.next();
        }
        assert_eq!(screen, Screen::BarEditor);
        assert_eq!(Screen::BarEditor.prev(), Screen::SavedPie);
    }

    #[test]
    fn test_quit_key() {
        let (_dir, mut app) = app();
        app.handle_input(KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_tab_enters_browser_and_loads_records() {
        let (_dir, mut app) = app();
        // Save from the bar editor, then tab over to the bar browser
        app.handle_input(KeyCode::Char('w'));
        app.handle_input(KeyCode::Tab); // pie editor
        app.handle_input(KeyCode::Tab); // saved bar
        assert_eq!(app.screen, Screen::SavedBar);
        assert_eq!(app.saved_bar.records.len(), 1);
    }

    #[test]
    fn test_save_and_delete_through_keys() {
        let (_dir, mut app) = app();
        app.handle_input(KeyCode::Char('w'));
        assert_eq!(app.store.load(ChartKind::Bar).len(), 1);

        app.handle_input(KeyCode::Char('3')); // jump to saved bar screen
        assert_eq!(app.screen, Screen::SavedBar);
        app.handle_input(KeyCode::Char('x'));
        assert!(app.store.load(ChartKind::Bar).is_empty());
        assert!(app.saved_bar.records.is_empty());
    }

    #[test]
    fn test_editor_keys_edit_rows() {
        let (_dir, mut app) = app();
        app.handle_input(KeyCode::Char('a'));
        assert_eq!(app.bar_editor.rows.len(), 4);
        app.handle_input(KeyCode::Char('d'));
        assert_eq!(app.bar_editor.rows.len(), 3);
    }

    #[test]
    fn test_text_edit_captures_command_keys() {
        let (_dir, mut app) = app();
        app.handle_input(KeyCode::Char('l'));
        assert!(app.bar_editor.is_editing());
        // 'q' goes into the buffer instead of quitting
        app.handle_input(KeyCode::Char('q'));
        assert!(!app.should_quit);
        app.handle_input(KeyCode::Enter);
        assert!(app.bar_editor.rows[0].label.ends_with('q'));
    }

    #[test]
    fn test_successful_commit_clears_old_error() {
        let (_dir, mut app) = app();
        app.handle_input(KeyCode::Char('v'));
        app.handle_input(KeyCode::Char('x'));
        app.handle_input(KeyCode::Enter);
        assert!(matches!(app.message, Some(StatusMessage::Error(_))));

        // Fix the buffer and commit again; the error must not linger
        app.handle_input(KeyCode::Backspace);
        app.handle_input(KeyCode::Enter);
        assert!(app.message.is_none());
        assert!(!app.bar_editor.is_editing());
    }

    #[test]
    fn test_bar_save_does_not_touch_pie_collection() {
        let (_dir, mut app) = app();
        app.handle_input(KeyCode::Char('w'));
        assert!(app.store.load(ChartKind::Pie).is_empty());
    }
}
