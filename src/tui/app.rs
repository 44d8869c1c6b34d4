//! Main TUI application.
//!
//! Handles:
//! - Terminal setup and teardown
//! - Input event dispatch to the wizard
//! - Rendering the screen for the current step

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::application::RiskEngine;

use super::ui::{
    edit::render_edit, entry::render_entry, render_disclaimer, result::render_result,
    selection::render_selection,
};
use super::wizard::{Wizard, WizardCommand, WizardStep};

/// Main application state
pub struct App {
    engine: RiskEngine,
    wizard: Wizard,
    should_quit: bool,
}

impl App {
    /// Create an application over a configured engine.
    #[must_use]
    pub fn new(engine: RiskEngine) -> Self {
        Self {
            engine,
            wizard: Wizard::default(),
            should_quit: false,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore the terminal even if the loop failed.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match self.wizard.step {
                    WizardStep::CollectAge | WizardStep::CollectProbability => {
                        render_entry(f, content_area, &self.wizard);
                    }
                    WizardStep::SelectTest => {
                        render_selection(f, content_area, &self.wizard, self.engine.catalog());
                    }
                    WizardStep::ShowResult => render_result(f, content_area, &self.wizard),
                    WizardStep::Edit => render_edit(f, content_area, &self.wizard),
                }

                render_disclaimer(f, disclaimer_area);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let before = self.wizard.step;
        if self.wizard.handle_key(key, &self.engine) == WizardCommand::Quit {
            self.should_quit = true;
        }
        if before != self.wizard.step {
            tracing::debug!("Wizard step {:?} -> {:?}", before, self.wizard.step);
        }
    }
}
