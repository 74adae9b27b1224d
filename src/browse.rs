//! Interactive release → CVE → detail browser.
//!
//! Every selection runs exactly one fetch on the calling thread and redraws
//! the screen with the result.

use crate::api::Glvd;
use crate::errors::*;
use crate::format;
use crate::model::{CveDetailsWithContext, VulnerabilitySummary};
use crate::style::{Presenter, Tag};
use crate::terminal::{self, TerminalGuard};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{
    Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState,
};
use ratatui::Frame;

const HELP: &str = "↑/↓ move  enter select  esc back  q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Versions,
    Cves,
    Detail,
}

fn tag_style(tag: Tag) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match tag {
        Tag::Plain | Tag::Value => Style::default(),
        Tag::Header => bold.fg(Color::Cyan),
        Tag::Label => bold.fg(Color::Yellow),
        Tag::Important | Tag::Critical => bold.fg(Color::Red),
        Tag::Fixed => bold.fg(Color::Green),
        Tag::High => bold.fg(Color::Magenta),
        Tag::Medium => bold.fg(Color::Yellow),
    }
}

fn detail_text(detail: &CveDetailsWithContext) -> Result<String> {
    let mut buf = Vec::new();
    format::write_detail(&mut buf, Presenter::Plain, detail)?;
    Ok(String::from_utf8(buf)?)
}

pub struct Browser {
    pub screen: Screen,
    versions: Vec<String>,
    version_state: ListState,
    version: Option<String>,
    summaries: Vec<VulnerabilitySummary>,
    cve_state: TableState,
    cve_id: Option<String>,
    detail: String,
    scroll: u16,
    status: Option<String>,
}

impl Browser {
    pub fn new(versions: Vec<String>) -> Self {
        let selected = if versions.is_empty() { None } else { Some(0) };
        Browser {
            screen: Screen::Versions,
            versions,
            version_state: ListState::default().with_selected(selected),
            version: None,
            summaries: Vec::new(),
            cve_state: TableState::default(),
            cve_id: None,
            detail: String::new(),
            scroll: 0,
            status: None,
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns `false` once the user asked to quit.
    pub async fn handle_key<G: Glvd + ?Sized>(&mut self, glvd: &G, key: KeyCode) -> Result<bool> {
        match key {
            KeyCode::Char('q') => return Ok(false),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => match self.screen {
                Screen::Versions => return Ok(false),
                Screen::Cves => self.screen = Screen::Versions,
                Screen::Detail => self.screen = Screen::Cves,
            },
            KeyCode::Up | KeyCode::Char('k') => self.move_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_by(1),
            KeyCode::Enter => self.select(glvd).await?,
            _ => (),
        }
        Ok(true)
    }

    fn move_by(&mut self, delta: i32) {
        fn step(current: Option<usize>, len: usize, delta: i32) -> Option<usize> {
            if len == 0 {
                return None;
            }
            let current = current.unwrap_or(0) as i64 + delta as i64;
            Some(current.clamp(0, len as i64 - 1) as usize)
        }

        match self.screen {
            Screen::Versions => {
                let idx = step(self.version_state.selected(), self.versions.len(), delta);
                self.version_state.select(idx);
            }
            Screen::Cves => {
                let idx = step(self.cve_state.selected(), self.summaries.len(), delta);
                self.cve_state.select(idx);
            }
            Screen::Detail => {
                self.scroll = if delta < 0 {
                    self.scroll.saturating_sub(1)
                } else {
                    self.scroll.saturating_add(1)
                };
            }
        }
    }

    async fn select<G: Glvd + ?Sized>(&mut self, glvd: &G) -> Result<()> {
        match self.screen {
            Screen::Versions => {
                let Some(version) = self.version_state.selected().and_then(|i| self.versions.get(i))
                else {
                    return Ok(());
                };
                let version = version.clone();

                match glvd.fetch_summaries(&version).await {
                    Ok(summaries) => {
                        let selected = if summaries.is_empty() { None } else { Some(0) };
                        self.cve_state = TableState::default().with_selected(selected);
                        self.summaries = summaries;
                        self.version = Some(version);
                        self.screen = Screen::Cves;
                        self.status = None;
                    }
                    Err(err) => self.failed(format!("Failed to fetch cves for {:?}", version), err),
                }
            }
            Screen::Cves => {
                let Some(summary) = self.cve_state.selected().and_then(|i| self.summaries.get(i))
                else {
                    return Ok(());
                };
                let cve_id = summary.cve_id.clone();

                match glvd.fetch_detail(&cve_id).await {
                    Ok(detail) => {
                        self.detail = detail_text(&detail)?;
                        self.cve_id = Some(cve_id);
                        self.scroll = 0;
                        self.screen = Screen::Detail;
                        self.status = None;
                    }
                    Err(err) => {
                        self.failed(format!("Failed to fetch details for {:?}", cve_id), err)
                    }
                }
            }
            Screen::Detail => (),
        }
        Ok(())
    }

    fn failed(&mut self, msg: String, err: Error) {
        // stderr is hidden behind the alternate screen, the status line shows the error
        debug!("{}: {:#}", msg, err);
        self.status = Some(format!("{}: {:#}", msg, err));
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let [main, footer] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

        match self.screen {
            Screen::Versions => self.draw_versions(frame, main),
            Screen::Cves => self.draw_cves(frame, main),
            Screen::Detail => self.draw_detail(frame, main),
        }

        let footer_text = match &self.status {
            Some(status) => Paragraph::new(status.as_str()).style(tag_style(Tag::Important)),
            None => Paragraph::new(HELP).style(Style::default().add_modifier(Modifier::DIM)),
        };
        frame.render_widget(footer_text, footer);
    }

    fn draw_versions(&mut self, frame: &mut Frame, area: Rect) {
        let items = self
            .versions
            .iter()
            .map(|v| ListItem::new(v.as_str()))
            .collect::<Vec<_>>();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Garden Linux Versions "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.version_state);
    }

    fn draw_cves(&mut self, frame: &mut Frame, area: Rect) {
        let header = Row::new(format::SUMMARY_COLUMNS.iter().map(|c| Cell::from(c.label)))
            .style(tag_style(Tag::Label));
        let widths = format::SUMMARY_COLUMNS
            .iter()
            .map(|c| Constraint::Length(c.width as u16))
            .collect::<Vec<_>>();
        let rows = self
            .summaries
            .iter()
            .map(|summary| {
                Row::new(
                    format::summary_row(summary)
                        .into_iter()
                        .map(|cell| Cell::from(cell.text).style(tag_style(cell.tag))),
                )
            })
            .collect::<Vec<_>>();

        let title = format!(
            " CVEs for {} ({}) ",
            self.version.as_deref().unwrap_or_default(),
            self.summaries.len()
        );
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(table, area, &mut self.cve_state);
    }

    fn draw_detail(&mut self, frame: &mut Frame, area: Rect) {
        let title = format!(" {} ", self.cve_id.as_deref().unwrap_or_default());
        let paragraph = Paragraph::new(self.detail.as_str())
            .block(Block::default().borders(Borders::ALL).title(title))
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }
}

pub async fn run<G: Glvd + ?Sized>(glvd: &G) -> Result<()> {
    let versions = glvd.fetch_versions().await?;
    if versions.is_empty() {
        println!("{}", format::NO_VERSIONS);
        return Ok(());
    }

    let mut browser = Browser::new(versions);
    let _guard = TerminalGuard::setup()?;
    let mut terminal = terminal::create_terminal()?;

    loop {
        terminal.draw(|frame| browser.draw(frame))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && !browser.handle_key(glvd, key.code).await? {
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CveDetail;
    use async_trait::async_trait;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Fake {
        calls: Mutex<Vec<String>>,
    }

    impl Fake {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Glvd for Fake {
        async fn fetch_versions(&self) -> Result<Vec<String>> {
            self.calls.lock().unwrap().push("versions".to_string());
            Ok(vec!["1443.3".to_string(), "1592.0".to_string()])
        }

        async fn fetch_summaries(&self, version: &str) -> Result<Vec<VulnerabilitySummary>> {
            self.calls.lock().unwrap().push(format!("cves/{}", version));
            if version == "1443.3" {
                bail!("connection reset");
            }
            Ok(vec![
                VulnerabilitySummary {
                    cve_id: "CVE-2024-0001".to_string(),
                    base_score: 9.8,
                    is_vulnerable: true,
                    source_package_name: "openssl".to_string(),
                    ..Default::default()
                },
                VulnerabilitySummary {
                    cve_id: "CVE-2024-0002".to_string(),
                    source_package_name: "curl".to_string(),
                    ..Default::default()
                },
            ])
        }

        async fn fetch_detail(&self, cve_id: &str) -> Result<CveDetailsWithContext> {
            self.calls.lock().unwrap().push(format!("cveDetails/{}", cve_id));
            Ok(CveDetailsWithContext {
                details: CveDetail {
                    cve_id: cve_id.to_string(),
                    vuln_status: "Analyzed".to_string(),
                    ..Default::default()
                },
                contexts: vec![],
            })
        }
    }

    async fn press(browser: &mut Browser, fake: &Fake, keys: &[KeyCode]) -> Result<bool> {
        let mut running = true;
        for key in keys {
            running = browser.handle_key(fake, *key).await?;
        }
        Ok(running)
    }

    fn screen_text(browser: &mut Browser) -> Result<String> {
        let mut terminal = Terminal::new(TestBackend::new(140, 60))?;
        terminal.draw(|frame| browser.draw(frame))?;
        let buffer = terminal.backend().buffer();
        let text = buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(text)
    }

    fn new_browser() -> Browser {
        Browser::new(vec!["1443.3".to_string(), "1592.0".to_string()])
    }

    #[tokio::test]
    async fn test_one_fetch_per_selection() -> Result<()> {
        let fake = Fake::default();
        let mut browser = new_browser();

        let keys = [KeyCode::Down, KeyCode::Enter, KeyCode::Down, KeyCode::Enter];
        assert!(press(&mut browser, &fake, &keys).await?);
        assert_eq!(browser.screen, Screen::Detail);
        assert_eq!(fake.calls(), vec!["cves/1592.0", "cveDetails/CVE-2024-0002"]);

        let text = screen_text(&mut browser)?;
        assert!(text.contains("CVE ID: CVE-2024-0002"));
        assert!(text.contains("Status: Analyzed"));
        assert!(text.contains(format::NO_CONTEXT));
        Ok(())
    }

    #[tokio::test]
    async fn test_cve_table() -> Result<()> {
        let fake = Fake::default();
        let mut browser = new_browser();
        press(&mut browser, &fake, &[KeyCode::Down, KeyCode::Enter]).await?;
        assert_eq!(browser.screen, Screen::Cves);

        let text = screen_text(&mut browser)?;
        assert!(text.contains("CVEs for 1592.0 (2)"));
        assert!(text.contains("CVE ID"));
        assert!(text.contains("CVE-2024-0001"));
        assert!(text.contains("YES"));
        assert!(text.contains(" 9.8"));
        assert!(text.contains("curl"));
        Ok(())
    }

    #[tokio::test]
    async fn test_back_and_quit() -> Result<()> {
        let fake = Fake::default();
        let mut browser = new_browser();

        let keys = [KeyCode::Down, KeyCode::Enter, KeyCode::Enter, KeyCode::Esc];
        assert!(press(&mut browser, &fake, &keys).await?);
        assert_eq!(browser.screen, Screen::Cves);

        assert!(press(&mut browser, &fake, &[KeyCode::Char('b')]).await?);
        assert_eq!(browser.screen, Screen::Versions);

        assert!(!press(&mut browser, &fake, &[KeyCode::Esc]).await?);
        assert!(!press(&mut new_browser(), &fake, &[KeyCode::Char('q')]).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_fetch_stays_on_screen() -> Result<()> {
        let fake = Fake::default();
        let mut browser = new_browser();

        assert!(press(&mut browser, &fake, &[KeyCode::Enter]).await?);
        assert_eq!(browser.screen, Screen::Versions);
        assert_eq!(fake.calls(), vec!["cves/1443.3"]);
        assert!(browser.status().unwrap().contains("connection reset"));

        let text = screen_text(&mut browser)?;
        assert!(text.contains("Failed to fetch cves for \"1443.3\""));

        press(&mut browser, &fake, &[KeyCode::Down, KeyCode::Enter]).await?;
        assert_eq!(browser.screen, Screen::Cves);
        assert_eq!(browser.status(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_selection_is_clamped() -> Result<()> {
        let fake = Fake::default();
        let mut browser = new_browser();

        let keys = [KeyCode::Up, KeyCode::Up, KeyCode::Down, KeyCode::Down, KeyCode::Down];
        press(&mut browser, &fake, &keys).await?;
        press(&mut browser, &fake, &[KeyCode::Enter]).await?;
        assert_eq!(fake.calls(), vec!["cves/1592.0"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_no_versions_selects_nothing() -> Result<()> {
        let fake = Fake::default();
        let mut browser = Browser::new(vec![]);
        press(&mut browser, &fake, &[KeyCode::Down, KeyCode::Enter]).await?;
        assert_eq!(browser.screen, Screen::Versions);
        assert!(fake.calls().is_empty());
        Ok(())
    }
}
