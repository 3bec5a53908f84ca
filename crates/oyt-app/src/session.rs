//! Interactive session against a virtual studio page.
//!
//! The page watcher and field translators run exactly as they would in the
//! browser; stdin commands play the part of the user.

use std::fmt::Write as _;
use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use clap::ValueEnum;
use oyt_core::{ElementId, PageHost, PageKind, PageWatcher};
use oyt_page::fixtures::{edit_url, translations_url};
use oyt_page::{EditPage, PanelView, TranslationsPage, VirtualPage};
use oyt_translator::AUTO;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub const HELP: &str = "\
Commands:
  type <title|description> <text>   replace the field content (\\n for a line break)
  from <title|description> <code>   pick the source language
  to <title|description> <code>     pick the target language
  swap <title|description>          swap languages and contents
  goto <edit|translations>          navigate inside the studio
  hide | show                       hide or show the current editor
  status                            show every translation panel
  errors                            show the error log
  close-errors                      close the error log
  help                              this text
  quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageChoice {
    Edit,
    Translations,
}

impl From<PageChoice> for PageKind {
    fn from(choice: PageChoice) -> Self {
        match choice {
            PageChoice::Edit => PageKind::VideoEdit,
            PageChoice::Translations => PageKind::VideoTranslations,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName {
    Title,
    Description,
}

impl FieldName {
    fn parse(word: &str) -> anyhow::Result<Self> {
        match word {
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            other => bail!("unknown field '{other}', expected title or description"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Type(FieldName, String),
    From(FieldName, String),
    To(FieldName, String),
    Swap(FieldName),
    Goto(PageKind),
    Hide,
    Show,
    Status,
    Errors,
    CloseErrors,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim_start();
        let (first, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));

        let field = || FieldName::parse(first);
        let argument = |what: &str| {
            let tail = tail.trim();
            if tail.is_empty() {
                Err(anyhow!("missing {what}"))
            } else {
                Ok(tail.to_string())
            }
        };

        let command = match verb {
            "type" => Command::Type(field()?, tail.replace("\\n", "\n")),
            "from" => Command::From(field()?, argument("language code")?),
            "to" => Command::To(field()?, argument("language code")?),
            "swap" => Command::Swap(field()?),
            "goto" => match first {
                "edit" => Command::Goto(PageKind::VideoEdit),
                "translations" => Command::Goto(PageKind::VideoTranslations),
                other => bail!("unknown page '{other}', expected edit or translations"),
            },
            "hide" => Command::Hide,
            "show" => Command::Show,
            "status" => Command::Status,
            "errors" => Command::Errors,
            "close-errors" => Command::CloseErrors,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command '{other}', try help"),
        };
        Ok(Some(command))
    }
}

/// Both studio editors built into one page; only the current one is shown
pub struct Studio {
    pub page: Arc<VirtualPage>,
    pub edit: EditPage,
    pub translations: TranslationsPage,
    video_id: String,
    current: PageKind,
}

impl Studio {
    pub fn new(video_id: &str, target_language: &str, start: PageKind) -> Self {
        let page = Arc::new(VirtualPage::new("https://studio.youtube.com/"));
        let edit = EditPage::build(&page, video_id);
        let translations = TranslationsPage::build(&page, video_id, target_language);
        page.set_text(translations.original_title, "Original title");
        page.set_text(
            translations.original_description,
            "Original description\nsecond line",
        );

        let mut studio = Self {
            page,
            edit,
            translations,
            video_id: video_id.to_string(),
            current: start,
        };
        studio.goto(start);
        studio
    }

    pub fn current(&self) -> PageKind {
        self.current
    }

    pub fn goto(&mut self, kind: PageKind) {
        self.page
            .set_hidden(self.edit.editor, kind != PageKind::VideoEdit);
        self.page
            .set_hidden(self.translations.dialog, kind != PageKind::VideoTranslations);
        self.page.navigate(match kind {
            PageKind::VideoEdit => edit_url(&self.video_id),
            PageKind::VideoTranslations => translations_url(&self.video_id),
        });
        self.current = kind;
    }

    fn container(&self) -> ElementId {
        match self.current {
            PageKind::VideoEdit => self.edit.editor,
            PageKind::VideoTranslations => self.translations.dialog,
        }
    }

    /// Input and panel anchor of `field` on the current page
    pub fn field(&self, field: FieldName) -> (ElementId, ElementId) {
        match (self.current, field) {
            (PageKind::VideoEdit, FieldName::Title) => (self.edit.title, self.edit.title_anchor),
            (PageKind::VideoEdit, FieldName::Description) => {
                (self.edit.description, self.edit.description_anchor)
            }
            (PageKind::VideoTranslations, FieldName::Title) => {
                (self.translations.title, self.translations.title_anchor)
            }
            (PageKind::VideoTranslations, FieldName::Description) => (
                self.translations.description,
                self.translations.description_anchor,
            ),
        }
    }

    /// Field contents and the panel mounted beside each
    pub fn status(&self) -> String {
        let mut out = format!("{}\n", self.page.current_url());

        for field in [FieldName::Title, FieldName::Description] {
            let (input, _) = self.field(field);
            let content = self.page.text(input).unwrap_or_default();
            let _ = writeln!(out, "{field:?}: {content:?}");

            match self.panel(field) {
                Ok(panel) => {
                    let from = if panel.from == AUTO {
                        panel.auto_label.as_str()
                    } else {
                        panel.from.as_str()
                    };
                    let _ = writeln!(
                        out,
                        "  [{from} {} {}] {}",
                        panel.spec.arrow, panel.to, panel.output
                    );
                }
                Err(_) => {
                    let _ = writeln!(out, "  (no panel)");
                }
            }
        }
        out
    }

    fn panel(&self, field: FieldName) -> anyhow::Result<PanelView> {
        let (_, anchor) = self.field(field);
        self.page
            .panel_on(anchor)
            .ok_or_else(|| anyhow!("no translation panel on the {field:?} field yet"))
    }
}

pub enum Reply {
    Text(String),
    Quit,
}

pub struct Session {
    studio: Studio,
}

impl Session {
    pub fn new(studio: Studio) -> Self {
        Self { studio }
    }

    pub fn studio(&self) -> &Studio {
        &self.studio
    }

    pub fn execute(&mut self, command: Command) -> anyhow::Result<Reply> {
        let studio = &mut self.studio;
        let page = Arc::clone(&studio.page);

        let text = match command {
            Command::Type(field, text) => {
                let (input, _) = studio.field(field);
                page.type_text(input, &text);
                String::new()
            }
            Command::From(field, code) => {
                page.select_from(studio.panel(field)?.id, &code);
                String::new()
            }
            Command::To(field, code) => {
                page.select_to(studio.panel(field)?.id, &code);
                String::new()
            }
            Command::Swap(field) => {
                page.press_swap(studio.panel(field)?.id);
                String::new()
            }
            Command::Goto(kind) => {
                studio.goto(kind);
                format!("now on {}", page.current_url())
            }
            Command::Hide => {
                page.set_hidden(studio.container(), true);
                String::new()
            }
            Command::Show => {
                page.set_hidden(studio.container(), false);
                String::new()
            }
            Command::Status => studio.status(),
            Command::Errors => match page.error_log() {
                Some(log) if !log.entries.is_empty() => {
                    let state = if log.visible { "open" } else { "closed" };
                    format!("{} ({state}):\n{}", log.title, log.entries.join("\n"))
                }
                _ => "no errors".to_string(),
            },
            Command::CloseErrors => {
                page.close_error_log();
                String::new()
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Text(text))
    }
}

pub struct SessionOptions {
    pub page: PageChoice,
    pub video_id: String,
    pub target_language: String,
}

impl SessionOptions {
    pub fn studio(&self) -> Studio {
        Studio::new(&self.video_id, &self.target_language, self.page.into())
    }
}

/// Run the watcher on `studio` and feed it commands read from `input`.
///
/// The watcher is always stopped and awaited before returning, also when
/// reading `input` fails.
pub async fn run<R>(
    state: AppState,
    studio: Studio,
    input: R,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let host: Arc<dyn PageHost> = studio.page.clone();
    let watcher = PageWatcher::new(
        host,
        Arc::clone(&state.translator),
        Arc::clone(&state.store),
        state.config.watcher.clone(),
    )
    .context("invalid watcher configuration")?;

    let cancel = CancellationToken::new();
    let watcher_task = tokio::spawn(watcher.run(cancel.clone()));

    let mut session = Session::new(studio);
    let mut lines = input.lines();
    println!("{HELP}");
    tokio::pin!(shutdown);

    let result = loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested");
                break Ok(());
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break Ok(()),
                    Err(e) => break Err(anyhow::Error::new(e).context("failed to read input")),
                };
                let command = match Command::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match session.execute(command) {
                    Ok(Reply::Text(text)) if text.is_empty() => {}
                    Ok(Reply::Text(text)) => println!("{}", text.trim_end()),
                    Ok(Reply::Quit) => break Ok(()),
                    Err(e) => println!("{e}"),
                }
            }
        }
    };

    cancel.cancel();
    if let Err(e) = watcher_task.await {
        tracing::error!("watcher task panicked: {e}");
    }
    result
}
