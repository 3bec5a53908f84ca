use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};
use std::time::Duration;

use oyt_config::{Config, WatcherConfig};
use oyt_core::{MemoryStore, PageHost, PageKind, PageWatcher};
use tokio::io::{AsyncRead, BufReader, ReadBuf};
use tokio::time::{Sleep, sleep};
use tokio_util::sync::CancellationToken;

use super::ShoutTranslator;
use crate::session::{self, Command, FieldName, Reply, Session, Studio};
use crate::state::AppState;

/// Input that stays silent for a while, then fails
struct FailAfter {
    delay: Pin<Box<Sleep>>,
}

impl FailAfter {
    fn new(delay: Duration) -> Self {
        Self {
            delay: Box::pin(sleep(delay)),
        }
    }
}

impl AsyncRead for FailAfter {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        ready!(self.delay.as_mut().poll(cx));
        Poll::Ready(Err(io::Error::other("input closed abruptly")))
    }
}

fn shout_state() -> AppState {
    AppState {
        config: Config::default(),
        translator: Arc::new(ShoutTranslator),
        store: Arc::new(MemoryStore::new()),
    }
}

fn text(reply: Reply) -> String {
    match reply {
        Reply::Text(text) => text,
        Reply::Quit => panic!("unexpected quit"),
    }
}

#[test]
fn parses_field_commands() {
    assert_eq!(
        Command::parse("type title Hello\\nworld").unwrap(),
        Some(Command::Type(FieldName::Title, "Hello\nworld".to_string()))
    );
    assert_eq!(
        Command::parse("  to description de ").unwrap(),
        Some(Command::To(FieldName::Description, "de".to_string()))
    );
    assert_eq!(
        Command::parse("swap title").unwrap(),
        Some(Command::Swap(FieldName::Title))
    );
    assert_eq!(
        Command::parse("goto translations").unwrap(),
        Some(Command::Goto(PageKind::VideoTranslations))
    );
    assert_eq!(Command::parse("   ").unwrap(), None);
}

#[test]
fn rejects_malformed_commands() {
    assert!(Command::parse("type subtitle hi").is_err());
    assert!(Command::parse("from title").is_err());
    assert!(Command::parse("goto home").is_err());
    assert!(Command::parse("dance").is_err());
}

#[test]
fn studio_shows_one_editor_at_a_time() {
    let mut studio = Studio::new("abc123", "German", PageKind::VideoEdit);
    assert_eq!(
        PageKind::classify(&studio.page.current_url()),
        Some(PageKind::VideoEdit)
    );
    assert!(studio.page.is_live(studio.edit.title));
    assert!(!studio.page.is_live(studio.translations.title));

    studio.goto(PageKind::VideoTranslations);
    assert_eq!(studio.current(), PageKind::VideoTranslations);
    assert!(!studio.page.is_live(studio.edit.title));
    assert!(studio.page.is_live(studio.translations.title));
    assert_eq!(studio.field(FieldName::Title).0, studio.translations.title);
}

#[tokio::test(start_paused = true)]
async fn session_drives_the_watcher() {
    let studio = Studio::new("abc123", "German", PageKind::VideoEdit);
    let host: Arc<dyn PageHost> = studio.page.clone();
    let watcher = PageWatcher::new(
        host,
        Arc::new(ShoutTranslator),
        Arc::new(MemoryStore::new()),
        WatcherConfig::default(),
    )
    .unwrap();
    let cancel = CancellationToken::new();
    let task = tokio::spawn(watcher.run(cancel.clone()));
    let mut session = Session::new(studio);

    // Fields are bound before the panel-less commands are tried
    assert!(session.execute(Command::Swap(FieldName::Title)).is_err());
    sleep(Duration::from_millis(500)).await;

    session
        .execute(Command::Type(FieldName::Title, "hello".to_string()))
        .unwrap();
    sleep(Duration::from_millis(1200)).await;

    let status = text(session.execute(Command::Status).unwrap());
    assert!(status.contains("Title: \"hello\""), "{status}");
    assert!(status.contains("[Detected: English ➤ tr] HELLO"), "{status}");

    session
        .execute(Command::Goto(PageKind::VideoTranslations))
        .unwrap();
    sleep(Duration::from_millis(1500)).await;

    let page = Arc::clone(&session.studio().page);
    let title = session.studio().translations.title;
    assert_eq!(page.text(title).unwrap(), "Original title");
    let status = text(session.execute(Command::Status).unwrap());
    assert!(status.contains("de] ORIGINAL TITLE"), "{status}");

    assert!(matches!(session.execute(Command::Quit), Ok(Reply::Quit)));
    cancel.cancel();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn read_failure_still_stops_the_watcher() {
    let studio = Studio::new("abc123", "German", PageKind::VideoEdit);
    let page = Arc::clone(&studio.page);

    let task = tokio::spawn(session::run(
        shout_state(),
        studio,
        BufReader::new(FailAfter::new(Duration::from_secs(1))),
        std::future::pending::<()>(),
    ));

    sleep(Duration::from_millis(500)).await;
    assert_eq!(page.panels().len(), 2);

    let result = task.await.unwrap();
    assert!(result.is_err());
    assert!(page.panels().is_empty());
    assert_eq!(page.listener_count(), 0);
    assert_eq!(page.observer_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn end_of_input_ends_the_session() {
    let studio = Studio::new("abc123", "German", PageKind::VideoEdit);
    let page = Arc::clone(&studio.page);

    let input: &[u8] = b"type title hello\nstatus\n";
    session::run(shout_state(), studio, input, std::future::pending::<()>())
        .await
        .unwrap();

    assert!(page.panels().is_empty());
}
