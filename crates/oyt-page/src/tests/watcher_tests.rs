use std::sync::Arc;
use std::time::Duration;

use oyt_config::WatcherConfig;
use oyt_core::page::PageKind;
use oyt_core::{MemoryStore, PageHost, PageWatcher, PreferenceStore};
use oyt_translator::Translator;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::FakeTranslator;
use crate::fixtures::{EditPage, TranslationsPage, edit_url};
use crate::page::VirtualPage;

fn watcher(page: &Arc<VirtualPage>) -> PageWatcher {
    let host: Arc<dyn PageHost> = page.clone();
    let translator: Arc<dyn Translator> = FakeTranslator::new();
    let store: Arc<dyn PreferenceStore> = Arc::new(MemoryStore::new());

    PageWatcher::new(host, translator, store, WatcherConfig::default()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn each_url_is_evaluated_once() {
    let page = Arc::new(VirtualPage::new(edit_url("abc123")));
    let mut watcher = watcher(&page);

    assert_eq!(watcher.tick(), Some(PageKind::VideoEdit));
    assert_eq!(watcher.current_page(), Some(edit_url("abc123").as_str()));
    assert_eq!(watcher.tick(), None);

    watcher.reset();
    assert_eq!(watcher.tick(), Some(PageKind::VideoEdit));
}

#[tokio::test(start_paused = true)]
async fn unsupported_urls_are_remembered() {
    let page = Arc::new(VirtualPage::new("https://studio.youtube.com/channel/xyz/videos"));
    let mut watcher = watcher(&page);

    assert_eq!(watcher.tick(), None);
    assert_eq!(
        watcher.current_page(),
        Some("https://studio.youtube.com/channel/xyz/videos")
    );

    page.navigate("https://studio.youtube.com/video/abc123/translations");
    assert_eq!(watcher.tick(), Some(PageKind::VideoTranslations));
}

#[tokio::test(start_paused = true)]
async fn binds_both_edit_fields() {
    let page = Arc::new(VirtualPage::new("about:blank"));
    let studio = EditPage::build(&page, "abc123");
    let cancel = CancellationToken::new();
    let task = tokio::spawn(watcher(&page).run(cancel.clone()));

    sleep(Duration::from_millis(500)).await;
    assert!(page.panel_on(studio.title_anchor).is_some());
    assert!(page.panel_on(studio.description_anchor).is_some());

    cancel.cancel();
    task.await.unwrap();
    assert!(page.panels().is_empty());
    assert_eq!(page.listener_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn removed_inputs_rearm_the_watcher() {
    let page = Arc::new(VirtualPage::new("about:blank"));
    let studio = EditPage::build(&page, "abc123");
    let cancel = CancellationToken::new();
    let task = tokio::spawn(watcher(&page).run(cancel.clone()));

    sleep(Duration::from_millis(500)).await;
    assert_eq!(page.panels().len(), 2);

    // Leaving the editor hides it without changing the URL for long
    page.set_hidden(studio.editor, true);
    sleep(Duration::from_millis(1500)).await;
    assert!(page.panels().is_empty());

    page.set_hidden(studio.editor, false);
    sleep(Duration::from_secs(2)).await;
    assert_eq!(page.panels().len(), 2);
    assert!(page.panel_on(studio.title_anchor).is_some());

    cancel.cancel();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn navigation_replaces_bound_fields() {
    let page = Arc::new(VirtualPage::new("about:blank"));
    let edit = EditPage::build(&page, "abc123");
    let cancel = CancellationToken::new();
    let task = tokio::spawn(watcher(&page).run(cancel.clone()));

    sleep(Duration::from_millis(500)).await;
    assert_eq!(page.panels().len(), 2);

    let translations = TranslationsPage::build(&page, "abc123", "German");
    sleep(Duration::from_millis(1500)).await;

    assert!(page.panel_on(edit.title_anchor).is_none());
    assert!(page.panel_on(translations.title_anchor).is_some());
    assert!(page.panel_on(translations.description_anchor).is_some());

    cancel.cancel();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn framed_pages_are_skipped() {
    let page = Arc::new(VirtualPage::framed("about:blank"));
    EditPage::build(&page, "abc123");

    watcher(&page).run(CancellationToken::new()).await;

    assert!(page.panels().is_empty());
}

#[test]
fn zero_poll_interval_is_rejected() {
    let page: Arc<dyn PageHost> = Arc::new(VirtualPage::new("about:blank"));
    let config = WatcherConfig {
        poll_interval_ms: 0,
        ..WatcherConfig::default()
    };

    let result = PageWatcher::new(
        page,
        FakeTranslator::new(),
        Arc::new(MemoryStore::new()),
        config,
    );
    assert!(result.is_err());
}
