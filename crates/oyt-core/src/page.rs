use std::sync::LazyLock;

use regex::Regex;

static EDIT_PAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://studio\.youtube\.com/video/[^/?#]+/edit(?:[/?#]|$)")
        .expect("edit page pattern is valid")
});

static TRANSLATIONS_PAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://studio\.youtube\.com/video/[^/?#]+/translations(?:[/?#]|$)")
        .expect("translations page pattern is valid")
});

/// Studio pages that carry translatable fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// `.../video/{id}/edit`
    VideoEdit,
    /// `.../video/{id}/translations`
    VideoTranslations,
}

impl PageKind {
    pub fn classify(url: &str) -> Option<Self> {
        if EDIT_PAGE.is_match(url) {
            Some(Self::VideoEdit)
        } else if TRANSLATIONS_PAGE.is_match(url) {
            Some(Self::VideoTranslations)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_supported_pages() {
        assert_eq!(
            PageKind::classify("https://studio.youtube.com/video/abc123/edit"),
            Some(PageKind::VideoEdit)
        );
        assert_eq!(
            PageKind::classify("https://studio.youtube.com/video/abc123/edit?o=U"),
            Some(PageKind::VideoEdit)
        );
        assert_eq!(
            PageKind::classify("https://studio.youtube.com/video/abc123/translations"),
            Some(PageKind::VideoTranslations)
        );
    }

    #[test]
    fn ignores_other_pages() {
        assert_eq!(PageKind::classify("https://studio.youtube.com/channel/x/videos"), None);
        assert_eq!(PageKind::classify("https://studio.youtube.com/video/abc/analytics"), None);
        assert_eq!(PageKind::classify("https://studio.youtube.com/video//edit"), None);
        assert_eq!(PageKind::classify("https://example.com/video/abc/edit"), None);
    }
}
