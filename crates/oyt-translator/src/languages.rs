/// A language the translation service accepts, with its menu label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

impl Language {
    const fn new(code: &'static str, name: &'static str) -> Self {
        Self { code, name }
    }
}

pub static SUPPORTED_LANGUAGES: &[Language] = &[
    Language::new("af", "Afrikaans"),
    Language::new("sq", "Albanian"),
    Language::new("am", "Amharic"),
    Language::new("ar", "Arabic"),
    Language::new("hy", "Armenian"),
    Language::new("as", "Assamese"),
    Language::new("ay", "Aymara"),
    Language::new("az", "Azerbaijani"),
    Language::new("bm", "Bambara"),
    Language::new("eu", "Basque"),
    Language::new("be", "Belarusian"),
    Language::new("bn", "Bengali"),
    Language::new("bho", "Bhojpuri"),
    Language::new("bs", "Bosnian"),
    Language::new("bg", "Bulgarian"),
    Language::new("ca", "Catalan"),
    Language::new("ceb", "Cebuano"),
    Language::new("zh-CN", "Chinese (Simplified)"),
    Language::new("zh-TW", "Chinese (Traditional)"),
    Language::new("co", "Corsican"),
    Language::new("hr", "Croatian"),
    Language::new("cs", "Czech"),
    Language::new("da", "Danish"),
    Language::new("dv", "Dhivehi"),
    Language::new("doi", "Dogri"),
    Language::new("nl", "Dutch"),
    Language::new("en", "English"),
    Language::new("eo", "Esperanto"),
    Language::new("et", "Estonian"),
    Language::new("ee", "Ewe"),
    Language::new("fil", "Filipino (Tagalog)"),
    Language::new("fi", "Finnish"),
    Language::new("fr", "French"),
    Language::new("fy", "Frisian"),
    Language::new("gl", "Galician"),
    Language::new("ka", "Georgian"),
    Language::new("de", "German"),
    Language::new("el", "Greek"),
    Language::new("gn", "Guarani"),
    Language::new("gu", "Gujarati"),
    Language::new("ht", "Haitian Creole"),
    Language::new("ha", "Hausa"),
    Language::new("haw", "Hawaiian"),
    Language::new("he", "Hebrew"),
    Language::new("hi", "Hindi"),
    Language::new("hmn", "Hmong"),
    Language::new("hu", "Hungarian"),
    Language::new("is", "Icelandic"),
    Language::new("ig", "Igbo"),
    Language::new("ilo", "Ilocano"),
    Language::new("id", "Indonesian"),
    Language::new("ga", "Irish"),
    Language::new("it", "Italian"),
    Language::new("ja", "Japanese"),
    Language::new("jv", "Javanese"),
    Language::new("kn", "Kannada"),
    Language::new("kk", "Kazakh"),
    Language::new("km", "Khmer"),
    Language::new("rw", "Kinyarwanda"),
    Language::new("gom", "Konkani"),
    Language::new("ko", "Korean"),
    Language::new("kri", "Krio"),
    Language::new("ku", "Kurdish"),
    Language::new("ckb", "Kurdish (Sorani)"),
    Language::new("ky", "Kyrgyz"),
    Language::new("lo", "Lao"),
    Language::new("la", "Latin"),
    Language::new("lv", "Latvian"),
    Language::new("ln", "Lingala"),
    Language::new("lt", "Lithuanian"),
    Language::new("lg", "Luganda"),
    Language::new("lb", "Luxembourgish"),
    Language::new("mk", "Macedonian"),
    Language::new("mai", "Maithili"),
    Language::new("mg", "Malagasy"),
    Language::new("ms", "Malay"),
    Language::new("ml", "Malayalam"),
    Language::new("mt", "Maltese"),
    Language::new("mi", "Maori"),
    Language::new("mr", "Marathi"),
    Language::new("mni-Mtei", "Meiteilon (Manipuri)"),
    Language::new("lus", "Mizo"),
    Language::new("mn", "Mongolian"),
    Language::new("my", "Myanmar (Burmese)"),
    Language::new("ne", "Nepali"),
    Language::new("no", "Norwegian"),
    Language::new("ny", "Nyanja (Chichewa)"),
    Language::new("or", "Odia (Oriya)"),
    Language::new("om", "Oromo"),
    Language::new("ps", "Pashto"),
    Language::new("fa", "Persian"),
    Language::new("pl", "Polish"),
    Language::new("pt", "Portuguese"),
    Language::new("pa", "Punjabi"),
    Language::new("qu", "Quechua"),
    Language::new("ro", "Romanian"),
    Language::new("ru", "Russian"),
    Language::new("sm", "Samoan"),
    Language::new("sa", "Sanskrit"),
    Language::new("gd", "Scots Gaelic"),
    Language::new("nso", "Sepedi"),
    Language::new("sr", "Serbian"),
    Language::new("st", "Sesotho"),
    Language::new("sn", "Shona"),
    Language::new("sd", "Sindhi"),
    Language::new("si", "Sinhala (Sinhalese)"),
    Language::new("sk", "Slovak"),
    Language::new("sl", "Slovenian"),
    Language::new("so", "Somali"),
    Language::new("es", "Spanish"),
    Language::new("su", "Sundanese"),
    Language::new("sw", "Swahili"),
    Language::new("sv", "Swedish"),
    Language::new("tl", "Tagalog (Filipino)"),
    Language::new("tg", "Tajik"),
    Language::new("ta", "Tamil"),
    Language::new("tt", "Tatar"),
    Language::new("te", "Telugu"),
    Language::new("th", "Thai"),
    Language::new("ti", "Tigrinya"),
    Language::new("ts", "Tsonga"),
    Language::new("tr", "Turkish"),
    Language::new("tk", "Turkmen"),
    Language::new("ak", "Twi (Akan)"),
    Language::new("uk", "Ukrainian"),
    Language::new("ur", "Urdu"),
    Language::new("ug", "Uyghur"),
    Language::new("uz", "Uzbek"),
    Language::new("vi", "Vietnamese"),
    Language::new("cy", "Welsh"),
    Language::new("xh", "Xhosa"),
    Language::new("yi", "Yiddish"),
    Language::new("yo", "Yoruba"),
    Language::new("zu", "Zulu"),
];

/// Display name for a language code
pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case(code))
        .map(|l| l.name)
}

/// Resolve a label shown on the page (e.g. "Turkish") to its code.
///
/// Labels like "Chinese (Simplified)" match exactly. Otherwise the parts
/// before any parenthesis are compared, so a bare "Filipino" and a
/// regional "Portuguese (Brazil)" both resolve.
pub fn code_for_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let label_base = base_name(name);

    SUPPORTED_LANGUAGES
        .iter()
        .find(|l| l.name.eq_ignore_ascii_case(name))
        .or_else(|| {
            SUPPORTED_LANGUAGES
                .iter()
                .find(|l| l.name.eq_ignore_ascii_case(label_base))
        })
        .or_else(|| {
            SUPPORTED_LANGUAGES
                .iter()
                .find(|l| base_name(l.name).eq_ignore_ascii_case(label_base))
        })
        .map(|l| l.code)
}

fn base_name(name: &str) -> &str {
    name.split(" (").next().unwrap_or(name).trim()
}
