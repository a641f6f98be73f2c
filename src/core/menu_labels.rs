#[derive(Debug, PartialEq, Eq)]
pub struct MenuLabels {
    pub open_link: &'static str,
    pub open_image: &'static str,
    pub open_video: &'static str,
    pub cut: &'static str,
    pub copy: &'static str,
    pub paste: &'static str,
    pub select_all: &'static str,
}

static EN: MenuLabels = MenuLabels {
    open_link: "Open Link in Browser",
    open_image: "Open Image in Browser",
    open_video: "Open Video in Browser",
    cut: "Cut",
    copy: "Copy",
    paste: "Paste",
    select_all: "Select All",
};

static ZH: MenuLabels = MenuLabels {
    open_link: "在浏览器中打开链接",
    open_image: "在浏览器中打开图片",
    open_video: "在浏览器中打开视频",
    cut: "剪切",
    copy: "复制",
    paste: "粘贴",
    select_all: "全选",
};

/// Reduces an OS locale (`zh-CN`, `zh_TW.UTF-8`, `EN`) to its lowercase language subtag.
pub fn coarse_language(locale: &str) -> String {
    locale
        .split(|c| c == '-' || c == '_' || c == '.' || c == '@')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub fn labels_for(language: &str) -> &'static MenuLabels {
    match language {
        "zh" => &ZH,
        _ => &EN,
    }
}

pub fn system_labels() -> &'static MenuLabels {
    let locale = sys_locale::get_locale().unwrap_or_default();
    labels_for(&coarse_language(&locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coarse_language_strips_region_and_encoding() {
        assert_eq!(coarse_language("zh-CN"), "zh");
        assert_eq!(coarse_language("zh_TW.UTF-8"), "zh");
        assert_eq!(coarse_language("en-US"), "en");
        assert_eq!(coarse_language("EN"), "en");
        assert_eq!(coarse_language("de_DE@euro"), "de");
        assert_eq!(coarse_language(""), "");
    }

    #[test]
    fn unknown_languages_fall_back_to_english() {
        assert_eq!(labels_for("zh"), &ZH);
        assert_eq!(labels_for("en"), &EN);
        assert_eq!(labels_for("fr"), &EN);
        assert_eq!(labels_for(""), &EN);
    }
}
