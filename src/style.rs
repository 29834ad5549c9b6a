//! Style Classifier Module
//!
//! セルのスタイル属性文字列を、Markdown変換に必要な判定結果へ写像する純粋関数群。
//! どの関数も失敗せず、未知の値や欠落値は安全な既定値（`false` / `Alignment::Center`）になります。

use phf::phf_set;

/// 等幅フォントとみなすフォントファミリー名（小文字）
///
/// fonts.google.com の Monospace カテゴリに掲載されているファミリー。
static MONOSPACE_FONTS: phf::Set<&'static str> = phf_set! {
    "roboto mono",
    "inconsolata",
    "source code pro",
    "ibm plex mono",
    "nanum gothic coding",
    "jetbrains mono",
    "space mono",
    "vt323",
    "courier prime",
    "dm mono",
    "ubuntu mono",
    "pt mono",
    "doto",
    "geist mono",
    "fira mono",
    "cousine",
    "share tech mono",
    "fira code",
    "anonymous pro",
    "overpass mono",
    "sixtyfour convergence",
    "major mono display",
    "cutive mono",
    "oxygen mono",
    "azeret mono",
    "b612 mono",
    "nova mono",
    "syne mono",
    "reddit mono",
    "lekton",
    "xanh mono",
    "martian mono",
    "fragment mono",
    "chivo mono",
    "monofett",
    "red hat mono",
    "lxgw wenkai mono tc",
    "kode mono",
    "ubuntu sans mono",
    "m plus 1 code",
    "spline sans mono",
    "sono",
    "sometype mono",
    "sixtyfour",
    "workbench",
    "victor mono",
};

/// 列のアライメント区分
///
/// 左寄せ以外（右寄せ・中央・general・未知の値）はすべて`Center`に集約されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// 左寄せ（`:--`）
    Left,
    /// 中央寄せ、およびその他すべて（`:--:`）
    Center,
}

impl Alignment {
    /// Markdownの区切り行で使用するトークン
    pub fn token(self) -> &'static str {
        match self {
            Alignment::Left => ":--",
            Alignment::Center => ":--:",
        }
    }
}

/// フォントファミリーが等幅フォントかどうか
///
/// 大文字小文字を区別せず、許可リストとの完全一致で判定します。
///
/// ```rust
/// use sheetmd::is_monospace;
///
/// assert!(is_monospace(Some("JetBrains Mono")));
/// assert!(!is_monospace(Some("Arial")));
/// assert!(!is_monospace(None));
/// ```
pub fn is_monospace(family: Option<&str>) -> bool {
    match family {
        Some(name) if !name.is_empty() => MONOSPACE_FONTS.contains(name.to_lowercase().as_str()),
        _ => false,
    }
}

/// フォントウェイトが太字かどうか
pub fn is_bold(weight: Option<&str>) -> bool {
    matches!(weight, Some("bold"))
}

/// フォントスタイルが斜体かどうか
pub fn is_italic(style: Option<&str>) -> bool {
    matches!(style, Some("italic"))
}

/// 線装飾が取り消し線かどうか
pub fn is_strikethrough(line_decoration: Option<&str>) -> bool {
    matches!(line_decoration, Some("line-through"))
}

/// アライメントラベルを区分に分類する
///
/// `left` / `general-left`（大文字小文字を区別しない）のみが`Left`になります。
/// `right` / `general-right` も`Center`に集約される点に注意してください。
pub fn classify_alignment(label: Option<&str>) -> Alignment {
    let Some(label) = label else {
        return Alignment::Center;
    };

    match label.to_lowercase().as_str() {
        "left" | "general-left" => Alignment::Left,
        _ => Alignment::Center,
    }
}
