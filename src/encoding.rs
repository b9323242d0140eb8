use encoding_rs::{
    Encoding, EUC_JP, ISO_2022_JP, ISO_8859_2, MACINTOSH, SHIFT_JIS, UTF_16BE, UTF_16LE, UTF_8,
    WINDOWS_1250, WINDOWS_1251, WINDOWS_1252, WINDOWS_1253, WINDOWS_1254,
};

/// Charset names servers commonly declare, including a few non-standard
/// aliases the WHATWG label list does not know about.
fn lookup(name: &str) -> Option<&'static Encoding> {
    let encoding = match name {
        "utf-8" | "x-nextstep" | "nextstep" => UTF_8,
        "us-ascii" | "iso-8859-1" | "latin1" | "windows-1252" => WINDOWS_1252,
        "iso-8859-2" | "latin2" => ISO_8859_2,
        "euc-jp" => EUC_JP,
        "shift_jis" | "cp932" => SHIFT_JIS,
        "iso-2022-jp" => ISO_2022_JP,
        "windows-1250" => WINDOWS_1250,
        "windows-1251" => WINDOWS_1251,
        "windows-1253" => WINDOWS_1253,
        "windows-1254" => WINDOWS_1254,
        "macroman" | "x-mac-roman" => MACINTOSH,
        "unicode" | "utf-16" | "utf-16le" => UTF_16LE,
        "unicodefffe" | "utf-16be" => UTF_16BE,
        _ => return None,
    };
    Some(encoding)
}

/// Map a charset name to a decoder. Unknown names fall back to UTF-8.
///
/// ```
/// use favicon_finder::encoding::for_charset;
///
/// assert_eq!(for_charset("Shift_JIS").name(), "Shift_JIS");
/// assert_eq!(for_charset("klingon").name(), "UTF-8");
/// ```
pub fn for_charset(name: &str) -> &'static Encoding {
    let name = name.trim().trim_matches(['"', '\'']).to_ascii_lowercase();
    lookup(&name)
        .or_else(|| Encoding::for_label(name.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Find the encoding declared by a `Content-Type` header value.
pub fn from_content_type(content_type: Option<&str>) -> &'static Encoding {
    content_type
        .and_then(charset_param)
        .map(for_charset)
        .unwrap_or(UTF_8)
}

fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|part| {
        let (name, value) = part.split_once('=')?;
        let value = value.trim();
        (name.trim().eq_ignore_ascii_case("charset") && !value.is_empty()).then_some(value)
    })
}
