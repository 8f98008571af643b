//! Text encoding helpers shared by every generator
//!
//! LaTeX in both directions, XML/HTML escaping and the small number formats the CV uses.

use phf::phf_map;

/// Non-ASCII characters with a LaTeX spelling
static UNICODE_TO_LATEX: phf::Map<char, &'static str> = phf_map! {
    'à' => r"{\`a}", 'á' => r"{\'a}", 'â' => r"{\^a}", 'ã' => r"{\~a}", 'ä' => r#"{\"a}"#,
    'å' => r"{\r{a}}", 'æ' => r"{\ae}", 'ç' => r"{\c{c}}",
    'è' => r"{\`e}", 'é' => r"{\'e}", 'ê' => r"{\^e}", 'ë' => r#"{\"e}"#,
    'ì' => r"{\`\i}", 'í' => r"{\'\i}", 'î' => r"{\^\i}", 'ï' => r#"{\"\i}"#,
    'ñ' => r"{\~n}",
    'ò' => r"{\`o}", 'ó' => r"{\'o}", 'ô' => r"{\^o}", 'õ' => r"{\~o}", 'ö' => r#"{\"o}"#,
    'ø' => r"{\o}",
    'ù' => r"{\`u}", 'ú' => r"{\'u}", 'û' => r"{\^u}", 'ü' => r#"{\"u}"#,
    'ý' => r"{\'y}", 'ÿ' => r#"{\"y}"#, 'ß' => r"{\ss}",
    'À' => r"{\`A}", 'Á' => r"{\'A}", 'Â' => r"{\^A}", 'Ã' => r"{\~A}", 'Ä' => r#"{\"A}"#,
    'Å' => r"{\AA}", 'Æ' => r"{\AE}", 'Ç' => r"{\c{C}}",
    'È' => r"{\`E}", 'É' => r"{\'E}", 'Ê' => r"{\^E}", 'Ë' => r#"{\"E}"#,
    'Ì' => r"{\`I}", 'Í' => r"{\'I}", 'Î' => r"{\^I}", 'Ï' => r#"{\"I}"#,
    'Ñ' => r"{\~N}",
    'Ò' => r"{\`O}", 'Ó' => r"{\'O}", 'Ô' => r"{\^O}", 'Õ' => r"{\~O}", 'Ö' => r#"{\"O}"#,
    'Ø' => r"{\O}",
    'Ù' => r"{\`U}", 'Ú' => r"{\'U}", 'Û' => r"{\^U}", 'Ü' => r#"{\"U}"#,
    'Ý' => r"{\'Y}",
    'ă' => r"{\u{a}}", 'ą' => r"{\k{a}}", 'ć' => r"{\'c}", 'č' => r"{\v{c}}", 'Č' => r"{\v{C}}",
    'ď' => r"{\v{d}}", 'ę' => r"{\k{e}}", 'ě' => r"{\v{e}}", 'ğ' => r"{\u{g}}", 'ı' => r"{\i}",
    'ł' => r"{\l}", 'Ł' => r"{\L}", 'ń' => r"{\'n}", 'ň' => r"{\v{n}}", 'ő' => r"{\H{o}}",
    'œ' => r"{\oe}", 'Œ' => r"{\OE}", 'ř' => r"{\v{r}}", 'ś' => r"{\'s}", 'Ś' => r"{\'S}",
    'š' => r"{\v{s}}", 'Š' => r"{\v{S}}", 'ş' => r"{\c{s}}", 'ţ' => r"{\c{t}}", 'ť' => r"{\v{t}}",
    'ů' => r"{\r{u}}", 'ű' => r"{\H{u}}", 'ź' => r"{\'z}", 'ż' => r"{\.z}", 'Ż' => r"{\.Z}",
    'ž' => r"{\v{z}}", 'Ž' => r"{\v{Z}}",
    '–' => "--", '—' => "---", '‘' => "`", '’' => "'", '“' => "``", '”' => "''",
    '…' => r"\ldots{}", '\u{a0}' => "~", '€' => r"\texteuro{}", '£' => r"\pounds{}",
    '©' => r"\copyright{}", '®' => r"\textregistered{}", '°' => r"\textdegree{}",
    '×' => r"$\times$",
};

/// Accent macro + base letter -> composed character
static ACCENTS: phf::Map<&'static str, &'static str> = phf_map! {
    "`a" => "à", "'a" => "á", "^a" => "â", "~a" => "ã", "\"a" => "ä", "ra" => "å", "ua" => "ă", "ka" => "ą",
    "`A" => "À", "'A" => "Á", "^A" => "Â", "~A" => "Ã", "\"A" => "Ä", "rA" => "Å",
    "cc" => "ç", "cC" => "Ç", "'c" => "ć", "vc" => "č", "vC" => "Č", "vd" => "ď",
    "`e" => "è", "'e" => "é", "^e" => "ê", "\"e" => "ë", "ke" => "ę", "ve" => "ě", "=e" => "ē",
    "`E" => "È", "'E" => "É", "^E" => "Ê", "\"E" => "Ë",
    "ug" => "ğ",
    "`i" => "ì", "'i" => "í", "^i" => "î", "\"i" => "ï",
    "`I" => "Ì", "'I" => "Í", "^I" => "Î", "\"I" => "Ï",
    "~n" => "ñ", "~N" => "Ñ", "'n" => "ń", "vn" => "ň",
    "`o" => "ò", "'o" => "ó", "^o" => "ô", "~o" => "õ", "\"o" => "ö", "Ho" => "ő", "=o" => "ō",
    "`O" => "Ò", "'O" => "Ó", "^O" => "Ô", "~O" => "Õ", "\"O" => "Ö",
    "vr" => "ř", "'s" => "ś", "'S" => "Ś", "vs" => "š", "vS" => "Š", "cs" => "ş", "ct" => "ţ", "vt" => "ť",
    "`u" => "ù", "'u" => "ú", "^u" => "û", "\"u" => "ü", "ru" => "ů", "Hu" => "ű", "=u" => "ū",
    "`U" => "Ù", "'U" => "Ú", "^U" => "Û", "\"U" => "Ü",
    "'y" => "ý", "\"y" => "ÿ", "'Y" => "Ý",
    "'z" => "ź", ".z" => "ż", ".Z" => "Ż", "vz" => "ž", "vZ" => "Ž",
};

/// Control words that stand for a single character or short string
static LATEX_SYMBOLS: phf::Map<&'static str, &'static str> = phf_map! {
    "ss" => "ß", "o" => "ø", "O" => "Ø", "ae" => "æ", "AE" => "Æ", "oe" => "œ", "OE" => "Œ",
    "aa" => "å", "AA" => "Å", "l" => "ł", "L" => "Ł", "i" => "i", "j" => "j",
    "ldots" => "…", "dots" => "…", "textendash" => "–", "textemdash" => "—",
    "LaTeX" => "LaTeX", "TeX" => "TeX", "textasciitilde" => "~", "textasciicircum" => "^",
    "textbackslash" => "\\", "textregistered" => "®", "copyright" => "©", "texteuro" => "€",
    "pounds" => "£", "textdegree" => "°", "times" => "×", "textquoteright" => "’",
    "textquoteleft" => "‘",
};

/// Control words whose argument is an accent target
const LETTER_ACCENTS: &[&str] = &["c", "v", "u", "H", "k", "r", "d", "b", "t"];
const SYMBOL_ACCENTS: &[char] = &['\'', '`', '^', '"', '~', '=', '.'];

/// Ordinal form of a number: 1st, 2nd, 3rd, 4th, 11th, 21st ...
pub fn ordinal(n: i64) -> String {
    let suffix = if (11..=13).contains(&(n.rem_euclid(100))) {
        "th"
    } else {
        match n.rem_euclid(10) {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{n}{suffix}")
}

/// Trims and encodes plain text so LaTeX typesets it literally
pub fn latex_format(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.trim().chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '\\' => out.push_str(r"\textbackslash{}"),
            c if c.is_ascii() => out.push(c),
            c => match UNICODE_TO_LATEX.get(&c) {
                Some(latex) => out.push_str(latex),
                None => out.push(c),
            },
        }
    }
    out
}

/// Decodes LaTeX markup (as found in BibTeX fields) into plain text
pub fn latex_to_text(latex: &str) -> String {
    let chars: Vec<char> = latex.chars().collect();
    let mut out = String::with_capacity(latex.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '{' | '}' | '$' => i += 1,
            '~' => {
                out.push(' ');
                i += 1;
            }
            '%' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '-' => {
                let start = i;
                while i < chars.len() && chars[i] == '-' {
                    i += 1;
                }
                match i - start {
                    1 => out.push('-'),
                    2 => out.push('–'),
                    _ => out.push('—'),
                }
            }
            '`' if chars.get(i + 1) == Some(&'`') => {
                out.push('"');
                i += 2;
            }
            '\'' if chars.get(i + 1) == Some(&'\'') => {
                out.push('"');
                i += 2;
            }
            '\\' => i = decode_control(&chars, i, &mut out),
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Decodes the control sequence starting at `chars[start] == '\\'`, returns the next index
fn decode_control(chars: &[char], start: usize, out: &mut String) -> usize {
    let Some(&next) = chars.get(start + 1) else {
        return start + 1;
    };

    if SYMBOL_ACCENTS.contains(&next) {
        let (base, end) = accent_argument(chars, start + 2);
        out.push_str(&compose(next, &base));
        return end;
    }

    if next.is_ascii_alphabetic() {
        let mut end = start + 1;
        while end < chars.len() && chars[end].is_ascii_alphabetic() {
            end += 1;
        }
        let word: String = chars[start + 1..end].iter().collect();
        if LETTER_ACCENTS.contains(&word.as_str()) {
            let accent = word.chars().next().unwrap_or('c');
            let (base, after) = accent_argument(chars, end);
            out.push_str(&compose(accent, &base));
            return after;
        }
        let end = skip_spaces(chars, end);
        if let Some(symbol) = LATEX_SYMBOLS.get(word.as_str()) {
            out.push_str(symbol);
            return end;
        }
        if word == "href" && chars.get(end) == Some(&'{') {
            // the link target is not part of the text
            let (_, after) = read_group(chars, end);
            return after;
        }
        return end;
    }

    match next {
        ',' | ';' | ':' | ' ' | '\\' => out.push(' '),
        '!' | '-' | '/' => {}
        other => out.push(other),
    }
    start + 2
}

/// Reads an accent's argument: a `{group}` or the next non-space character
fn accent_argument(chars: &[char], start: usize) -> (String, usize) {
    let start = skip_spaces(chars, start);
    match chars.get(start) {
        Some('{') => {
            let (inner, end) = read_group(chars, start);
            (latex_to_text(&inner), end)
        }
        Some('\\') => {
            let mut decoded = String::new();
            let end = decode_control(chars, start, &mut decoded);
            (decoded, end)
        }
        Some(c) => (c.to_string(), start + 1),
        None => (String::new(), start),
    }
}

/// Returns the content of the brace group opening at `chars[start]` and the index after it
fn read_group(chars: &[char], start: usize) -> (String, usize) {
    let mut depth = 0usize;
    let mut i = start;
    let mut inner = String::new();
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '{' => {
                depth += 1;
                if depth == 1 {
                    continue;
                }
            }
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
        inner.push(c);
    }
    (inner, i)
}

fn skip_spaces(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}

fn compose(accent: char, base: &str) -> String {
    let mut letters = base.chars();
    let Some(first) = letters.next() else {
        return String::new();
    };
    let key = format!("{accent}{first}");
    match ACCENTS.get(key.as_str()) {
        Some(composed) => format!("{composed}{}", letters.as_str()),
        None => base.to_string(),
    }
}

/// Escapes `&`, `<` and `>` for XML character data
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// XML escaping plus double quotes, safe inside HTML attributes
pub fn html_escape(text: &str) -> String {
    xml_escape(text).replace('"', "&quot;")
}

/// Trims a CSV value for CCV output; digit-and-comma values lose their commas
pub fn ccv_text(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().all(|c| c.is_ascii_digit() || c == ',') {
        trimmed.replace(',', "")
    } else {
        trimmed.to_string()
    }
}

/// `ccv_text` followed by XML escaping
pub fn format_xml(text: &str) -> String {
    xml_escape(&ccv_text(text))
}

/// Plain text of a LaTeX value, ready for CCV output
pub fn latex2xml(text: &str) -> String {
    latex_to_text(text.trim()).trim().to_string()
}

/// Formats an integer with `,` thousands separators
pub fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (42, "42nd"),
            (111, "111th"),
            (123, "123rd"),
        ];
        for (n, expected) in cases {
            assert_eq!(ordinal(n), expected);
        }
    }

    #[test]
    fn latex_format_escapes_specials() {
        assert_eq!(latex_format("  R&D 100% #1 $5 a_b  "), r"R\&D 100\% \#1 \$5 a\_b");
        assert_eq!(latex_format("{x}"), r"\{x\}");
        assert_eq!(latex_format("a~b^c"), r"a\textasciitilde{}b\textasciicircum{}c");
    }

    #[test]
    fn latex_format_encodes_accents() {
        assert_eq!(latex_format("Montréal"), r"Montr{\'e}al");
        assert_eq!(latex_format("Müller – Straße"), r#"M{\"u}ller -- Stra{\ss}e"#);
        assert_eq!(latex_format("日本"), "日本");
    }

    #[test]
    fn latex_to_text_decodes_accents() {
        assert_eq!(latex_to_text(r"Montr\'eal"), "Montréal");
        assert_eq!(latex_to_text(r"Montr{\'e}al"), "Montréal");
        assert_eq!(latex_to_text(r#"M{\"{u}}ller"#), "Müller");
        assert_eq!(latex_to_text(r"Fran\c{c}ois"), "François");
        assert_eq!(latex_to_text(r"{\v S}koda"), "Škoda");
        assert_eq!(latex_to_text(r"Stra{\ss}e"), "Straße");
        assert_eq!(latex_to_text(r"Mart{\'\i}n"), "Martín");
    }

    #[test]
    fn latex_to_text_strips_markup() {
        assert_eq!(latex_to_text("{SGX}: Secure {E}nclaves"), "SGX: Secure Enclaves");
        assert_eq!(latex_to_text(r"R\&D \emph{matters}"), "R&D matters");
        assert_eq!(latex_to_text("pages 1--10"), "pages 1–10");
        assert_eq!(latex_to_text("a~b"), "a b");
        assert_eq!(latex_to_text(r"\href{http://x.org}{Link}"), "Link");
        assert_eq!(latex_to_text(r"\textbf{Bold} text"), "Bold text");
    }

    #[test]
    fn latex_round_trip_for_names() {
        let name = "José Ñúñez";
        assert_eq!(latex_to_text(&latex_format(name)), name);
    }

    #[test]
    fn xml_helpers() {
        assert_eq!(xml_escape("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(html_escape(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(format_xml(" 1,250,000 "), "1250000");
        assert_eq!(format_xml("Smith, Jones & Co"), "Smith, Jones &amp; Co");
        assert_eq!(latex2xml(r"  The {\'E}cole  "), "The École");
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
        assert_eq!(thousands(-45000), "-45,000");
    }
}
