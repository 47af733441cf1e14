//! 最小 PDF 写入器
//!
//! 只使用 PDF 标准字体（Helvetica，WinAnsiEncoding），不嵌入字体。
//! 标准字体没有西里尔字形，正文按 ГОСТ 7.79 B 方案转写为拉丁字母，
//! 原文标题以 UTF-16 写入文档信息字典。

use std::fmt::Write as _;

/// A4 单栏文本 PDF 写入器
#[derive(Debug, Clone)]
pub struct PdfWriter {
    page_width: u32,
    page_height: u32,
    margin: u32,
    font_size: u32,
    title_size: u32,
    leading: u32,
    wrap_at: usize,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::a4()
    }
}

impl PdfWriter {
    pub fn a4() -> Self {
        Self {
            page_width: 595,
            page_height: 842,
            margin: 50,
            font_size: 11,
            title_size: 13,
            leading: 15,
            wrap_at: 90,
        }
    }

    fn lines_per_page(&self) -> usize {
        ((self.page_height - 2 * self.margin) / self.leading) as usize
    }

    /// 生成 PDF；相同输入得到相同字节
    pub fn write(&self, title: &str, text: &str) -> Vec<u8> {
        let lines: Vec<Vec<u8>> = text.lines().flat_map(|line| wrap(line, self.wrap_at)).collect();
        let empty: &[Vec<u8>] = &[];
        let pages: Vec<&[Vec<u8>]> = if lines.is_empty() {
            vec![empty]
        } else {
            lines.chunks(self.lines_per_page()).collect()
        };

        // 1 catalog, 2 pages, 3 regular font, 4 bold font, 5 info, then (page, content) pairs
        let page_ids: Vec<usize> = (0..pages.len()).map(|i| 6 + i * 2).collect();
        let mut objects: Vec<Vec<u8>> = Vec::with_capacity(5 + pages.len() * 2);

        objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
        let kids = page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        objects.push(format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages.len()).into_bytes());
        objects.push(b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_vec());
        objects.push(b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>".to_vec());
        objects.push(format!("<< /Title {} /Producer (dealer-adapter-document) >>", utf16_hex(title)).into_bytes());

        for (index, page_lines) in pages.iter().enumerate() {
            let content_id = page_ids[index] + 1;
            objects.push(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    self.page_width, self.page_height, content_id
                )
                .into_bytes(),
            );

            let stream = self.content_stream(page_lines, index == 0);
            let mut content = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
            content.extend_from_slice(&stream);
            content.extend_from_slice(b"\nendstream");
            objects.push(content);
        }

        assemble(objects)
    }

    fn content_stream(&self, lines: &[Vec<u8>], first_page: bool) -> Vec<u8> {
        let mut out = Vec::new();
        let top = self.page_height - self.margin;
        out.extend_from_slice(format!("BT\n{} {} Td\n{} TL\n", self.margin, top, self.leading).as_bytes());

        for (i, line) in lines.iter().enumerate() {
            if i == 0 && first_page {
                out.extend_from_slice(format!("/F2 {} Tf\n", self.title_size).as_bytes());
            } else if i <= 1 {
                out.extend_from_slice(format!("/F1 {} Tf\n", self.font_size).as_bytes());
            }
            if i > 0 {
                out.extend_from_slice(b"T*\n");
            }
            out.push(b'(');
            out.extend_from_slice(line);
            out.extend_from_slice(b") Tj\n");
        }

        out.extend_from_slice(b"ET");
        out
    }
}

fn assemble(objects: Vec<Vec<u8>>) -> Vec<u8> {
    let mut out = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());

    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_at = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(xref, "{:010} 00000 n \n", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R /Info 5 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

/// 按编码后的字形数折行，超长单词在字符边界处硬断开
fn wrap(line: &str, width: usize) -> Vec<Vec<u8>> {
    if glyph_width(line) <= width {
        return vec![encode_win_ansi(line)];
    }

    let mut unit = Vec::with_capacity(4);
    let mut result = Vec::new();
    let mut current = Vec::new();
    let mut current_width = 0;
    for word in line.split(' ') {
        let word_width = glyph_width(word);
        if current_width > 0 && current_width + 1 + word_width > width {
            result.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if current_width > 0 {
            current.push(b' ');
            current_width += 1;
        }
        for ch in word.chars() {
            unit.clear();
            let glyphs = encode_char(ch, &mut unit);
            if current_width > 0 && current_width + glyphs > width {
                result.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.extend_from_slice(&unit);
            current_width += glyphs;
        }
    }
    if !current.is_empty() {
        result.push(current);
    }
    result
}

fn glyph_width(text: &str) -> usize {
    let mut scratch = Vec::new();
    text.chars().map(|ch| encode_char(ch, &mut scratch)).sum()
}

fn utf16_hex(text: &str) -> String {
    let mut hex = String::from("<FEFF");
    for unit in text.encode_utf16() {
        let _ = write!(hex, "{:04X}", unit);
    }
    hex.push('>');
    hex
}

/// 编码为 WinAnsi 字符串字面量内容（已转义）
fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        encode_char(ch, &mut out);
    }
    out
}

/// 追加单个字符的编码，返回占用的字形数（转义符不计）
fn encode_char(ch: char, out: &mut Vec<u8>) -> usize {
    match ch {
        '(' | ')' | '\\' => {
            out.push(b'\\');
            out.push(ch as u8);
            1
        }
        ' '..='~' => {
            out.push(ch as u8);
            1
        }
        '\t' => {
            out.push(b' ');
            1
        }
        '№' => {
            out.extend_from_slice(b"No.");
            3
        }
        '–' => {
            out.push(0x96);
            1
        }
        '—' => {
            out.push(0x97);
            1
        }
        '«' | '»' => {
            out.push(b'"');
            1
        }
        '\u{A0}'..='\u{FF}' => {
            out.push(ch as u32 as u8);
            1
        }
        _ => match transliterate(ch) {
            Some(latin) => {
                out.extend_from_slice(latin.as_bytes());
                latin.len()
            }
            None => {
                out.push(b'?');
                1
            }
        },
    }
}

fn transliterate(ch: char) -> Option<&'static str> {
    let latin = match ch {
        'А' => "A", 'Б' => "B", 'В' => "V", 'Г' => "G", 'Д' => "D", 'Е' => "E", 'Ё' => "Yo",
        'Ж' => "Zh", 'З' => "Z", 'И' => "I", 'Й' => "J", 'К' => "K", 'Л' => "L", 'М' => "M",
        'Н' => "N", 'О' => "O", 'П' => "P", 'Р' => "R", 'С' => "S", 'Т' => "T", 'У' => "U",
        'Ф' => "F", 'Х' => "X", 'Ц' => "Cz", 'Ч' => "Ch", 'Ш' => "Sh", 'Щ' => "Shh", 'Ъ' => "\"",
        'Ы' => "Y", 'Ь' => "'", 'Э' => "E", 'Ю' => "Yu", 'Я' => "Ya",
        'а' => "a", 'б' => "b", 'в' => "v", 'г' => "g", 'д' => "d", 'е' => "e", 'ё' => "yo",
        'ж' => "zh", 'з' => "z", 'и' => "i", 'й' => "j", 'к' => "k", 'л' => "l", 'м' => "m",
        'н' => "n", 'о' => "o", 'п' => "p", 'р' => "r", 'с' => "s", 'т' => "t", 'у' => "u",
        'ф' => "f", 'х' => "x", 'ц' => "cz", 'ч' => "ch", 'ш' => "sh", 'щ' => "shh", 'ъ' => "\"",
        'ы' => "y", 'ь' => "'", 'э' => "e", 'ю' => "yu", 'я' => "ya",
        // казахские буквы
        'Ә' => "A", 'ә' => "a", 'Ғ' => "G", 'ғ' => "g", 'Қ' => "Q", 'қ' => "q", 'Ң' => "N",
        'ң' => "n", 'Ө' => "O", 'ө' => "o", 'Ұ' | 'Ү' => "U", 'ұ' | 'ү' => "u", 'Һ' => "H",
        'һ' => "h", 'І' => "I", 'і' => "i",
        _ => return None,
    };
    Some(latin)
}
