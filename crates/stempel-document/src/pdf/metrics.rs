// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Helvetica advance widths and WinAnsi text encoding.
//
// Standard 14 fonts are not embedded, so centring text needs the metrics
// from the Adobe AFM. Widths are in thousandths of the font size.

/// AFM widths for the printable ASCII range 0x20..=0x7E.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Width used for Latin-1 supplement characters.
const DEFAULT_WIDTH: u16 = 556;

/// Substitute for characters WinAnsi cannot represent.
const REPLACEMENT: u8 = b'?';

/// Encode `text` for a simple font using `/WinAnsiEncoding`.
///
/// Printable ASCII and the Latin-1 supplement map one-to-one; everything
/// else, control characters included, becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => REPLACEMENT,
        })
        .collect()
}

fn byte_width(byte: u8) -> u16 {
    match byte {
        0x20..=0x7E => HELVETICA_ASCII[usize::from(byte - 0x20)],
        _ => DEFAULT_WIDTH,
    }
}

/// Advance width of `text` set in Helvetica at `size` points.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = encode_win_ansi(text).into_iter().map(|b| u32::from(byte_width(b))).sum();
    units as f32 * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lines_up_with_ascii() {
        assert_eq!(byte_width(b' '), 278);
        assert_eq!(byte_width(b'@'), 1015);
        assert_eq!(byte_width(b'W'), 944);
        assert_eq!(byte_width(b'i'), 222);
        assert_eq!(byte_width(b'~'), 584);
    }

    #[test]
    fn width_scales_with_size() {
        let width = text_width("Hello", 10.0);
        assert!((width - 22.78).abs() < 1e-3, "got {width}");
        assert!((text_width("Hello", 20.0) - 2.0 * width).abs() < 1e-3);
        assert_eq!(text_width("", 12.0), 0.0);
    }

    #[test]
    fn non_latin_text_is_replaced() {
        assert_eq!(encode_win_ansi("café"), b"caf\xE9".to_vec());
        assert_eq!(encode_win_ansi("Документ"), vec![b'?'; 8]);
        assert_eq!(encode_win_ansi("a\tb"), b"a?b".to_vec());
    }
}
