//! Utility functions

use crate::constants::DATA_DIR_NAME;
use std::path::PathBuf;

// Amber badge with a car silhouette; used for the header logo and window icon
pub const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><rect width="64" height="64" rx="16" fill="#fbbf24"/><path d="M16 38l4-11c.8-2.2 2.6-3.5 4.9-3.5h14.2c2.3 0 4.1 1.3 4.9 3.5l4 11v10a2 2 0 0 1-2 2h-3a2 2 0 0 1-2-2v-2H23v2a2 2 0 0 1-2 2h-3a2 2 0 0 1-2-2z" fill="#09090b"/><path d="M22.5 35l2.6-7.3c.3-.8 1-1.2 1.8-1.2h10.2c.8 0 1.5.4 1.8 1.2l2.6 7.3z" fill="#fbbf24"/><circle cx="22.5" cy="41" r="2.5" fill="#fbbf24"/><circle cx="41.5" cy="41" r="2.5" fill="#fbbf24"/><rect x="27" y="14" width="10" height="6" rx="1.5" fill="#09090b"/></svg>"##;

/// Rasterize the logo SVG to a square RGBA image of `size` pixels.
pub fn rasterize_logo(size: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).ok()?;
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), size, size))
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Get the app data directory path (settings and logs)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

/// Format a whole amount with thousands separators: 125400 -> "125,400"
pub fn format_money(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Strict number parse for admin fields: the whole trimmed text must be an
/// integer.
pub fn parse_strict_amount(input: &str) -> Option<i64> {
    input.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_grouping() {
        assert_eq!(format_money(0), "0");
        assert_eq!(format_money(350), "350");
        assert_eq!(format_money(8050), "8,050");
        assert_eq!(format_money(125_400), "125,400");
        assert_eq!(format_money(1_000_000), "1,000,000");
        assert_eq!(format_money(-4500), "-4,500");
    }

    #[test]
    fn strict_amounts() {
        assert_eq!(parse_strict_amount(" 600 "), Some(600));
        assert_eq!(parse_strict_amount("-3"), Some(-3));
        assert_eq!(parse_strict_amount("12abc"), None);
        assert_eq!(parse_strict_amount(""), None);
    }

    #[test]
    fn logo_rasterizes() {
        let (pixels, w, h) = rasterize_logo(32).unwrap();
        assert_eq!((w, h), (32, 32));
        assert_eq!(pixels.len(), 32 * 32 * 4);
    }
}
