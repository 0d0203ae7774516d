//! Project list icons
//!
//! Each project icon shows the first letter of the project name on a
//! Material palette color. The color is offset by the item index so
//! neighbours rarely match, with a random shift per page load.

use rand::Rng;

/// Material design accent palette
pub const MATERIAL_COLORS: [&str; 15] = [
    "#F44336", "#E91E63", "#9C27B0", "#673AB7", "#3F51B5", "#2196F3", "#03A9F4", "#00BCD4",
    "#009688", "#4CAF50", "#8BC34A", "#CDDC39", "#FFC107", "#FF9800", "#FF5722",
];

pub const ICON_TEXT_COLOR: &str = "#ffffff";

pub const ICON_FONT: &str = "\"JetBrains Mono\", ui-monospace, SFMono-Regular, Menlo, Monaco, \
     Consolas, \"Liberation Mono\", \"Courier New\", monospace";

/// Uppercased first character of the trimmed name, `?` for blank names
pub fn icon_letter(name: &str) -> String {
    match name.trim().chars().next() {
        Some(c) => c.to_uppercase().collect(),
        None => "?".to_string(),
    }
}

/// Palette index for item `index` given a random shift in `0..15`
pub fn icon_color_index(index: usize, shift: usize) -> usize {
    (index * 3 + shift) % MATERIAL_COLORS.len()
}

/// Pick a background color for item `index`
pub fn icon_color(index: usize, rng: &mut impl Rng) -> &'static str {
    let shift = rng.random_range(0..MATERIAL_COLORS.len());
    MATERIAL_COLORS[icon_color_index(index, shift)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_icon_letter() {
        assert_eq!(icon_letter("  rusty tools"), "R");
        assert_eq!(icon_letter("42 things"), "4");
        assert_eq!(icon_letter("   "), "?");
        assert_eq!(icon_letter(""), "?");
        assert_eq!(icon_letter("ßeta"), "SS");
    }

    #[test]
    fn test_color_index_wraps() {
        assert_eq!(icon_color_index(0, 0), 0);
        assert_eq!(icon_color_index(1, 0), 3);
        assert_eq!(icon_color_index(5, 0), 0);
        assert_eq!(icon_color_index(4, 14), 11);
    }

    #[test]
    fn test_icon_color_from_palette() {
        let mut rng = Pcg32::seed_from_u64(11);
        for i in 0..50 {
            assert!(MATERIAL_COLORS.contains(&icon_color(i, &mut rng)));
        }
    }
}
