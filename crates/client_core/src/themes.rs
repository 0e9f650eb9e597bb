use shared::domain::{Aesthetic, CommentColor};

/// Presentation-owned theme data the core needs: the ordered comment palette
/// for each aesthetic.
pub trait ThemeCatalog: Send + Sync {
    fn comment_palette(&self, aesthetic: Aesthetic) -> Vec<CommentColor>;

    fn default_comment_color(&self, aesthetic: Aesthetic) -> CommentColor {
        self.comment_palette(aesthetic)
            .into_iter()
            .next()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinThemes;

impl BuiltinThemes {
    fn palette(aesthetic: Aesthetic) -> &'static [&'static str] {
        match aesthetic {
            Aesthetic::Professional => &["#E8EAF6", "#C5CAE9", "#9FA8DA", "#7986CB", "#5C6BC0"],
            Aesthetic::DarkAcademia => &["#D4AF37", "#C19A6B", "#8B7355", "#654321", "#3E2723"],
            Aesthetic::CottageCore => &["#87eafc", "#6eefd1", "#54e098", "#5acd65", "#d9f0b3"],
            Aesthetic::TechNeon => &["#00FF88", "#00D9FF", "#FF00FF", "#FFFF00", "#FF0080"],
            Aesthetic::Retro90s => &["#FF6B9D", "#C06C84", "#FFA07A", "#FFD700", "#87CEEB"],
        }
    }
}

impl ThemeCatalog for BuiltinThemes {
    fn comment_palette(&self, aesthetic: Aesthetic) -> Vec<CommentColor> {
        Self::palette(aesthetic)
            .iter()
            .map(|hex| CommentColor::new(*hex))
            .collect()
    }
}
